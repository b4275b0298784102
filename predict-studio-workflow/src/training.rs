//! Model training and the views rendered from a trained model.

use predict_studio_core::{
    display_value, BarChartSpec, ModelKind, ModelMetrics, StudioResult, TrainedModel,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::session::SessionContext;
use crate::status::StatusRegion;

pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Model kind and split ratio; target and features live in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingForm {
    pub kind: ModelKind,
    pub test_size: f64,
}

impl Default for TrainingForm {
    fn default() -> Self {
        Self {
            kind: ModelKind::Regression,
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

/// Work done, in order, after the service accepts a training request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostTrainingStep {
    StoreModel,
    RenderMetrics,
    RenderChart,
    RenderPredictionsTable,
    RegeneratePredictionForm,
}

impl PostTrainingStep {
    pub const SEQUENCE: [PostTrainingStep; 5] = [
        PostTrainingStep::StoreModel,
        PostTrainingStep::RenderMetrics,
        PostTrainingStep::RenderChart,
        PostTrainingStep::RenderPredictionsTable,
        PostTrainingStep::RegeneratePredictionForm,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl MetricCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }

    /// Four cards for regression, two percentage cards for classification.
    pub fn for_metrics(metrics: &ModelMetrics) -> Vec<MetricCard> {
        match metrics {
            ModelMetrics::Regression {
                train_r2,
                test_r2,
                train_rmse,
                test_rmse,
            } => vec![
                Self::new("Train R² Score", format!("{:.4}", train_r2)),
                Self::new("Test R² Score", format!("{:.4}", test_r2)),
                Self::new("Train RMSE", format!("{:.4}", train_rmse)),
                Self::new("Test RMSE", format!("{:.4}", test_rmse)),
            ],
            ModelMetrics::Classification {
                train_accuracy,
                test_accuracy,
            } => vec![
                Self::new("Train Accuracy", format!("{:.2}%", train_accuracy * 100.0)),
                Self::new("Test Accuracy", format!("{:.2}%", test_accuracy * 100.0)),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub actual: String,
    pub predicted: String,
}

/// Held-out rows next to the model's prediction for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionsTable {
    pub rows: Vec<PredictionRow>,
}

impl PredictionsTable {
    pub fn from_model(model: &TrainedModel) -> Self {
        Self {
            rows: model
                .samples
                .iter()
                .map(|s| PredictionRow {
                    actual: display_value(&s.actual),
                    predicted: display_value(&s.predicted),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingResults {
    pub kind: ModelKind,
    pub metrics: Vec<MetricCard>,
    pub chart: Option<BarChartSpec>,
    pub predictions: PredictionsTable,
    /// Steps that ran, in the order they ran.
    pub steps: Vec<PostTrainingStep>,
}

impl TrainingResults {
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
    }
}

pub struct TrainingController<'s> {
    session: &'s mut SessionContext,
}

impl<'s> TrainingController<'s> {
    pub(crate) fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    /// Train on the current selections and render the outcome.
    ///
    /// On failure the previous model and its views stay in place.
    pub async fn train(&mut self) -> StudioResult<TrainingResults> {
        let s = &mut *self.session;
        s.require_data()?;

        let form = s.training_form;
        let request = s
            .schema
            .training_request(form.kind, form.test_size)
            .map_err(|e| s.reject(e))?;

        s.status.loading(StatusRegion::Training, "Training model...");

        let response = match s.client.training().train(&request).await {
            Ok(response) => response,
            Err(e) => return Err(s.fail(StatusRegion::Training, "Error training model", e.into())),
        };

        let dataset = s
            .schema
            .dataset()
            .map(|d| d.filename.clone())
            .unwrap_or_default();
        let model = match response.into_model(&request, &dataset) {
            Ok(model) => model,
            Err(e) => return Err(s.fail(StatusRegion::Training, "Error training model", e)),
        };

        let mut results = TrainingResults {
            kind: model.kind,
            ..Default::default()
        };
        for step in PostTrainingStep::SEQUENCE {
            run_step(s, step, &model, &mut results)?;
        }

        info!(
            kind = %model.kind,
            target = %model.target_column,
            features = model.feature_columns.len(),
            "training results rendered"
        );
        s.status
            .success(StatusRegion::Training, "Model trained successfully!");
        s.views.training = Some(results.clone());
        Ok(results)
    }
}

fn run_step(
    s: &mut SessionContext,
    step: PostTrainingStep,
    model: &TrainedModel,
    results: &mut TrainingResults,
) -> StudioResult<()> {
    debug!(?step, "post-training step");
    match step {
        PostTrainingStep::StoreModel => {
            s.state.on_train_success()?;
            s.model = Some(model.clone());
        }
        PostTrainingStep::RenderMetrics => {
            results.metrics = MetricCard::for_metrics(&model.metrics);
        }
        PostTrainingStep::RenderChart => {
            let spec = BarChartSpec::feature_importance(&model.feature_importance);
            s.chart.replace(spec.clone());
            results.chart = Some(spec);
        }
        PostTrainingStep::RenderPredictionsTable => {
            results.predictions = PredictionsTable::from_model(model);
        }
        PostTrainingStep::RegeneratePredictionForm => {
            s.schema.build_prediction_form();
        }
    }
    results.steps.push(step);
    Ok(())
}
