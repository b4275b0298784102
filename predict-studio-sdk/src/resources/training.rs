//! Training resource client
//!
//! The model kind picks the endpoint; the request body is the same for both.

use crate::client::HttpClient;
use crate::error::SdkResult;
use predict_studio_core::{
    FeatureImportance, ModelKind, ModelMetrics, StudioResult, TrainedModel, TrainingRequest,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Client for model training
#[derive(Debug, Clone)]
pub struct TrainingClient {
    client: Arc<HttpClient>,
}

impl TrainingClient {
    /// Create a new training client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Train a model of the request's kind on the active dataset
    pub async fn train(&self, request: &TrainingRequest) -> SdkResult<TrainingResponse> {
        let path = request.endpoint();
        let response = match request.kind {
            ModelKind::Regression => {
                TrainingResponse::Regression(self.client.post_json(path, request).await?)
            }
            ModelKind::Classification => {
                TrainingResponse::Classification(self.client.post_json(path, request).await?)
            }
        };
        info!(
            kind = %request.kind,
            target = %request.target_column,
            features = request.feature_columns.len(),
            "model trained"
        );
        Ok(response)
    }
}

/// Metrics and samples returned by the regression endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTrainingResponse {
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_rmse: f64,
    pub test_rmse: f64,
    pub feature_importance: HashMap<String, f64>,
    #[serde(default)]
    pub actual: Vec<serde_json::Value>,
    #[serde(default)]
    pub predicted: Vec<serde_json::Value>,
    #[serde(default)]
    pub samples: usize,
}

/// Metrics and samples returned by the classification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationTrainingResponse {
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub feature_importance: HashMap<String, f64>,
    #[serde(default)]
    pub actual: Vec<serde_json::Value>,
    #[serde(default)]
    pub predicted: Vec<serde_json::Value>,
    #[serde(default)]
    pub samples: usize,
    #[serde(default)]
    pub classes: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub classification_report: Option<serde_json::Value>,
}

/// Training outcome, by model kind
#[derive(Debug, Clone)]
pub enum TrainingResponse {
    Regression(RegressionTrainingResponse),
    Classification(ClassificationTrainingResponse),
}

impl TrainingResponse {
    /// Convert into the client-held model descriptor for `request`
    pub fn into_model(self, request: &TrainingRequest, dataset: &str) -> StudioResult<TrainedModel> {
        let model = match self {
            TrainingResponse::Regression(r) => TrainedModel::new(
                ModelMetrics::Regression {
                    train_r2: r.train_r2,
                    test_r2: r.test_r2,
                    train_rmse: r.train_rmse,
                    test_rmse: r.test_rmse,
                },
                FeatureImportance::from_map(r.feature_importance)?,
            )
            .with_samples(r.samples, r.actual, r.predicted),
            TrainingResponse::Classification(c) => {
                let model = TrainedModel::new(
                    ModelMetrics::Classification {
                        train_accuracy: c.train_accuracy,
                        test_accuracy: c.test_accuracy,
                    },
                    FeatureImportance::from_map(c.feature_importance)?,
                )
                .with_samples(c.samples, c.actual, c.predicted);
                match c.classes {
                    Some(classes) => model.with_classes(classes),
                    None => model,
                }
            }
        };

        Ok(model
            .with_columns(request.target_column.clone(), request.feature_columns.clone())
            .with_dataset(dataset))
    }
}
