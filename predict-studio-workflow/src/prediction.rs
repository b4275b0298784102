//! Single-record and batch predictions against the trained model.

use predict_studio_core::{
    DownloadSink, ModelKind, PredictedValue, PredictionResult, StudioError, StudioResult,
};
use predict_studio_sdk::PredictRequest;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::session::SessionContext;
use crate::status::StatusRegion;
use crate::upload::SelectedFile;

pub const BATCH_FILENAME: &str = "predictions.csv";
pub const CSV_MIME: &str = "text/csv";
pub const NO_BATCH_FILE_MESSAGE: &str = "Please select a file for batch prediction";

/// One class probability; classes are identified by position only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityBar {
    pub class_index: usize,
    pub label: String,
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model_type", rename_all = "lowercase")]
pub enum PredictionView {
    Regression { value: String },
    Classification { label: String, bars: Vec<ProbabilityBar> },
}

impl PredictionView {
    pub fn from_result(result: &PredictionResult) -> Self {
        match result.kind {
            ModelKind::Regression => PredictionView::Regression {
                value: match &result.prediction {
                    PredictedValue::Number(n) => format!("{:.4}", n),
                    PredictedValue::Label(s) => s.clone(),
                },
            },
            ModelKind::Classification => PredictionView::Classification {
                label: result.prediction.to_string(),
                bars: result
                    .probabilities
                    .iter()
                    .flatten()
                    .enumerate()
                    .map(|(i, p)| ProbabilityBar {
                        class_index: i,
                        label: format!("Class {}: {:.2}%", i, p * 100.0),
                        width_percent: p * 100.0,
                    })
                    .collect(),
            },
        }
    }
}

/// A result file the user may save locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOffer {
    pub filename: String,
    pub mime: String,
    pub csv: String,
}

impl DownloadOffer {
    pub fn csv(csv: impl Into<String>) -> Self {
        Self {
            filename: BATCH_FILENAME.to_string(),
            mime: CSV_MIME.to_string(),
            csv: csv.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResultView {
    pub count: usize,
    pub offer: DownloadOffer,
}

/// Stage the payload, save it under the offer's name, then release the staged object.
///
/// The staged object is released whether or not the save succeeds.
pub async fn download(offer: &DownloadOffer, sink: &mut dyn DownloadSink) -> StudioResult<PathBuf> {
    let staged = sink.stage(offer.csv.as_bytes().to_vec(), &offer.mime).await?;
    let saved = sink.save_as(&staged, &offer.filename).await;
    sink.release(staged).await;
    match &saved {
        Ok(path) => info!(path = %path.display(), "predictions saved"),
        Err(e) => warn!(error = %e, "saving predictions failed"),
    }
    saved
}

pub struct PredictionController<'s> {
    session: &'s mut SessionContext,
}

impl<'s> PredictionController<'s> {
    pub(crate) fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    /// Predict one record from raw form values keyed by column name.
    pub async fn predict_single(&mut self, raw: &[(String, String)]) -> StudioResult<PredictionView> {
        let s = &mut *self.session;
        s.require_model()?;
        let record = s.schema.decode_inputs(raw).map_err(|e| s.reject(e))?;

        s.status.loading(StatusRegion::SinglePrediction, "Predicting...");
        let response = match s.client.predictions().predict(&PredictRequest::new(record)).await {
            Ok(response) => response,
            Err(e) => return Err(s.fail(StatusRegion::SinglePrediction, "Error", e.into())),
        };

        let result: PredictionResult = response.into();
        let view = PredictionView::from_result(&result);
        info!(kind = %result.kind, prediction = %result.prediction, "single prediction");
        s.status.clear(StatusRegion::SinglePrediction);
        s.views.prediction = Some(view.clone());
        Ok(view)
    }

    /// Files chosen with the batch file picker.
    pub fn select_batch_file(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        self.session.batch_zone.select(files)
    }

    /// Predict every row of the selected batch file.
    pub async fn predict_batch(&mut self) -> StudioResult<BatchResultView> {
        let s = &mut *self.session;
        s.require_model()?;
        let file = match s.batch_zone.selection().first() {
            Some(file) => file.clone(),
            None => {
                return Err(s.reject(StudioError::Validation(NO_BATCH_FILE_MESSAGE.to_string())))
            }
        };

        s.status.loading(StatusRegion::BatchPrediction, "Predicting...");
        let response = match s.client.predictions().batch_predict(&file).await {
            Ok(response) => response,
            Err(e) => return Err(s.fail(StatusRegion::BatchPrediction, "Error", e.into())),
        };

        let view = BatchResultView {
            count: response.count,
            offer: DownloadOffer::csv(response.csv),
        };
        s.status.clear(StatusRegion::BatchPrediction);
        s.views.batch = Some(view.clone());
        Ok(view)
    }

    /// Save the current batch result through `sink`.
    pub async fn download(&mut self, sink: &mut dyn DownloadSink) -> StudioResult<PathBuf> {
        let offer = match &self.session.views.batch {
            Some(view) => view.offer.clone(),
            None => {
                return Err(self.session.reject(StudioError::Validation(
                    "No batch predictions to download".to_string(),
                )))
            }
        };
        download(&offer, sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_view_has_four_decimals() {
        let view = PredictionView::from_result(&PredictionResult {
            kind: ModelKind::Regression,
            prediction: PredictedValue::Number(3.14159),
            probabilities: None,
        });
        assert_eq!(
            view,
            PredictionView::Regression {
                value: "3.1416".to_string()
            }
        );
    }

    #[test]
    fn test_classification_without_probabilities_has_no_bars() {
        let view = PredictionView::from_result(&PredictionResult {
            kind: ModelKind::Classification,
            prediction: PredictedValue::Label("cat".into()),
            probabilities: None,
        });
        match view {
            PredictionView::Classification { label, bars } => {
                assert_eq!(label, "cat");
                assert!(bars.is_empty());
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_download_offer_defaults() {
        let offer = DownloadOffer::csv("a\n1\n");
        assert_eq!(offer.filename, "predictions.csv");
        assert_eq!(offer.mime, "text/csv");
    }
}
