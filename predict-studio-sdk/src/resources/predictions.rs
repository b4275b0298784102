//! Predictions resource client

use crate::client::{HttpClient, UploadFile};
use crate::error::SdkResult;
use predict_studio_core::{ModelKind, PredictedValue, PredictionResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Client for single and batch predictions
#[derive(Debug, Clone)]
pub struct PredictionsClient {
    client: Arc<HttpClient>,
}

impl PredictionsClient {
    /// Create a new predictions client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Predict a single record keyed by column name
    pub async fn predict(&self, request: &PredictRequest) -> SdkResult<PredictResponse> {
        self.client.post_json("/predict", request).await
    }

    /// Predict every row of a CSV file
    pub async fn batch_predict(&self, file: &UploadFile) -> SdkResult<BatchPredictResponse> {
        let response: BatchPredictResponse = self.client.post_file("/batch-predict", file).await?;
        info!(filename = %file.filename, count = response.count, "batch prediction complete");
        Ok(response)
    }
}

/// Body of a single prediction request
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl PredictRequest {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

/// Response of the single prediction endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub model_type: ModelKind,
    pub prediction: PredictedValue,
    #[serde(default)]
    pub probability: Option<Vec<f64>>,
}

impl From<PredictResponse> for PredictionResult {
    fn from(r: PredictResponse) -> Self {
        PredictionResult {
            kind: r.model_type,
            prediction: r.prediction,
            probabilities: r.probability,
        }
    }
}

/// Response of the batch prediction endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPredictResponse {
    pub count: usize,
    pub csv: String,
    #[serde(default)]
    pub predictions: Option<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predict_request_shape() {
        let mut data = serde_json::Map::new();
        data.insert("a".into(), json!(1.5));
        let body = serde_json::to_value(PredictRequest::new(data)).unwrap();
        assert_eq!(body, json!({"data": {"a": 1.5}}));
    }

    #[test]
    fn test_classification_response() {
        let response: PredictResponse = serde_json::from_value(json!({
            "model_type": "classification",
            "prediction": "yes",
            "probability": [0.3, 0.7]
        }))
        .unwrap();
        let result: PredictionResult = response.into();
        assert_eq!(result.kind, ModelKind::Classification);
        assert_eq!(result.prediction, PredictedValue::Label("yes".into()));
        assert_eq!(result.probabilities, Some(vec![0.3, 0.7]));
    }

    #[test]
    fn test_regression_response_with_null_probability() {
        let response: PredictResponse = serde_json::from_value(json!({
            "model_type": "regression",
            "prediction": 12.5,
            "probability": null
        }))
        .unwrap();
        assert_eq!(response.prediction, PredictedValue::Number(12.5));
        assert!(response.probability.is_none());
    }
}
