//! Datasets resource client
//!
//! Upload of the active dataset and the dataset-level summaries computed by
//! the service.

use crate::client::{HttpClient, UploadFile};
use crate::error::SdkResult;
use predict_studio_core::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Client for dataset operations
#[derive(Debug, Clone)]
pub struct DatasetsClient {
    client: Arc<HttpClient>,
}

impl DatasetsClient {
    /// Create a new datasets client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Upload a CSV file; it becomes the service's active dataset
    pub async fn upload(&self, file: &UploadFile) -> SdkResult<UploadResponse> {
        let response: UploadResponse = self.client.post_file("/upload", file).await?;
        info!(
            filename = %response.filename,
            rows = response.rows,
            columns = response.columns.len(),
            "dataset uploaded"
        );
        Ok(response)
    }

    /// Summary statistics of the active dataset
    pub async fn analyze(&self) -> SdkResult<AnalysisResponse> {
        self.client.post_empty("/analyze").await
    }

    /// Lightweight column partition of the active dataset
    pub async fn summary(&self) -> SdkResult<DataSummary> {
        self.client.get("/data-summary").await
    }
}

/// Response to a successful upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub shape: (u64, u64),
    pub rows: u64,
    pub columns: Vec<String>,
    #[serde(default)]
    pub dtypes: HashMap<String, String>,
    #[serde(default)]
    pub null_counts: HashMap<String, u64>,
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub statistics: String,
}

impl From<UploadResponse> for Dataset {
    fn from(r: UploadResponse) -> Self {
        Dataset {
            filename: r.filename,
            rows: r.rows,
            shape: r.shape,
            columns: r.columns,
            dtypes: r.dtypes,
            null_counts: r.null_counts,
            head: r.head,
            statistics: r.statistics,
        }
    }
}

/// Response of the analysis endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub shape: (u64, u64),
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub dtypes: HashMap<String, String>,
    #[serde(default)]
    pub null_counts: HashMap<String, u64>,
    /// Percentage of missing values per column, in the service's column order
    #[serde(default)]
    pub null_percentage: serde_json::Map<String, serde_json::Value>,
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    /// Correlation matrix, JSON-encoded by the service
    #[serde(default)]
    pub correlation: Option<serde_json::Value>,
    /// Descriptive statistics, JSON-encoded by the service
    #[serde(default)]
    pub statistics: Option<serde_json::Value>,
}

impl AnalysisResponse {
    /// Columns whose missing percentage is strictly positive
    pub fn missing_percentages(&self) -> Vec<(String, f64)> {
        let order: Vec<&String> = if self.columns.is_empty() {
            self.null_percentage.keys().collect()
        } else {
            self.columns
                .iter()
                .filter(|c| self.null_percentage.contains_key(*c))
                .collect()
        };

        order
            .into_iter()
            .filter_map(|col| {
                let pct = self.null_percentage.get(col)?.as_f64()?;
                (pct > 0.0).then(|| (col.clone(), pct))
            })
            .collect()
    }
}

/// Response of the data summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSummary {
    pub shape: (u64, u64),
    pub columns: Vec<String>,
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
}
