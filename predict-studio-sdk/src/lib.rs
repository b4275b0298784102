//! Predict Studio SDK
//!
//! This crate provides a typed async client for the Predict Studio service:
//! upload a CSV dataset, analyze it, train a regression or classification
//! model on it and request single or batch predictions.
//!
//! # Features
//!
//! - **Typed responses**: every endpoint deserializes into a dedicated struct
//! - **Multipart uploads**: CSV files are sent as the `file` form field
//! - **Service errors**: the `error` field of a response body is surfaced as-is
//! - **Optional retries**: transport failures can be retried with backoff
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use predict_studio_sdk::{StudioClient, SdkConfig, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StudioClient::new(SdkConfig::new("http://127.0.0.1:5000"))?;
//!
//!     let file = UploadFile::from_path("housing.csv").await?;
//!     let uploaded = client.datasets().upload(&file).await?;
//!     println!("{} rows, {} columns", uploaded.rows, uploaded.columns.len());
//!
//!     let analysis = client.datasets().analyze().await?;
//!     println!("numeric columns: {:?}", analysis.numeric_cols);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use predict_studio_sdk::{StudioClient, SdkError};
//!
//! async fn handle_errors(client: &StudioClient) {
//!     match client.datasets().analyze().await {
//!         Ok(analysis) => println!("{} columns", analysis.columns.len()),
//!         Err(SdkError::ApiError { status, message, .. }) => {
//!             eprintln!("service rejected the request ({}): {}", status, message)
//!         }
//!         Err(SdkError::BackendError(msg)) => eprintln!("service error: {}", msg),
//!         Err(e) => eprintln!("other error: {}", e),
//!     }
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

// Re-export main types for convenience
pub use client::{HttpClient, UploadFile, FILE_FIELD};
pub use config::{SdkConfig, DEFAULT_BASE_URL};
pub use error::{SdkError, SdkResult};

// Re-export resource clients
pub use resources::datasets::{AnalysisResponse, DataSummary, DatasetsClient, UploadResponse};
pub use resources::predictions::{
    BatchPredictResponse, PredictRequest, PredictResponse, PredictionsClient,
};
pub use resources::training::{
    ClassificationTrainingResponse, RegressionTrainingResponse, TrainingClient, TrainingResponse,
};

use std::sync::Arc;

/// The main client for the Predict Studio service.
///
/// Resource sub-clients share one HTTP connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use predict_studio_sdk::StudioClient;
/// use std::time::Duration;
///
/// let client = StudioClient::builder("http://127.0.0.1:5000")
///     .with_timeout(Duration::from_secs(120))
///     .build()?;
///
/// let datasets = client.datasets();
/// let training = client.training();
/// let predictions = client.predictions();
/// # Ok::<(), predict_studio_sdk::SdkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StudioClient {
    http_client: Arc<HttpClient>,
    datasets: DatasetsClient,
    training: TrainingClient,
    predictions: PredictionsClient,
}

impl StudioClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config)?);

        Ok(Self {
            datasets: DatasetsClient::new(Arc::clone(&http_client)),
            training: TrainingClient::new(Arc::clone(&http_client)),
            predictions: PredictionsClient::new(Arc::clone(&http_client)),
            http_client,
        })
    }

    /// Create a new client using a builder pattern.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Dataset upload, analysis and summary.
    pub fn datasets(&self) -> &DatasetsClient {
        &self.datasets
    }

    /// Model training.
    pub fn training(&self) -> &TrainingClient {
        &self.training
    }

    /// Single and batch predictions.
    pub fn predictions(&self) -> &PredictionsClient {
        &self.predictions
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// This is useful for making custom requests not covered by the resource clients.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the base URL of the service.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Builder for creating a StudioClient with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: SdkConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SdkConfig::new(base_url),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Set the maximum number of transport retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    /// Enable or disable request/response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(name, value);
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<StudioClient> {
        StudioClient::new(self.config)
    }
}
