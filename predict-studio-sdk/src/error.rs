//! SDK error types and handling
//!
//! The service reports failures as a JSON body carrying a human-readable
//! `error` field, either with a non-2xx status or, occasionally, inside an
//! otherwise successful response.

use predict_studio_core::StudioError;
use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Service answered with a non-2xx status
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        /// Whether `message` came from the body's `error` field
        from_body: bool,
    },

    /// Service answered 2xx but the body carries an `error` field
    #[error("Service error: {0}")]
    BackendError(String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Local file could not be read
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Error body returned by the service
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

impl SdkError {
    /// Create an API error from a non-2xx response
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(response) => SdkError::ApiError {
                status,
                message: response.error,
                from_body: true,
            },
            Err(_) => SdkError::ApiError {
                status,
                message: format!("Request failed with status code {}", status),
                from_body: false,
            },
        }
    }

    /// Extract the `error` field from a successful response body, if present
    pub fn embedded(body: &serde_json::Value) -> Option<Self> {
        body.get("error")
            .and_then(|e| e.as_str())
            .map(|msg| SdkError::BackendError(msg.to_string()))
    }

    /// Check if the error is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, SdkError::NetworkError(_) | SdkError::Timeout(_))
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<SdkError> for StudioError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::ApiError { message, .. } => StudioError::Transport(message),
            SdkError::BackendError(message) => StudioError::Backend(message),
            SdkError::Timeout(secs) => {
                StudioError::Transport(format!("Request timed out after {} seconds", secs))
            }
            SdkError::NetworkError(e) => StudioError::Transport(format!(
                "Could not reach the prediction service: {}",
                e
            )),
            SdkError::SerializationError(e) => {
                StudioError::Backend(format!("Unexpected response from the service: {}", e))
            }
            SdkError::ConfigurationError(msg) => StudioError::Transport(msg),
            SdkError::UrlError(e) => StudioError::Transport(format!("Invalid URL: {}", e)),
            SdkError::FileError(e) => StudioError::Validation(format!("Could not read file: {}", e)),
        }
    }
}
