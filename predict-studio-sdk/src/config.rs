//! Where the prediction service lives and how patiently to talk to it.

use crate::error::{SdkError, SdkResult};
use std::time::Duration;

/// Default address of a locally running prediction service
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Training on a large upload blocks the request until the model is fitted.
const TRAINING_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub base_url: String,
    /// Applies to every endpoint, so it must cover a full training run
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Retries for transport failures only; the service's own errors are final
    pub max_retries: u32,
    pub retry_initial_backoff: Duration,
    pub retry_max_backoff: Duration,
    pub user_agent: String,
    /// Log request and response bodies at debug level
    pub enable_logging: bool,
    pub custom_headers: Vec<(String, String)>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: TRAINING_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_initial_backoff: Duration::from_millis(100),
            retry_max_backoff: Duration::from_secs(5),
            user_agent: format!("predict-studio-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            custom_headers: Vec::new(),
        }
    }
}

impl SdkConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// The base URL must be an http(s) origin the endpoint paths can be appended to.
    pub fn validate(&self) -> SdkResult<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SdkError::ConfigurationError(format!(
                "Service URL must use http or https: {}",
                self.base_url
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(SdkError::ConfigurationError(format!(
                "Service URL cannot carry a query or fragment: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}
