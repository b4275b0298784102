//! HTTP client implementation
//!
//! This module provides the core HTTP client for the SDK: JSON and multipart
//! requests, optional transport retries, error-body extraction and
//! request/response logging.

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use reqwest::{header, multipart, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Multipart form field the service reads uploaded files from
pub const FILE_FIELD: &str = "file";

/// A file held in memory, ready to be sent as a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name reported to the service
    pub filename: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload from in-memory bytes
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name
    pub async fn from_path(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { filename, bytes })
    }

    fn to_part(&self) -> SdkResult<multipart::Part> {
        multipart::Part::bytes(self.bytes.clone())
            .file_name(self.filename.clone())
            .mime_str("text/csv")
            .map_err(SdkError::NetworkError)
    }
}

/// Body attached to a request
enum RequestBody<'a> {
    Empty,
    Json(String),
    File(&'a UploadFile),
}

/// The HTTP client for making service requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in &config.custom_headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.request(Method::GET, path, RequestBody::Empty).await
    }

    /// Make a POST request with a JSON body
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> SdkResult<T> {
        let json = serde_json::to_string(body)?;
        self.request(Method::POST, path, RequestBody::Json(json)).await
    }

    /// Make a POST request without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.request(Method::POST, path, RequestBody::Empty).await
    }

    /// Make a multipart POST request carrying a single file
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &UploadFile,
    ) -> SdkResult<T> {
        self.request(Method::POST, path, RequestBody::File(file)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody<'_>,
    ) -> SdkResult<T> {
        let response = self.execute_with_retry(method, path, &body).await?;

        let status = response.status();
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        if self.config.enable_logging {
            debug!("Response body: {}", text);
        }

        if !status.is_success() {
            warn!(%status, path, "service returned an error status");
            return Err(SdkError::from_response(status.as_u16(), &text));
        }

        let value: serde_json::Value = serde_json::from_str(&text)?;
        if let Some(err) = SdkError::embedded(&value) {
            warn!(path, "service reported an error in a successful response");
            return Err(err);
        }

        serde_json::from_value(value).map_err(SdkError::SerializationError)
    }

    /// Execute a request, retrying transport failures up to `max_retries` times
    async fn execute_with_retry(
        &self,
        method: Method,
        path: &str,
        body: &RequestBody<'_>,
    ) -> SdkResult<Response> {
        let url = self.url(path);

        let mut attempts = 0;
        let mut backoff = self.config.retry_initial_backoff;

        loop {
            if attempts > 0 {
                info!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempts, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, self.config.retry_max_backoff);
            }

            let mut request = self.client.request(method.clone(), &url);

            match body {
                RequestBody::Empty => {}
                RequestBody::Json(json) => {
                    request = request
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(json.clone());
                }
                RequestBody::File(file) => {
                    let form = multipart::Form::new().part(FILE_FIELD, file.to_part()?);
                    request = request.multipart(form);
                }
            }

            if self.config.enable_logging {
                debug!("Request: {} {}", method, url);
                match body {
                    RequestBody::Json(json) => debug!("Request body: {}", json),
                    RequestBody::File(file) => {
                        debug!("Request file: {} ({} bytes)", file.filename, file.bytes.len())
                    }
                    RequestBody::Empty => {}
                }
            }

            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    error!("Request failed: {}", e);

                    let err = if e.is_timeout() {
                        SdkError::Timeout(self.config.timeout.as_secs())
                    } else {
                        SdkError::NetworkError(e)
                    };

                    if !err.is_retryable() || attempts >= self.config.max_retries {
                        return Err(err);
                    }
                    attempts += 1;
                }
            }
        }
    }
}
