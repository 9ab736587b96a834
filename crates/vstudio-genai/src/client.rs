//! REST client for the generative services.
//!
//! - API key authentication via the `x-goog-api-key` header
//! - HTTP client tuning (pooling, timeouts)
//! - Observability (tracing spans, metrics)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, info_span, Instrument};
use url::Url;

use vstudio_models::JobHandle;

use crate::error::{GenAiError, GenAiResult};
use crate::metrics::{record_poll, record_request};
use crate::reasoning::{ContentRequest, ContentResponse, ReasoningService};
use crate::types::{GenerateContentResponse, Operation};
use crate::video::{VideoJobRequest, VideoJobService};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// Configuration
// =============================================================================

/// Generative service client configuration.
#[derive(Clone)]
pub struct GenAiConfig {
    /// API key
    pub api_key: String,
    /// Base URL of the REST API (without trailing slash)
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl GenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| GenAiError::MissingCredential)?;

        if api_key.trim().is_empty() {
            return Err(GenAiError::MissingCredential);
        }

        let timeout_secs: u64 = std::env::var("GENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);
        let connect_timeout_secs: u64 = std::env::var("GENAI_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let config = Self {
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            ..Self::new("")
        };

        Ok(match std::env::var("GENAI_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// REST client implementing both [`ReasoningService`] and [`VideoJobService`].
#[derive(Clone)]
pub struct GenAiClient {
    http: Client,
    config: GenAiConfig,
}

impl GenAiClient {
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GenAiError::MissingCredential);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("vstudio-genai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GenAiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        Self::new(GenAiConfig::from_env()?)
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url, model, method)
    }

    fn operation_url(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url, name.trim_start_matches('/'))
    }

    async fn execute_request<T, F>(&self, operation: &str, model: &str, fut: F) -> GenAiResult<T>
    where
        F: std::future::Future<Output = GenAiResult<T>>,
    {
        let span = info_span!("genai_request", operation = %operation, model = %model);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> GenAiError {
        let body = response.text().await.unwrap_or_default();
        GenAiError::from_http_status(status.as_u16(), &body)
    }
}

#[async_trait]
impl ReasoningService for GenAiClient {
    async fn generate_content(&self, request: &ContentRequest) -> GenAiResult<ContentResponse> {
        let url = self.model_url(&request.model, "generateContent");
        let body = request.to_wire();

        self.execute_request("generate_content", &request.model, async {
            debug!(
                "generateContent with {} inline parts, {} total",
                request.inline_count(),
                request.parts.len()
            );

            let response = self
                .http
                .post(&url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, response).await);
            }

            let parsed: GenerateContentResponse = response.json().await?;
            Ok(ContentResponse::from(parsed))
        })
        .await
    }
}

#[async_trait]
impl VideoJobService for GenAiClient {
    async fn submit(&self, request: &VideoJobRequest) -> GenAiResult<JobHandle> {
        let url = self.model_url(&request.model, "predictLongRunning");
        let body = request.to_wire();

        self.execute_request("submit_video_job", &request.model, async {
            let response = self
                .http
                .post(&url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, response).await);
            }

            let operation: Operation = response.json().await?;
            debug!(operation = %operation.name, "Submitted predictLongRunning");
            Ok(JobHandle::from(operation))
        })
        .await
    }

    async fn poll(&self, handle: &JobHandle) -> GenAiResult<JobHandle> {
        let url = self.operation_url(&handle.name);
        record_poll();

        self.execute_request("poll_video_job", "", async {
            let response = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, response).await);
            }

            let operation: Operation = response.json().await?;
            let refreshed = JobHandle::from(operation);
            if refreshed.done {
                info!(
                    operation = %refreshed.name,
                    results = refreshed.result_uris.len(),
                    failed = refreshed.failure.is_some(),
                    "Video job reached terminal state"
                );
            } else {
                debug!(operation = %refreshed.name, "Video job still running");
            }
            Ok(refreshed)
        })
        .await
    }

    async fn fetch_result(&self, uri: &str) -> GenAiResult<Vec<u8>> {
        let url = Url::parse(uri)
            .map_err(|e| GenAiError::invalid_response(format!("Invalid result URI {}: {}", uri, e)))?;

        self.execute_request("fetch_result", "", async {
            let response = self
                .http
                .get(url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, response).await);
            }

            let bytes = response.bytes().await?;
            debug!("Fetched {} bytes of job output", bytes.len());
            Ok(bytes.to_vec())
        })
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
