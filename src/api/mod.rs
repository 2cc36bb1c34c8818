//! HTTP client for the text-classification backend.
//!
//! Talks to the backend with the synchronous `ureq` client. Every request
//! carries the configured timeout, so a stalled backend surfaces as
//! [`ApiError::Timeout`] instead of hanging the caller.
//!
//! Endpoints:
//!
//! - `GET  /api/models` — model comparison records
//! - `POST /predict`    — classify a piece of text
//! - `GET  /api/stats`  — project statistics
//! - `GET  /health`     — liveness and the serving model's name
//!
//! The dashboard and the form depend on the [`ModelSource`] and
//! [`Predictor`] traits rather than on [`ApiClient`] directly, so tests can
//! substitute in-memory fakes.

mod error;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::analytics::{Event, EventKind, EventLogger};
use crate::config::TextclassConfig;
use crate::models::{ModelRecord, is_unit_interval};

pub use error::ApiError;

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Anything that can produce the model comparison records.
pub trait ModelSource {
    fn fetch_models(&self) -> Result<Vec<ModelRecord>, ApiError>;
}

/// Anything that can classify a piece of text.
pub trait Predictor {
    fn predict(&self, text: &str) -> Result<PredictionResult, ApiError>;
}

// ---------------------------------------------------------------------------
// Prediction types
// ---------------------------------------------------------------------------

/// One ranked alternative from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPrediction {
    pub category: String,
    pub confidence: f64,
}

/// A validated prediction. Built fresh from each response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub category: String,
    pub model_name: String,
    pub word_count: u64,
    /// `None` when the model has no probability estimates.
    pub confidence: Option<f64>,
    pub top_predictions: Vec<TopPrediction>,
}

/// Request body for `POST /predict`.
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

/// Success body from `POST /predict`, before validation.
///
/// Every field is optional here so that a missing field is reported as a
/// malformed response rather than a generic decode error.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    category: Option<String>,
    model: Option<String>,
    word_count: Option<u64>,
    confidence: Option<f64>,
    top_predictions: Option<Vec<TopPrediction>>,
}

impl PredictResponse {
    /// Check the response shape and ranges; fail closed on anything odd.
    fn validate(self) -> Result<PredictionResult, ApiError> {
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApiError::Malformed("missing category".to_string()))?;
        let model_name = self
            .model
            .ok_or_else(|| ApiError::Malformed("missing model".to_string()))?;
        let word_count = self
            .word_count
            .ok_or_else(|| ApiError::Malformed("missing word_count".to_string()))?;

        if let Some(confidence) = self.confidence
            && !is_unit_interval(confidence)
        {
            return Err(ApiError::Malformed(format!(
                "confidence out of range: {confidence}"
            )));
        }

        let top_predictions = self.top_predictions.unwrap_or_default();
        if let Some(bad) = top_predictions
            .iter()
            .find(|p| !is_unit_interval(p.confidence))
        {
            return Err(ApiError::Malformed(format!(
                "top prediction '{}' has confidence {}",
                bad.category, bad.confidence
            )));
        }

        Ok(PredictionResult {
            category,
            model_name,
            word_count,
            confidence: self.confidence,
            top_predictions,
        })
    }
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// Stats / health types
// ---------------------------------------------------------------------------

/// Response body from `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub dataset: String,
    pub total_samples: String,
    pub categories: u32,
    pub features: String,
    pub best_model: String,
    #[serde(default)]
    pub preprocessing: Vec<String>,
    pub models_trained: u32,
}

/// Response body from `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous backend client. Cheap to build; create one per command.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    logger: EventLogger,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            logger: EventLogger::disabled(),
        }
    }

    /// Build a client from the resolved config, logging to the configured
    /// event log.
    pub fn from_config(config: &TextclassConfig) -> Self {
        Self::new(&config.api.base_url, Duration::from_millis(config.api.timeout_ms))
            .with_logger(EventLogger::from_config(config))
    }

    pub fn with_logger(mut self, logger: EventLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/stats`
    pub fn fetch_stats(&self) -> Result<ProjectStats, ApiError> {
        self.logged(EventKind::FetchStats, || {
            let body = self.get_body("/api/stats")?;
            parse_json(&body)
        })
    }

    /// `GET /health`
    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        self.logged(EventKind::Health, || {
            let body = self.get_body("/health")?;
            parse_json(&body)
        })
    }

    fn get_body(&self, path: &str) -> Result<String, ApiError> {
        let result = ureq::get(&self.url(path)).timeout(self.timeout).call();
        self.read_body(result)
    }

    fn read_body(
        &self,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<String, ApiError> {
        match result {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| self.map_io(e, "failed to read response body")),
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp
                    .into_string()
                    .ok()
                    .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                    .and_then(|body| body.error);
                Err(ApiError::Status { status, message })
            }
            Err(ureq::Error::Transport(transport)) => Err(self.map_transport(&transport)),
        }
    }

    fn map_transport(&self, transport: &ureq::Transport) -> ApiError {
        if is_timeout(transport) {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(transport.to_string())
        }
    }

    fn map_io(&self, err: std::io::Error, what: &str) -> ApiError {
        if is_timeout_kind(err.kind()) {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(format!("{what}: {err}"))
        }
    }

    /// Run `call`, then append one event with its outcome and latency.
    fn logged<T>(
        &self,
        kind: EventKind,
        call: impl FnOnce() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        self.logged_with(kind, |_| None, call)
    }

    /// Like [`ApiClient::logged`]; `describe` supplies the detail recorded
    /// for a successful call.
    fn logged_with<T>(
        &self,
        kind: EventKind,
        describe: impl FnOnce(&T) -> Option<String>,
        call: impl FnOnce() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let start = Instant::now();
        let result = call();
        let latency_ms = start.elapsed().as_millis() as u64;

        let event = match &result {
            Ok(value) => {
                let event = Event::new(kind, true);
                match describe(value) {
                    Some(detail) => event.with_detail(detail),
                    None => event,
                }
            }
            Err(e) => Event::new(kind, false).with_detail(e.to_string()),
        };
        self.logger.record(&event.with_latency(latency_ms));

        result
    }
}

impl ModelSource for ApiClient {
    /// `GET /api/models`
    fn fetch_models(&self) -> Result<Vec<ModelRecord>, ApiError> {
        self.logged(EventKind::FetchModels, || {
            let body = self.get_body("/api/models")?;
            parse_json(&body)
        })
    }
}

impl Predictor for ApiClient {
    /// `POST /predict` with `{"text": ...}`.
    fn predict(&self, text: &str) -> Result<PredictionResult, ApiError> {
        let describe = |p: &PredictionResult| Some(p.category.clone());
        self.logged_with(EventKind::Predict, describe, || {
            let result = ureq::post(&self.url("/predict"))
                .timeout(self.timeout)
                .send_json(PredictRequest { text });
            let body = self.read_body(result)?;
            parse_json::<PredictResponse>(&body)?.validate()
        })
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Walk the error chain looking for an I/O timeout.
fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>()
            && is_timeout_kind(io.kind())
        {
            return true;
        }
        source = err.source();
    }
    transport.to_string().contains("timed out")
}

fn is_timeout_kind(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
