//! The external classification service and its wire contract.
//!
//! [`ClassificationService`] is the seam the dispatcher talks to. The HTTP
//! implementation owns the endpoint paths, request payloads, and the
//! validation step that turns a malformed body into [`DispatchError::Parse`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::core::error::DispatchError;
use crate::core::input::{FileRef, SingleInput};
use crate::core::results::{Metrics, PredictionResult, RetrainResult};

/// Address used when neither the command line nor the settings name one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Endpoint classifying JSON records.
pub const PREDICT_PATH: &str = "/predict";
/// Endpoint classifying an uploaded file.
pub const PREDICT_FILE_PATH: &str = "/predict_csv";
/// Endpoint retraining from an uploaded labeled file.
pub const RETRAIN_PATH: &str = "/retrain";
/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Operations offered by the classification service.
#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Classifies one record.
    async fn predict(&self, input: SingleInput) -> Result<PredictionResult, DispatchError>;

    /// Classifies every record of `file`, one result per record in file order.
    async fn predict_file(&self, file: FileRef) -> Result<PredictionResult, DispatchError>;

    /// Retrains the model from the labeled records of `file`.
    async fn retrain(&self, file: FileRef) -> Result<RetrainResult, DispatchError>;
}

/// One record as the service expects it.
#[derive(Debug, Serialize)]
pub struct RecordPayload<'a> {
    #[serde(rename = "Titulo")]
    pub title: &'a str,
    #[serde(rename = "Descripcion")]
    pub body: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictionBody {
    predictions: Option<Vec<i64>>,
    probabilities: Option<Vec<f64>>,
    metrics: Option<MetricsBody>,
}

#[derive(Debug, Deserialize)]
struct MetricsBody {
    precision: f64,
    recall: f64,
    f1_score: f64,
}

impl From<MetricsBody> for Metrics {
    fn from(body: MetricsBody) -> Self {
        Self {
            precision: body.precision,
            recall: body.recall,
            f1: body.f1_score,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn decode(bytes: &[u8]) -> Result<PredictionBody, DispatchError> {
    serde_json::from_slice(bytes).map_err(|e| DispatchError::Parse(e.to_string()))
}

fn prediction_from(body: &mut PredictionBody) -> Result<PredictionResult, DispatchError> {
    let predictions = body
        .predictions
        .take()
        .ok_or_else(|| DispatchError::Parse("missing field `predictions`".to_string()))?;
    let probabilities = body
        .probabilities
        .take()
        .ok_or_else(|| DispatchError::Parse("missing field `probabilities`".to_string()))?;
    PredictionResult::new(predictions, probabilities)
}

/// Parses a prediction body, checking the record count when it is known.
///
/// # Errors
///
/// Returns [`DispatchError::Parse`] when the body is not JSON, lacks either
/// sequence, has sequences of different lengths, or has an unexpected count.
pub fn parse_prediction(
    bytes: &[u8],
    expected_len: Option<usize>,
) -> Result<PredictionResult, DispatchError> {
    let result = prediction_from(&mut decode(bytes)?)?;
    match expected_len {
        Some(expected) if result.len() != expected => Err(DispatchError::Parse(format!(
            "expected {expected} prediction(s), got {}",
            result.len()
        ))),
        _ => Ok(result),
    }
}

/// Parses a retrain body.
///
/// # Errors
///
/// Returns [`DispatchError::Parse`] for the same reasons as
/// [`parse_prediction`], or when `metrics` is missing or incomplete.
pub fn parse_retrain(bytes: &[u8]) -> Result<RetrainResult, DispatchError> {
    let mut body = decode(bytes)?;
    let prediction = prediction_from(&mut body)?;
    let metrics = body
        .metrics
        .ok_or_else(|| DispatchError::Parse("missing field `metrics`".to_string()))?;
    Ok(RetrainResult {
        prediction,
        metrics: metrics.into(),
    })
}

/// Extracts a readable detail from an error body.
///
/// FastAPI-style services answer `{"detail": ...}`; anything else is shown
/// verbatim (trimmed), or replaced by the status reason when empty.
#[must_use]
pub fn error_detail(bytes: &[u8], reason: &str) -> String {
    if let Ok(body) = serde_json::from_slice::<ErrorBody>(bytes) {
        return match body.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
    }
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() {
        reason.to_string()
    } else {
        text
    }
}

/// Classification service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClassificationService {
    http: Client,
    base_url: String,
}

impl HttpClassificationService {
    /// Creates a client for the service at `base_url`.
    ///
    /// A trailing slash on the base URL is ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Reads `file` into a multipart form under [`UPLOAD_FIELD`].
    async fn upload_form(file: &FileRef) -> Result<Form, DispatchError> {
        let bytes = tokio::fs::read(file.path()).await.map_err(|e| {
            DispatchError::Validation(format!(
                "could not read {}: {e}",
                file.path().display()
            ))
        })?;
        let part = Part::bytes(bytes).file_name(file.file_name());
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }

    /// Returns the body of a success response, or the matching error.
    async fn read_success(response: Response) -> Result<Vec<u8>, DispatchError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("request failed");
            return Err(DispatchError::Service {
                status: status.as_u16(),
                detail: error_detail(&bytes, reason),
            });
        }
        Ok(bytes.to_vec())
    }

    async fn post_upload(&self, path: &str, file: &FileRef) -> Result<Vec<u8>, DispatchError> {
        let form = Self::upload_form(file).await?;
        tracing::debug!(path, file = %file.path().display(), "uploading file");
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        Self::read_success(response).await
    }
}

#[async_trait]
impl ClassificationService for HttpClassificationService {
    async fn predict(&self, input: SingleInput) -> Result<PredictionResult, DispatchError> {
        let records = [RecordPayload {
            title: &input.title,
            body: &input.body,
        }];
        let response = self
            .http
            .post(self.url(PREDICT_PATH))
            .json(&records)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        let bytes = Self::read_success(response).await?;
        parse_prediction(&bytes, Some(1))
    }

    async fn predict_file(&self, file: FileRef) -> Result<PredictionResult, DispatchError> {
        let bytes = self.post_upload(PREDICT_FILE_PATH, &file).await?;
        parse_prediction(&bytes, None)
    }

    async fn retrain(&self, file: FileRef) -> Result<RetrainResult, DispatchError> {
        let bytes = self.post_upload(RETRAIN_PATH, &file).await?;
        parse_retrain(&bytes)
    }
}
