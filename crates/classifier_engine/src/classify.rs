use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use engine_logging::{engine_debug, engine_info};

use crate::settings::ClientSettings;
use crate::{ClassifyError, FailureKind, Prediction, UploadFile, DEFAULT_CONFIDENCE_PERCENT};

/// Multipart field the classifier reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// Sends one image to a remote classifier.
///
/// Implementations resolve every failure into a [`ClassifyError`]; nothing
/// escapes as a panic.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, upload: &UploadFile) -> Result<Prediction, ClassifyError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClassifier {
    settings: ClientSettings,
}

impl ReqwestClassifier {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ClassifyError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| ClassifyError::new(FailureKind::Network, err.to_string()))
    }

    fn build_form(upload: &UploadFile) -> Result<Form, ClassifyError> {
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|err| ClassifyError::new(FailureKind::InvalidUpload, err.to_string()))?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ClassifyError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ClassifyError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ClassifyError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Classifier for ReqwestClassifier {
    async fn classify(&self, upload: &UploadFile) -> Result<Prediction, ClassifyError> {
        let url = self
            .settings
            .predict_url()
            .map_err(|err| ClassifyError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;
        let form = Self::build_form(upload)?;

        engine_debug!(
            "POST {} file={} content_type={} bytes={}",
            url,
            upload.file_name,
            upload.content_type,
            upload.bytes.len()
        );
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.read_body(response).await?;
        let prediction = parse_prediction(&body)?;
        engine_info!(
            "Classified {} as {} ({:.1}%{})",
            upload.file_name,
            prediction.label,
            prediction.confidence_percent,
            if prediction.confidence_reported {
                ""
            } else {
                ", defaulted"
            }
        );
        Ok(prediction)
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    class_en: Option<String>,
    class_it: Option<String>,
    confidence: Option<f64>,
}

/// Parses a `/predict` response body.
///
/// `confidence` is a fraction in `[0, 1]`; it is scaled to percent and
/// clamped. A missing confidence becomes [`DEFAULT_CONFIDENCE_PERCENT`].
pub fn parse_prediction(body: &[u8]) -> Result<Prediction, ClassifyError> {
    let response: PredictResponse = serde_json::from_slice(body).map_err(|err| {
        ClassifyError::new(
            FailureKind::MalformedResponse,
            format!("invalid response body: {err}"),
        )
    })?;

    let label = non_empty(response.class_en).ok_or_else(|| {
        ClassifyError::new(FailureKind::MalformedResponse, "response has no class_en label")
    })?;
    let confidence_percent = match response.confidence {
        Some(fraction) => (fraction * 100.0).clamp(0.0, 100.0),
        None => DEFAULT_CONFIDENCE_PERCENT,
    };

    Ok(Prediction {
        label,
        source_label: non_empty(response.class_it),
        confidence_percent,
        confidence_reported: response.confidence.is_some(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> ClassifyError {
    if err.is_timeout() {
        return ClassifyError::new(FailureKind::Timeout, err.to_string());
    }
    ClassifyError::new(FailureKind::Network, err.to_string())
}
