use std::fmt;

use bytes::Bytes;

pub type RequestId = u64;

/// Confidence reported when the classifier omits one.
pub const DEFAULT_CONFIDENCE_PERCENT: f64 = 90.0;

/// The file part of a classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Label in the training dataset's own language, when reported.
    pub source_label: Option<String>,
    /// Within `0.0..=100.0`.
    pub confidence_percent: f64,
    /// False when `confidence_percent` is [`DEFAULT_CONFIDENCE_PERCENT`]
    /// because the response had no confidence.
    pub confidence_reported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ClassifyCompleted {
        request_id: RequestId,
        result: Result<Prediction, ClassifyError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClassifyError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClassifyError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    InvalidUpload,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    Network,
}

impl FailureKind {
    /// Whether the endpoint answered but the answer was unusable.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, FailureKind::MalformedResponse | FailureKind::TooLarge { .. })
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::InvalidUpload => write!(f, "invalid upload"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
