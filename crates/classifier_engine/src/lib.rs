//! Classifier engine: HTTP client for the remote classifier and effect execution.
mod classify;
mod engine;
mod settings;
mod types;

pub use classify::{parse_prediction, Classifier, ReqwestClassifier, UPLOAD_FIELD};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use settings::{ClientSettings, ConfigError, BASE_URL_ENV, DEFAULT_BASE_URL, PREDICT_PATH};
pub use types::{
    ClassifyError, EngineEvent, FailureKind, Prediction, RequestId, UploadFile,
    DEFAULT_CONFIDENCE_PERCENT,
};
