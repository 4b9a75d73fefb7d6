//! Classifier core: pure session state machine, file acquisition and view-model helpers.
mod acquisition;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use acquisition::{acquire, try_acquire, AcquisitionError, CandidateFile, DragEvent, RawFile};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    ClassificationResult, ErrorDescriptor, ErrorKind, ImageId, ImageRef, Outcome, Phase,
    Prediction, RequestToken, Session,
};
pub use update::update;
pub use view_model::{
    ConfidenceBand, ImageView, SessionView, HIGH_CONFIDENCE_PERCENT, MEDIUM_CONFIDENCE_PERCENT,
};
