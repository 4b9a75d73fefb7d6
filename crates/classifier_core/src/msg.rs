use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked file(s) through the file chooser.
    FilesPicked(Vec<crate::RawFile>),
    /// User dropped file(s) onto the drop target.
    FilesDropped(Vec<crate::RawFile>),
    /// Drag hover changed over the drop target.
    Drag(crate::DragEvent),
    /// Driver acknowledged `Effect::DispatchClassification`.
    DispatchReady { image_id: crate::ImageId },
    /// Classifier finished a request. `observed_at` is stamped by the driver
    /// right before this message is applied.
    ClassificationResolved {
        token: crate::RequestToken,
        outcome: crate::Outcome,
        observed_at: DateTime<Utc>,
    },
    /// User asked to classify the current image again.
    RetryClicked,
    /// User clicked Reset.
    ResetClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
