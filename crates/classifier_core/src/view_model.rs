use crate::{ClassificationResult, ErrorDescriptor, ImageId, Phase, RequestToken};

/// Lower bound (inclusive) of the high confidence band, in percent.
pub const HIGH_CONFIDENCE_PERCENT: f64 = 90.0;
/// Lower bound (inclusive) of the medium confidence band, in percent.
pub const MEDIUM_CONFIDENCE_PERCENT: f64 = 75.0;

/// Read-only snapshot of the session for rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub phase: Phase,
    pub image: Option<ImageView>,
    pub active_token: Option<RequestToken>,
    pub result: Option<ClassificationResult>,
    pub error: Option<ErrorDescriptor>,
    pub drag_active: bool,
    pub dirty: bool,
}

impl SessionView {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::ImageSelected | Phase::Classifying)
    }

    pub fn confidence_band(&self) -> Option<ConfidenceBand> {
        self.result
            .as_ref()
            .map(|result| ConfidenceBand::from_percent(result.confidence_percent))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub image_id: ImageId,
    pub file_name: String,
    pub mime_type: String,
    pub byte_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= HIGH_CONFIDENCE_PERCENT {
            ConfidenceBand::High
        } else if percent >= MEDIUM_CONFIDENCE_PERCENT {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}
