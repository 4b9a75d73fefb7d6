use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_info};

use crate::view_model::{ImageView, SessionView};
use crate::{CandidateFile, Effect};

pub type RequestToken = u64;
pub type ImageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    ImageSelected,
    Classifying,
    Resulted,
    Failed,
}

/// The image currently owned by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub id: ImageId,
    pub file: CandidateFile,
}

/// What the remote classifier reported, before the session accepts it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub source_label: Option<String>,
    pub confidence_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub source_label: Option<String>,
    /// Always within `0.0..=100.0`.
    pub confidence_percent: f64,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorDescriptor {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Prediction),
    Failure(ErrorDescriptor),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    phase: Phase,
    image: Option<ImageRef>,
    active_token: Option<RequestToken>,
    result: Option<ClassificationResult>,
    error: Option<ErrorDescriptor>,
    drag_active: bool,
    last_token: RequestToken,
    last_image_id: ImageId,
    dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn active_token(&self) -> Option<RequestToken> {
        self.active_token
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            image: self.image.as_ref().map(|image| ImageView {
                image_id: image.id,
                file_name: image.file.name().to_string(),
                mime_type: image.file.mime_type().to_string(),
                byte_len: image.file.len(),
            }),
            active_token: self.active_token,
            result: self.result.clone(),
            error: self.error.clone(),
            drag_active: self.drag_active,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_drag_active(&mut self, active: bool) {
        if self.drag_active != active {
            self.drag_active = active;
            self.mark_dirty();
        }
    }

    /// Takes ownership of a newly acquired image, superseding whatever the
    /// session held before, including an in-flight request.
    pub(crate) fn select(&mut self, file: CandidateFile) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(previous) = self.image.take() {
            effects.push(Effect::ReleaseImage {
                image_id: previous.id,
            });
        }
        if let Some(token) = self.active_token.take() {
            engine_debug!("Request {} superseded by a new selection", token);
        }

        self.last_image_id += 1;
        let image_id = self.last_image_id;
        engine_info!(
            "Selected image {} name={} mime={} bytes={}",
            image_id,
            file.name(),
            file.mime_type(),
            file.len()
        );
        self.image = Some(ImageRef { id: image_id, file });
        self.result = None;
        self.error = None;
        self.phase = Phase::ImageSelected;
        self.mark_dirty();

        effects.push(Effect::DispatchClassification { image_id });
        effects
    }

    /// Moves a selected image into `Classifying` under a fresh token.
    pub(crate) fn dispatch(&mut self, image_id: ImageId) -> Option<Effect> {
        if self.phase != Phase::ImageSelected {
            engine_debug!(
                "Ignoring dispatch for image {} in phase {:?}",
                image_id,
                self.phase
            );
            return None;
        }
        let file = match self.image.as_ref() {
            Some(image) if image.id == image_id => image.file.clone(),
            _ => {
                engine_debug!("Ignoring dispatch for superseded image {}", image_id);
                return None;
            }
        };

        self.last_token += 1;
        let token = self.last_token;
        self.active_token = Some(token);
        self.phase = Phase::Classifying;
        self.mark_dirty();

        Some(Effect::Classify {
            token,
            image_id,
            file,
        })
    }

    /// Applies an outcome if `token` is still current. Returns whether it was applied.
    pub(crate) fn resolve(
        &mut self,
        token: RequestToken,
        outcome: Outcome,
        observed_at: DateTime<Utc>,
    ) -> bool {
        if self.phase != Phase::Classifying || self.active_token != Some(token) {
            engine_debug!(
                "Discarding stale outcome for request {} (current {:?})",
                token,
                self.active_token
            );
            return false;
        }

        self.active_token = None;
        match accept(outcome, observed_at) {
            Ok(result) => {
                engine_info!(
                    "Request {} classified as {} ({:.1}%)",
                    token,
                    result.label,
                    result.confidence_percent
                );
                self.result = Some(result);
                self.error = None;
                self.phase = Phase::Resulted;
            }
            Err(error) => {
                engine_info!("Request {} failed: {}", token, error.message);
                self.error = Some(error);
                self.result = None;
                self.phase = Phase::Failed;
            }
        }
        self.mark_dirty();
        true
    }

    /// Sends the held image again after a result or failure.
    pub(crate) fn retry(&mut self) -> Vec<Effect> {
        if !matches!(self.phase, Phase::Resulted | Phase::Failed) {
            return Vec::new();
        }
        let Some(image_id) = self.image.as_ref().map(|image| image.id) else {
            return Vec::new();
        };
        self.result = None;
        self.error = None;
        self.phase = Phase::ImageSelected;
        self.mark_dirty();
        vec![Effect::DispatchClassification { image_id }]
    }

    pub(crate) fn reset(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Idle && !self.drag_active {
            return Vec::new();
        }
        if let Some(token) = self.active_token {
            engine_debug!("Reset while request {} is pending", token);
        }

        let effects = self
            .image
            .take()
            .map(|image| Effect::ReleaseImage { image_id: image.id })
            .into_iter()
            .collect();
        self.active_token = None;
        self.result = None;
        self.error = None;
        self.drag_active = false;
        self.phase = Phase::Idle;
        self.mark_dirty();
        effects
    }
}

fn accept(
    outcome: Outcome,
    observed_at: DateTime<Utc>,
) -> Result<ClassificationResult, ErrorDescriptor> {
    match outcome {
        Outcome::Success(prediction) => {
            if prediction.label.trim().is_empty() {
                return Err(ErrorDescriptor::new(
                    ErrorKind::MalformedResponse,
                    "classifier returned an empty label",
                ));
            }
            Ok(ClassificationResult {
                label: prediction.label,
                source_label: prediction.source_label,
                confidence_percent: prediction.confidence_percent.clamp(0.0, 100.0),
                observed_at,
            })
        }
        Outcome::Failure(error) => Err(error),
    }
}
