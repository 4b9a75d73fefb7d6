use std::collections::BTreeSet;
use std::sync::{mpsc, Arc};

use chrono::{DateTime, Utc};
use classifier_core::{Effect, ErrorDescriptor, ErrorKind, ImageId, Msg, Outcome, Prediction};
use classifier_engine::{
    ClassifyError, ClientSettings, EngineEvent, EngineHandle, EventSink, UploadFile,
};
use engine_logging::{engine_debug, engine_info, engine_warn};

use super::app::AppEvent;

/// Forwards engine completions into the app's event queue.
struct AppEventSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Engine(event));
    }
}

/// Where effects end up. Split out so the driver can be tested without HTTP.
pub trait EffectTarget {
    fn classify(&mut self, request_id: u64, upload: UploadFile);
    fn send(&mut self, msg: Msg);
}

pub struct EngineTarget {
    engine: EngineHandle,
    tx: mpsc::Sender<AppEvent>,
}

impl EngineTarget {
    pub fn new(settings: ClientSettings, tx: mpsc::Sender<AppEvent>) -> Self {
        let sink = Arc::new(AppEventSink { tx: tx.clone() });
        Self {
            engine: EngineHandle::new(settings, sink),
            tx,
        }
    }
}

impl EffectTarget for EngineTarget {
    fn classify(&mut self, request_id: u64, upload: UploadFile) {
        self.engine.classify(request_id, upload);
    }

    fn send(&mut self, msg: Msg) {
        let _ = self.tx.send(AppEvent::Msg(msg));
    }
}

pub struct EffectRunner<T> {
    target: T,
    /// Images the adapter currently shows a preview for.
    previews: BTreeSet<ImageId>,
}

impl<T: EffectTarget> EffectRunner<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            previews: BTreeSet::new(),
        }
    }

    #[cfg(test)]
    pub fn live_previews(&self) -> usize {
        self.previews.len()
    }

    #[cfg(test)]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[cfg(test)]
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::DispatchClassification { image_id } => {
                    self.previews.insert(image_id);
                    // Round-trip through the queue so observers see the
                    // selected phase before the request goes out.
                    self.target.send(Msg::DispatchReady { image_id });
                }
                Effect::Classify {
                    token,
                    image_id,
                    file,
                } => {
                    engine_info!(
                        "Classify token={} image_id={} name={}",
                        token,
                        image_id,
                        file.name()
                    );
                    let upload = UploadFile {
                        file_name: file.name().to_string(),
                        content_type: file.mime_type().to_string(),
                        bytes: file.bytes().clone(),
                    };
                    self.target.classify(token, upload);
                }
                Effect::ReleaseImage { image_id } => {
                    if self.previews.remove(&image_id) {
                        engine_debug!("Released preview for image {}", image_id);
                    } else {
                        engine_warn!("Release for unknown image {}", image_id);
                    }
                }
            }
        }
    }
}

/// Turns an engine completion into the message that resolves it.
pub fn completion_msg(event: EngineEvent, observed_at: DateTime<Utc>) -> Msg {
    match event {
        EngineEvent::ClassifyCompleted { request_id, result } => Msg::ClassificationResolved {
            token: request_id,
            outcome: map_result(result),
            observed_at,
        },
    }
}

fn map_result(result: Result<classifier_engine::Prediction, ClassifyError>) -> Outcome {
    match result {
        Ok(prediction) => Outcome::Success(Prediction {
            label: prediction.label,
            source_label: prediction.source_label,
            confidence_percent: prediction.confidence_percent,
        }),
        Err(err) => {
            let kind = if err.kind.is_malformed_response() {
                ErrorKind::MalformedResponse
            } else {
                ErrorKind::Network
            };
            Outcome::Failure(ErrorDescriptor::new(
                kind,
                format!("Failed to classify image: {err}"),
            ))
        }
    }
}
