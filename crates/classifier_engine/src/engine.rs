use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_info, engine_warn};

use crate::classify::{Classifier, ReqwestClassifier};
use crate::settings::ClientSettings;
use crate::{EngineEvent, RequestId, UploadFile};

/// Receives engine events on the runtime's worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Classify {
        request_id: RequestId,
        upload: UploadFile,
    },
}

/// Runs classifications on a background tokio runtime.
///
/// Requests are never cancelled or deduplicated here; every request yields
/// exactly one `ClassifyCompleted` event, in completion order. Dropping the
/// handle abandons requests still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Self {
        Self::with_classifier(Arc::new(ReqwestClassifier::new(settings)), sink)
    }

    pub fn with_classifier(classifier: Arc<dyn Classifier>, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let classifier = classifier.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(classifier.as_ref(), command, sink.as_ref()).await;
                });
            }
        });

        Self { cmd_tx }
    }

    pub fn classify(&self, request_id: RequestId, upload: UploadFile) {
        engine_info!(
            "Enqueue classify request_id={} file={} bytes={}",
            request_id,
            upload.file_name,
            upload.bytes.len()
        );
        if self
            .cmd_tx
            .send(EngineCommand::Classify { request_id, upload })
            .is_err()
        {
            engine_warn!("Engine thread is gone; request {} dropped", request_id);
        }
    }
}

async fn handle_command(
    classifier: &dyn Classifier,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Classify { request_id, upload } => {
            let result = classifier.classify(&upload).await;
            if let Err(err) = &result {
                engine_warn!("Request {} failed: {}", request_id, err);
            }
            sink.emit(EngineEvent::ClassifyCompleted { request_id, result });
        }
    }
}
