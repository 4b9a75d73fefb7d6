#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, Utc};
use classifier_core::{
    update, Effect, ErrorDescriptor, ErrorKind, ImageId, Msg, Outcome, Prediction, RawFile,
    RequestToken, Session,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn image(name: &str) -> RawFile {
    RawFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

pub fn text(name: &str) -> RawFile {
    RawFile::new(name, "text/plain", b"hello".to_vec())
}

pub fn dispatched_image(effects: &[Effect]) -> Option<ImageId> {
    effects.iter().find_map(|effect| match effect {
        Effect::DispatchClassification { image_id } => Some(*image_id),
        _ => None,
    })
}

pub fn classify_token(effects: &[Effect]) -> Option<RequestToken> {
    effects.iter().find_map(|effect| match effect {
        Effect::Classify { token, .. } => Some(*token),
        _ => None,
    })
}

/// Picks `file` and acknowledges the dispatch, like the driver does.
pub fn submit(state: Session, file: RawFile) -> (Session, RequestToken, Vec<Effect>) {
    let (state, mut effects) = update(state, Msg::FilesPicked(vec![file]));
    let image_id = dispatched_image(&effects).expect("dispatch effect");
    let (state, dispatch) = update(state, Msg::DispatchReady { image_id });
    let token = classify_token(&dispatch).expect("classify effect");
    effects.extend(dispatch);
    (state, token, effects)
}

pub fn success(label: &str, confidence_percent: f64) -> Outcome {
    Outcome::Success(Prediction {
        label: label.to_string(),
        source_label: None,
        confidence_percent,
    })
}

pub fn network_failure(message: &str) -> Outcome {
    Outcome::Failure(ErrorDescriptor::new(ErrorKind::Network, message))
}

pub fn resolve_at(
    state: Session,
    token: RequestToken,
    outcome: Outcome,
    observed_at: DateTime<Utc>,
) -> Session {
    let (state, effects) = update(
        state,
        Msg::ClassificationResolved {
            token,
            outcome,
            observed_at,
        },
    );
    assert!(effects.is_empty());
    state
}

pub fn resolve(state: Session, token: RequestToken, outcome: Outcome) -> Session {
    resolve_at(state, token, outcome, Utc::now())
}
