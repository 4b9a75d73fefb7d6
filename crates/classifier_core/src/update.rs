use crate::{acquire, Effect, Msg, Session};

/// Pure update function: applies a message to the session and returns any effects.
pub fn update(mut state: Session, msg: Msg) -> (Session, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked(files) => match acquire(files) {
            Some(file) => state.select(file),
            None => Vec::new(),
        },
        Msg::FilesDropped(files) => {
            // A drop always ends the hover, even when the file is rejected.
            state.set_drag_active(false);
            match acquire(files) {
                Some(file) => state.select(file),
                None => Vec::new(),
            }
        }
        Msg::Drag(event) => {
            state.set_drag_active(event.is_hovering());
            Vec::new()
        }
        Msg::DispatchReady { image_id } => state.dispatch(image_id).into_iter().collect(),
        Msg::ClassificationResolved {
            token,
            outcome,
            observed_at,
        } => {
            state.resolve(token, outcome, observed_at);
            Vec::new()
        }
        Msg::RetryClicked => state.retry(),
        Msg::ResetClicked => state.reset(),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
