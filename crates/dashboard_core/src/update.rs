use crate::{AppState, Effect, FinishDecision, Msg, SubmitDecision};

/// Pure update function: applies a message to state and returns any effects.
///
/// Outcome and refresh signal change inside the same call, so a view taken
/// afterwards never shows `Succeeded` with the old embed reference.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => {
            if state.controller_mut().select_file(file) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadClicked => match state.controller_mut().submit() {
            SubmitDecision::Dispatch { upload_id, file } => {
                state.mark_dirty();
                vec![Effect::SubmitUpload { upload_id, file }]
            }
            SubmitDecision::Rejected => {
                state.mark_dirty();
                Vec::new()
            }
            SubmitDecision::AlreadyInFlight => Vec::new(),
        },
        Msg::ResetClicked => {
            if state.controller_mut().reset() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadFinished {
            upload_id,
            result,
            completed_at_ms,
        } => match state.controller_mut().finish(upload_id, result) {
            FinishDecision::Succeeded(_completed) => {
                state.on_upload_completed(completed_at_ms);
                state.mark_dirty();
                vec![Effect::ReloadEmbed {
                    reference: state.embed_reference().clone(),
                }]
            }
            FinishDecision::Failed => {
                state.mark_dirty();
                Vec::new()
            }
            FinishDecision::Ignored => Vec::new(),
        },
    };

    (state, effects)
}
