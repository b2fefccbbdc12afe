use crate::view_model::{status_line, AppViewModel};
use crate::{
    compute_embed_reference, EmbedReference, EmbedTarget, RefreshSignal, UploadController,
    UploadOutcome,
};

/// Composition root: the upload controller plus the refresh signal it drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    target: EmbedTarget,
    controller: UploadController,
    refresh: RefreshSignal,
    embed: EmbedReference,
    dirty: bool,
}

impl AppState {
    pub fn new(target: EmbedTarget) -> Self {
        let refresh = RefreshSignal::Unset;
        let embed = compute_embed_reference(refresh, &target);
        Self {
            target,
            controller: UploadController::new(),
            refresh,
            embed,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let outcome = self.controller.outcome().clone();
        AppViewModel {
            selected_file: self.controller.selected_file().map(|file| file.name().to_string()),
            status_line: status_line(&outcome),
            insights: match &outcome {
                UploadOutcome::Succeeded { insights, .. } => insights.clone(),
                _ => Vec::new(),
            },
            columns: self.controller.columns().cloned(),
            can_submit: self.controller.can_submit(),
            outcome,
            refresh: self.refresh,
            embed: self.embed.clone(),
            dirty: self.dirty,
        }
    }

    pub fn refresh_signal(&self) -> RefreshSignal {
        self.refresh
    }

    pub fn embed_reference(&self) -> &EmbedReference {
        &self.embed
    }

    pub fn controller(&self) -> &UploadController {
        &self.controller
    }

    pub(crate) fn controller_mut(&mut self) -> &mut UploadController {
        &mut self.controller
    }

    /// Reacts to the controller's completion signal. The only writer of `refresh`.
    pub(crate) fn on_upload_completed(&mut self, completed_at_ms: u64) {
        self.refresh = self.refresh.advance(completed_at_ms);
        self.embed = compute_embed_reference(self.refresh, &self.target);
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
