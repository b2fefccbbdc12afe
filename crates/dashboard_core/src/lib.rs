//! Dashboard core: pure upload state machine, refresh signal and embed derivation.
mod effect;
mod embed;
mod file;
mod msg;
mod signal;
mod state;
mod update;
mod upload;
mod view_model;

pub use effect::Effect;
pub use embed::{
    compute_embed_reference, render_embed_markup, EmbedDelivery, EmbedReference, EmbedTarget,
    EmbedTargetError, REFRESH_PARAM,
};
pub use file::SelectedFile;
pub use msg::Msg;
pub use signal::RefreshSignal;
pub use state::AppState;
pub use update::update;
pub use upload::{
    ColumnReport, FinishDecision, SubmitDecision, UploadCompleted, UploadController, UploadError,
    UploadId, UploadOutcome, UploadResponse, NO_FILE_SELECTED, SERVER_UNREACHABLE,
};
pub use view_model::AppViewModel;
