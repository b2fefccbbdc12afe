use crate::{ColumnReport, EmbedReference, RefreshSignal, UploadOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub selected_file: Option<String>,
    pub outcome: UploadOutcome,
    pub status_line: Option<String>,
    /// Insights of the last successful upload, in service order.
    pub insights: Vec<String>,
    pub columns: Option<ColumnReport>,
    pub can_submit: bool,
    pub refresh: RefreshSignal,
    pub embed: EmbedReference,
    pub dirty: bool,
}

pub(crate) fn status_line(outcome: &UploadOutcome) -> Option<String> {
    match outcome {
        UploadOutcome::Idle => None,
        UploadOutcome::InProgress => Some("Uploading and processing...".to_string()),
        UploadOutcome::Succeeded { message, .. } if message.is_empty() => {
            Some("Success".to_string())
        }
        UploadOutcome::Succeeded { message, .. } => Some(format!("Success: {message}")),
        UploadOutcome::Failed { error_detail } => Some(format!("Error: {error_detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_without_message_has_plain_status() {
        let outcome = UploadOutcome::Succeeded {
            message: String::new(),
            insights: Vec::new(),
        };
        assert_eq!(status_line(&outcome).as_deref(), Some("Success"));
    }
}
