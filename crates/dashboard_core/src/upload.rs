use thiserror::Error;

use crate::SelectedFile;

pub type UploadId = u64;

/// Detail shown when an upload is requested without a file.
pub const NO_FILE_SELECTED: &str = "no file selected";
/// Detail shown when the service gave no usable error of its own.
pub const SERVER_UNREACHABLE: &str = "server unreachable";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadOutcome {
    #[default]
    Idle,
    InProgress,
    Succeeded {
        message: String,
        insights: Vec<String>,
    },
    Failed {
        error_detail: String,
    },
}

/// Column mapping the service applied to the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnReport {
    /// `(uploaded column, standard column)` pairs.
    pub mapped: Vec<(String, String)>,
    pub final_columns: Vec<String>,
}

impl ColumnReport {
    pub fn is_empty(&self) -> bool {
        self.mapped.is_empty() && self.final_columns.is_empty()
    }
}

/// Successful reply of the processing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub message: String,
    pub insights: Vec<String>,
    pub columns: ColumnReport,
}

impl UploadResponse {
    pub fn new(message: impl Into<String>, insights: Vec<String>) -> Self {
        Self {
            message: message.into(),
            insights,
            columns: ColumnReport::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("transport failure: {detail}")]
    TransportFailure { detail: String },
    #[error("server rejected upload with status {status}: {error}")]
    ServerRejected { status: u16, error: String },
    #[error("server unreachable")]
    ServerUnreachableGeneric,
}

impl UploadError {
    /// The single line shown to the user.
    pub fn error_detail(&self) -> String {
        match self {
            UploadError::NoFileSelected => NO_FILE_SELECTED.to_string(),
            UploadError::ServerRejected { error, .. } => error.clone(),
            UploadError::TransportFailure { .. } | UploadError::ServerUnreachableGeneric => {
                SERVER_UNREACHABLE.to_string()
            }
        }
    }
}

/// Zero-payload signal emitted once per successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadCompleted;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Send this file; the controller is now `InProgress`.
    Dispatch { upload_id: UploadId, file: SelectedFile },
    /// Nothing to send; the controller is now `Failed`.
    Rejected,
    /// An upload is already running; nothing changed.
    AlreadyInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishDecision {
    Succeeded(UploadCompleted),
    Failed,
    /// Completion for an upload that is not in flight.
    Ignored,
}

/// Selected file plus the lifecycle of its single upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadController {
    selected: Option<SelectedFile>,
    outcome: UploadOutcome,
    columns: Option<ColumnReport>,
    in_flight: Option<UploadId>,
    next_upload_id: UploadId,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> &UploadOutcome {
        &self.outcome
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn columns(&self) -> Option<&ColumnReport> {
        self.columns.as_ref()
    }

    pub fn in_flight(&self) -> Option<UploadId> {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && self.in_flight.is_none()
    }

    /// Replaces the selection and clears whatever the last upload displayed.
    ///
    /// Refused while an upload is in flight; returns whether it was applied.
    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.selected = Some(file);
        self.clear_result();
        true
    }

    /// Drops the selection and returns to `Idle`. Refused while in flight.
    pub fn reset(&mut self) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.selected = None;
        self.clear_result();
        true
    }

    pub fn submit(&mut self) -> SubmitDecision {
        if self.in_flight.is_some() {
            return SubmitDecision::AlreadyInFlight;
        }
        let Some(file) = self.selected.clone() else {
            self.columns = None;
            self.outcome = UploadOutcome::Failed {
                error_detail: UploadError::NoFileSelected.error_detail(),
            };
            return SubmitDecision::Rejected;
        };

        self.next_upload_id += 1;
        let upload_id = self.next_upload_id;
        self.in_flight = Some(upload_id);
        self.columns = None;
        self.outcome = UploadOutcome::InProgress;
        SubmitDecision::Dispatch { upload_id, file }
    }

    /// Applies the result of upload `upload_id`.
    ///
    /// The completion signal is returned only after the outcome is `Succeeded`,
    /// and at most once per upload.
    pub fn finish(
        &mut self,
        upload_id: UploadId,
        result: Result<UploadResponse, UploadError>,
    ) -> FinishDecision {
        if self.in_flight != Some(upload_id) {
            return FinishDecision::Ignored;
        }
        self.in_flight = None;

        match result {
            Ok(response) => {
                self.selected = None;
                self.columns = (!response.columns.is_empty()).then_some(response.columns);
                self.outcome = UploadOutcome::Succeeded {
                    message: response.message,
                    insights: response.insights,
                };
                FinishDecision::Succeeded(UploadCompleted)
            }
            Err(err) => {
                self.outcome = UploadOutcome::Failed {
                    error_detail: err.error_detail(),
                };
                FinishDecision::Failed
            }
        }
    }

    fn clear_result(&mut self) {
        self.outcome = UploadOutcome::Idle;
        self.columns = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(name: &str) -> SelectedFile {
        SelectedFile::new(name, "text/csv", b"date,qty\n2024-01-01,3\n".to_vec())
    }

    #[test]
    fn upload_ids_increase_per_dispatch() {
        let mut controller = UploadController::new();
        controller.select_file(csv("a.csv"));
        let SubmitDecision::Dispatch { upload_id: first, .. } = controller.submit() else {
            panic!("expected dispatch");
        };
        controller.finish(first, Err(UploadError::ServerUnreachableGeneric));

        let SubmitDecision::Dispatch { upload_id: second, .. } = controller.submit() else {
            panic!("expected dispatch");
        };
        assert!(second > first);
    }

    #[test]
    fn failed_upload_keeps_file_for_retry() {
        let mut controller = UploadController::new();
        controller.select_file(csv("a.csv"));
        let SubmitDecision::Dispatch { upload_id, .. } = controller.submit() else {
            panic!("expected dispatch");
        };
        let decision = controller.finish(
            upload_id,
            Err(UploadError::TransportFailure {
                detail: "connection refused".into(),
            }),
        );

        assert_eq!(decision, FinishDecision::Failed);
        assert_eq!(controller.selected_file().map(SelectedFile::name), Some("a.csv"));
        assert!(controller.can_submit());
    }

    #[test]
    fn second_finish_for_same_upload_is_ignored() {
        let mut controller = UploadController::new();
        controller.select_file(csv("a.csv"));
        let SubmitDecision::Dispatch { upload_id, .. } = controller.submit() else {
            panic!("expected dispatch");
        };
        let ok = UploadResponse::new("ok", Vec::new());

        assert_eq!(
            controller.finish(upload_id, Ok(ok.clone())),
            FinishDecision::Succeeded(UploadCompleted)
        );
        assert_eq!(controller.finish(upload_id, Ok(ok)), FinishDecision::Ignored);
    }

    #[test]
    fn error_detail_prefers_server_text() {
        let rejected = UploadError::ServerRejected {
            status: 400,
            error: "Invalid file type".into(),
        };
        assert_eq!(rejected.error_detail(), "Invalid file type");
        assert_eq!(
            UploadError::TransportFailure {
                detail: "dns".into()
            }
            .error_detail(),
            SERVER_UNREACHABLE
        );
        assert_eq!(UploadError::NoFileSelected.error_detail(), NO_FILE_SELECTED);
    }
}
