use std::fmt;

use bytes::Bytes;

pub type UploadId = u64;

/// File content and metadata sent as the multipart `file` part.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file_name: String,
    pub media_type: String,
    pub content: Bytes,
}

impl fmt::Debug for UploadPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPayload")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Decoded 2xx reply of the processing service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadReply {
    pub message: String,
    pub insights: Vec<String>,
    /// `(uploaded column, standard column)`, sorted by uploaded column.
    pub mapped_columns: Vec<(String, String)>,
    pub final_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        upload_id: UploadId,
        result: Result<UploadReply, UploadFailure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    InvalidRequest,
    Timeout,
    Network,
    /// Non-2xx reply; `server_error` is the `error` field of a JSON body, if any.
    HttpStatus {
        status: u16,
        server_error: Option<String>,
    },
    /// 2xx reply whose body is not the expected JSON.
    MalformedBody,
    /// The engine stopped before the upload could run.
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus {
                status,
                server_error: Some(error),
            } => write!(f, "http status {status} ({error})"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}
