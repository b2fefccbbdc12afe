//! Dashboard engine: multipart upload to the processing service and effect execution.
mod decode;
mod engine;
mod types;
mod upload;

pub use decode::{decode_error_body, decode_reply, DecodeError};
pub use engine::{stopped_failure, EngineError, EngineHandle};
pub use types::{EngineEvent, FailureKind, UploadFailure, UploadId, UploadPayload, UploadReply};
pub use upload::{ReqwestUploader, UploadSettings, Uploader, FILE_FIELD};
