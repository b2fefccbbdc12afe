use std::sync::mpsc;
use std::thread;

use bytes::Bytes;
use chrono::Utc;
use dashboard_core::{ColumnReport, Effect, Msg, SelectedFile, UploadError, UploadResponse};
use dashboard_engine::{
    stopped_failure, EngineEvent, EngineHandle, FailureKind, UploadFailure, UploadPayload,
    UploadReply,
};
use dashboard_logging::{dash_error, dash_info, dash_warn};

use super::app::AppInput;

/// Executes core effects against the engine and feeds completions back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        events: mpsc::Receiver<EngineEvent>,
        input_tx: mpsc::Sender<AppInput>,
    ) -> Self {
        spawn_event_loop(events, input_tx);
        Self { engine }
    }

    /// Runs `effects` and returns messages that must be dispatched right away.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitUpload { upload_id, file } => {
                    dash_info!(
                        "SubmitUpload upload_id={} file={} bytes={}",
                        upload_id,
                        file.name(),
                        file.len()
                    );
                    if let Err(err) = self.engine.submit(upload_id, to_payload(&file)) {
                        dash_error!("Upload {} could not be started: {}", upload_id, err);
                        follow_ups.push(Msg::UploadFinished {
                            upload_id,
                            result: Err(map_failure(stopped_failure())),
                            completed_at_ms: now_ms(),
                        });
                    }
                }
                Effect::ReloadEmbed { reference } => {
                    dash_info!("Dashboard embed now points at {}", reference);
                }
            }
        }
        follow_ups
    }
}

fn spawn_event_loop(events: mpsc::Receiver<EngineEvent>, input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            let msg = completion_msg(event, now_ms());
            if input_tx.send(AppInput::Core(msg)).is_err() {
                break;
            }
        }
    });
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

pub(crate) fn completion_msg(event: EngineEvent, completed_at_ms: u64) -> Msg {
    match event {
        EngineEvent::UploadCompleted { upload_id, result } => Msg::UploadFinished {
            upload_id,
            result: result.map(map_reply).map_err(map_failure),
            completed_at_ms,
        },
    }
}

pub(crate) fn to_payload(file: &SelectedFile) -> UploadPayload {
    UploadPayload {
        file_name: file.name().to_string(),
        media_type: file.media_type().to_string(),
        content: Bytes::copy_from_slice(file.content()),
    }
}

fn map_reply(reply: UploadReply) -> UploadResponse {
    UploadResponse {
        message: reply.message,
        insights: reply.insights,
        columns: ColumnReport {
            mapped: reply.mapped_columns,
            final_columns: reply.final_columns,
        },
    }
}

/// Maps engine failures onto the errors the user sees.
pub(crate) fn map_failure(failure: UploadFailure) -> UploadError {
    let detail = failure.to_string();
    match failure.kind {
        FailureKind::HttpStatus {
            status,
            server_error: Some(error),
        } => UploadError::ServerRejected { status, error },
        FailureKind::HttpStatus {
            status,
            server_error: None,
        } => {
            dash_warn!("Upload failed with status {} and no error body", status);
            UploadError::ServerUnreachableGeneric
        }
        FailureKind::MalformedBody => {
            dash_warn!("Upload reply could not be decoded: {}", detail);
            UploadError::ServerUnreachableGeneric
        }
        FailureKind::InvalidEndpoint
        | FailureKind::InvalidRequest
        | FailureKind::Timeout
        | FailureKind::Network
        | FailureKind::EngineStopped => UploadError::TransportFailure { detail },
    }
}
