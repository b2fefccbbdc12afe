use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_logging::{dash_error, dash_info, dash_warn};
use thiserror::Error;

use crate::upload::{ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, FailureKind, UploadFailure, UploadId, UploadPayload};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
    #[error("engine is no longer running")]
    Stopped,
}

enum EngineCommand {
    Submit {
        upload_id: UploadId,
        payload: UploadPayload,
    },
}

/// Runs uploads on a background tokio runtime and reports completions on a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        settings: UploadSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        Self::spawn_with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn spawn_with_uploader(
        uploader: Arc<dyn Uploader>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("upload-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let uploader = uploader.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(uploader.as_ref(), command, event_tx).await;
                    });
                }
                dash_info!("Upload engine command channel closed");
            })
            .map_err(EngineError::Thread)?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn submit(&self, upload_id: UploadId, payload: UploadPayload) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Submit { upload_id, payload })
            .map_err(|_| EngineError::Stopped)
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { upload_id, payload } => {
            let result = uploader.upload(payload).await;
            match &result {
                Ok(reply) => dash_info!(
                    "Upload {} succeeded with {} insights",
                    upload_id,
                    reply.insights.len()
                ),
                Err(failure) => dash_warn!("Upload {} failed: {}", upload_id, failure),
            }
            if event_tx
                .send(EngineEvent::UploadCompleted { upload_id, result })
                .is_err()
            {
                dash_error!("Dropped completion of upload {}: receiver gone", upload_id);
            }
        }
    }
}

/// Completion used when a submission never reached the engine.
pub fn stopped_failure() -> UploadFailure {
    UploadFailure::new(FailureKind::EngineStopped, EngineError::Stopped.to_string())
}
