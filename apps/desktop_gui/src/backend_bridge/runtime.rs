//! Runtime bridge between UI command queue and backend event intake.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::{load_document, AnalysisClient, AnalysisTransport, ProgressCallback, TransportConfig};
use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::UiEvent;

/// Starts the backend worker thread that owns the tokio runtime.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    transport: TransportConfig,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("analysis-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build backend runtime: {err}");
                    let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                        "Backend worker startup failure: failed to build runtime: {err}"
                    )));
                    return;
                }
            };

            let client: Arc<dyn AnalysisTransport> = Arc::new(AnalysisClient::new(transport));
            serve(runtime.handle(), cmd_rx, ui_tx, client);
        })
}

/// Receives commands until the UI side hangs up, running each one as its
/// own task so a stale in-flight request never blocks the next workflow.
pub fn serve(
    runtime: &Handle,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    transport: Arc<dyn AnalysisTransport>,
) {
    info!("analysis backend worker ready");
    while let Ok(cmd) = cmd_rx.recv() {
        debug!(
            command = cmd.name(),
            generation = cmd.generation().0,
            "backend command received"
        );
        runtime.spawn(handle_command(cmd, Arc::clone(&transport), ui_tx.clone()));
    }
    info!("ui command queue closed; backend worker exiting");
}

pub async fn handle_command(
    cmd: BackendCommand,
    transport: Arc<dyn AnalysisTransport>,
    ui_tx: Sender<UiEvent>,
) {
    match cmd {
        BackendCommand::Ask { generation, query } => {
            let outcome = transport.submit_question(&query).await;
            if let Err(err) = &outcome {
                warn!(generation = generation.0, error = %err, "ask failed");
            }
            deliver(&ui_tx, UiEvent::QueryResolved { generation, outcome }).await;
        }
        BackendCommand::Upload {
            generation,
            document,
        } => {
            let outcome = match load_document(&document).await {
                Ok(upload) => {
                    let progress_tx = ui_tx.clone();
                    let on_progress: ProgressCallback = Arc::new(move |percent| {
                        // Progress is best-effort; a full queue just skips a tick.
                        if progress_tx
                            .try_send(UiEvent::UploadProgress {
                                generation,
                                percent,
                            })
                            .is_err()
                        {
                            debug!(generation = generation.0, percent, "upload progress dropped");
                        }
                    });
                    transport.submit_document(upload, on_progress).await
                }
                Err(err) => Err(err),
            };
            if let Err(err) = &outcome {
                warn!(
                    generation = generation.0,
                    file_name = %document.file_name,
                    error = %err,
                    "upload failed"
                );
            }
            deliver(&ui_tx, UiEvent::UploadResolved { generation, outcome }).await;
        }
    }
}

/// Resolutions must not be dropped, so a full UI queue is waited out on the
/// blocking pool instead of a runtime worker.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let ui_tx = ui_tx.clone();
    match tokio::task::spawn_blocking(move || ui_tx.send(event)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => debug!("ui event receiver dropped; discarding backend result"),
        Err(err) => error!("ui event delivery task failed: {err}"),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
