//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use thiserror::Error;

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("UI command queue is full; please retry")]
    QueueFull,
    #[error("Backend command processor disconnected (possible startup/runtime failure)")]
    Disconnected,
}

/// Seam between the workflow controller and whatever executes its commands.
pub trait CommandDispatcher {
    fn dispatch(&mut self, cmd: BackendCommand) -> Result<(), DispatchError>;
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), DispatchError> {
    let cmd_name = cmd.name();
    let generation = cmd.generation().0;

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, generation, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, generation, "ui->backend command queue full");
            Err(DispatchError::QueueFull)
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!(command = cmd_name, generation, "backend command processor gone");
            Err(DispatchError::Disconnected)
        }
    }
}

impl CommandDispatcher for Sender<BackendCommand> {
    fn dispatch(&mut self, cmd: BackendCommand) -> Result<(), DispatchError> {
        dispatch_backend_command(self, cmd)
    }
}
