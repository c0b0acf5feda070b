//! The ask/upload state machine.
//!
//! [`WorkflowController`] owns the single live [`WorkflowState`]. Starting a
//! workflow bumps the [`Generation`]; backend events carry the generation they
//! were issued under and are dropped when it no longer matches, so a late
//! answer can never overwrite a newer state.

use std::collections::VecDeque;

use shared::{check_upload_size, AnalysisResult, SelectedDocument};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{Generation, Notification, UiEvent};
use crate::controller::orchestration::CommandDispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Query,
    Upload,
}

impl WorkflowKind {
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Query => "Error: ",
            Self::Upload => "Upload Error: ",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Query => "An unexpected error occurred.",
            Self::Upload => "Upload failed. Please try again.",
        }
    }

    fn success_notification(self) -> Notification {
        match self {
            Self::Query => Notification::success(
                "Analysis Complete",
                "Your legal question has been successfully analyzed.",
            ),
            Self::Upload => Notification::success(
                "Upload Successful",
                "Your document has been analyzed successfully.",
            ),
        }
    }

    fn failure_title(self) -> &'static str {
        match self {
            Self::Query => "Analysis Failed",
            Self::Upload => "Upload Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Running {
        kind: WorkflowKind,
        progress_percent: Option<u8>,
    },
    Succeeded {
        result: AnalysisResult,
    },
    Failed {
        message: String,
    },
}

impl WorkflowState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn running_kind(&self) -> Option<WorkflowKind> {
        match self {
            Self::Running { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn progress_percent(&self) -> Option<u8> {
        match self {
            Self::Running {
                progress_percent, ..
            } => *progress_percent,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a legal question to get started.")]
    EmptyQuery,
    #[error("Please select a PDF, DOCX, or TXT file to upload.")]
    MissingFile,
    #[error("Please upload a file smaller than 15MB.")]
    FileTooLarge { size_bytes: u64 },
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "Input Required",
            Self::MissingFile => "File Required",
            Self::FileTooLarge { .. } => "File Too Large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a {0:?} workflow is already running")]
    Busy(WorkflowKind),
}

/// What [`WorkflowController::apply`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Unchanged,
    Stale,
}

pub struct WorkflowController<D> {
    state: WorkflowState,
    generation: Generation,
    dispatcher: D,
    notifications: VecDeque<Notification>,
}

impl<D: CommandDispatcher> WorkflowController<D> {
    pub fn new(dispatcher: D) -> Self {
        Self {
            state: WorkflowState::Idle,
            generation: Generation::default(),
            dispatcher,
            notifications: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn start_query(&mut self, text: &str) -> Result<Generation, WorkflowError> {
        self.ensure_not_running()?;
        let query = text.trim();
        if query.is_empty() {
            return Err(self.reject(ValidationError::EmptyQuery));
        }

        let generation = self.begin(WorkflowKind::Query, None);
        info!(generation = generation.0, query_len = query.len(), "workflow: question submitted");
        self.send(
            WorkflowKind::Query,
            BackendCommand::Ask {
                generation,
                query: query.to_string(),
            },
        );
        Ok(generation)
    }

    pub fn start_upload(
        &mut self,
        document: Option<&SelectedDocument>,
    ) -> Result<Generation, WorkflowError> {
        self.ensure_not_running()?;
        let Some(document) = document else {
            return Err(self.reject(ValidationError::MissingFile));
        };
        if check_upload_size(document.size_bytes).is_err() {
            return Err(self.reject(ValidationError::FileTooLarge {
                size_bytes: document.size_bytes,
            }));
        }

        let generation = self.begin(WorkflowKind::Upload, Some(0));
        info!(
            generation = generation.0,
            file_name = %document.file_name,
            size_bytes = document.size_bytes,
            "workflow: document submitted"
        );
        self.send(
            WorkflowKind::Upload,
            BackendCommand::Upload {
                generation,
                document: document.clone(),
            },
        );
        Ok(generation)
    }

    /// Returns to Idle. Refused while a workflow is running.
    pub fn clear(&mut self) -> Result<(), WorkflowError> {
        self.ensure_not_running()?;
        self.generation = self.generation.next();
        self.state = WorkflowState::Idle;
        debug!(generation = self.generation.0, "workflow: cleared");
        Ok(())
    }

    /// Returns to Idle from any state, abandoning an in-flight request.
    ///
    /// The request is not cancelled; its resolution arrives under an old
    /// generation and is discarded.
    pub fn reset(&mut self) {
        if let Some(kind) = self.state.running_kind() {
            warn!(generation = self.generation.0, ?kind, "workflow: abandoning in-flight request");
        }
        self.generation = self.generation.next();
        self.state = WorkflowState::Idle;
    }

    pub fn apply(&mut self, event: UiEvent) -> Applied {
        if let Some(generation) = event.generation() {
            if generation != self.generation {
                debug!(
                    event_generation = generation.0,
                    current_generation = self.generation.0,
                    "workflow: dropping stale backend event"
                );
                return Applied::Stale;
            }
        }

        match event {
            UiEvent::UploadProgress { percent, .. } => self.apply_progress(percent),
            UiEvent::QueryResolved { outcome, .. } => self.resolve(WorkflowKind::Query, outcome),
            UiEvent::UploadResolved { outcome, .. } => self.resolve(WorkflowKind::Upload, outcome),
            UiEvent::BackendUnavailable(reason) => {
                self.notifications
                    .push_back(Notification::error("Backend Unavailable", reason));
                // No worker is left to resolve the pending request.
                if self.state.is_running() {
                    self.reset();
                    Applied::Updated
                } else {
                    Applied::Unchanged
                }
            }
        }
    }

    fn ensure_not_running(&self) -> Result<(), WorkflowError> {
        match self.state.running_kind() {
            Some(kind) => {
                debug!(?kind, "workflow: request rejected while running");
                Err(WorkflowError::Busy(kind))
            }
            None => Ok(()),
        }
    }

    fn reject(&mut self, err: ValidationError) -> WorkflowError {
        self.notifications
            .push_back(Notification::error(err.title(), err.to_string()));
        WorkflowError::Validation(err)
    }

    fn begin(&mut self, kind: WorkflowKind, progress_percent: Option<u8>) -> Generation {
        self.generation = self.generation.next();
        self.state = WorkflowState::Running {
            kind,
            progress_percent,
        };
        self.generation
    }

    fn send(&mut self, kind: WorkflowKind, cmd: BackendCommand) {
        if let Err(err) = self.dispatcher.dispatch(cmd) {
            self.fail(kind, err.to_string());
        }
    }

    fn apply_progress(&mut self, percent: u8) -> Applied {
        let WorkflowState::Running {
            kind: WorkflowKind::Upload,
            progress_percent,
        } = &mut self.state
        else {
            return Applied::Unchanged;
        };

        let percent = percent.min(100);
        if progress_percent.is_some_and(|current| percent <= current) {
            return Applied::Unchanged;
        }
        *progress_percent = Some(percent);
        debug!(generation = self.generation.0, percent, "workflow: upload progress");
        Applied::Updated
    }

    fn resolve(
        &mut self,
        kind: WorkflowKind,
        outcome: Result<AnalysisResult, client_core::RequestError>,
    ) -> Applied {
        if self.state.running_kind() != Some(kind) {
            return Applied::Unchanged;
        }

        match outcome {
            Ok(result) => {
                info!(
                    generation = self.generation.0,
                    ?kind,
                    references = result.references.len(),
                    "workflow: succeeded"
                );
                self.notifications.push_back(kind.success_notification());
                self.state = WorkflowState::Succeeded { result };
            }
            Err(err) => self.fail(kind, err.user_message(kind.fallback_message())),
        }
        Applied::Updated
    }

    fn fail(&mut self, kind: WorkflowKind, message: String) {
        warn!(generation = self.generation.0, ?kind, %message, "workflow: failed");
        self.notifications
            .push_back(Notification::error(kind.failure_title(), message.clone()));
        self.state = WorkflowState::Failed {
            message: format!("{}{message}", kind.failure_prefix()),
        };
    }
}

#[cfg(test)]
#[path = "../tests/workflow_tests.rs"]
mod tests;
