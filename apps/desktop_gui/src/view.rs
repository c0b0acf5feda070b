//! Presentational state derived from the workflow state.
//!
//! Nothing here is stored between frames; the shell calls [`project`] every
//! frame and renders whatever it returns.

use shared::{Reference, SelectedDocument};

use crate::controller::{WorkflowKind, WorkflowState};

pub const ASK_LABEL: &str = "Ask AI";
pub const ASKING_LABEL: &str = "Analyzing...";
pub const UPLOAD_LABEL: &str = "Analyze Document";
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

/// The user's unsubmitted inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputDraft<'a> {
    pub query: &'a str,
    pub document: Option<&'a SelectedDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Empty,
    Answer {
        text: String,
        references: Vec<String>,
    },
    Error {
        message: String,
    },
}

impl PanelContent {
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            Self::Empty => None,
            Self::Answer { text, .. } => Some(text.as_str()),
            Self::Error { message } => Some(message.as_str()),
        };
        text.filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub ask_disabled: bool,
    pub upload_disabled: bool,
    pub clear_disabled: bool,
    pub inputs_disabled: bool,
    pub ask_label: &'static str,
    pub upload_label: String,
    pub progress_text: Option<String>,
    pub selection_text: Option<String>,
    pub panel: PanelContent,
    pub copy_label: &'static str,
    pub copy_text: Option<String>,
}

pub fn project(state: &WorkflowState, draft: &InputDraft<'_>, copy_acknowledged: bool) -> ViewModel {
    let running = state.is_running();
    let running_kind = state.running_kind();
    let upload_percent = match running_kind {
        Some(WorkflowKind::Upload) => Some(state.progress_percent().unwrap_or(0).min(100)),
        _ => None,
    };

    let panel = match state {
        WorkflowState::Idle | WorkflowState::Running { .. } => PanelContent::Empty,
        WorkflowState::Succeeded { result } => PanelContent::Answer {
            text: result.answer_text.clone(),
            references: result
                .references
                .iter()
                .map(Reference::label)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect(),
        },
        WorkflowState::Failed { message } => PanelContent::Error {
            message: message.clone(),
        },
    };
    let copy_text = panel.text().map(str::to_string);

    ViewModel {
        ask_disabled: running || draft.query.trim().is_empty(),
        upload_disabled: running || draft.document.is_none(),
        clear_disabled: running,
        inputs_disabled: running,
        ask_label: if running_kind == Some(WorkflowKind::Query) {
            ASKING_LABEL
        } else {
            ASK_LABEL
        },
        upload_label: upload_percent
            .map(|percent| format!("{percent}%"))
            .unwrap_or_else(|| UPLOAD_LABEL.to_string()),
        progress_text: match running_kind {
            Some(WorkflowKind::Query) => Some("Analyzing your question...".to_string()),
            Some(WorkflowKind::Upload) => {
                Some(format!("Uploading... {}%", upload_percent.unwrap_or(0)))
            }
            None => None,
        },
        selection_text: draft.document.map(describe_selection),
        panel,
        copy_label: if copy_acknowledged {
            COPIED_LABEL
        } else {
            COPY_LABEL
        },
        copy_text,
    }
}

pub fn describe_selection(document: &SelectedDocument) -> String {
    let megabytes = document.size_bytes as f64 / (1024.0 * 1024.0);
    format!("Selected: {} ({megabytes:.2} MB)", document.file_name)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
