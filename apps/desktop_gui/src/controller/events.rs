//! Backend-to-UI events and user-facing notifications.

use client_core::RequestError;
use shared::AnalysisResult;

/// Token identifying the workflow attempt a command or event belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    UploadProgress {
        generation: Generation,
        percent: u8,
    },
    QueryResolved {
        generation: Generation,
        outcome: Result<AnalysisResult, RequestError>,
    },
    UploadResolved {
        generation: Generation,
        outcome: Result<AnalysisResult, RequestError>,
    },
    BackendUnavailable(String),
}

impl UiEvent {
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Self::UploadProgress { generation, .. }
            | Self::QueryResolved { generation, .. }
            | Self::UploadResolved { generation, .. } => Some(*generation),
            Self::BackendUnavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Success)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Error)
    }
}
