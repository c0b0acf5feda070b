//! Backend commands queued from UI to backend worker.

use shared::SelectedDocument;

use crate::controller::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Ask {
        generation: Generation,
        query: String,
    },
    Upload {
        generation: Generation,
        document: SelectedDocument,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ask { .. } => "ask",
            Self::Upload { .. } => "upload",
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Self::Ask { generation, .. } | Self::Upload { generation, .. } => *generation,
        }
    }
}
