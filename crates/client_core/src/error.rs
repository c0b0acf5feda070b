use std::time::Duration;

use shared::UploadLimitError;
use thiserror::Error;

/// Uniform failure shape for every call made against the analysis service.
///
/// `Display` is the human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{detail}")]
    Api { status: u16, detail: String },
    #[error("Request failed with status code {status}")]
    Status { status: u16 },
    #[error("timeout of {}ms exceeded", .after.as_millis())]
    Timeout { after: Duration },
    #[error("{0}")]
    Transport(String),
    #[error("invalid response from analysis service: {0}")]
    Decode(String),
    #[error(transparent)]
    DocumentTooLarge(#[from] UploadLimitError),
    #[error("could not read {file_name}: {reason}")]
    ReadDocument { file_name: String, reason: String },
    #[error("invalid analysis service endpoint: {0}")]
    InvalidEndpoint(String),
}

impl RequestError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { after: timeout }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The message to show, or `fallback` when the error carries no text.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.message();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}
