use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::UploadLimitError;

/// Hard upper bound for a document upload, checked before anything is sent.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Extensions offered by the file picker. Not a security boundary.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

pub fn check_upload_size(size_bytes: u64) -> Result<(), UploadLimitError> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadLimitError::TooLarge {
            size_bytes,
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

pub fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Citation-like label returned next to an answer.
///
/// The service documents `source`; deployed backends also send `type`,
/// `file` and `url`, which are kept so a label can still be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Reference {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn label(&self) -> &str {
        if !self.source.trim().is_empty() {
            return &self.source;
        }
        [self.file.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub answer_text: String,
    pub references: Vec<Reference>,
}

/// A document picked by the user, described by metadata only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub media_type: String,
}

/// A document loaded into memory and ready to be transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}
