pub mod domain;
pub mod error;
pub mod protocol;

pub use domain::{
    check_upload_size, has_accepted_extension, AnalysisResult, DocumentUpload, Reference,
    SelectedDocument, ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES,
};
pub use error::{ErrorBody, UploadLimitError};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
