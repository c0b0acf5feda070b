//! Turning a picked or dropped path into a [`SelectedDocument`].

use std::{io, path::Path};

use shared::SelectedDocument;

pub fn inspect(path: &Path) -> io::Result<SelectedDocument> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        ));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(SelectedDocument {
        path: path.to_path_buf(),
        file_name,
        size_bytes: metadata.len(),
        media_type,
    })
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
