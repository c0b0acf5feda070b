//! Upload progress tracking over a chunked request body.

use std::{io, sync::Arc};

use futures::{stream, Stream};

/// Observer invoked with the upload percentage (0 to 100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

pub const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

pub fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent * 100 + total / 2) / total).min(100) as u8
}

/// Reports a percentage only when it increases.
pub struct ProgressTracker {
    total: u64,
    sent: u64,
    last_reported: Option<u8>,
    callback: ProgressCallback,
}

impl ProgressTracker {
    pub fn new(total: u64, callback: ProgressCallback) -> Self {
        Self {
            total,
            sent: 0,
            last_reported: None,
            callback,
        }
    }

    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes).min(self.total);
        let percent = percent_of(self.sent, self.total);
        if self.last_reported.is_some_and(|last| percent <= last) {
            return None;
        }
        self.last_reported = Some(percent);
        (self.callback)(percent);
        Some(percent)
    }

    pub fn last_reported(&self) -> Option<u8> {
        self.last_reported
    }
}

/// Splits `bytes` into body chunks, reporting progress as each chunk is
/// pulled by the connection.
pub fn chunked_body(
    bytes: Vec<u8>,
    callback: ProgressCallback,
) -> impl Stream<Item = Result<Vec<u8>, io::Error>> + Send + Sync + 'static {
    let mut tracker = ProgressTracker::new(bytes.len() as u64, callback);
    if bytes.is_empty() {
        tracker.advance(0);
    }
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(UPLOAD_CHUNK_BYTES)
        .map(<[u8]>::to_vec)
        .collect();
    stream::iter(chunks.into_iter().map(move |chunk| {
        tracker.advance(chunk.len() as u64);
        Ok::<_, io::Error>(chunk)
    }))
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
