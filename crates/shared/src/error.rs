use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadLimitError {
    #[error("file is {size_bytes} bytes; uploads are limited to {limit_bytes} bytes")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
}

/// Error body returned by the analysis service on non-2xx responses.
///
/// `detail` is normally a string. Request validation failures carry a list
/// of `{ "msg": ... }` objects instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    pub fn detail_message(&self) -> Option<String> {
        let message = match self.detail.as_ref()? {
            Value::String(text) => text.trim().to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::trim)
                .filter(|msg| !msg.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
            _ => return None,
        };
        (!message.is_empty()).then_some(message)
    }
}
