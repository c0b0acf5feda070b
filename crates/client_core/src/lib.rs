use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Body, Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    check_upload_size,
    protocol::{AskRequest, AskResponse, UploadResponse},
    AnalysisResult, DocumentUpload, ErrorBody, SelectedDocument,
};
use tracing::{debug, info, warn};
use url::Url;

pub mod error;
pub mod progress;

pub use error::RequestError;
pub use progress::{ProgressCallback, ProgressTracker};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const ASK_TIMEOUT: Duration = Duration::from_secs(90);
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

const ASK_PATH: &str = "ask";
const UPLOAD_PATH: &str = "upload";
const UPLOAD_FIELD: &str = "file";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// The two calls the client makes against the analysis service.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn submit_question(&self, query: &str) -> Result<AnalysisResult, RequestError>;

    async fn submit_document(
        &self,
        document: DocumentUpload,
        on_progress: ProgressCallback,
    ) -> Result<AnalysisResult, RequestError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    base_url: Url,
    pub ask_timeout: Duration,
    pub upload_timeout: Duration,
}

impl TransportConfig {
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            ask_timeout: ASK_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, ask_timeout: Duration, upload_timeout: Duration) -> Self {
        self.ask_timeout = ask_timeout;
        self.upload_timeout = upload_timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|err| RequestError::InvalidEndpoint(err.to_string()))
    }
}

pub struct AnalysisClient {
    http: Client,
    config: TransportConfig,
}

impl AnalysisClient {
    pub fn new(config: TransportConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: TransportConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl AnalysisTransport for AnalysisClient {
    async fn submit_question(&self, query: &str) -> Result<AnalysisResult, RequestError> {
        let url = self.config.endpoint(ASK_PATH)?;
        let timeout = self.config.ask_timeout;
        info!(%url, query_len = query.len(), "ask: submitting question");

        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .json(&AskRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|err| RequestError::from_reqwest(err, timeout))?;
        let body: AskResponse = read_json(response, timeout).await?;
        let result = body.into_result();

        info!(references = result.references.len(), "ask: answer received");
        Ok(result)
    }

    async fn submit_document(
        &self,
        document: DocumentUpload,
        on_progress: ProgressCallback,
    ) -> Result<AnalysisResult, RequestError> {
        check_upload_size(document.size_bytes())?;
        let url = self.config.endpoint(UPLOAD_PATH)?;
        let timeout = self.config.upload_timeout;

        let DocumentUpload {
            file_name,
            media_type,
            bytes,
        } = document;
        let length = bytes.len() as u64;
        let media_type = if media_type.trim().is_empty() {
            FALLBACK_MEDIA_TYPE.to_string()
        } else {
            media_type
        };
        info!(%url, file_name = %file_name, length, media_type = %media_type, "upload: submitting document");

        let body = Body::wrap_stream(progress::chunked_body(bytes, on_progress));
        let part = Part::stream_with_length(body, length)
            .file_name(file_name.clone())
            .mime_str(&media_type)
            .map_err(|err| RequestError::from_reqwest(err, timeout))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|err| RequestError::from_reqwest(err, timeout))?;
        let body: UploadResponse = read_json(response, timeout).await?;
        let result = body.into_result(&file_name);

        info!(references = result.references.len(), "upload: analysis received");
        Ok(result)
    }
}

/// Reads a picked document from disk, re-checking the size limit first.
pub async fn load_document(selected: &SelectedDocument) -> Result<DocumentUpload, RequestError> {
    let read_error = |err: std::io::Error| RequestError::ReadDocument {
        file_name: selected.file_name.clone(),
        reason: err.to_string(),
    };

    let metadata = tokio::fs::metadata(&selected.path).await.map_err(read_error)?;
    check_upload_size(metadata.len())?;
    let bytes = tokio::fs::read(&selected.path).await.map_err(read_error)?;
    check_upload_size(bytes.len() as u64)?;

    Ok(DocumentUpload {
        file_name: selected.file_name.clone(),
        media_type: selected.media_type.clone(),
        bytes,
    })
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    timeout: Duration,
) -> Result<T, RequestError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| RequestError::from_reqwest(err, timeout))?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|error_body| error_body.detail_message());
        warn!(status = status.as_u16(), detail = ?detail, "analysis service returned an error");
        return Err(match detail {
            Some(detail) => RequestError::Api {
                status: status.as_u16(),
                detail,
            },
            None => RequestError::Status {
                status: status.as_u16(),
            },
        });
    }

    debug!(status = status.as_u16(), bytes = body.len(), "analysis service responded");
    serde_json::from_slice(&body).map_err(|err| RequestError::Decode(err.to_string()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
