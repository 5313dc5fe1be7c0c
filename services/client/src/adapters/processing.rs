//! services/client/src/adapters/processing.rs
//!
//! Implements the `FileProcessingService` port: multipart uploads to the
//! document-processing and transcription endpoints. Both endpoints share the
//! same request shape and response fields, so they share one upload helper.

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use super::backend::{rejection, transport_error, Backend};
use vibebot_core::domain::SourceFile;
use vibebot_core::ports::{FileProcessingService, PortResult, ProcessedFile};

/// An adapter that implements `FileProcessingService` over the backend's
/// HTTP API.
#[derive(Clone)]
pub struct HttpProcessingAdapter {
    backend: Backend,
}

impl HttpProcessingAdapter {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    async fn upload(&self, path: &str, token: &str, file: &SourceFile) -> PortResult<ProcessedFile> {
        let part = multipart::Part::stream(reqwest::Body::from(file.content.clone()))
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(transport_error)?;
        let form = multipart::Form::new().part("file", part);

        debug!(endpoint = path, file = %file.name, bytes = file.size(), "uploading file");
        let response = self
            .backend
            .client()
            .post(self.backend.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body: ProcessResponse = response.json().await.map_err(transport_error)?;
        Ok(ProcessedFile {
            transcript: body.transcript,
            summary: body.summary,
            transcript_id: body.transcript_id,
        })
    }
}

#[derive(Deserialize)]
struct ProcessResponse {
    transcript: Option<String>,
    summary: Option<String>,
    transcript_id: String,
}

//=========================================================================================
// `FileProcessingService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FileProcessingService for HttpProcessingAdapter {
    /// POST /api/v1/process-pdf, multipart.
    async fn process_pdf(&self, token: &str, file: &SourceFile) -> PortResult<ProcessedFile> {
        self.upload("/api/v1/process-pdf", token, file).await
    }

    /// POST /api/v1/transcribe, multipart.
    async fn transcribe(&self, token: &str, file: &SourceFile) -> PortResult<ProcessedFile> {
        self.upload("/api/v1/transcribe", token, file).await
    }
}
