//! crates/vibebot_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture: the
//! controller depends only on them, never on a concrete transport. The HTTP
//! adapters in the service crate implement them against the backend's
//! documented endpoints.

use async_trait::async_trait;

use crate::domain::SourceFile;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the underlying transport.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend understood the request and rejected it; carries the
    /// backend's `detail` message where one was provided.
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Port Data Carriers
//=========================================================================================

/// Identity returned by a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub access_token: String,
    pub username: String,
}

/// Artifacts returned by the processing backend for one file.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub transcript_id: String,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a bearer token and display name.
    async fn login(&self, username: &str, password: &str) -> PortResult<AuthenticatedUser>;

    /// Creates a new account. Success carries no payload; the caller is
    /// expected to log in afterwards.
    async fn register(&self, username: &str, email: &str, password: &str) -> PortResult<()>;

    /// Checks whether `token` still identifies a user. Returns the verified
    /// username, or `None` when the token is absent, expired or invalid.
    async fn verify_token(&self, token: &str) -> PortResult<Option<String>>;
}

#[async_trait]
pub trait FileProcessingService: Send + Sync {
    /// Extracts text and a summary from a PDF document.
    async fn process_pdf(&self, token: &str, file: &SourceFile) -> PortResult<ProcessedFile>;

    /// Transcribes an audio or video file.
    async fn transcribe(&self, token: &str, file: &SourceFile) -> PortResult<ProcessedFile>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Answers a question about a previously processed file. Returns the
    /// backend's answer, or `None` when the response carried no answer field.
    async fn ask(
        &self,
        token: &str,
        transcript_id: &str,
        question: &str,
    ) -> PortResult<Option<String>>;
}
