//! crates/vibebot_core/src/domain.rs
//!
//! Defines the pure, core data structures for the client.
//! These structs are independent of any transport or serialization format.

use bytes::Bytes;
use uuid::Uuid;

/// An authenticated backend session. Lives only for the life of the process;
/// there is no durable persistence.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque bearer credential sent on every protected backend call.
    pub token: String,
    /// Display identity, taken from the login response.
    pub username: String,
}

/// The raw user-selected file, exactly one of which may be active at a time.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Classification derived from the file's MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Audio,
    Video,
    Unknown,
}

impl FileKind {
    /// Classifies by MIME substring match, mirroring the upload dispatch
    /// rules: "pdf" → Pdf, "audio" → Audio, "video" → Video, anything
    /// else → Unknown.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.contains("pdf") {
            FileKind::Pdf
        } else if mime_type.contains("audio") {
            FileKind::Audio
        } else if mime_type.contains("video") {
            FileKind::Video
        } else {
            FileKind::Unknown
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileKind::Pdf => "pdf",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// The single active file plus its backend-derived artifacts.
///
/// Invariant: `transcript_id`, `transcript` and `summary` are only meaningful
/// while `file` is this attachment's file; replacing or removing the
/// attachment clears all three atomically.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file: SourceFile,
    pub kind: FileKind,
    pub transcript_id: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
}

impl Attachment {
    /// Creates a fresh attachment with no derived data yet.
    pub fn new(file: SourceFile) -> Self {
        let kind = FileKind::from_mime(&file.mime_type);
        Self {
            file,
            kind,
            transcript_id: None,
            transcript: None,
            summary: None,
        }
    }
}

/// The author of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the chat history. Entries are append-only except for the
/// placeholder assistant entry inserted by `ask`, which is later mutated in
/// place (same id) once the backend responds.
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Which authentication form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Raw form input for `Controller::authenticate`.
///
/// On login the `username` field carries the email-or-username identity and
/// `email` is ignored; on register all three fields are required.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

/// The client-visible screens guarded by `Controller::guard_route`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public login/register screen.
    Entry,
    /// Protected upload/viewer/chat screen.
    Interact,
}
