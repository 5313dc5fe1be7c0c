//! crates/vibebot_core/src/controller.rs
//!
//! The Session Interaction Controller: owns the authenticated session, the
//! currently attached file with its derived artifacts, and the ordered chat
//! history, and mediates every backend call through the ports. View code
//! never mutates state directly; all mutation funnels through the operations
//! defined here.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    Attachment, AuthMode, ConversationEntry, Credentials, FileKind, Route, Session, SourceFile,
};
use crate::ports::{AuthService, ChatService, FileProcessingService, PortError};
use crate::validate::{self, FieldError};

//=========================================================================================
// Fixed User-Visible Messages
//=========================================================================================

/// Synthetic greeting seeded as the first conversation entry.
pub const GREETING: &str = "Hello! Upload a PDF, audio, or video file to get started.";

/// Placeholder content shown while a question is in flight.
pub const THINKING: &str = "🤔 Thinking...";

/// Shown when the chat backend responds without an answer field.
pub const NO_ANSWER: &str = "No valid response received.";

/// Replaces the placeholder when the chat call fails.
pub const CHAT_ERROR: &str =
    "⚠️ Sorry, something went wrong while processing your question. Please try again later.";

/// Appended when file processing fails.
pub const PROCESSING_ERROR: &str =
    "Sorry, there was an error processing the file. Please try again.";

/// Appended when the active attachment is removed.
pub const FILE_REMOVED: &str =
    "The file has been removed. You can upload a new document to continue.";

/// Generic alert for a rejected login.
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";

/// Fallback alert for a failed registration with no backend detail.
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Invitation appended once a file has been processed.
pub fn upload_invitation(file_name: &str) -> String {
    format!("I see you've uploaded \"{file_name}\". What would you like to know about it?")
}

//=========================================================================================
// Operation Outcomes
//=========================================================================================

/// Result of a successful `authenticate` call.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// Login succeeded; the session is now active.
    LoggedIn(Session),
    /// Registration succeeded; no auto-login, the user should log in next.
    Registered,
}

/// User-facing authentication failure.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Caught before any network call; rendered inline per field.
    #[error("Invalid input")]
    Validation(Vec<FieldError>),
    /// Backend rejection, already reduced to display text.
    #[error("{0}")]
    Backend(String),
}

/// Advisory routing decision from `guard_route`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

//=========================================================================================
// Controller State
//=========================================================================================

/// Tab-wide mutable state. Private to the controller module so every
/// mutation goes through a controller operation.
#[derive(Debug, Default)]
struct AppState {
    session: Option<Session>,
    attachment: Option<Attachment>,
    conversation: Vec<ConversationEntry>,
    /// Bumped on every attach/remove. A processing response captured under an
    /// older generation is discarded rather than applied, so a slow call can
    /// never repopulate state that belongs to a newer (or absent) file.
    attachment_generation: u64,
}

impl AppState {
    fn token(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.token.clone())
            .unwrap_or_default()
    }
}

//=========================================================================================
// The Controller
//=========================================================================================

pub struct Controller {
    auth: Arc<dyn AuthService>,
    processing: Arc<dyn FileProcessingService>,
    chat: Arc<dyn ChatService>,
    state: Arc<Mutex<AppState>>,
}

impl Controller {
    /// Creates a controller with an empty session and a conversation seeded
    /// with the greeting entry.
    pub fn new(
        auth: Arc<dyn AuthService>,
        processing: Arc<dyn FileProcessingService>,
        chat: Arc<dyn ChatService>,
    ) -> Self {
        let state = AppState {
            conversation: vec![ConversationEntry::assistant(GREETING)],
            ..AppState::default()
        };
        Self {
            auth,
            processing,
            chat,
            state: Arc::new(Mutex::new(state)),
        }
    }

    //---------------------------------------------------------------------------------
    // Read-only snapshots for view code
    //---------------------------------------------------------------------------------

    pub async fn session(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    pub async fn attachment(&self) -> Option<Attachment> {
        self.state.lock().await.attachment.clone()
    }

    pub async fn conversation(&self) -> Vec<ConversationEntry> {
        self.state.lock().await.conversation.clone()
    }

    //---------------------------------------------------------------------------------
    // authenticate
    //---------------------------------------------------------------------------------

    /// Validates the form input, then performs the login or registration
    /// call. A successful login stores the session; a successful
    /// registration does not log the user in.
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthOutcome, AuthError> {
        validate::validate(mode, credentials).map_err(AuthError::Validation)?;

        match mode {
            AuthMode::Login => {
                match self
                    .auth
                    .login(&credentials.username, &credentials.password)
                    .await
                {
                    Ok(user) => {
                        let session = Session {
                            token: user.access_token,
                            username: user.username,
                        };
                        info!(username = %session.username, "login succeeded");
                        self.state.lock().await.session = Some(session.clone());
                        Ok(AuthOutcome::LoggedIn(session))
                    }
                    Err(err) => {
                        warn!(%err, "login rejected");
                        Err(AuthError::Backend(LOGIN_FAILED.to_string()))
                    }
                }
            }
            AuthMode::Register => {
                let email = credentials.email.as_deref().unwrap_or_default();
                match self
                    .auth
                    .register(&credentials.username, email, &credentials.password)
                    .await
                {
                    Ok(()) => Ok(AuthOutcome::Registered),
                    Err(PortError::Rejected(detail)) => Err(AuthError::Backend(detail)),
                    Err(err) => {
                        warn!(%err, "registration failed");
                        Err(AuthError::Backend(REGISTER_FAILED.to_string()))
                    }
                }
            }
        }
    }

    //---------------------------------------------------------------------------------
    // guard_route
    //---------------------------------------------------------------------------------

    /// Advisory route guard. Verifies the current token with the backend and
    /// decides whether the given route may be shown. Verification failure is
    /// treated as "no session", never surfaced as an error; the backend is
    /// assumed to independently reject unauthorized calls either way.
    pub async fn guard_route(&self, route: Route) -> RouteDecision {
        let token = self.state.lock().await.token();

        let verified = match self.auth.verify_token(&token).await {
            Ok(Some(username)) => !username.is_empty(),
            Ok(None) => false,
            Err(err) => {
                info!(%err, "token verification failed; treating as no session");
                false
            }
        };

        match (route, verified) {
            (Route::Entry, true) => RouteDecision::Redirect(Route::Interact),
            (Route::Entry, false) => RouteDecision::Allow,
            (Route::Interact, true) => RouteDecision::Allow,
            (Route::Interact, false) => RouteDecision::Redirect(Route::Entry),
        }
    }

    //---------------------------------------------------------------------------------
    // attach_file
    //---------------------------------------------------------------------------------

    /// Attaches `file`, replacing any existing attachment and clearing its
    /// derived fields before any network call is made. Dispatches at most
    /// one processing call chosen by the file's kind; `Unknown` files are
    /// attached without a backend call.
    ///
    /// The result of the processing call is applied only if the attachment
    /// generation still matches; a response that arrives after the file was
    /// replaced or removed is discarded entirely.
    pub async fn attach_file(&self, file: SourceFile) -> FileKind {
        let upload = file.clone();
        let name = file.name.clone();

        let (kind, token, generation) = {
            let mut state = self.state.lock().await;
            state.attachment_generation += 1;
            let attachment = Attachment::new(file);
            let kind = attachment.kind;
            state.attachment = Some(attachment);
            (kind, state.token(), state.attachment_generation)
        };

        info!(file = %name, %kind, "file attached");

        let result = match kind {
            FileKind::Pdf => Some(self.processing.process_pdf(&token, &upload).await),
            FileKind::Audio | FileKind::Video => {
                Some(self.processing.transcribe(&token, &upload).await)
            }
            FileKind::Unknown => {
                // Unrecognized types stay attached with no processing call,
                // so questions about them no-op until a recognizable file
                // replaces them.
                warn!(file = %name, mime = %upload.mime_type, "unrecognized file type; skipping processing");
                None
            }
        };

        let Some(result) = result else {
            return kind;
        };

        let mut state = self.state.lock().await;
        if state.attachment_generation != generation {
            info!(file = %name, "discarding stale processing result");
            return kind;
        }

        match result {
            Ok(processed) => {
                if let Some(attachment) = state.attachment.as_mut() {
                    attachment.transcript = processed.transcript;
                    attachment.summary = processed.summary;
                    attachment.transcript_id = Some(processed.transcript_id);
                }
                state
                    .conversation
                    .push(ConversationEntry::assistant(upload_invitation(&name)));
            }
            Err(err) => {
                error!(file = %name, %err, "file processing failed");
                state
                    .conversation
                    .push(ConversationEntry::assistant(PROCESSING_ERROR));
            }
        }

        kind
    }

    //---------------------------------------------------------------------------------
    // remove_attachment
    //---------------------------------------------------------------------------------

    /// Clears the attachment and all derived fields atomically and announces
    /// the removal in the conversation. Prior chat history is retained.
    /// No-op when nothing is attached.
    pub async fn remove_attachment(&self) {
        let mut state = self.state.lock().await;
        if state.attachment.take().is_none() {
            return;
        }
        state.attachment_generation += 1;
        state
            .conversation
            .push(ConversationEntry::assistant(FILE_REMOVED));
        info!("attachment removed");
    }

    //---------------------------------------------------------------------------------
    // ask
    //---------------------------------------------------------------------------------

    /// Submits one question about the attached file. Appends the user entry
    /// and a placeholder assistant entry, calls the chat backend once, then
    /// replaces the placeholder in place (matched by id, so concurrent
    /// questions resolve independently of arrival order).
    ///
    /// A no-op returning `false` when the trimmed question is empty or no
    /// transcript id is present.
    pub async fn ask(&self, question: &str) -> bool {
        let question = question.trim();
        if question.is_empty() {
            return false;
        }

        let (token, transcript_id, placeholder_id) = {
            let mut state = self.state.lock().await;
            let transcript_id = state
                .attachment
                .as_ref()
                .and_then(|a| a.transcript_id.clone())
                .filter(|id| !id.is_empty());
            let Some(transcript_id) = transcript_id else {
                return false;
            };

            state.conversation.push(ConversationEntry::user(question));
            let placeholder = ConversationEntry::assistant(THINKING);
            let placeholder_id = placeholder.id;
            state.conversation.push(placeholder);

            (state.token(), transcript_id, placeholder_id)
        };

        let content = match self.chat.ask(&token, &transcript_id, question).await {
            Ok(Some(answer)) => answer,
            Ok(None) => NO_ANSWER.to_string(),
            Err(err) => {
                error!(%err, "chat request failed");
                CHAT_ERROR.to_string()
            }
        };

        self.resolve_placeholder(placeholder_id, content).await;
        true
    }

    /// Mutates only the entry matching `id`; a placeholder whose entry was
    /// somehow dropped resolves to nothing rather than corrupting another
    /// turn.
    async fn resolve_placeholder(&self, id: Uuid, content: String) {
        let mut state = self.state.lock().await;
        match state.conversation.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.content = content,
            None => warn!(%id, "placeholder entry vanished before resolution"),
        }
    }

    //---------------------------------------------------------------------------------
    // logout
    //---------------------------------------------------------------------------------

    /// Drops the session. The route guard will redirect to the entry screen
    /// on the next protected-view check.
    pub async fn logout(&self) {
        self.state.lock().await.session = None;
        info!("session cleared");
    }
}

//=========================================================================================
// Tests
//=========================================================================================
