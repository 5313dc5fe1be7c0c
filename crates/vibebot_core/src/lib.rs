pub mod controller;
pub mod domain;
pub mod ports;
pub mod validate;

pub use controller::{AuthError, AuthOutcome, Controller, RouteDecision};
pub use domain::{
    Attachment, AuthMode, ConversationEntry, Credentials, FileKind, Role, Route, Session,
    SourceFile,
};
pub use ports::{
    AuthService, AuthenticatedUser, ChatService, FileProcessingService, PortError, PortResult,
    ProcessedFile,
};
pub use validate::FieldError;
