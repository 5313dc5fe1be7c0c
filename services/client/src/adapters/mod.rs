pub mod auth;
pub mod backend;
pub mod chat;
pub mod processing;

pub use auth::HttpAuthAdapter;
pub use backend::Backend;
pub use chat::HttpChatAdapter;
pub use processing::HttpProcessingAdapter;
