//! services/client/src/adapters/chat.rs
//!
//! Implements the `ChatService` port against the question-answering endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::backend::{rejection, transport_error, Backend};
use vibebot_core::ports::{ChatService, PortResult};

/// An adapter that implements `ChatService` over the backend's HTTP API.
#[derive(Clone)]
pub struct HttpChatAdapter {
    backend: Backend,
}

impl HttpChatAdapter {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    transcript_id: &'a str,
    question: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    answer: Option<String>,
}

//=========================================================================================
// `ChatService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatService for HttpChatAdapter {
    /// POST /api/v1/chat with `{transcript_id, question}`. Returns `None`
    /// when the response body has no answer field.
    async fn ask(
        &self,
        token: &str,
        transcript_id: &str,
        question: &str,
    ) -> PortResult<Option<String>> {
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/v1/chat"))
            .bearer_auth(token)
            .json(&ChatRequest {
                transcript_id,
                question,
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body: ChatResponse = response.json().await.map_err(transport_error)?;
        Ok(body.answer)
    }
}
