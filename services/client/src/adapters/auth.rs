//! services/client/src/adapters/auth.rs
//!
//! Implements the `AuthService` port against the backend's login,
//! registration and token-verification endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::{rejection, transport_error, Backend};
use vibebot_core::ports::{AuthService, AuthenticatedUser, PortResult};

/// An adapter that implements `AuthService` over the backend's HTTP API.
#[derive(Clone)]
pub struct HttpAuthAdapter {
    backend: Backend,
}

impl HttpAuthAdapter {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    username: String,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct VerifiedUser {
    username: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(rename = "isValid")]
    is_valid: bool,
    user: Option<VerifiedUser>,
}

//=========================================================================================
// `AuthService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthService for HttpAuthAdapter {
    /// POST /api/v1/login, form-encoded.
    async fn login(&self, username: &str, password: &str) -> PortResult<AuthenticatedUser> {
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/v1/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body: LoginResponse = response.json().await.map_err(transport_error)?;
        debug!(username = %body.username, "login response received");
        Ok(AuthenticatedUser {
            access_token: body.access_token,
            username: body.username,
        })
    }

    /// POST /api/v1/register, JSON body. Success carries no payload.
    async fn register(&self, username: &str, email: &str, password: &str) -> PortResult<()> {
        let response = self
            .backend
            .client()
            .post(self.backend.url("/api/v1/register"))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    /// GET /api/v1/verify-token with the bearer token. Any non-200 status or
    /// invalid-token body maps to `None` rather than an error, matching the
    /// guard's "treat as no session" semantics.
    async fn verify_token(&self, token: &str) -> PortResult<Option<String>> {
        let response = self
            .backend
            .client()
            .get(self.backend.url("/api/v1/verify-token"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }

        let body: VerifyResponse = response.json().await.map_err(transport_error)?;
        if !body.is_valid {
            return Ok(None);
        }
        Ok(body.user.map(|user| user.username))
    }
}
