//! services/client/src/adapters/backend.rs
//!
//! The shared HTTP plumbing used by every backend adapter: one
//! `reqwest::Client` configured once (timeout, JSON defaults), base-URL
//! joining, and the common error translations into `PortError`.

use reqwest::{header, Response, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::error::ClientError;
use vibebot_core::ports::PortError;

/// A handle to the backend service, cloned into each adapter.
#[derive(Clone)]
pub struct Backend {
    client: reqwest::Client,
    base_url: String,
}

impl Backend {
    /// Builds the shared client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Joins an absolute endpoint path onto the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a transport-level failure (connection refused, timeout, malformed
/// body) into the generic port error.
pub(crate) fn transport_error(err: reqwest::Error) -> PortError {
    PortError::Unexpected(err.to_string())
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Extracts the backend's `detail` message from a non-success response,
/// falling back to the status code when the body carries none.
pub(crate) async fn rejection(response: Response) -> PortError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return PortError::Unauthorized;
    }
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            detail: Some(detail),
        }) => PortError::Rejected(detail),
        _ => PortError::Rejected(format!("Request failed with status {status}")),
    }
}
