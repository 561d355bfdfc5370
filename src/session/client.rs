//! Client wrappers for the hornada auth API endpoints. These helpers
//! centralize request setup and error mapping, keeping auth flows consistent
//! and preventing token leakage in page code.
//!
//! No request timeout is configured, a hung login leaves the caller in its
//! "signing in" state until the transport gives up.

use crate::token::Claims;
use serde::Deserialize;
use std::fmt;

#[derive(Clone, Debug)]
pub enum ClientError {
    Network(String),
    Http { status: u16, message: String },
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(message) => write!(formatter, "Network error: {message}"),
            ClientError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            ClientError::Parse(message) => write!(formatter, "Response error: {message}"),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct MeResponse {
    user: Claims,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the auth endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    http: reqwest::Client,
}

impl AuthClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server responds with a
    /// non-success status, or the response body cannot be decoded.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to send login request: {e}")))?;

        let response = check_status(response).await?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to decode login response: {e}")))?;

        Ok(body.token)
    }

    /// Ask the server to verify a session token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the token is rejected, or the
    /// response body cannot be decoded.
    pub async fn me(&self, token: &str) -> Result<Claims, ClientError> {
        let url = format!("{}/api/auth/me", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to send session request: {e}")))?;

        let response = check_status(response).await?;
        let body: MeResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to decode session response: {e}")))?;

        Ok(body.user)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = AuthClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn error_display_includes_status_and_message() {
        let error = ClientError::Http {
            status: 401,
            message: "Invalid email or password".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Request failed (401): Invalid email or password"
        );
    }
}
