//! Session tokens.
//!
//! A session is a self-contained signed JWT (HS256, process-wide secret)
//! carrying the subject id, email and role. Tokens are valid for a fixed
//! seven-day window from issuance; there is no revocation list, a session
//! ends when the client discards the token or the expiry elapses.

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;
use utoipa::ToSchema;

/// Fixed session validity window, seven days.
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(ToSchema, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject, the credential record id.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Whether the expiry has elapsed relative to `now` (unix seconds).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("failed to sign token")]
    Sign,
}

pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Issue a session token for a credential record.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn issue(secret: &str, sub: &str, email: &str, role: &str) -> Result<String, Error> {
    let now = now_unix_seconds();
    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECONDS,
    };

    sign(secret, &claims)
}

/// Sign claims into an HS256 session token.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn sign(secret: &str, claims: &Claims) -> Result<String, Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| Error::Sign)
}

/// Verify a session token and return its decoded claims.
///
/// # Errors
///
/// Returns an error if:
/// - the token is malformed or contains invalid base64/json,
/// - the signature is invalid,
/// - the expiry has elapsed (no clock-skew leeway).
pub fn verify(secret: &str, token: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => Error::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::Base64(_) => Error::Base64,
        _ => Error::TokenFormat,
    })
}

/// Decode the claims segment without checking the signature.
///
/// The client-side guard holds no signing secret; it peeks at the payload to
/// project the session identity and expiry. Authorization still happens
/// server-side on every API call.
///
/// # Errors
///
/// Returns an error if the token is not three dot-separated segments or the
/// claims segment is not valid base64url/json.
pub fn decode_unverified(token: &str) -> Result<Claims, Error> {
    let mut parts = token.split('.');
    let _header = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let _signature = parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() {
        return Err(Error::TokenFormat);
    }

    let bytes = Base64UrlUnpadded::decode_vec(claims_b64).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}
