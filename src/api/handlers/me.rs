use crate::{
    api::handlers::{bearer_token, message_response},
    cli::globals::GlobalArgs,
    token::{self, Claims},
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub user: Claims,
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    params(
        ("Authorization" = String, Header, description = "Bearer session token")
    ),
    responses(
        (status = 200, description = "Decoded session claims", body = MeResponse, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = String),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn me(headers: HeaderMap, globals: Extension<GlobalArgs>) -> impl IntoResponse {
    let Some(token) = bearer_token(&headers) else {
        return message_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    match token::verify(globals.session_secret.expose_secret(), token) {
        Ok(claims) => (StatusCode::OK, Json(MeResponse { user: claims })).into_response(),
        Err(e) => {
            debug!("Session token rejected: {e}");

            message_response(StatusCode::UNAUTHORIZED, "Invalid token")
        }
    }
}
