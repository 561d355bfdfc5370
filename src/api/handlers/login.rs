use crate::{
    api::handlers::message_response,
    cli::globals::GlobalArgs,
    password::verify_password,
    token,
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserLogin {
    email: String,
    password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = UserLogin,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Email and password required", body = String),
        (status = 401, description = "Invalid email or password", body = String),
        (status = 405, description = "Method not allowed", body = String),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    globals: Extension<GlobalArgs>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => {
            return message_response(StatusCode::BAD_REQUEST, "Email and password required");
        }
    };

    if user.email.trim().is_empty() || user.password.is_empty() {
        return message_response(StatusCode::BAD_REQUEST, "Email and password required");
    }

    // Find user by email. An unknown email and a wrong password produce the
    // same response, account existence must not leak through this endpoint.
    let record = match find_credential(&pool, user.email.trim()).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("User not found");

            return message_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        Err(e) => {
            error!("Error getting credential record from database: {:?}", e);

            return message_response(StatusCode::INTERNAL_SERVER_ERROR, "Error getting user");
        }
    };

    if !verify_password(&record.password, &user.password) {
        debug!("Password mismatch");

        return message_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    let token = match token::issue(
        globals.session_secret.expose_secret(),
        &record.id.to_string(),
        &record.email,
        &record.role,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!("Error signing session token: {e}");

            return message_response(StatusCode::INTERNAL_SERVER_ERROR, "Error signing token");
        }
    };

    debug!("Login successful");

    (
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    )
        .into_response()
}

struct CredentialRecord {
    id: Uuid,
    email: String,
    password: String,
    role: String,
}

async fn find_credential(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>, sqlx::Error> {
    let row = sqlx::query("SELECT id, email, password, role FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| CredentialRecord {
        id: row.get("id"),
        email: row.get("email"),
        password: row.get("password"),
        role: row.get("role"),
    }))
}
