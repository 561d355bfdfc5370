use crate::{
    api::handlers::{is_unique_violation, message_response, valid_email},
    password::hash_password,
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::{error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegister {
    name: String,
    email: String,
    password: String,
    role: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisteredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = UserRegister,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse, content_type = "application/json"),
        (status = 400, description = "Missing field, invalid email or email already registered", body = String),
        (status = 405, description = "Method not allowed", body = String),
        (status = 500, description = "Database error", body = String),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<UserRegister>>,
) -> impl IntoResponse {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => {
            return message_response(
                StatusCode::BAD_REQUEST,
                "Name, Email, Password, and Role required",
            );
        }
    };

    let name = user.name.trim();
    let email = user.email.trim();
    let role = user.role.trim();

    if name.is_empty() || email.is_empty() || user.password.is_empty() || role.is_empty() {
        return message_response(
            StatusCode::BAD_REQUEST,
            "Name, Email, Password, and Role required",
        );
    }

    if !valid_email(email) {
        return message_response(StatusCode::BAD_REQUEST, "Invalid email");
    }

    // check if user exists
    match user_exists(&pool, email).await {
        Ok(true) => {
            return message_response(StatusCode::BAD_REQUEST, "Email already registered");
        }
        Ok(false) => (),
        Err(e) => {
            error!("Error checking if user exists: {:?}", e);
            return message_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error while checking email",
            );
        }
    }

    // hash the password before inserting
    let password = match hash_password(&user.password) {
        Ok(password) => password,
        Err(e) => {
            error!("Error hashing password: {:?}", e);
            return message_response(StatusCode::INTERNAL_SERVER_ERROR, "Error hashing password");
        }
    };

    // insert user, the unique constraint on email closes the race between the
    // existence check and the insert
    match insert_user(&pool, name, email, &password, role).await {
        Ok(registered) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User registered successfully".to_string(),
                user: registered,
            }),
        )
            .into_response(),
        Err(e) if is_unique_violation(&e) => {
            message_response(StatusCode::BAD_REQUEST, "Email already registered")
        }
        Err(e) => {
            error!("Error inserting user: {:?}", e);
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "Error inserting user")
        }
    }
}

async fn user_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS exists")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(row.get("exists"))
}

async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<RegisteredUser, sqlx::Error> {
    let row = sqlx::query(
        r"
        INSERT INTO users (name, email, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, role
    ",
    )
    .bind(name)
    .bind(email)
    .bind(password)
    .bind(role)
    .fetch_one(pool)
    .await?;

    let id: Uuid = row.get("id");
    Ok(RegisteredUser {
        id: id.to_string(),
        name: row.get("name"),
        email: row.get("email"),
        role: row.get("role"),
    })
}
