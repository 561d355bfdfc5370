use crate::GIT_COMMIT_HASH;
use axum::{
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Health {
    pub name: &'static str,
    pub version: &'static str,
    pub build: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service name, version and build", body = Health, content_type = "application/json"),
    ),
    tag = "hornada"
)]
// axum handler for health
pub async fn health() -> impl IntoResponse {
    let body = Json(Health {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build: GIT_COMMIT_HASH,
    });

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
    .parse()
    {
        headers.insert("X-App", value);
    }

    (headers, body)
}
