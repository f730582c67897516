use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{sign_token, Claims, TokenError};
use crate::config;
use crate::error::ApiError;
use crate::models::{User, UserNew};

pub fn routes() -> Router {
    Router::new()
        .route("/auth/token", post(token_post))
        .route("/auth/register", post(register_post))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issue a token for an existing user.
pub fn create_token(user: &User) -> Result<String, ApiError> {
    let secret = &config::config().security.jwt_secret;
    let claims = Claims::new(&user.username, user.is_admin);
    sign_token(&claims, secret).map_err(|e: TokenError| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}

/// POST /auth/token - exchange credentials for a bearer token
pub async fn token_post(Json(body): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let user = User::authenticate(&body.username, &body.password).await?;
    let token = create_token(&user)?;
    Ok(Json(json!({ "token": token })))
}

/// POST /auth/register - self-service signup; new accounts are never admins
pub async fn register_post(Json(mut body): Json<UserNew>) -> Result<impl IntoResponse, ApiError> {
    body.is_admin = Some(false);
    let user = User::register(body).await?;
    let token = create_token(&user)?;
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}
