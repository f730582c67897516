use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;

use crate::auth::{authorize, Guard};
use crate::error::ApiError;
use crate::handlers::auth::create_token;
use crate::middleware::RequestContext;
use crate::models::{User, UserNew, UserUpdate};

pub fn routes() -> Router {
    Router::new()
        .route("/users", get(users_get).post(users_post))
        .route(
            "/users/:username",
            get(user_get).patch(user_patch).delete(user_delete),
        )
        .route("/users/:username/jobs/:id", post(user_apply))
}

/// POST /users - admin adds an account (possibly another admin); returns the
/// new user plus a token for them. Authorization: admin.
pub async fn users_post(
    Extension(context): Extension<RequestContext>,
    Json(body): Json<UserNew>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&context, &[Guard::LoggedIn, Guard::Admin])?;

    let user = User::register(body).await?;
    let token = create_token(&user)?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}

/// GET /users - list all users. Authorization: admin.
pub async fn users_get(
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&context, &[Guard::LoggedIn, Guard::Admin])?;

    let users = User::find_all().await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /users/:username - user detail with applied job ids.
/// Authorization: admin or same user.
pub async fn user_get(
    Extension(context): Extension<RequestContext>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(
        &context,
        &[Guard::LoggedIn, Guard::AdminOrSelf(username.clone())],
    )?;

    let user = User::get(&username).await?;
    let jobs = User::applications(&username).await?;

    let mut body = serde_json::to_value(&user).map_err(|e| {
        tracing::error!("failed to serialize user: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;
    body["jobs"] = json!(jobs);
    Ok(Json(json!({ "user": body })))
}

/// PATCH /users/:username - partial update. Authorization: admin or same user.
pub async fn user_patch(
    Extension(context): Extension<RequestContext>,
    Path(username): Path<String>,
    Json(body): Json<UserUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(
        &context,
        &[Guard::LoggedIn, Guard::AdminOrSelf(username.clone())],
    )?;

    let user = User::update(&username, body).await?;
    Ok(Json(json!({ "user": user })))
}

/// DELETE /users/:username - Authorization: admin or same user.
pub async fn user_delete(
    Extension(context): Extension<RequestContext>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(
        &context,
        &[Guard::LoggedIn, Guard::AdminOrSelf(username.clone())],
    )?;

    User::delete(&username).await?;
    Ok(Json(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id - apply for a job. Authorization: login.
pub async fn user_apply(
    Extension(context): Extension<RequestContext>,
    Path((username, job_id)): Path<(String, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&context, &[Guard::LoggedIn])?;

    User::apply(&username, job_id).await?;
    Ok(Json(json!({ "applied": job_id })))
}
