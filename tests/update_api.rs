//! PATCH requests with an empty body must fail with 400 "No data" before any
//! SQL is produced or a connection is acquired. These run against the full
//! application router; the update builder rejects the request ahead of the
//! database layer, so no live database is needed.

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use jobly_api_rust::app;
use jobly_api_rust::auth::{sign_token, Claims};
use jobly_api_rust::config;

fn admin_header(username: &str) -> String {
    let secret = &config::config().security.jwt_secret;
    let token = sign_token(&Claims::new(username, true), secret).expect("sign test token");
    format!("Bearer {}", token)
}

async fn patch_empty(uri: &str, auth_header: Option<&str>) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = auth_header {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = app().oneshot(builder.body(Body::from("{}"))?).await?;

    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok((status, body))
}

#[tokio::test]
async fn empty_job_patch_is_rejected_with_no_data() -> Result<()> {
    let header = admin_header("admin");
    let (status, body) = patch_empty("/jobs/1", Some(&header)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No data");
    assert_eq!(body["error"]["status"], 400);
    Ok(())
}

#[tokio::test]
async fn empty_user_patch_is_rejected_with_no_data() -> Result<()> {
    let header = admin_header("admin");
    let (status, body) = patch_empty("/users/test", Some(&header)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No data");
    assert_eq!(body["error"]["status"], 400);
    Ok(())
}

#[tokio::test]
async fn guards_run_before_the_update_builder() -> Result<()> {
    // Anonymous caller: the guard chain refuses the request, so the empty
    // body never reaches the builder and the error is 401, not 400.
    let (status, body) = patch_empty("/jobs/1", None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status"], 401);
    Ok(())
}
