use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;

use crate::auth::{authorize, Guard};
use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::models::{Job, JobNew, JobUpdate};
use crate::sql::JobFilter;

pub fn routes() -> Router {
    Router::new()
        .route("/jobs", get(jobs_get).post(jobs_post))
        .route(
            "/jobs/:id",
            get(job_get).patch(job_patch).delete(job_delete),
        )
}

/// POST /jobs - create a job. Authorization: admin.
pub async fn jobs_post(
    Extension(context): Extension<RequestContext>,
    Json(body): Json<JobNew>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&context, &[Guard::LoggedIn, Guard::Admin])?;

    let job = Job::create(body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// GET /jobs - list jobs, with optional title/minSalary/hasEquity filters.
/// Authorization: none.
pub async fn jobs_get(Query(filter): Query<JobFilter>) -> Result<impl IntoResponse, ApiError> {
    let jobs = require_matches(Job::find_all(&filter).await?)?;
    Ok(Json(json!({ "jobs": jobs })))
}

/// A search that matches nothing is reported as 404, not as an empty list.
fn require_matches(jobs: Vec<Job>) -> Result<Vec<Job>, ApiError> {
    if jobs.is_empty() {
        return Err(ApiError::not_found("No jobs match your search"));
    }
    Ok(jobs)
}

/// GET /jobs/:id - show one job. Authorization: none.
pub async fn job_get(Path(id): Path<i32>) -> Result<impl IntoResponse, ApiError> {
    let job = Job::get(id).await?;
    Ok(Json(json!({ "job": job })))
}

/// PATCH /jobs/:id - partial update. Authorization: admin.
pub async fn job_patch(
    Extension(context): Extension<RequestContext>,
    Path(id): Path<i32>,
    Json(body): Json<JobUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&context, &[Guard::LoggedIn, Guard::Admin])?;

    let job = Job::update(id, body).await?;
    Ok(Json(json!({ "job": job })))
}

/// DELETE /jobs/:id - Authorization: admin.
pub async fn job_delete(
    Extension(context): Extension<RequestContext>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&context, &[Guard::LoggedIn, Guard::Admin])?;

    Job::delete(id).await?;
    Ok(Json(json!({ "deleted": id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_search_result_is_404() {
        let err = require_matches(vec![]).unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "No jobs match your search");
    }

    #[test]
    fn test_matches_pass_through_unchanged() {
        let jobs = vec![Job {
            id: 1,
            title: "Engineer".to_string(),
            salary: Some(100000),
            equity: None,
            company_handle: "acme".to_string(),
        }];

        let passed = require_matches(jobs).unwrap();
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].id, 1);
    }
}
