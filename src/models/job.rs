use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::{self, bind_value_as};
use crate::error::ApiError;
use crate::sql::{partial_update, FieldMapping, JobFilter, UpdateRequest};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    #[serde(rename = "companyHandle")]
    #[sqlx(rename = "company_handle")]
    pub company_handle: String,
}

#[derive(Debug, Deserialize)]
pub struct JobNew {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    #[serde(rename = "companyHandle")]
    pub company_handle: String,
}

/// Updatable job fields. `id` and `companyHandle` never change.
#[derive(Debug, Default, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
}

impl Job {
    pub async fn create(data: JobNew) -> Result<Job, ApiError> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS}"
        ))
        .bind(&data.title)
        .bind(data.salary)
        .bind(data.equity)
        .bind(&data.company_handle)
        .fetch_one(database::pool())
        .await?;

        Ok(job)
    }

    /// List jobs, optionally narrowed by search filters.
    pub async fn find_all(filter: &JobFilter) -> Result<Vec<Job>, ApiError> {
        let fragment = filter.to_where_sql();

        let mut query = format!("SELECT {JOB_COLUMNS} FROM jobs");
        if !fragment.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&fragment.text);
        }

        let mut q = sqlx::query_as::<_, Job>(&query);
        for param in &fragment.params {
            q = bind_value_as(q, param);
        }

        Ok(q.fetch_all(database::pool()).await?)
    }

    pub async fn get(id: i32) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(database::pool())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))
    }

    /// Partially update a job; only the supplied fields change.
    pub async fn update(id: i32, data: JobUpdate) -> Result<Job, ApiError> {
        let mut update = UpdateRequest::new();
        update
            .set_if_some("title", data.title)
            .set_if_some("salary", data.salary)
            .set_if_some("equity", data.equity);

        // Job fields already match their column names, so no mapping entries
        let fragment = partial_update(&update, &FieldMapping::new())?;

        let id_index = fragment.params.len() + 1;
        let query = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS}",
            fragment.text, id_index
        );

        let mut q = sqlx::query_as::<_, Job>(&query);
        for param in &fragment.params {
            q = bind_value_as(q, param);
        }

        q.bind(id)
            .fetch_optional(database::pool())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))
    }

    pub async fn delete(id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(database::pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!("No job: {}", id)));
        }
        Ok(())
    }
}
