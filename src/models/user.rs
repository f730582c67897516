use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::{self, bind_value_as};
use crate::error::ApiError;
use crate::sql::{partial_update, FieldMapping, UpdateRequest};

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(rename = "firstName")]
    #[sqlx(rename = "first_name")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    #[sqlx(rename = "last_name")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    #[sqlx(rename = "is_admin")]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserNew {
    pub username: String,
    pub password: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
}

/// Updatable user fields. Username and admin status are not self-serviceable.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Field -> column associations for user updates.
fn user_field_mapping() -> FieldMapping {
    FieldMapping::new()
        .map("firstName", "first_name")
        .map("lastName", "last_name")
        .map("isAdmin", "is_admin")
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("password hashing failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })
}

impl User {
    /// Register a new user with a hashed password.
    pub async fn register(data: UserNew) -> Result<User, ApiError> {
        let existing = sqlx::query("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(database::pool())
            .await?;
        if existing.is_some() {
            return Err(ApiError::bad_request(format!(
                "Duplicate username: {}",
                data.username
            )));
        }

        let hashed = hash_password(&data.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.username)
        .bind(&hashed)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(data.is_admin.unwrap_or(false))
        .fetch_one(database::pool())
        .await?;

        Ok(user)
    }

    /// Check username/password. The response for an unknown user and a wrong
    /// password is identical.
    pub async fn authenticate(username: &str, password: &str) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(database::pool())
        .await?;

        let invalid = || ApiError::unauthorized("Invalid username/password");
        let row = row.ok_or_else(invalid)?;

        let parsed = PasswordHash::new(&row.password).map_err(|e| {
            tracing::error!("stored password hash is unreadable: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| invalid())?;

        Ok(row.user)
    }

    pub async fn find_all() -> Result<Vec<User>, ApiError> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(database::pool())
        .await?)
    }

    pub async fn get(username: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(database::pool())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))
    }

    /// Ids of the jobs this user has applied to.
    pub async fn applications(username: &str) -> Result<Vec<i32>, ApiError> {
        let ids = sqlx::query_scalar::<_, i32>(
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
        )
        .bind(username)
        .fetch_all(database::pool())
        .await?;
        Ok(ids)
    }

    /// Partially update a user; a supplied password is re-hashed before it
    /// enters the parameter list.
    pub async fn update(username: &str, data: UserUpdate) -> Result<User, ApiError> {
        let mut update = UpdateRequest::new();
        update
            .set_if_some("firstName", data.first_name)
            .set_if_some("lastName", data.last_name)
            .set_if_some("email", data.email);
        if let Some(password) = data.password {
            update.set("password", hash_password(&password)?);
        }

        let fragment = partial_update(&update, &user_field_mapping())?;

        let username_index = fragment.params.len() + 1;
        let query = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {USER_COLUMNS}",
            fragment.text, username_index
        );

        let mut q = sqlx::query_as::<_, User>(&query);
        for param in &fragment.params {
            q = bind_value_as(q, param);
        }

        q.bind(username)
            .fetch_optional(database::pool())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))
    }

    pub async fn delete(username: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(database::pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!("No user: {}", username)));
        }
        Ok(())
    }

    /// Record a job application for this user.
    pub async fn apply(username: &str, job_id: i32) -> Result<(), ApiError> {
        let job = sqlx::query("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(database::pool())
            .await?;
        if job.is_none() {
            return Err(ApiError::not_found(format!("No job: {}", job_id)));
        }

        let user = sqlx::query("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(database::pool())
            .await?;
        if user.is_none() {
            return Err(ApiError::not_found(format!("No user: {}", username)));
        }

        sqlx::query("INSERT INTO applications (username, job_id) VALUES ($1, $2)")
            .bind(username)
            .bind(job_id)
            .execute(database::pool())
            .await?;
        Ok(())
    }
}

/// Internal row shape for credential checks; the hash never leaves this module.
#[derive(Debug, FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}
