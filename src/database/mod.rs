use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};

use crate::config;

static POOL: Lazy<PgPool> = Lazy::new(|| {
    let db = &config::config().database;
    PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(db.connection_timeout))
        .connect_lazy(&db.url)
        .expect("invalid DATABASE_URL")
});

/// Process-wide connection pool. Connections are only established on first
/// use, so pure-logic tests never touch the database.
pub fn pool() -> &'static PgPool {
    &POOL
}

pub async fn health_check() -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool()).await.map(|_| ())
}

/// Bind a JSON parameter value onto a typed `query_as` query. Fragment
/// builders carry their values as `serde_json::Value`, so binding dispatches
/// on the JSON type.
pub fn bind_value_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::Execute;

    #[test]
    fn test_bind_value_as_accepts_all_param_shapes() {
        let params = vec![json!(null), json!(true), json!(42), json!(1.5), json!("text")];

        let mut q = sqlx::query_as::<_, (i64,)>("SELECT $1, $2, $3, $4, $5");
        for param in &params {
            q = bind_value_as(q, param);
        }

        // Binding must not rewrite the SQL text; values travel separately.
        assert_eq!(q.sql(), "SELECT $1, $2, $3, $4, $5");
    }
}
