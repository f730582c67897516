use serde::Deserialize;
use serde_json::json;

use super::types::SqlFragment;

/// Search filters accepted by the job list endpoint. All fields are
/// independently optional; the caller (the query-string layer) is responsible
/// for producing typed values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub title: Option<String>,
    #[serde(rename = "minSalary")]
    pub min_salary: Option<i64>,
    #[serde(rename = "hasEquity")]
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.min_salary.is_none() && self.has_equity.is_none()
    }

    /// Build the WHERE fragment for whichever filters are present, AND-joined
    /// in the order title, minSalary, hasEquity. Parameter indices stay
    /// contiguous from $1 regardless of which subset is supplied. An empty
    /// filter yields an empty fragment (no WHERE clause at all).
    pub fn to_where_sql(&self) -> SqlFragment {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(title) = &self.title {
            params.push(json!(format!("%{}%", title)));
            conditions.push(format!("\"title\" ILIKE ${}", params.len()));
        }

        if let Some(min_salary) = self.min_salary {
            params.push(json!(min_salary));
            conditions.push(format!("\"salary\" >= ${}", params.len()));
        }

        // hasEquity=false means "don't filter on equity", not "equity <= 0";
        // only an explicit true adds the predicate, and it takes no parameter.
        if self.has_equity == Some(true) {
            conditions.push("\"equity\" > 0".to_string());
        }

        if conditions.is_empty() {
            return SqlFragment::empty();
        }

        let fragment = SqlFragment {
            text: conditions.join(" AND "),
            params,
        };
        tracing::debug!(where_clause = %fragment.text, "built job filter fragment");
        fragment
    }
}
