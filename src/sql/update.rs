use std::collections::HashMap;

use serde_json::Value;

use super::error::SqlBuildError;
use super::types::SqlFragment;

/// Ordered field -> value pairs for a partial update. Insertion order defines
/// parameter order in the generated SQL.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    entries: Vec<(String, Value)>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.push((field.into(), value.into()));
        self
    }

    /// Append the field only when a value was actually supplied. Lets handlers
    /// fold optional body fields straight into the request.
    pub fn set_if_some<T: Into<Value>>(&mut self, field: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.entries.iter()
    }
}

/// Server-declared field -> column associations. Fields without an entry use
/// the field name verbatim as the column name. Keys never come from caller
/// input; only values declared here may reach a column-name position.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    columns: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }
}

/// Build the SET fragment and value list for a partial UPDATE.
///
/// Column names are interpolated into the SQL text and therefore must come
/// from the trusted mapping (or from server-declared field names); caller
/// values only ever land in the parameter list.
pub fn partial_update(
    data: &UpdateRequest,
    mapping: &FieldMapping,
) -> Result<SqlFragment, SqlBuildError> {
    if data.is_empty() {
        return Err(SqlBuildError::EmptyUpdate);
    }

    let mut assignments = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());

    for (index, (field, value)) in data.iter().enumerate() {
        let column = mapping.resolve(field);
        validate_column(column)?;
        assignments.push(format!("\"{}\"=${}", column, index + 1));
        params.push(value.clone());
    }

    let fragment = SqlFragment {
        text: assignments.join(", "),
        params,
    };
    tracing::debug!(set_clause = %fragment.text, "built partial update fragment");
    Ok(fragment)
}

fn validate_column(column: &str) -> Result<(), SqlBuildError> {
    let starts_ok = column
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');

    if !starts_ok || !column.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SqlBuildError::InvalidColumn(column.to_string()));
    }
    Ok(())
}
