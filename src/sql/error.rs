use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlBuildError {
    #[error("no data to update")]
    EmptyUpdate,

    #[error("invalid column name: {0}")]
    InvalidColumn(String),
}
