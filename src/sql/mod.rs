pub mod error;
pub mod query;
pub mod types;
pub mod update;

pub use error::SqlBuildError;
pub use query::JobFilter;
pub use types::SqlFragment;
pub use update::{partial_update, FieldMapping, UpdateRequest};
