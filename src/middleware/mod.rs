pub mod auth;

pub use auth::{authenticate, Identity, RequestContext};
