pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod sql;

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the full application router. Every route sits behind the
/// authentication stage; per-route authorization happens in the handlers.
pub fn app() -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(handlers::auth::routes())
        .merge(handlers::jobs::routes())
        .merge(handlers::users::routes())
        .layer(from_fn(middleware::authenticate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
