//! HTTP route handlers.

pub mod dashboard_import;
pub mod health;
pub mod metrics;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the application router.
///
/// Every route sees the caller identity resolved by
/// [`resolve_identity`](crate::middleware::resolve_identity). Unknown routes
/// answer with the same 404 that anonymous import calls get.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(dashboard_import::router(state.import_body_limit()))
        .merge(health::router())
        .merge(metrics::router())
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::resolve_identity,
        ))
        .with_state(state)
}

/// Generic 404 handler.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
