//! Caller identity middleware.
//!
//! Runs the configured [`Authenticator`](crate::services::Authenticator) and,
//! if it resolves a user, stores the [`SignedInUser`] in request extensions.
//! Calls without a resolvable user pass through unchanged; handlers decide
//! how to reject them.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::state::AppState;

/// Middleware that attaches the signed-in user, if any, to the request.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(user) = state.authenticator().resolve(request.headers()).await {
        tracing::debug!(user_id = user.user_id, org_id = user.org_id, "resolved caller");
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}
