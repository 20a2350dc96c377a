use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, auth::resolve_caller, error::ApiError};

/// is_authenticated
///
/// Gate for every non-public route. Lets the request through when a caller identity can
/// be resolved, stashing it in the request extensions for the handler's extractor;
/// otherwise answers 401. Any role passes.
pub async fn is_authenticated(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match resolve_caller(&parts, &state.repo, &state.credentials, &state.config).await {
        Some(user) => {
            tracing::info!("Authenticated user: {}", user.id);
            parts.extensions.insert(user);
            next.run(Request::from_parts(parts, body)).await
        }
        None => {
            tracing::warn!("Unauthorized access attempt detected. No user found in request.");
            ApiError::unauthorized("You must be logged in to access this resource.").into_response()
        }
    }
}
