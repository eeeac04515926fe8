use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{authenticate, AuthenticatedContext};
use crate::error::ApiError;

/// Basic authentication middleware. Rejects the request with the shared
/// 401 body, or stores an [`AuthenticatedContext`] in the request
/// extensions for the handler to pick up with `Extension`.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context: AuthenticatedContext =
        authenticate(state.store.as_ref(), &state.hasher, request.headers()).await?;

    tracing::debug!(user_id = context.identity.id, "Authenticated request");

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
