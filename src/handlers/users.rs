use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use secrecy::ExposeSecret;

use crate::app::AppState;
use crate::auth::AuthenticatedContext;
use crate::database::models::{UserInput, UserProfile};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/users - the authenticated user
pub async fn current(Extension(context): Extension<AuthenticatedContext>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(context.identity))
}

/// POST /api/users - register an account
///
/// The password is hashed before it reaches the store. Responds 201 with
/// `Location: /` and no body.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> ApiResult<()> {
    let Json(input) = payload?;
    let valid = input.validate().map_err(ApiError::validation_error)?;

    let hasher = Arc::clone(&state.hasher);
    let (valid, digest) = tokio::task::spawn_blocking(move || {
        let digest = hasher.hash(valid.password.expose_secret());
        (valid, digest)
    })
    .await
    .map_err(|e| {
        tracing::error!("Password hashing task failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let user = state.store.create_user(valid.with_hash(digest?)).await?;
    tracing::info!(user_id = user.id, "Created user");

    Ok(ApiResponse::created_at("/"))
}
