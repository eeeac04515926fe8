use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::{authorize, AuthenticatedContext};
use crate::database::models::{CourseInput, CourseWithOwner};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// An id that cannot name a stored course is the same as a missing one
fn course_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Unparseable course id: {}", rejection.body_text());
            Err(ApiError::not_found("Course not found"))
        }
    }
}

/// GET /api/courses - every course with its owner
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CourseWithOwner>> {
    let courses = state.store.list_courses().await?;
    Ok(ApiResponse::success(courses))
}

/// GET /api/courses/:id - one course with its owner
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<CourseWithOwner> {
    let id = course_id(path)?;
    let course = state
        .store
        .find_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    Ok(ApiResponse::success(course))
}

/// POST /api/courses - create a course owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> ApiResult<()> {
    let Json(input) = payload?;
    let fields = input.validate().map_err(ApiError::validation_error)?;

    let course = state
        .store
        .create_course(context.identity.id, fields)
        .await?;
    tracing::info!(course_id = course.id, user_id = context.identity.id, "Created course");

    Ok(ApiResponse::created_at(format!("/api/courses/{}", course.id)))
}

/// PUT /api/courses/:id - replace a course the caller owns
pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> ApiResult<()> {
    let id = course_id(path)?;
    let existing = state.store.find_course(id).await?;
    authorize(&context, existing.as_ref())?;

    let Json(input) = payload?;
    let fields = input.validate().map_err(ApiError::validation_error)?;

    // Deleted between the ownership check and the write
    state
        .store
        .update_course(id, fields)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    tracing::info!(course_id = id, user_id = context.identity.id, "Updated course");

    Ok(ApiResponse::no_content())
}

/// DELETE /api/courses/:id - delete a course the caller owns
pub async fn delete(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let id = course_id(path)?;
    let existing = state.store.find_course(id).await?;
    authorize(&context, existing.as_ref())?;

    if !state.store.delete_course(id).await? {
        return Err(ApiError::not_found("Course not found"));
    }
    tracing::info!(course_id = id, user_id = context.identity.id, "Deleted course");

    Ok(ApiResponse::no_content())
}
