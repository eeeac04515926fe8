use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Successful handler output: a status, an optional JSON body and an
/// optional `Location` header.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub status_code: StatusCode,
    pub location: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data` as the body
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            status_code: StatusCode::OK,
            location: None,
        }
    }
}

impl ApiResponse<()> {
    /// 201 with an empty body and a `Location` header
    pub fn created_at(location: impl Into<String>) -> Self {
        Self {
            data: None,
            status_code: StatusCode::CREATED,
            location: Some(location.into()),
        }
    }

    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            data: None,
            status_code: StatusCode::NO_CONTENT,
            location: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut response = match self.data {
            Some(data) => match serde_json::to_value(&data) {
                Ok(value) => (self.status_code, Json(value)).into_response(),
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "message": "Failed to serialize response data" })),
                    )
                        .into_response();
                }
            },
            None => self.status_code.into_response(),
        };

        if let Some(location) = self.location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(LOCATION, value);
                }
                Err(e) => tracing::error!("Invalid Location header {:?}: {}", location, e),
            }
        }

        response
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
