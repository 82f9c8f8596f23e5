use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::services::error::ServiceError;

/// Wrapper so handlers can `?` straight out of the service layer; the
/// domain taxonomy is mapped to HTTP exactly once, here.
pub struct ApiError(ServiceError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self(ServiceError::Database(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            ServiceError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            }
            ServiceError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": "All fields are required for onboarding",
                    "missingFields": fields,
                }),
            ),
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            ServiceError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, json!({ "message": msg }))
            }
            ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "message": msg })),
            ServiceError::Database(e) => {
                error!(error = %e, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal Server Error" }),
                )
            }
            ServiceError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
