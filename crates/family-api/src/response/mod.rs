//! Response types and error handling for API endpoints
//!
//! Provides unified error handling and JSON response formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use family_common::AppError;
use family_core::SyncError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Sync(e) => match e {
                SyncError::NotRegistered => StatusCode::FORBIDDEN,
                SyncError::RecordNotFound(_) => StatusCode::NOT_FOUND,
                SyncError::MissingIdentity => StatusCode::CONFLICT,
                SyncError::AccountUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                SyncError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Sync(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidBody(_) => "INVALID_BODY",
        }
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail for API responses
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();
        let message = self.to_string();

        // Log server errors
        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        // Build details for validation errors
        let details = if let Self::Validation(errors) = &self {
            Some(serde_json::to_value(errors).unwrap_or_default())
        } else {
            None
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Created response (201) with JSON body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

/// Accepted response (202) for work that continues in the background
pub struct Accepted<T>(pub T);

impl<T: IntoResponse> IntoResponse for Accepted<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::ACCEPTED;
        response
    }
}

/// No content response (204)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use family_core::DirectoryError;

    #[test]
    fn test_sync_error_status_codes() {
        assert_eq!(
            ApiError::from(SyncError::NotRegistered).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(SyncError::MissingIdentity).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(SyncError::from(DirectoryError::network("down"))).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_api_error_codes() {
        assert_eq!(
            ApiError::from(SyncError::NotRegistered).error_code(),
            "NOT_REGISTERED"
        );
        assert_eq!(ApiError::invalid_body("test").error_code(), "INVALID_BODY");
        assert_eq!(
            ApiError::invalid_body("test").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_app_error_passthrough() {
        let err = ApiError::from(AppError::not_found("member r1"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_created_and_no_content_status() {
        assert_eq!(
            Created(Json(serde_json::json!({}))).into_response().status(),
            StatusCode::CREATED
        );
        assert_eq!(
            Accepted(Json(serde_json::json!({}))).into_response().status(),
            StatusCode::ACCEPTED
        );
        assert_eq!(NoContent.into_response().status(), StatusCode::NO_CONTENT);
    }
}
