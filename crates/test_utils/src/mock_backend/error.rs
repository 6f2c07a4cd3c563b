//! Error responses of the mock backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_claims::ClaimError;

/// Errors a mock endpoint can answer with
#[derive(Debug, Error)]
pub enum MockApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

/// Error envelope, mirroring the success envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for MockApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            MockApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            MockApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            MockApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            MockApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            MockApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            MockApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            MockApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorResponse {
            success: false,
            error: error_type,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for MockApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(_) => MockApiError::NotFound("Claim not found".to_string()),
            ClaimError::InvalidStatusTransition { .. } => MockApiError::Conflict(err.to_string()),
            ClaimError::TransitionNotPermitted { .. } => {
                MockApiError::Forbidden("You cannot perform this status transition".to_string())
            }
            ClaimError::InvalidForm(_) | ClaimError::AttachmentRejected { .. } | ClaimError::InvalidDateRange => {
                MockApiError::Validation(err.to_string())
            }
        }
    }
}
