//! Client error handling

use thiserror::Error;

use core_kernel::PortError;
use domain_access::{AccessError, FormErrors};
use domain_claims::ClaimError;

/// Fallback when an error carries no readable text
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Message used when the local transition check fails
pub const TRANSITION_NOT_PERMITTED: &str = "You cannot perform this status transition";

/// Client error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the token, which has been cleared
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ApiError {
    /// Text suitable for a notice: the server's message when there is one,
    /// otherwise the error itself
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Validation(m)
            | ApiError::Api { message: m, .. } => m.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            UNEXPECTED_ERROR.to_string()
        } else {
            message
        }
    }

    /// HTTP status behind the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidForm(errors) => errors.into(),
            AccessError::NotAuthenticated | AccessError::SessionExpired => {
                ApiError::Unauthorized(err.to_string())
            }
            other => ApiError::Decode(other.to_string()),
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(id) => ApiError::NotFound(format!("Claim {}", id)),
            ClaimError::TransitionNotPermitted { .. } | ClaimError::InvalidStatusTransition { .. } => {
                ApiError::Forbidden(TRANSITION_NOT_PERMITTED.to_string())
            }
            ClaimError::InvalidForm(errors) => errors.into(),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<ApiError> for PortError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) => PortError::Connection {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            ApiError::Unauthorized(message) => PortError::Unauthorized { message },
            ApiError::Forbidden(message) => PortError::forbidden(message),
            ApiError::NotFound(message) => PortError::not_found("Resource", message),
            ApiError::Api { status: 409, message } => PortError::conflict(message),
            ApiError::Api { status: 400 | 422, message } => PortError::validation(message),
            ApiError::Validation(message) => PortError::validation(message),
            other => PortError::internal(other.to_string()),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => ApiError::NotFound(format!("{} {}", entity_type, id)),
            PortError::Validation { message, .. } => ApiError::Validation(message),
            PortError::Conflict { message } => ApiError::Api { status: 409, message },
            PortError::Unauthorized { message } => ApiError::Unauthorized(message),
            PortError::Forbidden { message } => ApiError::Forbidden(message),
            PortError::Connection { message, .. } | PortError::Internal { message, .. } => {
                ApiError::Api { status: 500, message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_access::UserRole;
    use domain_claims::ClaimStatus;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Api {
            status: 422,
            message: "Description must be at least 10 characters".to_string(),
        };
        assert_eq!(err.user_message(), "Description must be at least 10 characters");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Forbidden("   ".to_string());
        assert_eq!(err.user_message(), UNEXPECTED_ERROR);
    }

    #[test]
    fn test_not_permitted_transition_message() {
        let err: ApiError = ClaimError::TransitionNotPermitted {
            role: UserRole::Adjuster,
            from: ClaimStatus::InReview,
            to: ClaimStatus::Approved,
        }
        .into();
        assert_eq!(err.user_message(), TRANSITION_NOT_PERMITTED);
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_port_error_mapping() {
        let conflict: PortError = ApiError::Api {
            status: 409,
            message: "Only draft claims can be deleted".to_string(),
        }
        .into();
        assert!(matches!(conflict, PortError::Conflict { .. }));

        let unauthorized: PortError = ApiError::Unauthorized("Token expired".to_string()).into();
        assert!(matches!(unauthorized, PortError::Unauthorized { .. }));
    }
}
