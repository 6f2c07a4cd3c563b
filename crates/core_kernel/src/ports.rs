//! Ports and Adapters Infrastructure
//!
//! Domain crates declare port traits describing what they need from the
//! backend; adapters (the REST client, in-memory mocks) implement them.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Desk / CLI (application)   │
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │  Port traits (ClaimsPort)    │
//! └──────────────────────────────┘
//!         ▲               ▲
//!  ┌──────┴──────┐  ┌─────┴──────┐
//!  │ REST client │  │ Mock port  │
//!  └─────────────┘  └────────────┘
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Every adapter maps its failures onto this type so that application code
/// handles backend and in-memory implementations the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with current data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication is missing or expired
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// The caller is authenticated but not allowed to do this
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        PortError::Forbidden {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Message suitable for showing to the user, without the category prefix
    pub fn user_message(&self) -> String {
        match self {
            PortError::NotFound { entity_type, .. } => format!("{} not found", entity_type),
            PortError::Validation { message, .. }
            | PortError::Conflict { message }
            | PortError::Connection { message, .. }
            | PortError::Unauthorized { message }
            | PortError::Forbidden { message }
            | PortError::Internal { message, .. } => message.clone(),
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and usable
/// behind `Arc<dyn ...>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Claim", "123");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("Claim"));
        assert!(error.to_string().contains("123"));
        assert_eq!(error.user_message(), "Claim not found");
    }

    #[test]
    fn test_validation_keeps_field() {
        match PortError::validation_field("Note cannot be empty", "body") {
            PortError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("body")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_user_message_strips_category() {
        let error = PortError::forbidden("You cannot perform this status transition");
        assert_eq!(error.user_message(), "You cannot perform this status transition");
    }
}
