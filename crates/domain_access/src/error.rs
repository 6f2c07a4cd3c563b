//! Access domain errors

use thiserror::Error;

use crate::forms::FormErrors;

/// Errors that can occur in the access domain
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Invalid form: {0}")]
    InvalidForm(FormErrors),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Token could not be read: {0}")]
    TokenDecode(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,
}

impl From<FormErrors> for AccessError {
    fn from(errors: FormErrors) -> Self {
        AccessError::InvalidForm(errors)
    }
}
