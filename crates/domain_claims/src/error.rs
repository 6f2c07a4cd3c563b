//! Claims domain errors

use thiserror::Error;

use core_kernel::PortError;
use domain_access::{FormErrors, UserRole};

use crate::status::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("{role} may not move a claim from {from} to {to}")]
    TransitionNotPermitted {
        role: UserRole,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    #[error("Invalid form: {0}")]
    InvalidForm(FormErrors),

    #[error("File {file_name} rejected: {reason}")]
    AttachmentRejected { file_name: String, reason: String },

    #[error("Start date must not be after end date")]
    InvalidDateRange,
}

impl From<FormErrors> for ClaimError {
    fn from(errors: FormErrors) -> Self {
        ClaimError::InvalidForm(errors)
    }
}

impl From<ClaimError> for PortError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(id) => PortError::not_found("Claim", id),
            ClaimError::InvalidStatusTransition { .. } => PortError::conflict(err.to_string()),
            ClaimError::TransitionNotPermitted { .. } => PortError::forbidden(err.to_string()),
            ClaimError::InvalidForm(errors) => PortError::validation(errors.to_string()),
            ClaimError::AttachmentRejected { .. } | ClaimError::InvalidDateRange => {
                PortError::validation(err.to_string())
            }
        }
    }
}
