//! Claim status state machine
//!
//! ```text
//! DRAFT -> SUBMITTED -> IN_REVIEW <-> INFO_REQUESTED
//!              |           |              |
//!              v           v              v
//!          REJECTED <-- APPROVED -> PAID -> CLOSED
//!              |
//!              +------> IN_REVIEW
//! ```
//!
//! A transition must be in the table *and* permitted for the acting role.
//! Policyholders may only submit their drafts, adjusters may do anything
//! except approve or pay, supervisors and admins may take every edge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use domain_access::UserRole;

use crate::claim::Claim;
use crate::error::ClaimError;
use crate::status::ClaimStatus;

/// Statuses reachable from `from` in one step, ignoring role
pub fn allowed_targets(from: ClaimStatus) -> &'static [ClaimStatus] {
    use ClaimStatus::*;

    match from {
        Draft => &[Submitted],
        Submitted => &[InReview, Rejected],
        InReview => &[InfoRequested, Approved, Rejected],
        InfoRequested => &[InReview, Rejected],
        Approved => &[Paid, Rejected],
        Rejected => &[InReview],
        Paid => &[Closed],
        Closed => &[],
    }
}

/// Returns true if the status has no outgoing transitions
pub fn is_terminal(status: ClaimStatus) -> bool {
    allowed_targets(status).is_empty()
}

/// Checks a transition against the table and the role's permissions
pub fn check_transition(current: ClaimStatus, target: ClaimStatus, role: UserRole) -> Result<(), ClaimError> {
    if !allowed_targets(current).contains(&target) {
        return Err(ClaimError::InvalidStatusTransition {
            from: current,
            to: target,
        });
    }

    let permitted = match role {
        UserRole::Policyholder => current == ClaimStatus::Draft && target == ClaimStatus::Submitted,
        UserRole::Adjuster => !matches!(target, ClaimStatus::Approved | ClaimStatus::Paid),
        UserRole::Supervisor | UserRole::Admin => true,
    };

    if permitted {
        Ok(())
    } else {
        Err(ClaimError::TransitionNotPermitted {
            role,
            from: current,
            to: target,
        })
    }
}

/// Returns true if `role` may move a claim from `current` to `target`
pub fn can_transition_status(current: ClaimStatus, target: ClaimStatus, role: UserRole) -> bool {
    check_transition(current, target, role).is_ok()
}

/// Targets offered in the status-change picker
///
/// Draft is never offered as a target; the rest follow lifecycle order.
pub fn available_transitions(current: ClaimStatus, role: UserRole) -> Vec<ClaimStatus> {
    ClaimStatus::ALL
        .into_iter()
        .filter(|&target| target != ClaimStatus::Draft && target != current)
        .filter(|&target| can_transition_status(current, target, role))
        .collect()
}

/// Body sent to the backend to change a claim's status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub target_status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StatusChangeRequest {
    /// Builds a request; a blank reason is dropped
    pub fn new(target_status: ClaimStatus, reason: Option<String>) -> Self {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Self { target_status, reason }
    }
}

impl Claim {
    /// Validates a status change locally and returns the request to send
    pub fn request_status_change(
        &self,
        target: ClaimStatus,
        role: UserRole,
        reason: Option<String>,
    ) -> Result<StatusChangeRequest, ClaimError> {
        check_transition(self.status, target, role)?;
        debug!(claim_id = %self.id, from = %self.status, to = %target, %role, "Status change validated");
        Ok(StatusChangeRequest::new(target, reason))
    }

    /// Status-change targets the role may pick for this claim
    pub fn available_transitions(&self, role: UserRole) -> Vec<ClaimStatus> {
        available_transitions(self.status, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClaimStatus::*;

    #[test]
    fn test_policyholder_can_only_submit_drafts() {
        assert!(can_transition_status(Draft, Submitted, UserRole::Policyholder));
        assert!(!can_transition_status(Submitted, InReview, UserRole::Policyholder));
        assert!(!can_transition_status(InfoRequested, InReview, UserRole::Policyholder));
    }

    #[test]
    fn test_adjuster_cannot_approve_or_pay() {
        assert!(!can_transition_status(InReview, Approved, UserRole::Adjuster));
        assert!(!can_transition_status(Approved, Paid, UserRole::Adjuster));
        assert!(can_transition_status(InReview, Rejected, UserRole::Adjuster));
        assert!(can_transition_status(Approved, Rejected, UserRole::Adjuster));
        assert!(can_transition_status(Paid, Closed, UserRole::Adjuster));
    }

    #[test]
    fn test_table_edges_checked_before_role() {
        let err = check_transition(Draft, Approved, UserRole::Admin).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidStatusTransition { .. }));

        let err = check_transition(InReview, Approved, UserRole::Adjuster).unwrap_err();
        assert!(matches!(err, ClaimError::TransitionNotPermitted { .. }));
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(is_terminal(Closed));
        assert!(!is_terminal(Paid));
        assert!(available_transitions(Closed, UserRole::Admin).is_empty());
    }

    #[test]
    fn test_available_transitions_for_supervisor() {
        assert_eq!(available_transitions(InReview, UserRole::Supervisor), vec![InfoRequested, Approved, Rejected]);
        assert_eq!(available_transitions(InReview, UserRole::Adjuster), vec![InfoRequested, Rejected]);
        assert!(available_transitions(Draft, UserRole::Supervisor).contains(&Submitted));
    }

    #[test]
    fn test_blank_reason_is_dropped() {
        let request = StatusChangeRequest::new(Rejected, Some("   ".to_string()));
        assert!(request.reason.is_none());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "targetStatus": "REJECTED" })
        );

        let request = StatusChangeRequest::new(Rejected, Some(" duplicate ".to_string()));
        assert_eq!(request.reason.as_deref(), Some("duplicate"));
    }
}
