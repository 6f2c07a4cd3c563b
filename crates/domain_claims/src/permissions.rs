//! What the current user may do with a claim

use core_kernel::UserId;
use domain_access::{User, UserRole};

use crate::claim::Claim;
use crate::status::ClaimStatus;

/// Claim permissions for an optional viewer
///
/// Without a viewer every check fails.
#[derive(Debug, Clone, Copy)]
pub struct ClaimPermissions<'a> {
    viewer: Option<&'a User>,
}

impl<'a> ClaimPermissions<'a> {
    pub fn new(viewer: Option<&'a User>) -> Self {
        Self { viewer }
    }

    fn role(&self) -> Option<UserRole> {
        self.viewer.map(|v| v.role)
    }

    fn is_own(&self, claimant_id: UserId) -> bool {
        self.viewer.is_some_and(|v| v.id == claimant_id)
    }

    /// Staff see every claim; policyholders only their own
    pub fn can_view_claim(&self, claimant_id: UserId) -> bool {
        match self.role() {
            Some(UserRole::Supervisor | UserRole::Admin | UserRole::Adjuster) => true,
            Some(UserRole::Policyholder) => self.is_own(claimant_id),
            None => false,
        }
    }

    pub fn can_edit_claim(&self, claimant_id: UserId, status: ClaimStatus) -> bool {
        match self.role() {
            Some(UserRole::Supervisor | UserRole::Admin) => true,
            Some(UserRole::Adjuster) => status != ClaimStatus::Draft,
            Some(UserRole::Policyholder) => self.is_own(claimant_id) && status == ClaimStatus::Draft,
            None => false,
        }
    }

    pub fn can_approve_claim(&self) -> bool {
        self.role().is_some_and(|r| r.is_supervisory())
    }

    pub fn can_assign_claim(&self) -> bool {
        self.role().is_some_and(|r| r.is_supervisory())
    }

    /// Internal notes are hidden from policyholders
    pub fn can_read_internal_notes(&self) -> bool {
        matches!(
            self.role(),
            Some(UserRole::Adjuster | UserRole::Supervisor | UserRole::Admin)
        )
    }

    /// Convenience for `can_view_claim` on a loaded claim
    pub fn can_view(&self, claim: &Claim) -> bool {
        self.can_view_claim(claim.claimant_id)
    }

    /// Convenience for `can_edit_claim` on a loaded claim
    pub fn can_edit(&self, claim: &Claim) -> bool {
        self.can_edit_claim(claim.claimant_id, claim.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(),
            email: "someone@example.com".to_string(),
            role,
            display_name: "Someone".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_viewer_denies_everything() {
        let perms = ClaimPermissions::new(None);
        let claimant = UserId::new();
        assert!(!perms.can_view_claim(claimant));
        assert!(!perms.can_edit_claim(claimant, ClaimStatus::Draft));
        assert!(!perms.can_approve_claim());
        assert!(!perms.can_assign_claim());
    }

    #[test]
    fn test_policyholder_sees_and_edits_own_drafts_only() {
        let holder = user(UserRole::Policyholder);
        let perms = ClaimPermissions::new(Some(&holder));
        let stranger = UserId::new();

        assert!(perms.can_view_claim(holder.id));
        assert!(!perms.can_view_claim(stranger));
        assert!(perms.can_edit_claim(holder.id, ClaimStatus::Draft));
        assert!(!perms.can_edit_claim(holder.id, ClaimStatus::Submitted));
        assert!(!perms.can_edit_claim(stranger, ClaimStatus::Draft));
        assert!(!perms.can_read_internal_notes());
    }

    #[test]
    fn test_adjuster_cannot_edit_drafts() {
        let adjuster = user(UserRole::Adjuster);
        let perms = ClaimPermissions::new(Some(&adjuster));
        assert!(perms.can_view_claim(UserId::new()));
        assert!(!perms.can_edit_claim(UserId::new(), ClaimStatus::Draft));
        assert!(perms.can_edit_claim(UserId::new(), ClaimStatus::InReview));
        assert!(!perms.can_approve_claim());
    }

    #[test]
    fn test_supervisory_roles() {
        for role in [UserRole::Supervisor, UserRole::Admin] {
            let viewer = user(role);
            let perms = ClaimPermissions::new(Some(&viewer));
            assert!(perms.can_approve_claim());
            assert!(perms.can_assign_claim());
            assert!(perms.can_edit_claim(UserId::new(), ClaimStatus::Draft));
        }
    }
}
