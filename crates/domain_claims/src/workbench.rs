//! Adjuster and supervisor workbench
//!
//! The workbench loads the claims in scope for the current user and
//! sorts them into queues. Queues overlap: an urgent claim that is in
//! review shows up in both the urgent and pending-review queues.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use domain_access::{User, UserRole};

use crate::claim::Claim;
use crate::filters::ClaimFilters;
use crate::status::{ClaimStatus, Priority};

/// Number of claims shown in each queue preview and the recent list
pub const PREVIEW_LEN: usize = 5;

/// Statuses offered in the workbench status picker
pub const WORKBENCH_STATUSES: [ClaimStatus; 5] = [
    ClaimStatus::Submitted,
    ClaimStatus::InReview,
    ClaimStatus::InfoRequested,
    ClaimStatus::Approved,
    ClaimStatus::Rejected,
];

/// Which claims the workbench loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbenchScope {
    /// Every claim
    All,
    /// Claims assigned to one adjuster
    AssignedTo(core_kernel::UserId),
}

impl WorkbenchScope {
    /// Supervisors see everything; anyone else only their own assignments
    pub fn for_user(user: &User) -> Self {
        if user.role == UserRole::Supervisor {
            WorkbenchScope::All
        } else {
            WorkbenchScope::AssignedTo(user.id)
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WorkbenchScope::All => "Supervisor Workbench",
            WorkbenchScope::AssignedTo(_) => "Adjuster Workbench",
        }
    }

    /// Filters used for the initial load
    pub fn base_filters(&self) -> ClaimFilters {
        match self {
            WorkbenchScope::All => ClaimFilters::new(),
            WorkbenchScope::AssignedTo(id) => ClaimFilters::new().assigned_to(*id),
        }
    }
}

/// Priority and status pickers on the workbench
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkbenchFilter {
    pub priority: Option<Priority>,
    pub status: Option<ClaimStatus>,
}

impl WorkbenchFilter {
    /// List filters for the picked values; adjusters stay restricted to their own claims
    pub fn to_filters(&self, user: &User) -> ClaimFilters {
        let mut filters = ClaimFilters::new();
        if let Some(priority) = self.priority {
            filters = filters.with_priority(priority);
        }
        if let Some(status) = self.status {
            filters = filters.with_status(status);
        }
        if user.role == UserRole::Adjuster {
            filters = filters.assigned_to(user.id);
        }
        filters
    }
}

/// Workbench queues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Queue {
    Urgent,
    PendingReview,
    AwaitingInfo,
    Recent,
}

impl Queue {
    pub const ALL: [Queue; 4] = [Queue::Urgent, Queue::PendingReview, Queue::AwaitingInfo, Queue::Recent];

    pub fn title(&self) -> &'static str {
        match self {
            Queue::Urgent => "Urgent Claims",
            Queue::PendingReview => "Pending Review",
            Queue::AwaitingInfo => "Awaiting Information",
            Queue::Recent => "Recent Claims",
        }
    }
}

/// Headline numbers for the workbench
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkbenchCounts {
    pub total: usize,
    pub urgent: usize,
    pub pending_review: usize,
    pub awaiting_info: usize,
    pub overdue: usize,
}

/// Due-date state of a claim as shown in the workbench table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Unassigned,
    OnTrack(DateTime<Utc>),
    Overdue(DateTime<Utc>),
}

impl DueState {
    pub fn of(claim: &Claim, now: DateTime<Utc>) -> Self {
        match claim.due_at() {
            None => DueState::Unassigned,
            Some(due) if due < now => DueState::Overdue(due),
            Some(due) => DueState::OnTrack(due),
        }
    }
}

/// Claims in scope split into triage queues
#[derive(Debug, Clone)]
pub struct Workbench<'a> {
    claims: &'a [Claim],
    urgent: Vec<&'a Claim>,
    pending_review: Vec<&'a Claim>,
    awaiting_info: Vec<&'a Claim>,
    overdue: usize,
}

impl<'a> Workbench<'a> {
    pub fn build(claims: &'a [Claim], now: DateTime<Utc>) -> Self {
        let mut urgent: Vec<&Claim> = claims
            .iter()
            .filter(|c| c.priority() == Some(Priority::Urgent) || c.is_overdue(now))
            .collect();
        urgent.sort_by_key(|c| {
            (
                c.priority() != Some(Priority::Urgent),
                c.due_at().is_none(),
                c.due_at(),
                Reverse(c.priority()),
            )
        });

        let pending_review = claims
            .iter()
            .filter(|c| matches!(c.status, ClaimStatus::Submitted | ClaimStatus::InReview))
            .collect();
        let awaiting_info = claims
            .iter()
            .filter(|c| c.status == ClaimStatus::InfoRequested)
            .collect();
        let overdue = claims.iter().filter(|c| c.is_overdue(now)).count();

        Self {
            claims,
            urgent,
            pending_review,
            awaiting_info,
            overdue,
        }
    }

    /// Claims in a queue; the recent queue is the first few claims as loaded
    pub fn queue(&self, queue: Queue) -> Vec<&'a Claim> {
        match queue {
            Queue::Urgent => self.urgent.clone(),
            Queue::PendingReview => self.pending_review.clone(),
            Queue::AwaitingInfo => self.awaiting_info.clone(),
            Queue::Recent => self.claims.iter().take(PREVIEW_LEN).collect(),
        }
    }

    /// At most `n` claims from a queue
    pub fn preview(&self, queue: Queue, n: usize) -> Vec<&'a Claim> {
        let mut claims = self.queue(queue);
        claims.truncate(n);
        claims
    }

    pub fn counts(&self) -> WorkbenchCounts {
        WorkbenchCounts {
            total: self.claims.len(),
            urgent: self.urgent.len(),
            pending_review: self.pending_review.len(),
            awaiting_info: self.awaiting_info.len(),
            overdue: self.overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use core_kernel::{AssignmentId, ClaimId, Currency, PolicyId, UserId};

    use crate::claim::Assignment;

    fn claim(status: ClaimStatus, assignment: Option<(Priority, i64)>, now: DateTime<Utc>) -> Claim {
        let id = ClaimId::new();
        Claim {
            id,
            policy_id: PolicyId::new(),
            policy: None,
            claimant_id: UserId::new(),
            claimant: None,
            incident_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            incident_type: "THEFT".to_string(),
            description: None,
            status,
            amount_claimed: None,
            amount_approved: None,
            currency: Currency::USD,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            attachments: Vec::new(),
            notes: Vec::new(),
            assignment: assignment.map(|(priority, due_in_hours)| Assignment {
                id: AssignmentId::new(),
                claim_id: id,
                adjuster_id: UserId::new(),
                adjuster: None,
                assigned_at: now,
                due_at: now + Duration::hours(due_in_hours),
                priority,
            }),
            events: Vec::new(),
        }
    }

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(),
            email: "wb@example.com".to_string(),
            role,
            display_name: "Workbench User".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_queues() {
        let now = Utc::now();
        let claims = vec![
            claim(ClaimStatus::Submitted, Some((Priority::Low, 48)), now),
            claim(ClaimStatus::InReview, Some((Priority::Urgent, 24)), now),
            claim(ClaimStatus::InfoRequested, Some((Priority::Medium, -2)), now),
            claim(ClaimStatus::Approved, None, now),
        ];
        let wb = Workbench::build(&claims, now);

        let counts = wb.counts();
        assert_eq!(counts.total, 4);
        assert_eq!(counts.urgent, 2);
        assert_eq!(counts.pending_review, 2);
        assert_eq!(counts.awaiting_info, 1);
        assert_eq!(counts.overdue, 1);
    }

    #[test]
    fn test_urgent_priority_sorts_before_overdue() {
        let now = Utc::now();
        let claims = vec![
            claim(ClaimStatus::InReview, Some((Priority::High, -10)), now),
            claim(ClaimStatus::InReview, Some((Priority::Urgent, 30)), now),
            claim(ClaimStatus::InReview, Some((Priority::Urgent, 5)), now),
        ];
        let wb = Workbench::build(&claims, now);
        let urgent: Vec<ClaimId> = wb.queue(Queue::Urgent).iter().map(|c| c.id).collect();
        assert_eq!(urgent, vec![claims[2].id, claims[1].id, claims[0].id]);
    }

    #[test]
    fn test_recent_and_preview_cap() {
        let now = Utc::now();
        let claims: Vec<Claim> = (0..8).map(|_| claim(ClaimStatus::Submitted, None, now)).collect();
        let wb = Workbench::build(&claims, now);
        assert_eq!(wb.queue(Queue::Recent).len(), PREVIEW_LEN);
        assert_eq!(wb.preview(Queue::PendingReview, 3).len(), 3);
        assert_eq!(wb.queue(Queue::PendingReview).len(), 8);
    }

    #[test]
    fn test_scope_and_title() {
        let supervisor = user(UserRole::Supervisor);
        let adjuster = user(UserRole::Adjuster);

        assert_eq!(WorkbenchScope::for_user(&supervisor), WorkbenchScope::All);
        assert_eq!(WorkbenchScope::for_user(&supervisor).title(), "Supervisor Workbench");
        assert!(WorkbenchScope::for_user(&supervisor).base_filters().is_empty());

        let scope = WorkbenchScope::for_user(&adjuster);
        assert_eq!(scope.title(), "Adjuster Workbench");
        assert_eq!(scope.base_filters().assigned_to, Some(adjuster.id));
    }

    #[test]
    fn test_filter_pins_adjuster() {
        let adjuster = user(UserRole::Adjuster);
        let supervisor = user(UserRole::Supervisor);
        let picked = WorkbenchFilter {
            priority: Some(Priority::High),
            status: None,
        };

        let filters = picked.to_filters(&adjuster);
        assert_eq!(filters.priority, vec![Priority::High]);
        assert_eq!(filters.assigned_to, Some(adjuster.id));

        assert_eq!(picked.to_filters(&supervisor).assigned_to, None);
    }

    #[test]
    fn test_due_state() {
        let now = Utc::now();
        assert_eq!(DueState::of(&claim(ClaimStatus::Submitted, None, now), now), DueState::Unassigned);
        assert!(matches!(
            DueState::of(&claim(ClaimStatus::Submitted, Some((Priority::Low, -1)), now), now),
            DueState::Overdue(_)
        ));
    }
}
