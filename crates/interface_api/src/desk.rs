//! Claims desk: worklist state and notices for the current user
//!
//! The desk sits between the front-end and a [`ClaimsPort`]. It keeps
//! what the claim screens show (the loaded page, the open claim, filters
//! and paging) and records the outcome of every action as a [`Notice`].
//! Rules the client can check itself, such as status transitions and who
//! may assign or write internal notes, are checked before any request is
//! sent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use core_kernel::ClaimId;
use domain_access::User;
use domain_claims::{
    Assignment, AssignmentRequest, Claim, ClaimFilters, ClaimPermissions, ClaimQuery, ClaimStatus, ClaimSubmission,
    ClaimsPort, NewNote, Note, NoteVisibility, Pagination, Workbench, WorkbenchFilter,
};

use crate::error::{ApiError, UNEXPECTED_ERROR};

/// Page size used when loading the workbench
pub const WORKBENCH_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Outcome of an action, shown to the user once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub struct ClaimsDesk {
    port: Arc<dyn ClaimsPort>,
    user: User,
    claims: Vec<Claim>,
    current: Option<Claim>,
    filters: ClaimFilters,
    pagination: Pagination,
    loading: bool,
    submitting: bool,
    last_error: Option<String>,
    notices: Vec<Notice>,
}

impl ClaimsDesk {
    pub fn new(port: Arc<dyn ClaimsPort>, user: User) -> Self {
        Self {
            port,
            user,
            claims: Vec::new(),
            current: None,
            filters: ClaimFilters::new(),
            pagination: Pagination::default(),
            loading: false,
            submitting: false,
            last_error: None,
            notices: Vec::new(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Claims on the loaded page
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// The claim opened last
    pub fn current(&self) -> Option<&Claim> {
        self.current.as_ref()
    }

    pub fn filters(&self) -> &ClaimFilters {
        &self.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hands over the pending notices, leaving none behind
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the filters and returns to the first page
    pub fn set_filters(&mut self, filters: ClaimFilters) {
        self.filters = filters;
        self.pagination.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.pagination.limit = limit.max(1);
        self.pagination.page = 1;
    }

    /// Loads the current page under the current filters
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let query = ClaimQuery::new(self.filters.clone()).page(self.pagination.page, self.pagination.limit);
        self.loading = true;
        let result = self.port.list_claims(&query).await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.pagination = page.pagination();
                self.claims = page.data;
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to load claims", e.into())),
        }
    }

    /// Loads the claims in the user's workbench scope
    pub async fn load_workbench(&mut self, filter: WorkbenchFilter) -> Result<(), ApiError> {
        self.set_filters(filter.to_filters(&self.user));
        self.pagination.limit = WORKBENCH_PAGE_LIMIT;
        self.load().await
    }

    /// Queues over the loaded claims
    pub fn workbench(&self, now: DateTime<Utc>) -> Workbench<'_> {
        Workbench::build(&self.claims, now)
    }

    /// Fetches a claim with its relations and makes it current
    pub async fn open(&mut self, id: ClaimId) -> Result<&Claim, ApiError> {
        match self.port.get_claim(id).await {
            Ok(claim) => Ok(self.current.insert(claim)),
            Err(e) => Err(self.fail("Failed to load claim", e.into())),
        }
    }

    /// Moves a claim to `target` after checking the transition locally
    pub async fn change_status(
        &mut self,
        id: ClaimId,
        target: ClaimStatus,
        reason: Option<String>,
    ) -> Result<Claim, ApiError> {
        let claim = match self.known(id) {
            Some(claim) => claim.clone(),
            None => self.open(id).await?.clone(),
        };

        let change = match claim.request_status_change(target, self.user.role, reason) {
            Ok(change) => change,
            Err(e) => {
                warn!(claim_id = %id, from = %claim.status, to = %target, role = %self.user.role, "Transition refused");
                return Err(self.fail("Failed to update claim status", e.into()));
            }
        };

        self.submitting = true;
        let result = self.port.update_claim_status(id, &change).await;
        self.submitting = false;

        match result {
            Ok(updated) => {
                info!(claim_id = %id, from = %claim.status, to = %updated.status, "Claim status updated");
                self.succeed(format!("Claim status updated to {}", updated.status.label()));
                self.replace(updated.clone());
                Ok(updated)
            }
            Err(e) => Err(self.fail("Failed to update claim status", e.into())),
        }
    }

    /// Creates the claim, uploads its files, then submits it
    pub async fn submit(&mut self, submission: ClaimSubmission) -> Result<Claim, ApiError> {
        self.submitting = true;
        let result = self.create_and_submit(&submission).await;
        self.submitting = false;

        match result {
            Ok(claim) => {
                info!(claim_id = %claim.id, status = %claim.status, "Claim submitted");
                self.succeed("Claim submitted successfully!");
                self.current = Some(claim.clone());
                Ok(claim)
            }
            Err(e) => Err(self.fail("Failed to submit claim", e)),
        }
    }

    async fn create_and_submit(&self, submission: &ClaimSubmission) -> Result<Claim, ApiError> {
        let mut claim = self.port.create_claim(&submission.form).await?;
        for file in &submission.attachments {
            let attachment = self.port.upload_attachment(claim.id, file).await?;
            claim.attachments.push(attachment);
        }
        if claim.status == ClaimStatus::Draft {
            let change = claim.request_status_change(ClaimStatus::Submitted, self.user.role, None)?;
            claim = self.port.update_claim_status(claim.id, &change).await?;
        }
        Ok(claim)
    }

    /// Assigns a claim to an adjuster; supervisors and admins only
    pub async fn assign(&mut self, request: AssignmentRequest) -> Result<Assignment, ApiError> {
        if !ClaimPermissions::new(Some(&self.user)).can_assign_claim() {
            let err = ApiError::Forbidden("Only supervisors can assign claims".to_string());
            return Err(self.fail("Failed to assign claim", err));
        }

        match self.port.assign_claim(&request).await {
            Ok(assignment) => {
                info!(claim_id = %request.claim_id, adjuster_id = %request.adjuster_id, "Claim assigned");
                self.succeed("Claim assigned successfully");
                for claim in self.current.iter_mut().chain(self.claims.iter_mut()) {
                    if claim.id == request.claim_id {
                        claim.assignment = Some(assignment.clone());
                    }
                }
                Ok(assignment)
            }
            Err(e) => Err(self.fail("Failed to assign claim", e.into())),
        }
    }

    /// Adds a note to a claim
    pub async fn add_note(&mut self, claim_id: ClaimId, note: NewNote) -> Result<Note, ApiError> {
        if note.body.trim().is_empty() {
            let err = ApiError::Validation("Note cannot be empty".to_string());
            return Err(self.fail("Failed to add note", err));
        }
        if note.visibility == NoteVisibility::Internal
            && !ClaimPermissions::new(Some(&self.user)).can_read_internal_notes()
        {
            let err = ApiError::Forbidden("Internal notes are for staff only".to_string());
            return Err(self.fail("Failed to add note", err));
        }

        match self.port.add_note(claim_id, &note).await {
            Ok(created) => {
                self.succeed("Note added");
                if let Some(claim) = self.current.as_mut().filter(|c| c.id == claim_id) {
                    claim.notes.push(created.clone());
                }
                Ok(created)
            }
            Err(e) => Err(self.fail("Failed to add note", e.into())),
        }
    }

    fn known(&self, id: ClaimId) -> Option<&Claim> {
        self.current
            .iter()
            .chain(self.claims.iter())
            .find(|c| c.id == id)
    }

    fn replace(&mut self, claim: Claim) {
        if let Some(listed) = self.claims.iter_mut().find(|c| c.id == claim.id) {
            *listed = claim.clone();
        }
        if self.current.as_ref().is_some_and(|c| c.id == claim.id) {
            self.current = Some(claim);
        }
    }

    fn succeed(&mut self, message: impl Into<String>) {
        self.last_error = None;
        self.notices.push(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Records the error as a notice and hands it back
    fn fail(&mut self, fallback: &str, err: ApiError) -> ApiError {
        let mut message = err.user_message();
        if message == UNEXPECTED_ERROR {
            message = fallback.to_string();
        }
        self.last_error = Some(message.clone());
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message,
            at: Utc::now(),
        });
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{PolicyId, UserId};
    use domain_access::UserRole;
    use domain_claims::mock::MockClaimsPort;
    use domain_claims::{ClaimFormData, IncidentType, ItemCategory, NewClaimItem, PendingAttachment};
    use rust_decimal_macros::dec;

    use crate::error::TRANSITION_NOT_PERMITTED;

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(),
            email: "desk@claims.test".to_string(),
            role,
            display_name: "Desk User".to_string(),
            created_at: Utc::now(),
        }
    }

    fn form() -> ClaimFormData {
        ClaimFormData {
            policy_id: PolicyId::new(),
            incident_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            incident_type: IncidentType::WaterDamage,
            description: "Pipe burst in the kitchen".to_string(),
            items: vec![NewClaimItem {
                category: ItemCategory::Furniture,
                description: "Oak table".to_string(),
                estimated_cost: dec!(640),
            }],
        }
    }

    fn desk_for(role: UserRole) -> (ClaimsDesk, Arc<MockClaimsPort>) {
        let user = user(role);
        let port = Arc::new(MockClaimsPort::acting_as(user.clone()));
        (ClaimsDesk::new(port.clone(), user), port)
    }

    #[tokio::test]
    async fn test_submit_creates_uploads_and_submits() {
        let (mut desk, port) = desk_for(UserRole::Policyholder);
        let submission = ClaimSubmission {
            form: form(),
            attachments: vec![PendingAttachment::from_bytes("table.png", "image/png", vec![9; 16])],
        };

        let claim = desk.submit(submission).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.attachments.len(), 1);
        assert_eq!(port.get_claim(claim.id).await.unwrap().status, ClaimStatus::Submitted);

        let notices = desk.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Claim submitted successfully!");
        assert!(desk.notices().is_empty());
    }

    #[tokio::test]
    async fn test_refused_transition_never_reaches_port() {
        let (mut desk, port) = desk_for(UserRole::Adjuster);
        let claim = port.create_claim(&form()).await.unwrap();
        desk.change_status(claim.id, ClaimStatus::Submitted, None).await.unwrap();
        desk.change_status(claim.id, ClaimStatus::InReview, None).await.unwrap();

        let err = desk.change_status(claim.id, ClaimStatus::Approved, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(desk.last_error(), Some(TRANSITION_NOT_PERMITTED));
        assert_eq!(port.get_claim(claim.id).await.unwrap().status, ClaimStatus::InReview);

        let messages: Vec<_> = desk.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Claim status updated to Submitted",
                "Claim status updated to In Review",
                TRANSITION_NOT_PERMITTED,
            ]
        );
    }

    #[tokio::test]
    async fn test_load_updates_page_state() {
        let (mut desk, port) = desk_for(UserRole::Supervisor);
        for _ in 0..3 {
            port.create_claim(&form()).await.unwrap();
        }
        desk.set_limit(2);
        desk.load().await.unwrap();
        assert_eq!(desk.claims().len(), 2);
        assert_eq!(desk.pagination().total, 3);
        assert!(desk.pagination().has_next());

        desk.set_page(2);
        desk.load().await.unwrap();
        assert_eq!(desk.claims().len(), 1);
        assert!(!desk.is_loading());
    }

    #[tokio::test]
    async fn test_policyholder_cannot_assign_or_write_internal_notes() {
        let (mut desk, port) = desk_for(UserRole::Policyholder);
        let claim = port.create_claim(&form()).await.unwrap();

        let assign = desk
            .assign(AssignmentRequest {
                claim_id: claim.id,
                adjuster_id: UserId::new(),
                priority: domain_claims::Priority::High,
            })
            .await;
        assert!(matches!(assign, Err(ApiError::Forbidden(_))));

        let internal = NewNote {
            body: "Looks suspicious".to_string(),
            visibility: NoteVisibility::Internal,
        };
        assert!(desk.add_note(claim.id, internal).await.is_err());
        assert!(port.get_claim(claim.id).await.unwrap().notes.is_empty());
        assert!(desk.notices().iter().all(Notice::is_error));
    }

    #[tokio::test]
    async fn test_open_missing_claim_records_error() {
        let (mut desk, _) = desk_for(UserRole::Supervisor);
        assert!(desk.open(ClaimId::new()).await.is_err());
        assert!(desk.last_error().is_some());
        assert!(desk.current().is_none());
    }
}
