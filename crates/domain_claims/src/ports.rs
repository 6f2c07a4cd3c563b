//! Claims Domain Ports
//!
//! `ClaimsPort` is everything the claims screens need from the backend.
//! The REST client in `interface_api` implements it against the HTTP API;
//! the in-memory [`mock::MockClaimsPort`] implements it for tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_claims::ports::ClaimsPort;
//!
//! pub struct Worklist {
//!     claims: Arc<dyn ClaimsPort>,
//! }
//!
//! impl Worklist {
//!     pub async fn open(&self, id: ClaimId) -> Result<Claim, PortError> {
//!         self.claims.get_claim(id).await
//!     }
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, PortError};

use crate::claim::{Assignment, AssignmentRequest, Attachment, Claim, NewNote, Note};
use crate::filters::{ClaimQuery, Page};
use crate::lifecycle::StatusChangeRequest;
use crate::submission::{ClaimFormData, PendingAttachment};

/// Backend operations on claims
#[async_trait]
pub trait ClaimsPort: DomainPort {
    /// Lists claims matching the query, one page at a time
    async fn list_claims(&self, query: &ClaimQuery) -> Result<Page<Claim>, PortError>;

    /// Fetches a claim with its related records
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Creates a claim from a completed wizard
    async fn create_claim(&self, form: &ClaimFormData) -> Result<Claim, PortError>;

    /// Moves a claim to a new status
    ///
    /// The backend re-checks the transition; a rejected move comes back as
    /// `Conflict` or `Forbidden`.
    async fn update_claim_status(&self, id: ClaimId, change: &StatusChangeRequest) -> Result<Claim, PortError>;

    /// Assigns a claim to an adjuster
    async fn assign_claim(&self, request: &AssignmentRequest) -> Result<Assignment, PortError>;

    /// Adds a note to a claim
    async fn add_note(&self, claim_id: ClaimId, note: &NewNote) -> Result<Note, PortError>;

    /// Stores a file against a claim
    ///
    /// Adapters check the file type and size before sending anything.
    async fn upload_attachment(&self, claim_id: ClaimId, file: &PendingAttachment) -> Result<Attachment, PortError>;
}

/// Mock implementation of ClaimsPort for testing
///
/// Claims live in memory. Status changes are checked against the lifecycle
/// table, and against the acting user's role when one is set.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tokio::sync::RwLock;

    use core_kernel::{AssignmentId, AttachmentId, NoteId, UserId};
    use domain_access::User;

    use crate::error::ClaimError;
    use crate::lifecycle::{allowed_targets, check_transition};

    /// Days an assignment has before it becomes overdue
    const ASSIGNMENT_DAYS: i64 = 3;

    /// In-memory mock implementation of ClaimsPort
    #[derive(Debug, Default)]
    pub struct MockClaimsPort {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        actor: Option<User>,
    }

    impl MockClaimsPort {
        /// Creates an empty mock with no acting user
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates an empty mock acting on behalf of `user`
        pub fn acting_as(user: User) -> Self {
            Self {
                claims: Arc::default(),
                actor: Some(user),
            }
        }

        /// Adds a claim directly to the store
        pub async fn insert(&self, claim: Claim) {
            self.claims.write().await.insert(claim.id, claim);
        }

        /// Number of claims stored
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }

        fn actor_id(&self) -> UserId {
            self.actor.as_ref().map(|u| u.id).unwrap_or_default()
        }
    }

    impl DomainPort for MockClaimsPort {}

    #[async_trait]
    impl ClaimsPort for MockClaimsPort {
        async fn list_claims(&self, query: &ClaimQuery) -> Result<Page<Claim>, PortError> {
            let claims = self.claims.read().await;
            let mut matching: Vec<Claim> = claims
                .values()
                .filter(|c| query.filters.matches(c))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(Page::paginate(matching, query.page.unwrap_or(1), query.limit.unwrap_or(10)))
        }

        async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn create_claim(&self, form: &ClaimFormData) -> Result<Claim, PortError> {
            let claim = Claim::draft_from(form, self.actor_id(), Utc::now());
            self.claims.write().await.insert(claim.id, claim.clone());
            Ok(claim)
        }

        async fn update_claim_status(&self, id: ClaimId, change: &StatusChangeRequest) -> Result<Claim, PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims.get_mut(&id).ok_or_else(|| PortError::not_found("Claim", id))?;

            match &self.actor {
                Some(actor) => check_transition(claim.status, change.target_status, actor.role)?,
                None => {
                    if !allowed_targets(claim.status).contains(&change.target_status) {
                        return Err(ClaimError::InvalidStatusTransition {
                            from: claim.status,
                            to: change.target_status,
                        }
                        .into());
                    }
                }
            }

            claim.apply_status(change.target_status, self.actor_id(), change.reason.as_deref(), Utc::now());
            Ok(claim.clone())
        }

        async fn assign_claim(&self, request: &AssignmentRequest) -> Result<Assignment, PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&request.claim_id)
                .ok_or_else(|| PortError::not_found("Claim", request.claim_id))?;

            let now = Utc::now();
            let assignment = Assignment {
                id: AssignmentId::new_v7(),
                claim_id: claim.id,
                adjuster_id: request.adjuster_id,
                adjuster: None,
                assigned_at: now,
                due_at: now + Duration::days(ASSIGNMENT_DAYS),
                priority: request.priority,
            };
            claim.assignment = Some(assignment.clone());
            claim.updated_at = now;
            Ok(assignment)
        }

        async fn add_note(&self, claim_id: ClaimId, note: &NewNote) -> Result<Note, PortError> {
            if note.body.trim().is_empty() {
                return Err(PortError::validation_field("Note cannot be empty", "body"));
            }
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;

            let created = Note {
                id: NoteId::new_v7(),
                claim_id,
                author_id: self.actor_id(),
                author: self.actor.clone(),
                body: note.body.clone(),
                visibility: note.visibility,
                created_at: Utc::now(),
            };
            claim.notes.push(created.clone());
            Ok(created)
        }

        async fn upload_attachment(&self, claim_id: ClaimId, file: &PendingAttachment) -> Result<Attachment, PortError> {
            file.check()?;
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;

            let attachment = Attachment {
                id: AttachmentId::new_v7(),
                claim_id,
                s3_key: format!("claims/{}/{}", claim_id.as_uuid(), file.file_name),
                file_name: file.file_name.clone(),
                mime_type: file.mime_type.clone(),
                size: file.size,
                checksum: file.checksum.clone(),
                uploaded_by: self.actor_id(),
                created_at: Utc::now(),
            };
            claim.attachments.push(attachment.clone());
            Ok(attachment)
        }
    }
}
