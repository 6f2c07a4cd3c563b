//! Claims Domain
//!
//! Claim records as exchanged with the backend, the status state machine
//! with its role gating, the adjuster workbench, the new-claim wizard,
//! and reporting.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Draft -> Submitted -> In Review -> Approved -> Paid -> Closed
//!                          |  ^          |
//!                          v  |          v
//!                    Info Requested   Rejected
//! ```

pub mod status;
pub mod claim;
pub mod lifecycle;
pub mod permissions;
pub mod filters;
pub mod workbench;
pub mod submission;
pub mod reports;
pub mod ports;
pub mod error;

pub use status::{ClaimStatus, Priority};
pub use claim::{
    Assignment, AssignmentRequest, Attachment, AttachmentKind, AuditEvent, Claim, ClaimItem, NewNote, Note,
    NoteVisibility, Policy,
};
pub use lifecycle::{
    allowed_targets, available_transitions, can_transition_status, check_transition, is_terminal,
    StatusChangeRequest,
};
pub use permissions::ClaimPermissions;
pub use filters::{ClaimFilters, ClaimQuery, Page, Pagination};
pub use workbench::{DueState, Queue, Workbench, WorkbenchCounts, WorkbenchFilter, WorkbenchScope};
pub use submission::{
    ClaimDraft, ClaimFormData, ClaimItemDraft, ClaimSubmission, ClaimUpdate, ClaimWizard, IncidentType, ItemCategory,
    NewClaimItem, PendingAttachment, WizardStep,
};
pub use reports::{export_csv, DashboardStats, ReportKind, ReportRange, SlaReport, StatCard};
pub use ports::ClaimsPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock;
pub use error::ClaimError;
