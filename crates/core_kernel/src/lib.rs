//! Core Kernel - Foundational types shared by the claims workbench crates
//!
//! This crate provides the building blocks used by every domain module:
//! - Strongly-typed identifiers for backend records
//! - Money types with precise decimal arithmetic and en-US formatting
//! - Display formatting for dates, relative times and file sizes
//! - Contact validation helpers
//! - Port error types for adapters that talk to the backend

pub mod money;
pub mod identifiers;
pub mod format;
pub mod validation;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    UserId, PolicyId, ClaimId, ClaimItemId, AttachmentId,
    NoteId, AssignmentId, AuditEventId,
};
pub use ports::{PortError, DomainPort};
