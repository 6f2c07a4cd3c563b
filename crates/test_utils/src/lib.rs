//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims workbench crates.
//!
//! # Modules
//!
//! - `fixtures`: Known users, policies and timestamps
//! - `builders`: Builder patterns for claims, users and claim forms
//! - `generators`: Property-based and fake-data generators
//! - `mock_backend`: An in-process HTTP backend for client tests

pub mod fixtures;
pub mod builders;
pub mod generators;
pub mod mock_backend;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
pub use mock_backend::{BackendData, MockBackend};
