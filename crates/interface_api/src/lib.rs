//! Claims Workbench Client
//!
//! Talks to the claims backend over REST and keeps the state the claim
//! screens need.
//!
//! # Architecture
//!
//! - **Client**: `ApiClient`, a reqwest client with bearer auth, grouped per resource
//! - **Session**: `SessionStore`, the shared (optionally persisted) login
//! - **Desk**: `ClaimsDesk`, worklist state and user-facing notices over a `ClaimsPort`
//! - **DTOs**: the response envelope and wire-only payloads
//! - **Error Handling**: `ApiError` and its mapping to `PortError`
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interface_api::{ApiClient, ClaimsDesk, ClientConfig, SessionStore};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?, SessionStore::in_memory())?;
//! let session = client.login(&form).await?;
//! let mut desk = ClaimsDesk::new(Arc::new(client), session.user);
//! desk.load().await?;
//! ```

pub mod config;
pub mod error;
pub mod dto;
pub mod session;
pub mod client;
pub mod desk;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use desk::{ClaimsDesk, Notice, NoticeLevel};
pub use error::ApiError;
pub use session::SessionStore;
