//! Access Domain
//!
//! Everything about who is using the workbench: user records and roles,
//! the login/profile/user-administration forms, the authenticated session,
//! and which parts of the application each role can reach.
//!
//! # Roles
//!
//! ```text
//! POLICYHOLDER  files and follows their own claims
//! ADJUSTER      works the claims assigned to them
//! SUPERVISOR    oversees every queue, approves and assigns
//! ADMIN         everything a supervisor can do, plus user administration
//! ```

pub mod user;
pub mod forms;
pub mod session;
pub mod navigation;
pub mod directory;
pub mod error;

pub use user::{User, UserRole, NewUser, UserUpdate};
pub use forms::{FormErrors, LoginForm, ProfileForm, PasswordChangeForm};
pub use session::{Session, TokenClaims, AuthState};
pub use navigation::{NavItem, QuickAction, navigation_for, quick_actions_for};
pub use directory::UserDirectory;
pub use error::AccessError;
