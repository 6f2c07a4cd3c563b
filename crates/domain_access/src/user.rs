//! User records and roles

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::UserId;
use crate::error::AccessError;

/// Role of a workbench user
///
/// Roles gate which claim transitions a user may perform and which
/// screens they can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Holds a policy and files claims against it
    Policyholder,
    /// Reviews and progresses assigned claims
    Adjuster,
    /// Oversees adjusters; may approve and assign
    Supervisor,
    /// Full access including user administration
    Admin,
}

impl UserRole {
    /// All roles in ascending order of authority
    pub const ALL: [UserRole; 4] = [
        UserRole::Policyholder,
        UserRole::Adjuster,
        UserRole::Supervisor,
        UserRole::Admin,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Policyholder => "Policyholder",
            UserRole::Adjuster => "Adjuster",
            UserRole::Supervisor => "Supervisor",
            UserRole::Admin => "Admin",
        }
    }

    /// Badge variant used when listing users
    pub fn badge(&self) -> &'static str {
        match self {
            UserRole::Admin => "danger",
            UserRole::Supervisor => "warning",
            UserRole::Adjuster => "primary",
            UserRole::Policyholder => "success",
        }
    }

    /// Wire name, e.g. `POLICYHOLDER`
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Policyholder => "POLICYHOLDER",
            UserRole::Adjuster => "ADJUSTER",
            UserRole::Supervisor => "SUPERVISOR",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Supervisors and admins share claim-management authority
    pub fn is_supervisory(&self) -> bool {
        matches!(self, UserRole::Supervisor | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}

/// A workbench user as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the user holds exactly this role
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    /// Returns true if the user holds any of the given roles
    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}

/// Payload for creating a user from the administration screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub role: UserRole,
    #[validate(length(min = 2, message = "Display name must be at least 2 characters"))]
    pub display_name: String,
}

/// Partial update for an existing user; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserUpdate {
    /// Applies the update to a user record in place
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(display_name) = &self.display_name {
            user.display_name = display_name.clone();
        }
    }
}
