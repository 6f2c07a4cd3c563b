//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the claims workbench. Dates are fixed so
//! that formatting assertions stay stable.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{PolicyId, UserId};
use domain_access::{User, UserRole};
use domain_claims::Policy;
use uuid::Uuid;

/// Password every fixture user logs in with on the mock backend
pub const FIXTURE_PASSWORD: &str = "password123";

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Anchor "now" used by deterministic tests (Jun 15, 2024 12:00 UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    /// Incident date a few days before the anchor
    pub fn incident_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    pub fn policy_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    pub fn policy_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }
}

/// Fixture for identifiers with stable values
pub struct IdFixtures;

impl IdFixtures {
    pub fn policyholder_id() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
    }

    pub fn adjuster_id() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0002))
    }

    pub fn supervisor_id() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0003))
    }

    pub fn admin_id() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0004))
    }

    pub fn auto_policy_id() -> PolicyId {
        PolicyId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0101))
    }

    pub fn home_policy_id() -> PolicyId {
        PolicyId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0102))
    }

    pub fn renters_policy_id() -> PolicyId {
        PolicyId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0103))
    }
}

/// Fixture users, one per role
pub struct UserFixtures;

impl UserFixtures {
    fn user(id: UserId, email: &str, role: UserRole, name: &str) -> User {
        User {
            id,
            email: email.to_string(),
            role,
            display_name: name.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
        }
    }

    pub fn policyholder() -> User {
        Self::user(IdFixtures::policyholder_id(), "holder@claims.test", UserRole::Policyholder, "Pat Holder")
    }

    pub fn adjuster() -> User {
        Self::user(IdFixtures::adjuster_id(), "adjuster@claims.test", UserRole::Adjuster, "Alex Adjuster")
    }

    pub fn supervisor() -> User {
        Self::user(IdFixtures::supervisor_id(), "supervisor@claims.test", UserRole::Supervisor, "Sam Supervisor")
    }

    pub fn admin() -> User {
        Self::user(IdFixtures::admin_id(), "admin@claims.test", UserRole::Admin, "Ada Admin")
    }

    /// One user per role
    pub fn all() -> Vec<User> {
        vec![Self::policyholder(), Self::adjuster(), Self::supervisor(), Self::admin()]
    }

    /// Fixture user for a role
    pub fn for_role(role: UserRole) -> User {
        match role {
            UserRole::Policyholder => Self::policyholder(),
            UserRole::Adjuster => Self::adjuster(),
            UserRole::Supervisor => Self::supervisor(),
            UserRole::Admin => Self::admin(),
        }
    }
}

/// Fixture policies held by the fixture policyholder
pub struct PolicyFixtures;

impl PolicyFixtures {
    fn policy(id: PolicyId, number: &str, product: &str) -> Policy {
        Policy {
            id,
            policy_number: number.to_string(),
            holder_id: IdFixtures::policyholder_id(),
            product: product.to_string(),
            start_date: TemporalFixtures::policy_start(),
            end_date: TemporalFixtures::policy_end(),
            status: "ACTIVE".to_string(),
        }
    }

    pub fn auto() -> Policy {
        Self::policy(IdFixtures::auto_policy_id(), "POL-001", "Auto Insurance")
    }

    pub fn home() -> Policy {
        Self::policy(IdFixtures::home_policy_id(), "POL-002", "Home Insurance")
    }

    pub fn renters() -> Policy {
        Self::policy(IdFixtures::renters_policy_id(), "POL-003", "Renters Insurance")
    }

    pub fn all() -> Vec<Policy> {
        vec![Self::auto(), Self::home(), Self::renters()]
    }
}

/// Fixture for string data
pub struct StringFixtures;

impl StringFixtures {
    pub fn incident_description() -> &'static str {
        "Water leaked from the upstairs bathroom into the living room"
    }

    pub fn short_description() -> &'static str {
        "Leak"
    }

    pub fn invalid_email() -> &'static str {
        "not-an-email"
    }
}
