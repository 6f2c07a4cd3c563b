//! Property-Based Test Generators
//!
//! proptest strategies for claims data, plus `fake`-backed helpers for
//! realistic-looking users.

use chrono::Duration;
use core_kernel::UserId;
use domain_access::{User, UserRole};
use domain_claims::{Claim, ClaimStatus, Priority};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::{ClaimBuilder, UserBuilder};
use crate::fixtures::TemporalFixtures;

pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

pub fn user_role_strategy() -> impl Strategy<Value = UserRole> {
    prop::sample::select(UserRole::ALL.to_vec())
}

pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

/// Non-negative cost with cents
pub fn estimated_cost_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Claims in any status, half of them assigned with a due date up to
/// five days either side of the fixture anchor
pub fn claim_strategy() -> impl Strategy<Value = Claim> {
    (
        claim_status_strategy(),
        proptest::option::of((priority_strategy(), -120i64..120i64)),
        0i64..(30 * 24),
    )
        .prop_map(|(status, assignment, age_hours)| {
            let created = TemporalFixtures::now() - Duration::hours(age_hours);
            let mut builder = ClaimBuilder::new().with_status(status).created_at(created);
            if let Some((priority, due_hours)) = assignment {
                let due_in = TemporalFixtures::now() + Duration::hours(due_hours) - created;
                builder = builder.assigned_to(UserId::new_v7(), priority, due_in);
            }
            builder.build()
        })
}

pub fn claims_strategy(max: usize) -> impl Strategy<Value = Vec<Claim>> {
    prop::collection::vec(claim_strategy(), 0..=max)
}

/// A user with a generated name and email
pub fn fake_user(role: UserRole) -> User {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    UserBuilder::new()
        .with_role(role)
        .with_display_name(name)
        .with_email(email)
        .build()
}

/// `count` generated users cycling through the roles
pub fn fake_users(count: usize) -> Vec<User> {
    UserRole::ALL
        .iter()
        .cycle()
        .take(count)
        .map(|role| fake_user(*role))
        .collect()
}

