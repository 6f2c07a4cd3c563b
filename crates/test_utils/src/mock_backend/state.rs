//! In-memory data held by the mock backend

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use tokio::sync::RwLock;

use core_kernel::{ClaimId, UserId};
use domain_access::User;
use domain_claims::{Claim, Policy};

use crate::fixtures::{PolicyFixtures, UserFixtures, FIXTURE_PASSWORD};

/// A user account with its password
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password: String,
}

/// Everything the backend stores
#[derive(Debug, Default)]
pub struct BackendData {
    pub users: Vec<StoredUser>,
    pub policies: Vec<Policy>,
    pub claims: HashMap<ClaimId, Claim>,
    /// Uploaded objects keyed by storage key
    pub uploads: HashMap<String, Vec<u8>>,
    /// Tokens ended by logout
    pub revoked: HashSet<String>,
}

impl BackendData {
    /// Fixture users (one per role) and policies, no claims
    pub fn seeded() -> Self {
        Self {
            users: UserFixtures::all()
                .into_iter()
                .map(|user| StoredUser {
                    user,
                    password: FIXTURE_PASSWORD.to_string(),
                })
                .collect(),
            policies: PolicyFixtures::all(),
            ..Self::default()
        }
    }

    /// Adds claims, keyed by their id
    pub fn with_claims(mut self, claims: impl IntoIterator<Item = Claim>) -> Self {
        self.claims.extend(claims.into_iter().map(|c| (c.id, c)));
        self
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().map(|s| &s.user).find(|u| u.id == id)
    }
}

/// Shared state behind every handler
#[derive(Debug)]
pub struct BackendState {
    pub data: RwLock<BackendData>,
    pub jwt_secret: String,
    /// Address the backend is reachable at, without the `/api` prefix
    pub public_url: String,
    pub token_ttl: Duration,
}
