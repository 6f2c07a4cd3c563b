//! Authenticated session and bearer-token inspection
//!
//! The backend signs tokens; the client only reads the payload to learn
//! when the session expires, so signature verification is disabled here.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::user::{User, UserRole};

/// Payload of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role the token was issued for
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    #[serde(default)]
    pub iat: Option<i64>,
    /// Unique token id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl TokenClaims {
    /// Reads the claims from a JWT without checking its signature
    pub fn inspect(token: &str) -> Result<Self, AccessError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| AccessError::TokenDecode(e.to_string()))
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// The logged-in user together with their bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Expiry read from the token; opaque tokens have none
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        TokenClaims::inspect(&self.token)
            .ok()
            .and_then(|claims| claims.expires_at())
    }

    /// Returns true once the token's expiry has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    /// Replaces the token after a refresh, keeping the user
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: self.user,
        }
    }
}

/// Authentication state of the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// Current user, if logged in
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(session) => Some(&session.user),
            AuthState::Anonymous => None,
        }
    }

    /// Current role, if logged in
    pub fn role(&self) -> Option<UserRole> {
        self.user().map(|u| u.role)
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.user().is_some_and(|u| u.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        self.user().is_some_and(|u| u.has_any_role(roles))
    }
}

impl From<Option<Session>> for AuthState {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => AuthState::Authenticated(session),
            None => AuthState::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_kernel::UserId;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(),
            email: "adjuster@example.com".to_string(),
            role,
            display_name: "Ada Adjuster".to_string(),
            created_at: Utc::now(),
        }
    }

    fn token(exp: DateTime<Utc>) -> String {
        let claims = TokenClaims {
            sub: "user-1".to_string(),
            role: Some(UserRole::Adjuster),
            exp: exp.timestamp(),
            iat: Some(Utc::now().timestamp()),
            jti: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn test_inspect_reads_claims_without_secret() {
        let exp = Utc::now() + Duration::hours(1);
        let claims = TokenClaims::inspect(&token(exp)).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Some(UserRole::Adjuster));
        assert_eq!(claims.exp, exp.timestamp());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let live = Session::new(token(now + Duration::minutes(5)), user(UserRole::Adjuster));
        let stale = Session::new(token(now - Duration::minutes(5)), user(UserRole::Adjuster));

        assert!(!live.is_expired(now));
        assert!(stale.is_expired(now));
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let session = Session::new("opaque-token", user(UserRole::Admin));
        assert!(session.expires_at().is_none());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_auth_state_roles() {
        let state = AuthState::from(Some(Session::new("t", user(UserRole::Supervisor))));
        assert!(state.is_authenticated());
        assert!(state.has_role(UserRole::Supervisor));
        assert!(state.has_any_role(&[UserRole::Adjuster, UserRole::Supervisor]));
        assert!(!state.has_any_role(&[UserRole::Admin]));

        let anonymous = AuthState::default();
        assert!(!anonymous.has_any_role(&UserRole::ALL));
        assert!(anonymous.user().is_none());
    }
}
