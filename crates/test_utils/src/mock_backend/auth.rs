//! Token minting and the bearer-auth middleware of the mock backend

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::warn;
use uuid::Uuid;

use domain_access::{TokenClaims, User};

use super::error::MockApiError;
use super::state::BackendState;

/// Bearer token of the current request
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// Mints a session token for a user, valid for `ttl`
pub fn mint_token(user: &User, secret: &str, ttl: Duration) -> Result<String, MockApiError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user.id.as_uuid().to_string(),
        role: Some(user.role),
        exp: (now + ttl).timestamp(),
        iat: Some(now.timestamp()),
        jti: Some(Uuid::new_v4().to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| MockApiError::Internal(e.to_string()))
}

/// Verifies signature and expiry
pub fn verify_token(token: &str, secret: &str) -> Result<TokenClaims, MockApiError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => MockApiError::Unauthorized("Token expired".to_string()),
            _ => MockApiError::Unauthorized("Invalid token".to_string()),
        })
}

/// Authentication middleware
///
/// Resolves the bearer token to a stored user and adds both to the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<BackendState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, MockApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        warn!("Missing or invalid Authorization header");
        return Err(MockApiError::Unauthorized("Authentication required".to_string()));
    };

    let claims = verify_token(&token, &state.jwt_secret)?;
    let user = {
        let data = state.data.read().await;
        if data.revoked.contains(&token) {
            return Err(MockApiError::Unauthorized("Session has ended".to_string()));
        }
        data.users
            .iter()
            .find(|stored| stored.user.id.as_uuid().to_string() == claims.sub)
            .map(|stored| stored.user.clone())
    };

    let Some(user) = user else {
        warn!(sub = %claims.sub, "Token subject no longer exists");
        return Err(MockApiError::Unauthorized("Unknown user".to_string()));
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(AuthToken(token));
    Ok(next.run(request).await)
}
