//! Shared session storage
//!
//! A `SessionStore` is a cheap handle; clones see the same session. When
//! given a file it persists the session there as JSON so the next run of
//! the CLI starts logged in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use domain_access::{AuthState, Session, User};

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    file: Option<PathBuf>,
}

impl SessionStore {
    /// Session kept for the lifetime of the process only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session backed by a file, restored from it when present and unexpired
    pub async fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let restored = read_session(&path).await.filter(|s| !s.is_expired(Utc::now()));
        Self {
            inner: Arc::new(RwLock::new(restored)),
            file: Some(path),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn auth_state(&self) -> AuthState {
        AuthState::from(self.current().await)
    }

    pub async fn set(&self, session: Session) {
        *self.inner.write().await = Some(session);
        self.persist().await;
    }

    /// Swaps in a refreshed token; no-op when logged out
    pub async fn update_token(&self, token: String) {
        {
            let mut guard = self.inner.write().await;
            let Some(session) = guard.take() else {
                return;
            };
            *guard = Some(session.with_token(token));
        }
        self.persist().await;
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
        self.persist().await;
    }

    async fn persist(&self) {
        let Some(path) = &self.file else {
            return;
        };
        let result = match self.current().await {
            Some(session) => match serde_json::to_vec_pretty(&session) {
                Ok(bytes) => tokio::fs::write(path, bytes).await,
                Err(e) => {
                    warn!(error = %e, "Session could not be serialized");
                    return;
                }
            },
            None => match tokio::fs::remove_file(path).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "Session file not updated");
        }
    }
}

async fn read_session(path: &Path) -> Option<Session> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            None
        }
    }
}
