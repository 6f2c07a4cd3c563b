//! In-process stand-in for the claims backend
//!
//! Serves the same REST surface the client talks to, over a real socket,
//! so client tests exercise the full HTTP path. Object storage is
//! emulated by a public `/uploads` endpoint that accepts the presigned
//! multipart form.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use chrono::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use core_kernel::ClaimId;
use domain_access::User;
use domain_claims::submission::MAX_ATTACHMENT_BYTES;
use domain_claims::Claim;

pub use self::auth::{auth_middleware, mint_token, AuthToken};
pub use self::error::MockApiError;
pub use self::state::{BackendData, BackendState, StoredUser};

const JWT_SECRET: &str = "mock-backend-secret";

/// Builds the backend router over shared state
pub fn router(state: Arc<BackendState>) -> Router {
    let public = Router::new().route("/auth/login", post(handlers::login));

    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/claims", get(handlers::list_claims).post(handlers::create_claim))
        .route(
            "/claims/:id",
            get(handlers::get_claim)
                .patch(handlers::update_claim)
                .delete(handlers::delete_claim),
        )
        .route("/claims/:id/status", patch(handlers::update_status))
        .route("/claims/:id/notes", post(handlers::add_note))
        .route("/notes/:id", patch(handlers::update_note).delete(handlers::delete_note))
        .route("/assignments", post(handlers::assign_claim))
        .route("/attachments/presign", post(handlers::presign))
        .route("/attachments", post(handlers::confirm_upload))
        .route("/attachments/:id", delete(handlers::delete_attachment))
        .route("/reports/sla", get(handlers::sla_report))
        .route("/reports/dashboard", get(handlers::dashboard))
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/:id",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let upload_limit = MAX_ATTACHMENT_BYTES as usize + 1024 * 1024;

    Router::new()
        .nest("/api", public.merge(protected))
        .route(
            "/uploads",
            post(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

/// A running mock backend; the server stops when this is dropped
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Starts a backend seeded with the fixture users and policies
    pub async fn spawn() -> io::Result<Self> {
        Self::spawn_with(BackendData::seeded()).await
    }

    /// Starts a backend over the given data
    pub async fn spawn_with(data: BackendData) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(BackendState {
            data: RwLock::new(data),
            jwt_secret: JWT_SECRET.to_string(),
            public_url: format!("http://{}", addr),
            token_ttl: Duration::hours(8),
        });

        let app = router(state.clone());
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });
        tracing::debug!(%addr, "Mock backend listening");

        Ok(Self { addr, state, task })
    }

    /// Base URL the client should be configured with
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn state(&self) -> &Arc<BackendState> {
        &self.state
    }

    pub async fn insert_claim(&self, claim: Claim) {
        self.state.data.write().await.claims.insert(claim.id, claim);
    }

    pub async fn claim(&self, id: ClaimId) -> Option<Claim> {
        self.state.data.read().await.claims.get(&id).cloned()
    }

    /// Bytes stored under an upload key
    pub async fn upload(&self, key: &str) -> Option<Vec<u8>> {
        self.state.data.read().await.uploads.get(key).cloned()
    }

    /// Mints a token for the user with a custom lifetime
    pub fn token_for(&self, user: &User, ttl: Duration) -> Result<String, MockApiError> {
        mint_token(user, &self.state.jwt_secret, ttl)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}
