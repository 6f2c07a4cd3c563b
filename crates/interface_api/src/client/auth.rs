use reqwest::Method;
use tracing::info;

use domain_access::forms::check;
use domain_access::{LoginForm, Session, User};

use super::ApiClient;
use crate::dto::{AuthResponse, TokenResponse};
use crate::error::ApiError;

impl ApiClient {
    /// Logs in and stores the session
    pub async fn login(&self, form: &LoginForm) -> Result<Session, ApiError> {
        check(form)?;
        let request = self.request(Method::POST, "/auth/login").await.json(form);
        let auth: AuthResponse = self.data(request).await?;

        let session = Session::new(auth.token, auth.user);
        self.session.set(session.clone()).await;
        info!(email = %session.user.email, role = %session.user.role, "Logged in");
        Ok(session)
    }

    /// Ends the session on the backend and forgets it locally
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = match self.session.token().await {
            Some(_) => {
                let request = self.request(Method::POST, "/auth/logout").await;
                self.data::<()>(request).await
            }
            None => Ok(()),
        };
        self.session.clear().await;
        result
    }

    /// Current user as the backend sees it
    pub async fn me(&self) -> Result<User, ApiError> {
        let request = self.request(Method::GET, "/auth/me").await;
        self.data(request).await
    }

    /// Exchanges the token for a fresh one
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let request = self.request(Method::POST, "/auth/refresh").await;
        let TokenResponse { token } = self.data(request).await?;
        self.session.update_token(token.clone()).await;
        Ok(token)
    }
}
