use reqwest::Method;

use core_kernel::UserId;
use domain_access::forms::check;
use domain_access::{NewUser, User, UserRole, UserUpdate};

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Lists users, optionally only those with a role
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>, ApiError> {
        let mut request = self.request(Method::GET, "/users").await;
        if let Some(role) = role {
            request = request.query(&[("role", role.as_str())]);
        }
        self.data(request).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        let request = self.request(Method::GET, &format!("/users/{}", id.as_uuid())).await;
        self.data(request).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        check(user)?;
        let request = self.request(Method::POST, "/users").await.json(user);
        self.data(request).await
    }

    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("/users/{}", id.as_uuid()))
            .await
            .json(update);
        self.data(request).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/users/{}", id.as_uuid())).await;
        self.data(request).await
    }
}
