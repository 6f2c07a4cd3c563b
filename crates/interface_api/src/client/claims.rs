use async_trait::async_trait;
use reqwest::Method;

use core_kernel::{ClaimId, DomainPort, PortError};
use domain_claims::{
    Assignment, AssignmentRequest, Attachment, Claim, ClaimFormData, ClaimQuery, ClaimUpdate, ClaimsPort, NewNote,
    Note, PendingAttachment, StatusChangeRequest,
};

use super::ApiClient;
use crate::dto::PaginatedResponse;
use crate::error::ApiError;

impl ApiClient {
    pub async fn list_claims(&self, query: &ClaimQuery) -> Result<PaginatedResponse<Claim>, ApiError> {
        let request = self.request(Method::GET, "/claims").await.query(&query.to_query_pairs());
        self.send(request).await
    }

    pub async fn get_claim(&self, id: ClaimId) -> Result<Claim, ApiError> {
        let request = self.request(Method::GET, &format!("/claims/{}", id.as_uuid())).await;
        self.data(request).await
    }

    pub async fn create_claim(&self, form: &ClaimFormData) -> Result<Claim, ApiError> {
        let request = self.request(Method::POST, "/claims").await.json(form);
        self.data(request).await
    }

    pub async fn update_claim(&self, id: ClaimId, update: &ClaimUpdate) -> Result<Claim, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("/claims/{}", id.as_uuid()))
            .await
            .json(update);
        self.data(request).await
    }

    pub async fn update_claim_status(&self, id: ClaimId, change: &StatusChangeRequest) -> Result<Claim, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("/claims/{}/status", id.as_uuid()))
            .await
            .json(change);
        self.data(request).await
    }

    pub async fn delete_claim(&self, id: ClaimId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/claims/{}", id.as_uuid())).await;
        self.data(request).await
    }

    pub async fn assign_claim(&self, assignment: &AssignmentRequest) -> Result<Assignment, ApiError> {
        let request = self.request(Method::POST, "/assignments").await.json(assignment);
        self.data(request).await
    }
}

impl DomainPort for ApiClient {}

#[async_trait]
impl ClaimsPort for ApiClient {
    async fn list_claims(&self, query: &ClaimQuery) -> Result<domain_claims::Page<Claim>, PortError> {
        Ok(ApiClient::list_claims(self, query).await?.data)
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        Ok(ApiClient::get_claim(self, id).await?)
    }

    async fn create_claim(&self, form: &ClaimFormData) -> Result<Claim, PortError> {
        Ok(ApiClient::create_claim(self, form).await?)
    }

    async fn update_claim_status(&self, id: ClaimId, change: &StatusChangeRequest) -> Result<Claim, PortError> {
        Ok(ApiClient::update_claim_status(self, id, change).await?)
    }

    async fn assign_claim(&self, request: &AssignmentRequest) -> Result<Assignment, PortError> {
        Ok(ApiClient::assign_claim(self, request).await?)
    }

    async fn add_note(&self, claim_id: ClaimId, note: &NewNote) -> Result<Note, PortError> {
        Ok(ApiClient::add_note(self, claim_id, note).await?)
    }

    async fn upload_attachment(&self, claim_id: ClaimId, file: &PendingAttachment) -> Result<Attachment, PortError> {
        Ok(ApiClient::upload_attachment(self, claim_id, file).await?)
    }
}
