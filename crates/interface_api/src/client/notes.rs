use reqwest::Method;

use core_kernel::{ClaimId, NoteId};
use domain_claims::{NewNote, Note};

use super::ApiClient;
use crate::dto::NoteUpdate;
use crate::error::ApiError;

impl ApiClient {
    pub async fn add_note(&self, claim_id: ClaimId, note: &NewNote) -> Result<Note, ApiError> {
        let request = self
            .request(Method::POST, &format!("/claims/{}/notes", claim_id.as_uuid()))
            .await
            .json(note);
        self.data(request).await
    }

    pub async fn update_note(&self, id: NoteId, body: impl Into<String>) -> Result<Note, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("/notes/{}", id.as_uuid()))
            .await
            .json(&NoteUpdate { body: body.into() });
        self.data(request).await
    }

    pub async fn delete_note(&self, id: NoteId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/notes/{}", id.as_uuid())).await;
        self.data(request).await
    }
}
