use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{debug, info};

use core_kernel::{AttachmentId, ClaimId};
use domain_claims::{Attachment, PendingAttachment};

use super::ApiClient;
use crate::dto::{ConfirmUploadRequest, PresignRequest, PresignedUpload};
use crate::error::ApiError;

impl ApiClient {
    pub async fn presign_upload(&self, request: &PresignRequest) -> Result<PresignedUpload, ApiError> {
        let request = self.request(Method::POST, "/attachments/presign").await.json(request);
        self.data(request).await
    }

    /// Posts the file to the presigned URL
    ///
    /// Storage is a separate service, so no bearer token is sent and the
    /// response carries no envelope.
    pub async fn upload_to(&self, upload: &PresignedUpload, file: &PendingAttachment) -> Result<(), ApiError> {
        let mut form = Form::new();
        for (name, value) in &upload.fields {
            form = form.text(name.clone(), value.clone());
        }
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        form = form.part("file", part);

        let response = self.http.post(&upload.url).multipart(form).send().await?;
        let status = response.status();
        debug!(%status, key = %upload.s3_key, "Storage response");
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Api {
                status: status.as_u16(),
                message: format!("Upload of {} failed", file.file_name),
            })
        }
    }

    pub async fn confirm_upload(&self, request: &ConfirmUploadRequest) -> Result<Attachment, ApiError> {
        let request = self.request(Method::POST, "/attachments").await.json(request);
        self.data(request).await
    }

    /// Checks, presigns, uploads and confirms a file for a claim
    pub async fn upload_attachment(&self, claim_id: ClaimId, file: &PendingAttachment) -> Result<Attachment, ApiError> {
        file.check()?;
        let upload = self.presign_upload(&PresignRequest::from(file)).await?;
        self.upload_to(&upload, file).await?;
        let attachment = self
            .confirm_upload(&ConfirmUploadRequest::new(claim_id, &upload, file))
            .await?;
        info!(claim_id = %claim_id, file = %file.file_name, "Attachment uploaded");
        Ok(attachment)
    }

    pub async fn delete_attachment(&self, id: AttachmentId) -> Result<(), ApiError> {
        let request = self
            .request(Method::DELETE, &format!("/attachments/{}", id.as_uuid()))
            .await;
        self.data(request).await
    }
}
