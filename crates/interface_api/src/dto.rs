//! Wire payloads exchanged with the backend
//!
//! Domain records (`Claim`, `User`, reports) travel as-is; this module
//! holds the envelope and the request/response shapes that exist only on
//! the wire.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_access::User;
use domain_claims::{Page, PendingAttachment};

/// Envelope around every successful response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
}

/// Envelope around a page of records
pub type PaginatedResponse<T> = ApiResponse<Page<T>>;

/// Body of a failed response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Readable message, preferring `message` over the error code
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

/// Payload of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Asks the backend for a presigned upload form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub checksum: String,
}

impl From<&PendingAttachment> for PresignRequest {
    fn from(file: &PendingAttachment) -> Self {
        Self {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            checksum: file.checksum.clone(),
        }
    }
}

/// Where and how to upload a file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub url: String,
    /// Form fields to send ahead of the file
    pub fields: HashMap<String, String>,
    pub s3_key: String,
}

/// Records an uploaded object as a claim attachment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadRequest {
    pub s3_key: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub checksum: String,
    pub claim_id: ClaimId,
}

impl ConfirmUploadRequest {
    pub fn new(claim_id: ClaimId, upload: &PresignedUpload, file: &PendingAttachment) -> Self {
        Self {
            s3_key: upload.s3_key.clone(),
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            checksum: file.checksum.clone(),
            claim_id,
        }
    }
}

/// Edits the body of an existing note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_without_message() {
        let body = json!({ "success": true, "data": { "token": "abc" } });
        let response: ApiResponse<TokenResponse> = serde_json::from_value(body).unwrap();
        assert!(response.success);
        assert!(response.message.is_none());
        assert_eq!(response.data.token, "abc");
    }

    #[test]
    fn test_empty_data_reads_as_unit() {
        let body = json!({ "success": true, "data": null, "message": "Deleted" });
        let response: ApiResponse<()> = serde_json::from_value(body).unwrap();
        assert_eq!(response.message.as_deref(), Some("Deleted"));
    }

    #[test]
    fn test_presign_request_is_camel_case() {
        let file = PendingAttachment::from_bytes("receipt.pdf", "application/pdf", b"%PDF".to_vec());
        let value = serde_json::to_value(PresignRequest::from(&file)).unwrap();
        assert_eq!(value["fileName"], "receipt.pdf");
        assert_eq!(value["mimeType"], "application/pdf");
        assert_eq!(value["size"], 4);
        assert_eq!(value["checksum"].as_str().map(str::len), Some(64));
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_value(json!({ "error": "conflict" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("conflict"));
        assert!(ErrorBody::default().into_message().is_none());
    }
}
