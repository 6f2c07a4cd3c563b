//! Request handlers of the mock backend
//!
//! Handlers enforce the same rules a real deployment would: role checks,
//! the claim lifecycle, and upload checksums.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, RawQuery, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use core_kernel::{AssignmentId, AttachmentId, ClaimId, NoteId, UserId};
use domain_access::forms::check;
use domain_access::{NewUser, User, UserRole, UserUpdate};
use domain_claims::submission::MAX_ATTACHMENT_BYTES;
use domain_claims::{
    check_transition, Assignment, AssignmentRequest, Attachment, Claim, ClaimFilters, ClaimFormData,
    ClaimPermissions, ClaimStatus, ClaimUpdate, DashboardStats, NewNote, Note, NoteVisibility, Page, Priority,
    ReportRange, SlaReport, StatusChangeRequest,
};

use super::auth::{mint_token, AuthToken};
use super::error::MockApiError;
use super::state::{BackendState, StoredUser};
use crate::fixtures::FIXTURE_PASSWORD;

type Shared = State<Arc<BackendState>>;
type ApiResult<T> = Result<Json<Envelope<T>>, MockApiError>;
type Created<T> = Result<(StatusCode, Json<Envelope<T>>), MockApiError>;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        message: None,
    })
}

fn created<T>(data: T, message: &str) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            data,
            message: Some(message.to_string()),
        }),
    )
}

fn forbidden(message: &str) -> MockApiError {
    MockApiError::Forbidden(message.to_string())
}

fn claim_not_found() -> MockApiError {
    MockApiError::NotFound("Claim not found".to_string())
}

fn require_supervisory(user: &User) -> Result<(), MockApiError> {
    if user.role.is_supervisory() {
        Ok(())
    } else {
        Err(forbidden("Supervisor or admin role required"))
    }
}

fn require_admin(user: &User) -> Result<(), MockApiError> {
    if user.role == UserRole::Admin {
        Ok(())
    } else {
        Err(forbidden("Admin role required"))
    }
}

/// Decodes a raw query string into pairs, keeping repeated keys
fn query_pairs(raw: Option<String>) -> Vec<(String, String)> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    reqwest::Url::parse(&format!("http://mock.local/?{}", raw))
        .map(|url| url.query_pairs().into_owned().collect())
        .unwrap_or_default()
}

fn parse_date(value: &str) -> Result<NaiveDate, MockApiError> {
    value
        .parse::<NaiveDate>()
        .map_err(|_| MockApiError::BadRequest(format!("Invalid date: {}", value)))
}

/// Claim filters and paging from query pairs
fn parse_claim_query(pairs: &[(String, String)]) -> Result<(ClaimFilters, u32, u32), MockApiError> {
    let mut filters = ClaimFilters::new();
    let mut page = 1;
    let mut limit = 10;
    for (key, value) in pairs {
        match key.as_str() {
            "page" => page = value.parse().map_err(|_| MockApiError::BadRequest("Invalid page".to_string()))?,
            "limit" => limit = value.parse().map_err(|_| MockApiError::BadRequest("Invalid limit".to_string()))?,
            "status" => filters = filters.with_status(value.parse::<ClaimStatus>().map_err(MockApiError::BadRequest)?),
            "priority" => filters = filters.with_priority(value.parse::<Priority>().map_err(MockApiError::BadRequest)?),
            "product" => filters = filters.with_product(value.clone()),
            "assignedTo" => {
                let id = value
                    .parse::<UserId>()
                    .map_err(|_| MockApiError::BadRequest("Invalid assignedTo".to_string()))?;
                filters = filters.assigned_to(id);
            }
            "dateFrom" => filters.date_from = Some(parse_date(value)?),
            "dateTo" => filters.date_to = Some(parse_date(value)?),
            "search" => filters = filters.with_search(value.clone()),
            _ => {}
        }
    }
    Ok((filters, page, limit))
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPayload {
    pub token: String,
}

pub async fn login(State(state): Shared, Json(body): Json<LoginBody>) -> ApiResult<AuthPayload> {
    let user = {
        let data = state.data.read().await;
        data.users
            .iter()
            .find(|s| s.user.email.eq_ignore_ascii_case(body.email.trim()) && s.password == body.password)
            .map(|s| s.user.clone())
    }
    .ok_or_else(|| MockApiError::Unauthorized("Invalid email or password".to_string()))?;

    let token = mint_token(&user, &state.jwt_secret, state.token_ttl)?;
    info!(email = %user.email, role = %user.role, "User logged in");
    Ok(ok(AuthPayload { user, token }))
}

pub async fn logout(State(state): Shared, Extension(AuthToken(token)): Extension<AuthToken>) -> ApiResult<()> {
    state.data.write().await.revoked.insert(token);
    Ok(ok(()))
}

pub async fn me(Extension(user): Extension<User>) -> ApiResult<User> {
    Ok(ok(user))
}

pub async fn refresh(
    State(state): Shared,
    Extension(user): Extension<User>,
    Extension(AuthToken(old)): Extension<AuthToken>,
) -> ApiResult<TokenPayload> {
    let token = mint_token(&user, &state.jwt_secret, state.token_ttl)?;
    state.data.write().await.revoked.insert(old);
    Ok(ok(TokenPayload { token }))
}

// ============================================================================
// Users
// ============================================================================

pub async fn list_users(
    State(state): Shared,
    Extension(user): Extension<User>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Vec<User>> {
    require_supervisory(&user)?;
    let role = query_pairs(raw)
        .into_iter()
        .find(|(k, _)| k == "role")
        .map(|(_, v)| v.parse::<UserRole>())
        .transpose()
        .map_err(|e| MockApiError::BadRequest(e.to_string()))?;

    let data = state.data.read().await;
    let users = data
        .users
        .iter()
        .map(|s| s.user.clone())
        .filter(|u| role.map_or(true, |r| u.role == r))
        .collect();
    Ok(ok(users))
}

pub async fn get_user(State(state): Shared, Extension(user): Extension<User>, Path(id): Path<Uuid>) -> ApiResult<User> {
    let id = UserId::from_uuid(id);
    if user.id != id {
        require_supervisory(&user)?;
    }
    let data = state.data.read().await;
    data.user(id)
        .cloned()
        .map(ok)
        .ok_or_else(|| MockApiError::NotFound("User not found".to_string()))
}

pub async fn create_user(
    State(state): Shared,
    Extension(user): Extension<User>,
    Json(body): Json<NewUser>,
) -> Created<User> {
    require_admin(&user)?;
    check(&body).map_err(|errors| MockApiError::Validation(errors.to_string()))?;

    let mut data = state.data.write().await;
    if data.users.iter().any(|s| s.user.email.eq_ignore_ascii_case(&body.email)) {
        return Err(MockApiError::Conflict("Email is already in use".to_string()));
    }
    let new_user = User {
        id: UserId::new_v7(),
        email: body.email,
        role: body.role,
        display_name: body.display_name,
        created_at: Utc::now(),
    };
    data.users.push(StoredUser {
        user: new_user.clone(),
        password: FIXTURE_PASSWORD.to_string(),
    });
    Ok(created(new_user, "User created"))
}

pub async fn update_user(
    State(state): Shared,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<User> {
    require_admin(&user)?;
    let id = UserId::from_uuid(id);
    let mut data = state.data.write().await;
    let stored = data
        .users
        .iter_mut()
        .find(|s| s.user.id == id)
        .ok_or_else(|| MockApiError::NotFound("User not found".to_string()))?;
    update.apply_to(&mut stored.user);
    Ok(ok(stored.user.clone()))
}

pub async fn delete_user(State(state): Shared, Extension(user): Extension<User>, Path(id): Path<Uuid>) -> ApiResult<()> {
    require_admin(&user)?;
    let id = UserId::from_uuid(id);
    if id == user.id {
        return Err(MockApiError::Conflict("You cannot delete your own account".to_string()));
    }
    let mut data = state.data.write().await;
    let before = data.users.len();
    data.users.retain(|s| s.user.id != id);
    if data.users.len() == before {
        return Err(MockApiError::NotFound("User not found".to_string()));
    }
    Ok(ok(()))
}

// ============================================================================
// Claims
// ============================================================================

pub async fn list_claims(
    State(state): Shared,
    Extension(user): Extension<User>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Page<Claim>> {
    let (filters, page, limit) = parse_claim_query(&query_pairs(raw))?;
    let perms = ClaimPermissions::new(Some(&user));

    let data = state.data.read().await;
    let mut claims: Vec<Claim> = data
        .claims
        .values()
        .filter(|c| perms.can_view(c) && filters.matches(c))
        .cloned()
        .collect();
    claims.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    Ok(ok(Page::paginate(claims, page, limit)))
}

pub async fn get_claim(State(state): Shared, Extension(user): Extension<User>, Path(id): Path<Uuid>) -> ApiResult<Claim> {
    let data = state.data.read().await;
    let claim = data.claims.get(&ClaimId::from_uuid(id)).ok_or_else(claim_not_found)?;
    if !ClaimPermissions::new(Some(&user)).can_view(claim) {
        return Err(forbidden("You do not have access to this claim"));
    }
    Ok(ok(claim.clone()))
}

pub async fn create_claim(
    State(state): Shared,
    Extension(user): Extension<User>,
    Json(form): Json<ClaimFormData>,
) -> Created<Claim> {
    if form.description.chars().count() < 10 {
        return Err(MockApiError::Validation("Description must be at least 10 characters".to_string()));
    }
    if form.items.is_empty() {
        return Err(MockApiError::Validation("At least one item is required".to_string()));
    }
    if form.items.iter().any(|item| item.estimated_cost.is_sign_negative() && !item.estimated_cost.is_zero()) {
        return Err(MockApiError::Validation("Cost must be positive".to_string()));
    }

    let mut data = state.data.write().await;
    let policy = data
        .policies
        .iter()
        .find(|p| p.id == form.policy_id)
        .cloned()
        .ok_or_else(|| MockApiError::BadRequest("Unknown policy".to_string()))?;
    if user.role == UserRole::Policyholder && policy.holder_id != user.id {
        return Err(forbidden("Policy belongs to another policyholder"));
    }

    let mut claim = Claim::draft_from(&form, user.id, Utc::now());
    claim.policy = Some(policy);
    claim.claimant = Some(user);
    data.claims.insert(claim.id, claim.clone());
    info!(claim_id = %claim.id, "Claim created");
    Ok(created(claim, "Claim created"))
}

pub async fn update_claim(
    State(state): Shared,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(update): Json<ClaimUpdate>,
) -> ApiResult<Claim> {
    let mut data = state.data.write().await;
    let policy = match update.policy_id {
        Some(policy_id) => Some(
            data.policies
                .iter()
                .find(|p| p.id == policy_id)
                .cloned()
                .ok_or_else(|| MockApiError::BadRequest("Unknown policy".to_string()))?,
        ),
        None => None,
    };
    let claim = data.claims.get_mut(&ClaimId::from_uuid(id)).ok_or_else(claim_not_found)?;
    if !ClaimPermissions::new(Some(&user)).can_edit(claim) {
        return Err(forbidden("You cannot edit this claim"));
    }
    update.apply_to(claim, Utc::now());
    if policy.is_some() {
        claim.policy = policy;
    }
    Ok(ok(claim.clone()))
}

pub async fn delete_claim(State(state): Shared, Extension(user): Extension<User>, Path(id): Path<Uuid>) -> ApiResult<()> {
    let id = ClaimId::from_uuid(id);
    let mut data = state.data.write().await;
    let claim = data.claims.get(&id).ok_or_else(claim_not_found)?;
    if !ClaimPermissions::new(Some(&user)).can_edit(claim) {
        return Err(forbidden("You cannot delete this claim"));
    }
    if claim.status != ClaimStatus::Draft {
        return Err(MockApiError::Conflict("Only draft claims can be deleted".to_string()));
    }
    data.claims.remove(&id);
    Ok(ok(()))
}

pub async fn update_status(
    State(state): Shared,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChangeRequest>,
) -> ApiResult<Claim> {
    let mut data = state.data.write().await;
    let claim = data.claims.get_mut(&ClaimId::from_uuid(id)).ok_or_else(claim_not_found)?;
    if !ClaimPermissions::new(Some(&user)).can_view(claim) {
        return Err(forbidden("You do not have access to this claim"));
    }
    check_transition(claim.status, change.target_status, user.role)?;

    let from = claim.status;
    claim.apply_status(change.target_status, user.id, change.reason.as_deref(), Utc::now());
    if change.target_status == ClaimStatus::Approved && claim.amount_approved.is_none() {
        claim.amount_approved = claim.amount_claimed;
    }
    info!(claim_id = %claim.id, %from, to = %change.target_status, "Claim status changed");
    Ok(ok(claim.clone()))
}

/// Working days an adjuster has for each priority
fn assignment_window(priority: Priority) -> Duration {
    match priority {
        Priority::Urgent => Duration::days(1),
        Priority::High => Duration::days(2),
        Priority::Medium => Duration::days(3),
        Priority::Low => Duration::days(5),
    }
}

pub async fn assign_claim(
    State(state): Shared,
    Extension(user): Extension<User>,
    Json(request): Json<AssignmentRequest>,
) -> Created<Assignment> {
    if !ClaimPermissions::new(Some(&user)).can_assign_claim() {
        return Err(forbidden("Only supervisors can assign claims"));
    }
    let mut data = state.data.write().await;
    let adjuster = data
        .user(request.adjuster_id)
        .filter(|u| u.role == UserRole::Adjuster)
        .cloned()
        .ok_or_else(|| MockApiError::BadRequest("Assignee must be an adjuster".to_string()))?;
    let claim = data.claims.get_mut(&request.claim_id).ok_or_else(claim_not_found)?;

    let now = Utc::now();
    let assignment = Assignment {
        id: AssignmentId::new_v7(),
        claim_id: claim.id,
        adjuster_id: adjuster.id,
        adjuster: Some(adjuster),
        assigned_at: now,
        due_at: now + assignment_window(request.priority),
        priority: request.priority,
    };
    claim.assignment = Some(assignment.clone());
    claim.updated_at = now;
    Ok(created(assignment, "Claim assigned"))
}

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NoteEdit {
    pub body: String,
}

pub async fn add_note(
    State(state): Shared,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(body): Json<NewNote>,
) -> Created<Note> {
    if body.body.trim().is_empty() {
        return Err(MockApiError::Validation("Note cannot be empty".to_string()));
    }
    let perms = ClaimPermissions::new(Some(&user));
    if body.visibility == NoteVisibility::Internal && !perms.can_read_internal_notes() {
        return Err(forbidden("Internal notes are for staff only"));
    }

    let mut data = state.data.write().await;
    let claim = data.claims.get_mut(&ClaimId::from_uuid(id)).ok_or_else(claim_not_found)?;
    if !perms.can_view(claim) {
        return Err(forbidden("You do not have access to this claim"));
    }
    let note = Note {
        id: NoteId::new_v7(),
        claim_id: claim.id,
        author_id: user.id,
        author: Some(user.clone()),
        body: body.body,
        visibility: body.visibility,
        created_at: Utc::now(),
    };
    claim.notes.push(note.clone());
    Ok(created(note, "Note added"))
}

pub async fn update_note(
    State(state): Shared,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(edit): Json<NoteEdit>,
) -> ApiResult<Note> {
    if edit.body.trim().is_empty() {
        return Err(MockApiError::Validation("Note cannot be empty".to_string()));
    }
    let id = NoteId::from_uuid(id);
    let mut data = state.data.write().await;
    let note = data
        .claims
        .values_mut()
        .flat_map(|c| c.notes.iter_mut())
        .find(|n| n.id == id)
        .ok_or_else(|| MockApiError::NotFound("Note not found".to_string()))?;
    if note.author_id != user.id {
        return Err(forbidden("Only the author can edit a note"));
    }
    note.body = edit.body;
    Ok(ok(note.clone()))
}

pub async fn delete_note(State(state): Shared, Extension(user): Extension<User>, Path(id): Path<Uuid>) -> ApiResult<()> {
    let id = NoteId::from_uuid(id);
    let mut data = state.data.write().await;
    for claim in data.claims.values_mut() {
        if let Some(index) = claim.notes.iter().position(|n| n.id == id) {
            if claim.notes[index].author_id != user.id && !user.role.is_supervisory() {
                return Err(forbidden("Only the author can delete a note"));
            }
            claim.notes.remove(index);
            return Ok(ok(()));
        }
    }
    Err(MockApiError::NotFound("Note not found".to_string()))
}

// ============================================================================
// Attachments
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignBody {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub checksum: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub url: String,
    pub fields: HashMap<String, String>,
    pub s3_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadBody {
    pub s3_key: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub checksum: String,
    pub claim_id: ClaimId,
}

pub async fn presign(State(state): Shared, Json(body): Json<PresignBody>) -> ApiResult<PresignedUpload> {
    if body.size > MAX_ATTACHMENT_BYTES {
        return Err(MockApiError::Validation("File is larger than 10 MB".to_string()));
    }
    if body.checksum.len() != 64 {
        return Err(MockApiError::Validation("Checksum must be a SHA-256 hex digest".to_string()));
    }
    let s3_key = format!("claims/{}/{}", Uuid::new_v4(), body.file_name);
    let fields = HashMap::from([
        ("key".to_string(), s3_key.clone()),
        ("Content-Type".to_string(), body.mime_type),
    ]);
    Ok(ok(PresignedUpload {
        url: format!("{}/uploads", state.public_url),
        fields,
        s3_key,
    }))
}

/// Object-storage stand-in: accepts the presigned multipart form
pub async fn upload(State(state): Shared, mut multipart: Multipart) -> Result<StatusCode, MockApiError> {
    let bad = |e: axum::extract::multipart::MultipartError| MockApiError::BadRequest(e.to_string());
    let mut key = None;
    let mut bytes = None;
    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("key") => key = Some(field.text().await.map_err(bad)?),
            Some("file") => bytes = Some(field.bytes().await.map_err(bad)?.to_vec()),
            _ => {}
        }
    }
    let (Some(key), Some(bytes)) = (key, bytes) else {
        return Err(MockApiError::BadRequest("Upload needs a key and a file".to_string()));
    };
    state.data.write().await.uploads.insert(key, bytes);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm_upload(
    State(state): Shared,
    Extension(user): Extension<User>,
    Json(body): Json<ConfirmUploadBody>,
) -> Created<Attachment> {
    let mut data = state.data.write().await;
    let bytes = data
        .uploads
        .get(&body.s3_key)
        .ok_or_else(|| MockApiError::BadRequest("Upload not found".to_string()))?;
    if hex::encode(Sha256::digest(bytes)) != body.checksum {
        return Err(MockApiError::Validation("Checksum mismatch".to_string()));
    }
    if bytes.len() as u64 != body.size {
        return Err(MockApiError::Validation("Size mismatch".to_string()));
    }

    let claim = data.claims.get_mut(&body.claim_id).ok_or_else(claim_not_found)?;
    if !ClaimPermissions::new(Some(&user)).can_view(claim) {
        return Err(forbidden("You do not have access to this claim"));
    }
    let attachment = Attachment {
        id: AttachmentId::new_v7(),
        claim_id: claim.id,
        s3_key: body.s3_key,
        file_name: body.file_name,
        mime_type: body.mime_type,
        size: body.size,
        checksum: body.checksum,
        uploaded_by: user.id,
        created_at: Utc::now(),
    };
    claim.attachments.push(attachment.clone());
    Ok(created(attachment, "Attachment saved"))
}

pub async fn delete_attachment(
    State(state): Shared,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let id = AttachmentId::from_uuid(id);
    let mut data = state.data.write().await;
    let mut removed_key = None;
    for claim in data.claims.values_mut() {
        if let Some(index) = claim.attachments.iter().position(|a| a.id == id) {
            if claim.attachments[index].uploaded_by != user.id && !user.role.is_supervisory() {
                return Err(forbidden("You cannot delete this attachment"));
            }
            removed_key = Some(claim.attachments.remove(index).s3_key);
            break;
        }
    }
    let key = removed_key.ok_or_else(|| MockApiError::NotFound("Attachment not found".to_string()))?;
    data.uploads.remove(&key);
    Ok(ok(()))
}

// ============================================================================
// Reports
// ============================================================================

pub async fn sla_report(
    State(state): Shared,
    Extension(user): Extension<User>,
    RawQuery(raw): RawQuery,
) -> ApiResult<SlaReport> {
    require_supervisory(&user)?;
    let pairs = query_pairs(raw);
    let date = |key: &str| -> Result<Option<NaiveDate>, MockApiError> {
        pairs
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| parse_date(v))
            .transpose()
    };
    let range = ReportRange::new(date("dateFrom")?, date("dateTo")?)?;

    let filters = ClaimFilters::new().between(range.date_from, range.date_to);
    let data = state.data.read().await;
    let claims: Vec<Claim> = data.claims.values().filter(|c| filters.matches(c)).cloned().collect();
    Ok(ok(SlaReport::from_claims(&claims, Utc::now())))
}

pub async fn dashboard(State(state): Shared, Extension(user): Extension<User>) -> ApiResult<DashboardStats> {
    let perms = ClaimPermissions::new(Some(&user));
    let data = state.data.read().await;
    let claims: Vec<Claim> = data.claims.values().filter(|c| perms.can_view(c)).cloned().collect();
    Ok(ok(DashboardStats::from_claims(&claims, Utc::now())))
}
