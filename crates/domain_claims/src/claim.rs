//! Claim aggregate and the records hanging off it

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AssignmentId, AttachmentId, AuditEventId, ClaimId, ClaimItemId, Currency, Money, NoteId, PolicyId,
    UserId,
};
use domain_access::User;

use crate::status::{ClaimStatus, Priority};
use crate::submission::ClaimFormData;

/// Policy a claim is made against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub holder_id: UserId,
    /// Product line, e.g. "Auto Insurance"
    pub product: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl Policy {
    /// Label shown when choosing a policy, e.g. `Auto Insurance - POL-001`
    pub fn option_label(&self) -> String {
        format!("{} - {}", self.product, self.policy_number)
    }

    /// Returns true if the date falls within the policy term
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A single damaged or lost item on a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItem {
    pub id: ClaimItemId,
    pub claim_id: ClaimId,
    pub category: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
}

/// Broad kind of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Pdf,
    Document,
    Spreadsheet,
    Other,
}

impl AttachmentKind {
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else if mime_type.contains("pdf") {
            AttachmentKind::Pdf
        } else if mime_type.contains("word") {
            AttachmentKind::Document
        } else if mime_type.contains("excel") || mime_type.contains("spreadsheet") {
            AttachmentKind::Spreadsheet
        } else {
            AttachmentKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Pdf => "pdf",
            AttachmentKind::Document => "document",
            AttachmentKind::Spreadsheet => "spreadsheet",
            AttachmentKind::Other => "file",
        }
    }
}

/// Supporting document stored with a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    pub claim_id: ClaimId,
    /// Object storage key
    pub s3_key: String,
    pub file_name: String,
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256 of the content
    pub checksum: String,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_mime_type(&self.mime_type)
    }
}

/// Who may read a note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteVisibility {
    /// Visible to the claimant as well as staff
    #[default]
    Public,
    /// Staff only
    Internal,
}

/// Free-text note on a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub claim_id: ClaimId,
    pub author_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    pub body: String,
    pub visibility: NoteVisibility,
    pub created_at: DateTime<Utc>,
}

/// Assignment of a claim to an adjuster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub claim_id: ClaimId,
    pub adjuster_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjuster: Option<User>,
    pub assigned_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub priority: Priority,
}

impl Assignment {
    /// Returns true once the due date has passed
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now
    }
}

/// Entry in a claim's audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub claim_id: ClaimId,
    pub actor_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<User>,
    pub event_type: String,
    #[serde(default)]
    pub payload_json: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Request to assign a claim to an adjuster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub claim_id: ClaimId,
    pub adjuster_id: UserId,
    pub priority: Priority,
}

/// Body of a note to add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub body: String,
    pub visibility: NoteVisibility,
}

/// An insurance claim
///
/// Related records are only present when the backend embeds them, which
/// it does for the detail view but not always for list pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: ClaimId,
    pub policy_id: PolicyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Policy>,
    pub claimant_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant: Option<User>,
    pub incident_date: NaiveDate,
    pub incident_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ClaimStatus,
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub amount_claimed: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub amount_approved: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<ClaimItem>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
    #[serde(default)]
    pub events: Vec<AuditEvent>,
}

impl Claim {
    /// Builds a new draft claim from submitted form data
    pub fn draft_from(form: &ClaimFormData, claimant_id: UserId, now: DateTime<Utc>) -> Self {
        let id = ClaimId::new_v7();
        let items: Vec<ClaimItem> = form
            .items
            .iter()
            .map(|item| ClaimItem {
                id: ClaimItemId::new_v7(),
                claim_id: id,
                category: item.category.as_str().to_string(),
                description: item.description.clone(),
                estimated_cost: item.estimated_cost,
            })
            .collect();
        let amount_claimed = items.iter().map(|item| item.estimated_cost).sum();

        Self {
            id,
            policy_id: form.policy_id,
            policy: None,
            claimant_id,
            claimant: None,
            incident_date: form.incident_date,
            incident_type: form.incident_type.as_str().to_string(),
            description: Some(form.description.clone()),
            status: ClaimStatus::Draft,
            amount_claimed: Some(amount_claimed),
            amount_approved: None,
            currency: Currency::default(),
            created_at: now,
            updated_at: now,
            items,
            attachments: Vec::new(),
            notes: Vec::new(),
            assignment: None,
            events: Vec::new(),
        }
    }

    /// Assignment priority, if the claim is assigned
    pub fn priority(&self) -> Option<Priority> {
        self.assignment.as_ref().map(|a| a.priority)
    }

    /// Assignment due date, if the claim is assigned
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.assignment.as_ref().map(|a| a.due_at)
    }

    /// Returns true if the claim is assigned and past its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.assignment.as_ref().is_some_and(|a| a.is_overdue(now))
    }

    /// Returns true if the claim is assigned to the given adjuster
    pub fn is_assigned_to(&self, adjuster_id: UserId) -> bool {
        self.assignment.as_ref().is_some_and(|a| a.adjuster_id == adjuster_id)
    }

    pub fn amount_claimed_money(&self) -> Option<Money> {
        self.amount_claimed.map(|amount| Money::new(amount, self.currency))
    }

    pub fn amount_approved_money(&self) -> Option<Money> {
        self.amount_approved.map(|amount| Money::new(amount, self.currency))
    }

    /// Sum of the items' estimated costs
    pub fn total_estimated_cost(&self) -> Money {
        let total: Decimal = self.items.iter().map(|item| item.estimated_cost).sum();
        Money::new(total, self.currency)
    }

    /// Claimant's display name, or "Unknown" when not embedded
    pub fn claimant_name(&self) -> &str {
        self.claimant
            .as_ref()
            .map(|c| c.display_name.as_str())
            .unwrap_or("Unknown")
    }

    /// Product of the embedded policy
    pub fn product(&self) -> Option<&str> {
        self.policy.as_ref().map(|p| p.product.as_str())
    }

    /// Notes the viewer may read; internal notes are for staff only
    pub fn visible_notes(&self, staff: bool) -> impl Iterator<Item = &Note> {
        self.notes
            .iter()
            .filter(move |note| staff || note.visibility == NoteVisibility::Public)
    }

    /// Records a status change and appends the matching audit event
    pub fn apply_status(
        &mut self,
        target: ClaimStatus,
        actor_id: UserId,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) {
        let from = self.status;
        self.status = target;
        self.updated_at = now;
        self.events.push(AuditEvent {
            id: AuditEventId::new_v7(),
            claim_id: self.id,
            actor_id,
            actor: None,
            event_type: "STATUS_CHANGED".to_string(),
            payload_json: serde_json::json!({
                "from": from,
                "to": target,
                "reason": reason,
            }),
            created_at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn claim() -> Claim {
        let now = Utc::now();
        Claim {
            id: ClaimId::new(),
            policy_id: PolicyId::new(),
            policy: None,
            claimant_id: UserId::new(),
            claimant: None,
            incident_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            incident_type: "THEFT".to_string(),
            description: None,
            status: ClaimStatus::Submitted,
            amount_claimed: Some(dec!(1500)),
            amount_approved: None,
            currency: Currency::USD,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            attachments: Vec::new(),
            notes: Vec::new(),
            assignment: None,
            events: Vec::new(),
        }
    }

    #[test]
    fn test_unassigned_claim_is_never_overdue() {
        let claim = claim();
        assert!(!claim.is_overdue(Utc::now() + Duration::days(365)));
        assert!(claim.priority().is_none());
    }

    #[test]
    fn test_total_estimated_cost() {
        let mut claim = claim();
        for cost in [dec!(100.50), dec!(49.50)] {
            claim.items.push(ClaimItem {
                id: ClaimItemId::new(),
                claim_id: claim.id,
                category: "ELECTRONICS".to_string(),
                description: "Laptop".to_string(),
                estimated_cost: cost,
            });
        }
        assert_eq!(claim.total_estimated_cost().amount(), dec!(150));
    }

    #[test]
    fn test_claim_wire_format() {
        let claim = claim();
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["status"], "SUBMITTED");
        assert_eq!(json["amountClaimed"], serde_json::json!(1500.0));
        assert!(json.get("amountApproved").is_none());
        assert_eq!(json["currency"], "USD");

        let back: Claim = serde_json::from_value(json).unwrap();
        assert_eq!(back.amount_claimed, Some(dec!(1500)));
    }

    #[test]
    fn test_list_payload_without_relations_deserializes() {
        let json = serde_json::json!({
            "id": "0190a0e4-5d6f-7c3b-8f00-000000000001",
            "policyId": "0190a0e4-5d6f-7c3b-8f00-000000000002",
            "claimantId": "0190a0e4-5d6f-7c3b-8f00-000000000003",
            "incidentDate": "2024-02-10",
            "incidentType": "FIRE",
            "status": "IN_REVIEW",
            "currency": "USD",
            "createdAt": "2024-02-11T09:00:00Z",
            "updatedAt": "2024-02-12T09:00:00Z"
        });
        let claim: Claim = serde_json::from_value(json).unwrap();
        assert_eq!(claim.status, ClaimStatus::InReview);
        assert!(claim.items.is_empty());
        assert!(claim.amount_claimed.is_none());
        assert_eq!(claim.claimant_name(), "Unknown");
    }

    #[test]
    fn test_apply_status_records_event() {
        let mut claim = claim();
        let actor = UserId::new();
        claim.apply_status(ClaimStatus::InReview, actor, Some("picked up"), Utc::now());

        assert_eq!(claim.status, ClaimStatus::InReview);
        let event = claim.events.last().unwrap();
        assert_eq!(event.event_type, "STATUS_CHANGED");
        assert_eq!(event.payload_json["from"], "SUBMITTED");
        assert_eq!(event.payload_json["to"], "IN_REVIEW");
    }

    #[test]
    fn test_attachment_kind() {
        assert_eq!(AttachmentKind::from_mime_type("image/png"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_mime_type("application/pdf"), AttachmentKind::Pdf);
        assert_eq!(
            AttachmentKind::from_mime_type("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            AttachmentKind::Document
        );
        assert_eq!(AttachmentKind::from_mime_type("text/plain"), AttachmentKind::Other);
    }
}
