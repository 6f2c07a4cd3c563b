//! New-claim submission wizard
//!
//! The wizard walks the claimant through five steps. Moving forward only
//! validates the fields owned by the current step; `submit` validates the
//! whole draft and hands back the payload plus the files to upload.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use validator::{Validate, ValidationError};

use core_kernel::{Currency, Money, PolicyId};
use domain_access::FormErrors;

use crate::claim::Claim;
use crate::error::ClaimError;

/// Largest file accepted as an attachment (10 MB)
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted MIME types and the extensions that go with them
pub const ACCEPTED_FILE_TYPES: [(&str, &[&str]); 6] = [
    ("image/jpeg", &["jpeg", "jpg"]),
    ("image/png", &["png"]),
    ("image/gif", &["gif"]),
    ("application/pdf", &["pdf"]),
    ("application/msword", &["doc"]),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &["docx"],
    ),
];

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Policy = 1,
    Incident,
    Items,
    Documents,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Policy,
        WizardStep::Incident,
        WizardStep::Items,
        WizardStep::Documents,
        WizardStep::Review,
    ];

    /// 1-based position
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Policy => "Policy Information",
            WizardStep::Incident => "Incident Details",
            WizardStep::Items => "Claim Items",
            WizardStep::Documents => "Documents",
            WizardStep::Review => "Review",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::Policy => "Select your policy",
            WizardStep::Incident => "Describe what happened",
            WizardStep::Items => "List damaged items",
            WizardStep::Documents => "Upload supporting documents",
            WizardStep::Review => "Review and submit",
        }
    }

    /// Draft fields validated before leaving this step
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            WizardStep::Policy => &["policy_id"],
            WizardStep::Incident => &["incident_date", "incident_type", "description"],
            WizardStep::Items => &["items"],
            WizardStep::Documents | WizardStep::Review => &[],
        }
    }

    /// Following step, staying on Review at the end
    pub fn next(&self) -> WizardStep {
        match self {
            WizardStep::Policy => WizardStep::Incident,
            WizardStep::Incident => WizardStep::Items,
            WizardStep::Items => WizardStep::Documents,
            WizardStep::Documents | WizardStep::Review => WizardStep::Review,
        }
    }

    /// Preceding step, staying on Policy at the start
    pub fn previous(&self) -> WizardStep {
        match self {
            WizardStep::Policy | WizardStep::Incident => WizardStep::Policy,
            WizardStep::Items => WizardStep::Incident,
            WizardStep::Documents => WizardStep::Items,
            WizardStep::Review => WizardStep::Documents,
        }
    }
}

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted) || v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

labelled_enum!(
    /// What happened
    IncidentType {
        AutoAccident => ("AUTO_ACCIDENT", "Auto Accident"),
        PropertyDamage => ("PROPERTY_DAMAGE", "Property Damage"),
        Theft => ("THEFT", "Theft"),
        Fire => ("FIRE", "Fire"),
        WaterDamage => ("WATER_DAMAGE", "Water Damage"),
        Vandalism => ("VANDALISM", "Vandalism"),
        Other => ("OTHER", "Other"),
    }
);

labelled_enum!(
    /// Category of a claimed item
    ItemCategory {
        Vehicle => ("VEHICLE", "Vehicle"),
        Electronics => ("ELECTRONICS", "Electronics"),
        Furniture => ("FURNITURE", "Furniture"),
        Jewelry => ("JEWELRY", "Jewelry"),
        Clothing => ("CLOTHING", "Clothing"),
        Other => ("OTHER", "Other"),
    }
);

fn non_negative_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(ValidationError::new("range").with_message(Cow::Borrowed("Cost must be positive")));
    }
    Ok(())
}

/// Item row being filled in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ClaimItemDraft {
    #[validate(required(message = "Category is required"))]
    pub category: Option<ItemCategory>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "non_negative_cost"))]
    pub estimated_cost: Decimal,
}

/// Claim being filled in
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ClaimDraft {
    #[validate(required(message = "Policy is required"))]
    pub policy_id: Option<PolicyId>,
    #[validate(required(message = "Incident date is required"))]
    pub incident_date: Option<NaiveDate>,
    #[validate(required(message = "Incident type is required"))]
    pub incident_type: Option<IncidentType>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<ClaimItemDraft>,
}

impl Default for ClaimDraft {
    /// Starts with one blank item row
    fn default() -> Self {
        Self {
            policy_id: None,
            incident_date: None,
            incident_type: None,
            description: String::new(),
            items: vec![ClaimItemDraft::default()],
        }
    }
}

impl ClaimDraft {
    /// Every field error, with item errors keyed `items.<index>.<field>`
    pub fn errors(&self) -> FormErrors {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(&e),
        };
        for (index, item) in self.items.iter().enumerate() {
            if let Err(e) = item.validate() {
                errors.merge_prefixed(&format!("items.{}", index), &e);
            }
        }
        errors
    }

    /// Errors for the fields owned by one step
    pub fn validate_step(&self, step: WizardStep) -> Result<(), FormErrors> {
        let mut errors = self.errors();
        errors.retain_fields(step.fields());
        errors.into_result()
    }

    /// Sum of the item estimates
    pub fn total_estimated_cost(&self) -> Money {
        let total: Decimal = self.items.iter().map(|item| item.estimated_cost).sum();
        Money::new(total, Currency::default())
    }
}

/// File picked for upload, with its size and checksum
#[derive(Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    /// Hex SHA-256 of the content
    pub checksum: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PendingAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAttachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .field("checksum", &self.checksum)
            .finish()
    }
}

impl PendingAttachment {
    pub fn from_bytes(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let checksum = hex::encode(Sha256::digest(&bytes));
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            checksum,
            bytes,
        }
    }

    /// Lower-cased extension of the file name
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Checks the file type and size limit
    ///
    /// A file is accepted when either its MIME type or its extension is on
    /// the accepted list.
    pub fn check(&self) -> Result<(), ClaimError> {
        let extension = self.extension();
        let type_ok = ACCEPTED_FILE_TYPES.iter().any(|(mime, extensions)| {
            self.mime_type.eq_ignore_ascii_case(mime)
                || extension.as_deref().is_some_and(|ext| extensions.contains(&ext))
        });
        if !type_ok {
            return Err(ClaimError::AttachmentRejected {
                file_name: self.file_name.clone(),
                reason: "File type not accepted".to_string(),
            });
        }
        if self.size > MAX_ATTACHMENT_BYTES {
            return Err(ClaimError::AttachmentRejected {
                file_name: self.file_name.clone(),
                reason: "File is larger than 10 MB".to_string(),
            });
        }
        Ok(())
    }
}

/// MIME type guessed from a file name's extension
pub fn mime_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    ACCEPTED_FILE_TYPES
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension.as_str()))
        .map(|(mime, _)| *mime)
        .unwrap_or("application/octet-stream")
}

/// Item as sent when creating a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClaimItem {
    pub category: ItemCategory,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
}

/// Body of the create-claim request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFormData {
    pub policy_id: PolicyId,
    pub incident_date: NaiveDate,
    pub incident_type: IncidentType,
    pub description: String,
    pub items: Vec<NewClaimItem>,
}

/// Partial edit of a claim; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<PolicyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClaimUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ClaimUpdate::default()
    }

    /// Applies the update to a claim in place
    pub fn apply_to(&self, claim: &mut Claim, now: DateTime<Utc>) {
        if let Some(policy_id) = self.policy_id {
            if claim.policy_id != policy_id {
                claim.policy = None;
            }
            claim.policy_id = policy_id;
        }
        if let Some(date) = self.incident_date {
            claim.incident_date = date;
        }
        if let Some(incident_type) = self.incident_type {
            claim.incident_type = incident_type.as_str().to_string();
        }
        if let Some(description) = &self.description {
            claim.description = Some(description.clone());
        }
        claim.updated_at = now;
    }
}

/// Validated claim and the files to upload once it exists
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimSubmission {
    pub form: ClaimFormData,
    pub attachments: Vec<PendingAttachment>,
}

/// Stateful wizard
#[derive(Debug, Clone)]
pub struct ClaimWizard {
    step: WizardStep,
    draft: ClaimDraft,
    attachments: Vec<PendingAttachment>,
}

impl Default for ClaimWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Policy,
            draft: ClaimDraft::default(),
            attachments: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ClaimDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ClaimDraft {
        &mut self.draft
    }

    pub fn attachments(&self) -> &[PendingAttachment] {
        &self.attachments
    }

    /// Validates the current step and moves on
    pub fn next(&mut self) -> Result<WizardStep, FormErrors> {
        self.draft.validate_step(self.step)?;
        self.step = self.step.next();
        debug!(step = self.step.number(), "Wizard advanced");
        Ok(self.step)
    }

    pub fn previous(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    /// Appends a blank item row and returns its index
    pub fn add_item(&mut self) -> usize {
        self.draft.items.push(ClaimItemDraft::default());
        self.draft.items.len() - 1
    }

    pub fn remove_item(&mut self, index: usize) -> Option<ClaimItemDraft> {
        (index < self.draft.items.len()).then(|| self.draft.items.remove(index))
    }

    /// Adds a file after checking its type and size
    pub fn attach(&mut self, file: PendingAttachment) -> Result<(), ClaimError> {
        file.check()?;
        debug!(file_name = %file.file_name, size = file.size, "Attachment accepted");
        self.attachments.push(file);
        Ok(())
    }

    pub fn detach(&mut self, index: usize) -> Option<PendingAttachment> {
        (index < self.attachments.len()).then(|| self.attachments.remove(index))
    }

    /// Validates everything and produces the create-claim payload
    pub fn submit(&self) -> Result<ClaimSubmission, FormErrors> {
        self.draft.errors().into_result()?;

        let mut errors = FormErrors::new();
        let (Some(policy_id), Some(incident_date), Some(incident_type)) =
            (self.draft.policy_id, self.draft.incident_date, self.draft.incident_type)
        else {
            errors.insert("form", "Claim is incomplete");
            return Err(errors);
        };

        let mut items = Vec::with_capacity(self.draft.items.len());
        for (index, item) in self.draft.items.iter().enumerate() {
            match item.category {
                Some(category) => items.push(NewClaimItem {
                    category,
                    description: item.description.clone(),
                    estimated_cost: item.estimated_cost,
                }),
                None => errors.insert(format!("items.{}.category", index), "Category is required"),
            }
        }
        errors.into_result()?;

        Ok(ClaimSubmission {
            form: ClaimFormData {
                policy_id,
                incident_date,
                incident_type,
                description: self.draft.description.clone(),
                items,
            },
            attachments: self.attachments.clone(),
        })
    }
}
