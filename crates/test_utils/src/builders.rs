//! Test Data Builders
//!
//! Builders with sensible defaults so tests only spell out the fields
//! they care about.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use core_kernel::{AssignmentId, ClaimId, ClaimItemId, Currency, PolicyId, UserId};
use domain_access::{User, UserRole};
use domain_claims::submission::NewClaimItem;
use domain_claims::{
    Assignment, Claim, ClaimFormData, ClaimItem, ClaimStatus, IncidentType, ItemCategory, Policy, Priority,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{PolicyFixtures, StringFixtures, TemporalFixtures, UserFixtures};

/// Builder for users
pub struct UserBuilder {
    id: UserId,
    email: String,
    role: UserRole,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl Default for UserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UserBuilder {
    pub fn new() -> Self {
        Self {
            id: UserId::new_v7(),
            email: "user@claims.test".to_string(),
            role: UserRole::Policyholder,
            display_name: "Test User".to_string(),
            created_at: TemporalFixtures::now(),
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn build(self) -> User {
        User {
            id: self.id,
            email: self.email,
            role: self.role,
            display_name: self.display_name,
            created_at: self.created_at,
        }
    }
}

/// Builder for claims
///
/// Defaults to a submitted fire claim on the fixture home policy, filed
/// by the fixture policyholder, with no assignment.
pub struct ClaimBuilder {
    id: ClaimId,
    policy: Policy,
    claimant: User,
    status: ClaimStatus,
    incident_date: NaiveDate,
    incident_type: IncidentType,
    description: String,
    items: Vec<(ItemCategory, String, Decimal)>,
    assignment: Option<(UserId, Priority, DateTime<Utc>)>,
    created_at: DateTime<Utc>,
    embed_relations: bool,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    pub fn new() -> Self {
        Self {
            id: ClaimId::new_v7(),
            policy: PolicyFixtures::home(),
            claimant: UserFixtures::policyholder(),
            status: ClaimStatus::Submitted,
            incident_date: TemporalFixtures::incident_date(),
            incident_type: IncidentType::Fire,
            description: StringFixtures::incident_description().to_string(),
            items: Vec::new(),
            assignment: None,
            created_at: TemporalFixtures::now(),
            embed_relations: true,
        }
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_claimant(mut self, claimant: User) -> Self {
        self.claimant = claimant;
        self
    }

    pub fn with_incident(mut self, incident_type: IncidentType, date: NaiveDate) -> Self {
        self.incident_type = incident_type;
        self.incident_date = date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_item(mut self, category: ItemCategory, description: impl Into<String>, cost: Decimal) -> Self {
        self.items.push((category, description.into(), cost));
        self
    }

    /// Assigns the claim, due `due_in` after creation
    pub fn assigned_to(mut self, adjuster_id: UserId, priority: Priority, due_in: Duration) -> Self {
        self.assignment = Some((adjuster_id, priority, self.created_at + due_in));
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        if let Some((_, _, due)) = self.assignment.as_mut() {
            *due = at + (*due - self.created_at);
        }
        self.created_at = at;
        self
    }

    /// Leaves the policy and claimant out, as list endpoints may
    pub fn without_relations(mut self) -> Self {
        self.embed_relations = false;
        self
    }

    pub fn build(self) -> Claim {
        let items: Vec<ClaimItem> = self
            .items
            .into_iter()
            .map(|(category, description, estimated_cost)| ClaimItem {
                id: ClaimItemId::new_v7(),
                claim_id: self.id,
                category: category.as_str().to_string(),
                description,
                estimated_cost,
            })
            .collect();
        let amount_claimed: Option<Decimal> = (!items.is_empty()).then(|| items.iter().map(|i| i.estimated_cost).sum());
        let amount_approved = matches!(self.status, ClaimStatus::Approved | ClaimStatus::Paid | ClaimStatus::Closed)
            .then_some(amount_claimed)
            .flatten();

        Claim {
            id: self.id,
            policy_id: self.policy.id,
            policy: self.embed_relations.then_some(self.policy),
            claimant_id: self.claimant.id,
            claimant: self.embed_relations.then_some(self.claimant),
            incident_date: self.incident_date,
            incident_type: self.incident_type.as_str().to_string(),
            description: Some(self.description),
            status: self.status,
            amount_claimed,
            amount_approved,
            currency: Currency::USD,
            created_at: self.created_at,
            updated_at: self.created_at,
            items,
            attachments: Vec::new(),
            notes: Vec::new(),
            assignment: self.assignment.map(|(adjuster_id, priority, due_at)| Assignment {
                id: AssignmentId::new_v7(),
                claim_id: self.id,
                adjuster_id,
                adjuster: None,
                assigned_at: self.created_at,
                due_at,
                priority,
            }),
            events: Vec::new(),
        }
    }
}

/// Builder for create-claim payloads
pub struct ClaimFormBuilder {
    policy_id: PolicyId,
    incident_date: NaiveDate,
    incident_type: IncidentType,
    description: String,
    items: Vec<NewClaimItem>,
}

impl Default for ClaimFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimFormBuilder {
    pub fn new() -> Self {
        Self {
            policy_id: PolicyFixtures::home().id,
            incident_date: TemporalFixtures::incident_date(),
            incident_type: IncidentType::WaterDamage,
            description: StringFixtures::incident_description().to_string(),
            items: vec![NewClaimItem {
                category: ItemCategory::Furniture,
                description: "Sofa".to_string(),
                estimated_cost: dec!(1200),
            }],
        }
    }

    pub fn with_policy_id(mut self, policy_id: PolicyId) -> Self {
        self.policy_id = policy_id;
        self
    }

    pub fn with_incident_type(mut self, incident_type: IncidentType) -> Self {
        self.incident_type = incident_type;
        self
    }

    pub fn with_item(mut self, category: ItemCategory, description: impl Into<String>, cost: Decimal) -> Self {
        self.items.push(NewClaimItem {
            category,
            description: description.into(),
            estimated_cost: cost,
        });
        self
    }

    pub fn build(self) -> ClaimFormData {
        ClaimFormData {
            policy_id: self.policy_id,
            incident_date: self.incident_date,
            incident_type: self.incident_type,
            description: self.description,
            items: self.items,
        }
    }
}
