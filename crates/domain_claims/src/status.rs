//! Claim status and assignment priority

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Started by the claimant, not yet sent
    Draft,
    Submitted,
    InReview,
    /// Waiting on the claimant for more information
    InfoRequested,
    Approved,
    Rejected,
    Paid,
    Closed,
}

impl ClaimStatus {
    /// All statuses in lifecycle order
    pub const ALL: [ClaimStatus; 8] = [
        ClaimStatus::Draft,
        ClaimStatus::Submitted,
        ClaimStatus::InReview,
        ClaimStatus::InfoRequested,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Paid,
        ClaimStatus::Closed,
    ];

    /// Wire name, e.g. `IN_REVIEW`
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "DRAFT",
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::InReview => "IN_REVIEW",
            ClaimStatus::InfoRequested => "INFO_REQUESTED",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::Paid => "PAID",
            ClaimStatus::Closed => "CLOSED",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "Draft",
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::InReview => "In Review",
            ClaimStatus::InfoRequested => "Info Requested",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Paid => "Paid",
            ClaimStatus::Closed => "Closed",
        }
    }

    /// Badge colour used when rendering the status
    pub fn tone(&self) -> &'static str {
        match self {
            ClaimStatus::Draft | ClaimStatus::Closed => "gray",
            ClaimStatus::Submitted => "blue",
            ClaimStatus::InReview => "yellow",
            ClaimStatus::InfoRequested => "orange",
            ClaimStatus::Approved => "green",
            ClaimStatus::Rejected => "red",
            ClaimStatus::Paid => "emerald",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    /// Accepts the wire name or the label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ClaimStatus::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(wanted) || status.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown claim status: {}", s))
    }
}

/// Urgency of an assignment
///
/// Variants are declared from least to most urgent, so the derived
/// ordering ranks priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    /// Numeric rank, 0 for `Low` up to 3 for `Urgent`
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            Priority::Low => "green",
            Priority::Medium => "yellow",
            Priority::High => "orange",
            Priority::Urgent => "red",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown priority: {}", s))
    }
}
