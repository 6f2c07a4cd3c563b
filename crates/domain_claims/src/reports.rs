//! SLA and dashboard reporting

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::error::ClaimError;
use crate::status::ClaimStatus;

/// Statuses that count as decided for cycle-time purposes
const DECIDED: [ClaimStatus; 4] = [
    ClaimStatus::Approved,
    ClaimStatus::Rejected,
    ClaimStatus::Paid,
    ClaimStatus::Closed,
];

/// Mean days from creation to last update over decided claims, to one decimal
fn average_cycle_days<'a>(claims: impl IntoIterator<Item = &'a Claim>) -> f64 {
    let durations: Vec<f64> = claims
        .into_iter()
        .filter(|c| DECIDED.contains(&c.status))
        .map(|c| (c.updated_at - c.created_at).num_minutes() as f64 / (60.0 * 24.0))
        .collect();
    if durations.is_empty() {
        return 0.0;
    }
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// SLA compliance for a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaReport {
    pub total_claims: u64,
    pub on_time: u64,
    pub overdue: u64,
    /// Average days from submission to decision
    pub average_cycle_time: f64,
    #[serde(default)]
    pub breaches_by_product: BTreeMap<String, u64>,
}

impl SlaReport {
    /// Computes the report from claims already restricted to the range
    pub fn from_claims(claims: &[Claim], now: DateTime<Utc>) -> Self {
        let overdue: Vec<&Claim> = claims.iter().filter(|c| c.is_overdue(now)).collect();
        let mut breaches_by_product = BTreeMap::new();
        for claim in &overdue {
            *breaches_by_product
                .entry(claim.product().unwrap_or("Unknown").to_string())
                .or_insert(0) += 1;
        }
        Self {
            total_claims: claims.len() as u64,
            on_time: (claims.len() - overdue.len()) as u64,
            overdue: overdue.len() as u64,
            average_cycle_time: average_cycle_days(claims),
            breaches_by_product,
        }
    }

    /// Share of claims handled on time, in percent; None without claims
    pub fn on_time_percentage(&self) -> Option<f64> {
        if self.total_claims == 0 {
            return None;
        }
        Some(self.on_time as f64 / self.total_claims as f64 * 100.0)
    }

    /// e.g. `87.5%`, or `n/a` without claims
    pub fn on_time_label(&self) -> String {
        match self.on_time_percentage() {
            Some(pct) => format!("{:.1}%", pct),
            None => "n/a".to_string(),
        }
    }

    /// Products by breach count, worst first
    pub fn breaches_ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .breaches_by_product
            .iter()
            .map(|(product, count)| (product.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_claims: u64,
    pub pending_review: u64,
    pub approved_today: u64,
    pub overdue_assignments: u64,
    /// Days
    pub average_processing_time: f64,
}

/// A titled number on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

impl DashboardStats {
    pub fn from_claims(claims: &[Claim], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let count = |pred: &dyn Fn(&Claim) -> bool| claims.iter().filter(|c| pred(*c)).count() as u64;
        Self {
            total_claims: claims.len() as u64,
            pending_review: count(&|c| matches!(c.status, ClaimStatus::Submitted | ClaimStatus::InReview)),
            approved_today: count(&|c| c.status == ClaimStatus::Approved && c.updated_at.date_naive() == today),
            overdue_assignments: count(&|c| c.is_overdue(now)),
            average_processing_time: average_cycle_days(claims),
        }
    }

    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                title: "Total Claims",
                value: self.total_claims.to_string(),
            },
            StatCard {
                title: "Pending Review",
                value: self.pending_review.to_string(),
            },
            StatCard {
                title: "Approved Today",
                value: self.approved_today.to_string(),
            },
            StatCard {
                title: "Overdue",
                value: self.overdue_assignments.to_string(),
            },
        ]
    }
}

/// Date range for the SLA report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportRange {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ReportRange {
    pub fn new(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Result<Self, ClaimError> {
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                return Err(ClaimError::InvalidDateRange);
            }
        }
        Ok(Self { date_from, date_to })
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom", from.to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo", to.to_string()));
        }
        pairs
    }
}

/// Report views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportKind {
    #[default]
    Overview,
    Sla,
    Financial,
    Trends,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [ReportKind::Overview, ReportKind::Sla, ReportKind::Financial, ReportKind::Trends];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::Sla => "sla",
            ReportKind::Financial => "financial",
            ReportKind::Trends => "trends",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Overview => "Overview",
            ReportKind::Sla => "SLA Performance",
            ReportKind::Financial => "Financial Summary",
            ReportKind::Trends => "Trends Analysis",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown report: {}", s))
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders the SLA report (and dashboard numbers, when given) as `metric,value` CSV
pub fn export_csv(sla: &SlaReport, stats: Option<&DashboardStats>) -> String {
    let mut rows: Vec<(String, String)> = vec![
        ("total_claims".to_string(), sla.total_claims.to_string()),
        ("on_time".to_string(), sla.on_time.to_string()),
        ("overdue".to_string(), sla.overdue.to_string()),
        (
            "on_time_percentage".to_string(),
            sla.on_time_percentage().map(|p| format!("{:.1}", p)).unwrap_or_default(),
        ),
        ("average_cycle_time_days".to_string(), format!("{:.1}", sla.average_cycle_time)),
    ];
    for (product, count) in sla.breaches_ranked() {
        rows.push((format!("breaches:{}", product), count.to_string()));
    }
    if let Some(stats) = stats {
        rows.push(("pending_review".to_string(), stats.pending_review.to_string()));
        rows.push(("approved_today".to_string(), stats.approved_today.to_string()));
        rows.push(("overdue_assignments".to_string(), stats.overdue_assignments.to_string()));
        rows.push((
            "average_processing_time_days".to_string(),
            format!("{:.1}", stats.average_processing_time),
        ));
    }

    let mut out = String::from("metric,value\n");
    for (metric, value) in rows {
        out.push_str(&csv_field(&metric));
        out.push(',');
        out.push_str(&csv_field(&value));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sla() -> SlaReport {
        SlaReport {
            total_claims: 40,
            on_time: 35,
            overdue: 5,
            average_cycle_time: 4.25,
            breaches_by_product: BTreeMap::from([
                ("Auto".to_string(), 1),
                ("Home, Contents".to_string(), 3),
                ("Renters".to_string(), 1),
            ]),
        }
    }

    #[test]
    fn test_on_time_percentage() {
        assert_eq!(sla().on_time_label(), "87.5%");
        assert_eq!(SlaReport::default().on_time_percentage(), None);
        assert_eq!(SlaReport::default().on_time_label(), "n/a");
    }

    #[test]
    fn test_breaches_ranked() {
        let report = sla();
        assert_eq!(report.breaches_ranked(), vec![("Home, Contents", 3), ("Auto", 1), ("Renters", 1)]);
    }

    #[test]
    fn test_report_range_rejects_inverted_dates() {
        let early = NaiveDate::from_ymd_opt(2024, 1, 1);
        let late = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(ReportRange::new(late, early).is_err());

        let range = ReportRange::new(early, late).unwrap();
        assert_eq!(
            range.to_query_pairs(),
            vec![("dateFrom", "2024-01-01".to_string()), ("dateTo", "2024-02-01".to_string())]
        );
    }

    #[test]
    fn test_export_csv() {
        let csv = export_csv(&sla(), None);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "metric,value");
        assert!(lines.contains(&"on_time_percentage,87.5"));
        assert!(lines.contains(&"\"breaches:Home, Contents\",3"));
        assert!(!csv.contains("pending_review"));

        let stats = DashboardStats {
            pending_review: 7,
            ..DashboardStats::default()
        };
        assert!(export_csv(&sla(), Some(&stats)).contains("pending_review,7\n"));
    }

    #[test]
    fn test_sla_wire_format() {
        let json = serde_json::json!({
            "totalClaims": 10,
            "onTime": 9,
            "overdue": 1,
            "averageCycleTime": 3.5,
            "breachesByProduct": { "Auto": 1 }
        });
        let report: SlaReport = serde_json::from_value(json).unwrap();
        assert_eq!(report.breaches_by_product.get("Auto"), Some(&1));
        assert_eq!("SLA".parse::<ReportKind>().unwrap(), ReportKind::Sla);
    }

    #[test]
    fn test_from_claims() {
        use crate::claim::{Assignment, Policy};
        use crate::status::Priority;
        use chrono::Duration;
        use core_kernel::{AssignmentId, ClaimId, Currency, PolicyId, UserId};

        let now = Utc::now();
        let claim = |status: ClaimStatus, age_days: i64, due_in_days: Option<i64>| {
            let id = ClaimId::new();
            let created = now - Duration::days(age_days);
            let policy_id = PolicyId::new();
            Claim {
                id,
                policy_id,
                policy: Some(Policy {
                    id: policy_id,
                    policy_number: "POL-001".to_string(),
                    holder_id: UserId::new(),
                    product: "Auto Insurance".to_string(),
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                    status: "ACTIVE".to_string(),
                }),
                claimant_id: UserId::new(),
                claimant: None,
                incident_date: created.date_naive(),
                incident_type: "THEFT".to_string(),
                description: None,
                status,
                amount_claimed: None,
                amount_approved: None,
                currency: Currency::USD,
                created_at: created,
                updated_at: now,
                items: Vec::new(),
                attachments: Vec::new(),
                notes: Vec::new(),
                assignment: due_in_days.map(|d| Assignment {
                    id: AssignmentId::new(),
                    claim_id: id,
                    adjuster_id: UserId::new(),
                    adjuster: None,
                    assigned_at: created,
                    due_at: now + Duration::days(d),
                    priority: Priority::Medium,
                }),
                events: Vec::new(),
            }
        };
        let claims = vec![
            claim(ClaimStatus::Approved, 4, None),
            claim(ClaimStatus::InReview, 2, Some(-1)),
            claim(ClaimStatus::Submitted, 1, Some(2)),
            claim(ClaimStatus::Closed, 2, None),
        ];

        let sla = SlaReport::from_claims(&claims, now);
        assert_eq!(sla.total_claims, 4);
        assert_eq!(sla.overdue, 1);
        assert_eq!(sla.on_time, 3);
        assert_eq!(sla.average_cycle_time, 3.0);
        assert_eq!(sla.breaches_ranked(), vec![("Auto Insurance", 1)]);

        let stats = DashboardStats::from_claims(&claims, now);
        assert_eq!(stats.pending_review, 2);
        assert_eq!(stats.approved_today, 1);
        assert_eq!(stats.overdue_assignments, 1);
    }
}
