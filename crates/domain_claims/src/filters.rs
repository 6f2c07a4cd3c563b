//! Claim list filters, query encoding, and pagination

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

use crate::claim::Claim;
use crate::status::{ClaimStatus, Priority};

/// Filters applied to the claim list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<ClaimStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priority: Vec<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ClaimFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status.push(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority.push(priority);
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product.push(product.into());
        self
    }

    pub fn assigned_to(mut self, adjuster_id: UserId) -> Self {
        self.assigned_to = Some(adjuster_id);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Sets the search term; blank input clears it
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() { None } else { Some(search) };
        self
    }

    /// Returns true if no filter is set
    pub fn is_empty(&self) -> bool {
        *self == ClaimFilters::default()
    }

    /// Query pairs for the filter keys; list values repeat the key
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for status in &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        for product in &self.product {
            pairs.push(("product", product.clone()));
        }
        for priority in &self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(adjuster) = &self.assigned_to {
            pairs.push(("assignedTo", adjuster.as_uuid().to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom", from.to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo", to.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }

    /// Applies the filters to a claim held in memory
    pub fn matches(&self, claim: &Claim) -> bool {
        if !self.status.is_empty() && !self.status.contains(&claim.status) {
            return false;
        }
        if !self.product.is_empty() && !claim.product().is_some_and(|p| self.product.iter().any(|f| f == p)) {
            return false;
        }
        if !self.priority.is_empty() && !claim.priority().is_some_and(|p| self.priority.contains(&p)) {
            return false;
        }
        if let Some(adjuster) = self.assigned_to {
            if !claim.is_assigned_to(adjuster) {
                return false;
            }
        }
        let created = claim.created_at.date_naive();
        if self.date_from.is_some_and(|from| created < from) || self.date_to.is_some_and(|to| created > to) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => search_matches(claim, &term.to_lowercase()),
            None => true,
        }
    }
}

fn search_matches(claim: &Claim, needle: &str) -> bool {
    let mut haystacks = vec![
        claim.id.as_uuid().to_string(),
        claim.incident_type.to_lowercase(),
        claim.claimant_name().to_lowercase(),
    ];
    if let Some(description) = &claim.description {
        haystacks.push(description.to_lowercase());
    }
    if let Some(policy) = &claim.policy {
        haystacks.push(policy.policy_number.to_lowercase());
    }
    haystacks.iter().any(|h| h.contains(needle))
}

/// Filters plus the requested page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    pub filters: ClaimFilters,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ClaimQuery {
    pub fn new(filters: ClaimFilters) -> Self {
        Self {
            filters,
            page: None,
            limit: None,
        }
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// `page` and `limit` first (zero is omitted), then the filter keys
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs.extend(self.filters.to_query_pairs());
        pairs
    }
}

/// One page of results as returned by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slices a full result set into the requested page (1-based)
    pub fn paginate(items: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = items.len() as u64;
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let skip = ((page - 1) as usize).saturating_mul(limit as usize);
        let data = items.into_iter().skip(skip).take(limit as usize).collect();
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Paging state of the claim list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    /// First and last row shown (1-based) and the total; None when the page is empty
    pub fn showing(&self) -> Option<(u64, u64, u64)> {
        let limit = u64::from(self.limit);
        let from = u64::from(self.page.saturating_sub(1)) * limit + 1;
        if self.total == 0 || limit == 0 || from > self.total {
            return None;
        }
        let to = (u64::from(self.page) * limit).min(self.total);
        Some((from, to, self.total))
    }

    /// e.g. `Showing 11 to 20 of 42 results`
    pub fn summary(&self) -> String {
        match self.showing() {
            Some((from, to, total)) => format!("Showing {} to {} of {} results", from, to, total),
            None => "No results".to_string(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_multi_page(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_order_and_repetition() {
        let adjuster = UserId::new();
        let query = ClaimQuery::new(
            ClaimFilters::new()
                .with_status(ClaimStatus::Submitted)
                .with_status(ClaimStatus::InReview)
                .with_priority(Priority::Urgent)
                .assigned_to(adjuster)
                .with_search("water"),
        )
        .page(2, 10);

        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
                ("status", "SUBMITTED".to_string()),
                ("status", "IN_REVIEW".to_string()),
                ("priority", "URGENT".to_string()),
                ("assignedTo", adjuster.as_uuid().to_string()),
                ("search", "water".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_page_and_blank_search_are_omitted() {
        let query = ClaimQuery::new(ClaimFilters::new().with_search("  ")).page(0, 0);
        assert!(query.to_query_pairs().is_empty());
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_showing_range() {
        let pagination = Pagination {
            page: 5,
            limit: 10,
            total: 42,
            total_pages: 5,
        };
        assert_eq!(pagination.showing(), Some((41, 42, 42)));
        assert_eq!(pagination.summary(), "Showing 41 to 42 of 42 results");
        assert!(pagination.has_previous());
        assert!(!pagination.has_next());
        assert_eq!(Pagination::default().showing(), None);
    }

    #[test]
    fn test_page_past_the_end_shows_nothing() {
        let pagination = Pagination {
            page: 6,
            limit: 10,
            total: 42,
            total_pages: 5,
        };
        assert_eq!(pagination.showing(), None);
        assert_eq!(pagination.summary(), "No results");
    }

    #[test]
    fn test_paginate() {
        let page = Page::paginate((1..=23).collect::<Vec<u32>>(), 3, 10);
        assert_eq!(page.data, vec![21, 22, 23]);
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);

        let beyond = Page::paginate(vec![1, 2], 4, 10);
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total_pages, 1);
    }
}
