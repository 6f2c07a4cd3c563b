use reqwest::Method;

use domain_claims::{DashboardStats, ReportRange, SlaReport};

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn sla_report(&self, range: &ReportRange) -> Result<SlaReport, ApiError> {
        let request = self
            .request(Method::GET, "/reports/sla")
            .await
            .query(&range.to_query_pairs());
        self.data(request).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let request = self.request(Method::GET, "/reports/dashboard").await;
        self.data(request).await
    }
}
