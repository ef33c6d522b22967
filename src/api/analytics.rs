use super::ApiClient;
use crate::error::ApiError;
use crate::models::HostSummary;

impl ApiClient {
    /// Dashboard numbers for the signed-in host.
    pub async fn host_summary(&self) -> Result<HostSummary, ApiError> {
        self.http.get("/analytics/host").await
    }
}
