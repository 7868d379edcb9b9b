// Door event log endpoint

use tracing::debug;

use crate::client::LockClient;
use crate::error::Error;
use crate::models::LogsPage;

impl LockClient {
    /// List one page of door events, newest first.
    ///
    /// `GET /api/logs?page={page}&per_page={per_page}`
    pub async fn list_logs(&self, page: u32, per_page: u32) -> Result<LogsPage, Error> {
        let mut url = self.api_url("logs")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .append_pair("per_page", &per_page.to_string());
        debug!(page, per_page, "listing logs");
        self.get(url).await
    }
}
