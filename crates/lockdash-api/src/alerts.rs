// Alert endpoints
//
// Listing, resolution by positional index, and manual alert creation.

use tracing::debug;

use crate::client::LockClient;
use crate::error::Error;
use crate::models::{AlertsPage, NewAlert, StatusBody};

const ALERT_RESOLVED: &str = "alert_resolved";
const ALERT_CREATED: &str = "alert_created";

impl LockClient {
    /// List one page of alerts, newest first.
    ///
    /// `GET /api/alerts?page={page}&per_page={per_page}&show_resolved={bool}`
    pub async fn list_alerts(
        &self,
        page: u32,
        per_page: u32,
        show_resolved: bool,
    ) -> Result<AlertsPage, Error> {
        let mut url = self.api_url("alerts")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .append_pair("per_page", &per_page.to_string())
            .append_pair("show_resolved", if show_resolved { "true" } else { "false" });
        debug!(page, per_page, show_resolved, "listing alerts");
        self.get(url).await
    }

    /// Mark an alert as resolved.
    ///
    /// `POST /api/alert/{index}/resolve`
    ///
    /// An unknown index comes back as HTTP 404 (`Error::Http`). A 2xx body
    /// that doesn't report `alert_resolved` is [`Error::Rejected`].
    pub async fn resolve_alert(&self, index: usize) -> Result<(), Error> {
        let url = self.api_url(&format!("alert/{index}/resolve"))?;
        debug!(index, "resolving alert");
        let body: StatusBody = self.post_empty(url).await?;
        expect_status(body, ALERT_RESOLVED)
    }

    /// Raise an alert manually.
    ///
    /// `POST /api/alert`
    pub async fn create_alert(&self, alert: &NewAlert) -> Result<(), Error> {
        let url = self.api_url("alert")?;
        debug!(alert_type = %alert.alert_type, "creating alert");
        let body: StatusBody = self.post(url, alert).await?;
        expect_status(body, ALERT_CREATED)
    }
}

fn expect_status(body: StatusBody, expected: &str) -> Result<(), Error> {
    if body.status.as_deref() == Some(expected) {
        return Ok(());
    }
    let StatusBody {
        status,
        error,
        message,
    } = body;
    let message = error
        .or(message)
        .or_else(|| status.map(|s| format!("unexpected status '{s}'")))
        .unwrap_or_else(|| format!("missing '{expected}' status"));
    Err(Error::Rejected { message })
}
