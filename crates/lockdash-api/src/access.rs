// Door event reporting endpoint
//
// Used by door controllers (and the CLI's simulator) to record an
// open/close attempt. The backend decides success and code invalidation.

use tracing::debug;

use crate::client::LockClient;
use crate::error::Error;
use crate::models::{AccessReceipt, AccessReport};

impl LockClient {
    /// Report a door event.
    ///
    /// `POST /api/access`
    pub async fn report_access(&self, report: &AccessReport) -> Result<AccessReceipt, Error> {
        let url = self.api_url("access")?;
        debug!(event = %report.event, "reporting door event");
        self.post(url, report).await
    }
}
