// Access code endpoints
//
// `GET /api/code` reports the current code (or none); `POST /api/code`
// asks the backend to mint a fresh one.

use tracing::debug;

use crate::client::LockClient;
use crate::error::Error;
use crate::models::{CodeBody, CodeRecord};

impl LockClient {
    /// Fetch the current access code.
    ///
    /// `GET /api/code`
    ///
    /// Returns `Ok(None)` when the backend reports no active code.
    pub async fn get_code(&self) -> Result<Option<CodeRecord>, Error> {
        let url = self.api_url("code")?;
        debug!("fetching current code");
        let body: CodeBody = self.get(url).await?;
        body.into_record()
    }

    /// Generate a new access code.
    ///
    /// `POST /api/code`
    ///
    /// A creation response must carry both a non-empty `code` and a
    /// `valid_until`; either missing is [`Error::MissingField`].
    pub async fn create_code(&self) -> Result<CodeRecord, Error> {
        let url = self.api_url("code")?;
        debug!("generating new code");
        let body: CodeBody = self.post_empty(url).await?;
        body.into_record()?
            .ok_or(Error::MissingField { field: "code" })
    }
}
