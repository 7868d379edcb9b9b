// Lock backend HTTP client
//
// Wraps `reqwest::Client` with URL construction under `/api/`, error-body
// extraction, and timeout classification. Endpoint groups (code, logs,
// alerts, access) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::StatusBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the SmartCadenas lock backend.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct LockClient {
    http: reqwest::Client,
    base_url: Url,
    /// Copied from the transport config, only used to label timeouts.
    timeout: Duration,
}

impl LockClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://192.168.1.20:5000`);
    /// endpoint paths are appended under `/api/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client(&base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the `X-Requested-With` header and
    /// timeout; mostly useful in tests.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: Duration::ZERO,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    /// Send a POST request with JSON body and decode the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    /// Send a POST request without a body and decode the response.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    /// Classify a reqwest failure, folding timeouts into [`Error::Timeout`].
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Check the status, then decode the body as `T`.
    ///
    /// Non-2xx responses become [`Error::Http`], carrying the server's
    /// `error` or `message` text when the body is JSON.
    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(status = status.as_u16(), len = body.len(), "response received");

        if !status.is_success() {
            let message = serde_json::from_str::<StatusBody>(&body)
                .ok()
                .and_then(StatusBody::failure)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map_or_else(|| body_preview(&body).to_owned(), String::from)
                });
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", body_preview(&body)),
            body,
        })
    }
}

fn body_preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
