// ── Core error types ──
//
// User-facing errors from lockdash-core. Consumers never match on
// reqwest or serde failures; `CoreError::from_api` folds transport-layer
// errors into the kinds a dashboard reports, tagged with the endpoint
// that produced them.

use lockdash_api::Error as ApiError;
use thiserror::Error;

/// The backend operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Endpoint {
    #[strum(to_string = "GET /api/code")]
    Code,
    #[strum(to_string = "POST /api/code")]
    GenerateCode,
    #[strum(to_string = "GET /api/logs")]
    Logs,
    #[strum(to_string = "GET /api/alerts")]
    Alerts,
    #[strum(to_string = "POST /api/alert/:index/resolve")]
    ResolveAlert,
    #[strum(to_string = "POST /api/alert")]
    RaiseAlert,
    #[strum(to_string = "POST /api/access")]
    Access,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend failures ─────────────────────────────────────────────
    /// Transport error or non-2xx response.
    #[error("{endpoint} failed: {message}")]
    NetworkFailure {
        endpoint: Endpoint,
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        message: String,
    },

    #[error("{endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: Endpoint, timeout_ms: u64 },

    /// Malformed or incomplete response body.
    #[error("{endpoint} returned an invalid response: {message}")]
    ProtocolViolation { endpoint: Endpoint, message: String },

    // ── Local refusals ───────────────────────────────────────────────
    #[error("Refreshing too often, retry in {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Alert {index} is already being resolved")]
    AlreadyPending { index: usize },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate a `lockdash-api` error raised while calling `endpoint`.
    pub fn from_api(endpoint: Endpoint, err: ApiError) -> Self {
        match err {
            ApiError::Timeout { timeout_ms } => Self::Timeout {
                endpoint,
                timeout_ms,
            },
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout {
                endpoint,
                timeout_ms: 0,
            },
            ApiError::Transport(e) => Self::NetworkFailure {
                endpoint,
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            ApiError::Http { status, message } => Self::NetworkFailure {
                endpoint,
                status: Some(status),
                message,
            },
            ApiError::InvalidUrl(e) => Self::Config {
                message: format!("invalid backend URL: {e}"),
            },
            ApiError::Tls(message) => Self::Config { message },
            e @ (ApiError::Rejected { .. }
            | ApiError::Deserialization { .. }
            | ApiError::MissingField { .. }) => Self::ProtocolViolation {
                endpoint,
                message: e.to_string(),
            },
        }
    }

    /// The endpoint that failed, for backend errors.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::NetworkFailure { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::ProtocolViolation { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    /// HTTP status reported by the server, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NetworkFailure { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether this counts toward the consecutive-failure escalation.
    pub fn is_backend_failure(&self) -> bool {
        self.endpoint().is_some()
    }
}
