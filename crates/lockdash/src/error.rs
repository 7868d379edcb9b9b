//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use lockdash_config::ConfigError;
use lockdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PROTOCOL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Backend ──────────────────────────────────────────────────────
    #[error("Could not reach the lock backend: {message}")]
    #[diagnostic(
        code(lockdash::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Endpoint: {endpoint}\n\
             Try: lockdash status --server http://<host>:5000"
        )
    )]
    ConnectionFailed { endpoint: String, message: String },

    #[error("{endpoint} answered HTTP {status}: {message}")]
    #[diagnostic(
        code(lockdash::backend),
        help("The backend is reachable but refused the request. Check its logs.")
    )]
    Backend {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("{endpoint} timed out after {millis}ms")]
    #[diagnostic(
        code(lockdash::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { endpoint: String, millis: u64 },

    #[error("Unexpected response from {endpoint}: {message}")]
    #[diagnostic(
        code(lockdash::protocol),
        help("The backend may be running an incompatible version.")
    )]
    Protocol { endpoint: String, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(lockdash::not_found),
        help("Run: lockdash {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Alert {index} is already being resolved")]
    #[diagnostic(code(lockdash::pending))]
    Pending { index: usize },

    #[error("Refreshing too often")]
    #[diagnostic(
        code(lockdash::rate_limited),
        help("Wait {retry_after_ms}ms before refreshing again.")
    )]
    RateLimited { retry_after_ms: u64 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lockdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lockdash::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lockdash config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No lock backend configured")]
    #[diagnostic(
        code(lockdash::no_config),
        help(
            "Create a profile with: lockdash config init\n\
             Or pass --server / set LOCKDASH_SERVER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(lockdash::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Protocol { .. } => exit_code::PROTOCOL,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Pending { .. } | Self::RateLimited { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_not_found() {
            return CliError::NotFound {
                resource_type: "alert".into(),
                identifier: err
                    .endpoint()
                    .map_or_else(|| "resource".into(), |e| e.to_string()),
                list_command: "alerts list".into(),
            };
        }

        match err {
            CoreError::NetworkFailure {
                endpoint,
                status: Some(status),
                message,
            } => CliError::Backend {
                endpoint: endpoint.to_string(),
                status,
                message,
            },

            CoreError::NetworkFailure {
                endpoint,
                status: None,
                message,
            } => CliError::ConnectionFailed {
                endpoint: endpoint.to_string(),
                message,
            },

            CoreError::Timeout {
                endpoint,
                timeout_ms,
            } => CliError::Timeout {
                endpoint: endpoint.to_string(),
                millis: timeout_ms,
            },

            CoreError::ProtocolViolation { endpoint, message } => CliError::Protocol {
                endpoint: endpoint.to_string(),
                message,
            },

            CoreError::RateLimited { retry_after_ms } => CliError::RateLimited { retry_after_ms },

            CoreError::AlreadyPending { index } => CliError::Pending { index },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
