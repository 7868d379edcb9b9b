//! Clap derive structures for the `lockdash` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lockdash -- terminal dashboard for SmartCadenas lock backends
#[derive(Debug, Parser)]
#[command(
    name = "lockdash",
    version,
    about = "Monitor and operate a smart-lock access control backend",
    long_about = "Polls a SmartCadenas lock backend for the current access code,\n\
        the door event log and unresolved alerts. Generate codes, resolve\n\
        alerts, or keep a live dashboard running with `lockdash watch`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "LOCKDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "LOCKDASH_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LOCKDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LOCKDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LOCKDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh everything once and print a summary
    #[command(alias = "st")]
    Status,

    /// Show or generate the access code
    Code(CodeArgs),

    /// Browse the door event log
    Logs(LogsArgs),

    /// List, resolve and raise alerts
    #[command(alias = "al")]
    Alerts(AlertsArgs),

    /// Report door events as a door controller would
    Access(AccessArgs),

    /// Run the live dashboard until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Code ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CodeArgs {
    #[command(subcommand)]
    pub command: CodeCommand,
}

#[derive(Debug, Subcommand)]
pub enum CodeCommand {
    /// Show the current code and its countdown
    Show,

    /// Ask the backend for a new code
    #[command(alias = "new")]
    Generate,
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List one page of door events, newest first
    #[command(alias = "ls")]
    List(PageArgs),
}

/// Shared pagination argument for list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List one page of unresolved alerts
    #[command(alias = "ls")]
    List(PageArgs),

    /// Resolve an alert by its index
    Resolve {
        /// Alert index as shown by `alerts list`
        index: usize,
    },

    /// Raise an alert manually
    Raise {
        /// Alert type (e.g. tamper, force_attempt)
        #[arg(long = "type", short = 't')]
        alert_type: String,

        /// Free-text description
        #[arg(long, short = 'm')]
        message: Option<String>,

        /// Severity
        #[arg(long, value_enum)]
        severity: Option<SeverityArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
    Critical,
}

// ── Access ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccessArgs {
    #[command(subcommand)]
    pub command: AccessCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// Report an open or close event
    Report {
        /// Door event
        #[arg(value_enum)]
        event: DoorEventArg,

        /// Code entered on the keypad
        #[arg(long)]
        code: Option<String>,

        /// Identifier of the reporting device
        #[arg(long)]
        agent: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DoorEventArg {
    DoorOpen,
    DoorClose,
}

impl DoorEventArg {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::DoorOpen => "door_open",
            Self::DoorClose => "door_close",
        }
    }
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh period in seconds (overrides profile; 0 disables polling)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile (prompts for missing values)
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Backend URL; prompted for when omitted
        #[arg(long = "url")]
        url: Option<String>,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles (* marks the active one)
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
