//! Clap derive structures for the `eventhub` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eventhub -- validate, share, and manage EventHub tickets
#[derive(Debug, Parser)]
#[command(
    name = "eventhub",
    version,
    about = "Validate, share, and manage EventHub tickets from the command line",
    long_about = "A CLI for the EventHub ticketing platform.\n\n\
        Validates scanned ticket links offline when they carry an embedded\n\
        snapshot, and falls back to the ticket service when they do not.",
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
    #[arg(long, short = 'p', env = "EVENTHUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API gateway URL (overrides profile)
    #[arg(long, short = 'b', env = "EVENTHUB_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Public site origin used in validation links (overrides profile)
    #[arg(long, env = "EVENTHUB_ORIGIN", global = true)]
    pub origin: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EVENTHUB_OUTPUT",
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

    /// Accept invalid TLS certificates (local development backends)
    #[arg(long, short = 'k', env = "EVENTHUB_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EVENTHUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Sign in and remember the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Browse events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// List, share, download, and check in tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Validate a scanned ticket link
    Validate(ValidateArgs),

    /// Print the snapshot embedded in a ticket link (no network)
    Decode(DecodeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e', env = "EVENTHUB_EMAIL")]
    pub email: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events
    #[command(alias = "ls")]
    List {
        /// Only events in this category
        #[arg(long, short = 'c', conflicts_with = "search")]
        category: Option<String>,

        /// Keyword search over titles and descriptions
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one event
    Show {
        /// Event id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List your tickets grouped by event
    #[command(alias = "ls")]
    List,

    /// Print the validation link for a ticket
    Link {
        /// Ticket number or its 8-character short form
        ticket: String,

        /// Public site origin (overrides profile)
        #[arg(long)]
        origin: Option<String>,
    },

    /// Save a printable HTML ticket
    Download {
        /// Ticket number or its 8-character short form
        ticket: String,

        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Mark a ticket as used at the venue (organizers only)
    CheckIn {
        /// Full ticket number
        ticket: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VALIDATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Scanned link, e.g. https://example.com/validate/<ticket>?d=...
    pub url: String,

    /// Never contact the backend; only embedded snapshots validate
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Ticket link carrying a `d` parameter
    pub url: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles (default marked with *)
    Profiles,

    /// Set the default profile
    SetDefault {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
