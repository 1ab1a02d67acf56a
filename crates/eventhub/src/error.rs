//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ValidationError`, and `ConfigError` into user-facing
//! errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use eventhub_config::ConfigError;
use eventhub_core::{CoreError, ValidationError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the EventHub backend at {url}")]
    #[diagnostic(
        code(eventhub::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the gateway with --backend or set it in your profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(eventhub::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    #[error("Ticket {ticket_number} cannot be validated offline")]
    #[diagnostic(
        code(eventhub::offline),
        help(
            "The link carries no usable embedded snapshot.\n\
             Run without --offline to ask the ticket service."
        )
    )]
    OfflineUnavailable { ticket_number: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(eventhub::auth_failed),
        help("Check your email and password, then run: eventhub login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in (profile '{profile}')")]
    #[diagnostic(
        code(eventhub::not_logged_in),
        help("Run: eventhub login\nOr set EVENTHUB_TOKEN for a stored session.")
    )]
    NotLoggedIn { profile: String },

    #[error("'{action}' requires an organizer account (current role: {role})")]
    #[diagnostic(code(eventhub::permission_denied))]
    PermissionDenied { action: String, role: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(eventhub::not_found),
        help("Run: eventhub {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Ticket {ticket_number} not found or invalid")]
    #[diagnostic(
        code(eventhub::ticket_invalid),
        help("The ticket service does not know this ticket. Do not admit.")
    )]
    TicketInvalid { ticket_number: String },

    #[error("'{identifier}' matches {matches} tickets")]
    #[diagnostic(
        code(eventhub::ambiguous),
        help("Use the full ticket number instead of the short form.")
    )]
    Ambiguous { identifier: String, matches: usize },

    // ── Links ────────────────────────────────────────────────────────
    #[error("Not a ticket validation link: {url}")]
    #[diagnostic(
        code(eventhub::invalid_link),
        help("Expected a link of the form https://<site>/validate/<ticket>?d=...")
    )]
    InvalidLink { url: String },

    #[error("Embedded ticket snapshot could not be decoded: {reason}")]
    #[diagnostic(code(eventhub::decode))]
    Decode { reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(eventhub::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(eventhub::validation))]
    Validation { field: String, reason: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(eventhub::cancelled))]
    Cancelled,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(eventhub::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: eventhub config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(eventhub::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(eventhub::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::OfflineUnavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::TicketInvalid { .. } => exit_code::NOT_FOUND,
            Self::Ambiguous { .. } | Self::InvalidLink { .. } | Self::Validation { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Offline => CliError::OfflineUnavailable {
                ticket_number: String::new(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotLoggedIn => CliError::NotLoggedIn {
                profile: "current".into(),
            },
            CoreError::PermissionDenied { action, role } => {
                CliError::PermissionDenied { action, role }
            }
            CoreError::TicketNotFound { identifier } => CliError::NotFound {
                resource_type: "ticket".into(),
                identifier,
                list_command: "tickets list".into(),
            },
            CoreError::AmbiguousTicket {
                identifier,
                matches,
            } => CliError::Ambiguous {
                identifier,
                matches,
            },
            CoreError::EventNotFound { identifier } => CliError::NotFound {
                resource_type: "event".into(),
                identifier,
                list_command: "events list".into(),
            },
            CoreError::NotFound { path } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: path,
                list_command: "--help".into(),
            },
            CoreError::InvalidLink { url } => CliError::InvalidLink { url },
            CoreError::Encode { message } => CliError::Validation {
                field: "origin".into(),
                reason: message,
            },
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ValidationError → CliError mapping ───────────────────────────────

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::NotFound { ticket_number, .. } => {
                CliError::TicketInvalid { ticket_number }
            }
            ValidationError::Network {
                ticket_number,
                source: CoreError::Offline,
            } => CliError::OfflineUnavailable { ticket_number },
            ValidationError::Network { source, .. } => source.into(),
            ValidationError::InvalidLink { url } => CliError::InvalidLink { url },
            ValidationError::Cancelled => CliError::Cancelled,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_exit_codes() {
        let not_found: CliError = ValidationError::NotFound {
            ticket_number: "t".into(),
            source: CoreError::NotFound { path: "/x".into() },
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let network: CliError = ValidationError::Network {
            ticket_number: "t".into(),
            source: CoreError::Timeout,
        }
        .into();
        assert_eq!(network.exit_code(), exit_code::TIMEOUT);

        let offline: CliError = ValidationError::Network {
            ticket_number: "t".into(),
            source: CoreError::Offline,
        }
        .into();
        assert!(matches!(offline, CliError::OfflineUnavailable { ref ticket_number } if ticket_number == "t"));
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn permission_maps_to_exit_five() {
        let err: CliError = CoreError::PermissionDenied {
            action: "check-in".into(),
            role: "USER".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::PERMISSION);
    }

    #[test]
    fn api_error_message_includes_status() {
        let err = CliError::ApiError {
            status: Some(503),
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "Backend error (503): down");
    }
}
