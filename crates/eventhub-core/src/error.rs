// ── Core error types ──
//
// User-facing errors from eventhub-core. Consumers never see raw HTTP
// statuses or JSON parse failures. The `From<eventhub_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the EventHub backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Network access is disabled (offline mode)")]
    Offline,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("'{action}' requires an organizer account (current role: {role})")]
    PermissionDenied { action: String, role: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Ticket not found: {identifier}")]
    TicketNotFound { identifier: String },

    #[error("Ticket identifier '{identifier}' matches {matches} tickets")]
    AmbiguousTicket { identifier: String, matches: usize },

    #[error("Event not found: {identifier}")]
    EventNotFound { identifier: String },

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Not a ticket validation link: {url}")]
    InvalidLink { url: String },

    #[error("Could not build validation link: {message}")]
    Encode { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// `true` when the backend could not be reached at all, as opposed to
    /// answering with an error.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Offline
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<eventhub_api::Error> for CoreError {
    fn from(err: eventhub_api::Error) -> Self {
        match err {
            eventhub_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            eventhub_api::Error::MissingToken => CoreError::NotLoggedIn,
            eventhub_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() || e.is_request() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            eventhub_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            eventhub_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            eventhub_api::Error::NotFound { path } => CoreError::NotFound { path },
            eventhub_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            eventhub_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response body: {message}"),
                status: None,
            },
        }
    }
}
