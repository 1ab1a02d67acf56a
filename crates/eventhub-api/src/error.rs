use thiserror::Error;

/// Top-level error type for the `eventhub-api` crate.
///
/// Covers every failure mode of the backend REST surface:
/// authentication, transport, HTTP status, and body decoding.
/// `eventhub-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the bearer token was rejected (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An authenticated endpoint was called without a session token.
    #[error("Not logged in -- a session token is required")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// The backend answered 404 for the requested resource.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success status. `message` is taken from the JSON
    /// body's `message`/`error` field when present.
    #[error("Backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session token is missing or was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::MissingToken)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status code, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_transient() {
        let err = Error::NotFound {
            path: "/api/tickets/validate/abc".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_not_found());

        let client_err = Error::Api {
            status: 400,
            message: "Bad Request".into(),
        };
        assert!(!client_err.is_transient());
    }

    #[test]
    fn auth_helpers() {
        assert!(Error::MissingToken.is_auth());
        assert!(
            Error::Authentication {
                message: "bad credentials".into()
            }
            .is_auth()
        );
        assert_eq!(Error::MissingToken.status(), None);
    }
}
