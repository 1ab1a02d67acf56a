// Wire types for the EventHub backend.
//
// Field names follow the backend's camelCase JSON. Timestamps stay as raw
// strings here (the services emit zone-less `LocalDateTime` values);
// `eventhub-core` parses them into `chrono` types.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── RecordId ────────────────────────────────────────────────────────

/// Identifier of a backend record.
///
/// The services emit numeric ids, but ids that travel through URLs and
/// share links may arrive as strings. The original JSON form is kept so
/// that re-encoding reproduces it byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// `true` for the empty-text placeholder used when an id is unknown.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

// ── Tickets ─────────────────────────────────────────────────────────

/// Ticket as returned by the ticket service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketRecord {
    pub id: Option<i64>,
    pub ticket_number: String,
    pub registration_id: Option<RecordId>,
    pub event_id: RecordId,
    pub user_id: RecordId,
    pub status: String,
    pub price: Option<f64>,
    pub seat_number: Option<String>,
    /// PNG data URL rendered by the ticket service.
    pub qr_code: Option<String>,
    pub issued_at: Option<String>,
    pub created_at: Option<String>,
}

// ── Events ──────────────────────────────────────────────────────────

/// Event as returned by the event service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRecord {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_tickets: Option<u32>,
    pub available_tickets: Option<u32>,
    pub price: Option<f64>,
    pub organizer: Option<String>,
    pub active: Option<bool>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

// ── Auth ────────────────────────────────────────────────────────────

/// `POST /api/auth/login` body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /api/auth/register` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// `USER` or `ORGANIZER`.
    pub role: String,
}

/// Login / signup response from the auth service.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    /// JWT bearer token. Wrap in a `SecretString` as soon as it is read.
    pub token: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("id", &self.id)
            .field("token", &"****")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Error body shape used by the backend services.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_keeps_json_form() {
        let numeric: RecordId = serde_json::from_value(json!(42)).unwrap();
        let text: RecordId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(numeric, RecordId::Number(42));
        assert_eq!(text, RecordId::Text("42".into()));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"42\"");
        assert_eq!(text.as_number(), Some(42));
    }

    #[test]
    fn ticket_record_tolerates_sparse_bodies() {
        let ticket: TicketRecord = serde_json::from_value(json!({
            "ticketNumber": "9b2f0c1e-aaaa-bbbb-cccc-111122223333",
            "eventId": 3,
            "userId": 7,
            "status": "ACTIVE"
        }))
        .unwrap();
        assert_eq!(ticket.event_id, RecordId::Number(3));
        assert!(ticket.price.is_none());
        assert!(ticket.created_at.is_none());
    }
}
