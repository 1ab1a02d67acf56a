// ── Ticket domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use super::status::{Validity, classify_status};

/// A purchased admission unit tied to one event and one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Option<i64>,
    /// Canonical identifier (a UUID issued by the ticket service).
    pub ticket_number: String,
    pub registration_id: Option<RecordId>,
    pub event_id: RecordId,
    pub user_id: RecordId,
    /// Raw status string, e.g. `ACTIVE`, `CONFIRMED`, `PENDING`, `USED`.
    pub status: String,
    pub price: f64,
    pub seat_number: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the ticket service rendered a QR image for this ticket.
    pub has_qr_image: bool,
}

impl Ticket {
    /// Display form of the ticket number, e.g. `ABCDEF12`.
    pub fn short_number(&self) -> String {
        short_ticket_number(&self.ticket_number)
    }

    pub fn validity(&self) -> Validity {
        classify_status(&self.status)
    }

    /// Best timestamp for "issued on": creation, then issue time.
    pub fn issued_on(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.issued_at)
    }

    /// `true` if `identifier` is this ticket's full number or its short
    /// display form (case-insensitive).
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.ticket_number == identifier || self.short_number().eq_ignore_ascii_case(identifier)
    }
}

/// First 8 characters of a ticket number, uppercased.
pub fn short_ticket_number(ticket_number: &str) -> String {
    ticket_number.chars().take(8).collect::<String>().to_uppercase()
}
