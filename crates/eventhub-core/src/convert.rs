// ── API-to-domain type conversions ──
//
// Bridges raw `eventhub_api` response types into canonical
// `eventhub_core::model` domain types. Each `From` impl parses timestamps
// into strong types and fills defaults for missing optional data.

use secrecy::SecretString;

use eventhub_api::{AuthResponse, EventRecord, TicketRecord};

use crate::format::parse_utc;
use crate::model::{AuthContext, Event, Role, Ticket};

impl From<TicketRecord> for Ticket {
    fn from(raw: TicketRecord) -> Self {
        Self {
            id: raw.id,
            ticket_number: raw.ticket_number,
            registration_id: raw.registration_id,
            event_id: raw.event_id,
            user_id: raw.user_id,
            status: raw.status,
            price: raw.price.unwrap_or_default(),
            seat_number: raw.seat_number.filter(|s| !s.is_empty()),
            issued_at: raw.issued_at.as_deref().and_then(parse_utc),
            created_at: raw.created_at.as_deref().and_then(parse_utc),
            has_qr_image: raw.qr_code.is_some_and(|q| !q.is_empty()),
        }
    }
}

impl From<EventRecord> for Event {
    fn from(raw: EventRecord) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description.filter(|d| !d.is_empty()),
            category: raw.category,
            location: raw.location.filter(|l| !l.is_empty()),
            start_date: raw.start_date.filter(|d| !d.is_empty()),
            end_date: raw.end_date.filter(|d| !d.is_empty()),
            total_tickets: raw.total_tickets,
            available_tickets: raw.available_tickets,
            price: raw.price,
            organizer: raw.organizer,
            image_url: raw.image_url,
            // The event service treats a missing flag as active.
            active: raw.active.unwrap_or(true),
        }
    }
}

impl From<AuthResponse> for AuthContext {
    fn from(raw: AuthResponse) -> Self {
        let display_name = format!("{} {}", raw.first_name, raw.last_name)
            .trim()
            .to_owned();
        Self {
            token: SecretString::from(raw.token),
            user_id: raw.id.unwrap_or_default(),
            display_name: if display_name.is_empty() {
                "User".into()
            } else {
                display_name
            },
            email: raw.email,
            role: Role::parse_lenient(raw.role.as_deref()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eventhub_api::RecordId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn ticket_record_converts() {
        let raw: TicketRecord = serde_json::from_value(json!({
            "id": 11,
            "ticketNumber": "abcdef1234567890",
            "eventId": 42,
            "userId": 7,
            "status": "ACTIVE",
            "price": 19.99,
            "seatNumber": "",
            "qrCode": "data:image/png;base64,AAAA",
            "issuedAt": "2025-11-20T09:15:00"
        }))
        .unwrap();

        let ticket = Ticket::from(raw);

        assert!((ticket.price - 19.99).abs() < f64::EPSILON);
        assert_eq!(ticket.seat_number, None);
        assert!(ticket.has_qr_image);
        assert_eq!(
            ticket.issued_at.map(|d| d.to_rfc3339()).as_deref(),
            Some("2025-11-20T09:15:00+00:00")
        );
        assert_eq!(ticket.issued_on(), ticket.issued_at);
    }

    #[test]
    fn event_record_converts_with_defaults() {
        let raw: EventRecord = serde_json::from_value(json!({
            "id": 3,
            "title": "Jazz Night",
            "location": ""
        }))
        .unwrap();

        let event = Event::from(raw);

        assert_eq!(event.id, RecordId::Number(3));
        assert_eq!(event.location, None);
        assert_eq!(event.display_location(), "TBD");
        assert!(event.active);
    }

    #[test]
    fn auth_response_converts() {
        let raw: AuthResponse = serde_json::from_value(json!({
            "id": 7,
            "token": "jwt",
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "ORGANIZER"
        }))
        .unwrap();

        let ctx = AuthContext::from(raw);

        assert_eq!(ctx.user_id, RecordId::Number(7));
        assert_eq!(ctx.display_name, "Ada Lovelace");
        assert_eq!(ctx.role, Role::Organizer);
    }
}
