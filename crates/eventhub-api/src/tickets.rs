// Ticket service endpoints

use tracing::debug;

use crate::client::{BackendClient, Service};
use crate::error::Error;
use crate::models::{RecordId, TicketRecord};

impl BackendClient {
    /// Public ticket lookup used by the validation page. No token required.
    ///
    /// `GET /api/tickets/validate/{ticketNumber}`
    pub async fn ticket_for_validation(&self, ticket_number: &str) -> Result<TicketRecord, Error> {
        debug!(ticket_number, "looking up ticket for validation");
        self.get_json(
            Service::Tickets,
            &["api", "tickets", "validate", ticket_number],
        )
        .await
    }

    /// Tickets owned by a user.
    ///
    /// `GET /api/tickets/user/{userId}`
    pub async fn user_tickets(&self, user_id: &RecordId) -> Result<Vec<TicketRecord>, Error> {
        let id = user_id.to_string();
        debug!(user_id = %id, "listing user tickets");
        self.get_json(Service::Tickets, &["api", "tickets", "user", &id])
            .await
    }

    /// Tickets issued for an event.
    ///
    /// `GET /api/tickets/event/{eventId}`
    pub async fn event_tickets(&self, event_id: &RecordId) -> Result<Vec<TicketRecord>, Error> {
        let id = event_id.to_string();
        debug!(event_id = %id, "listing event tickets");
        self.get_json(Service::Tickets, &["api", "tickets", "event", &id])
            .await
    }

    /// Fetch a ticket by its numeric id.
    ///
    /// `GET /api/tickets/{id}`
    pub async fn get_ticket(&self, id: i64) -> Result<TicketRecord, Error> {
        let id = id.to_string();
        debug!(ticket_id = %id, "fetching ticket");
        self.get_json(Service::Tickets, &["api", "tickets", &id]).await
    }

    /// Check a ticket in at the venue. The ticket service flips an `ACTIVE`
    /// ticket to `USED` and rejects anything else.
    ///
    /// `POST /api/tickets/{ticketNumber}/validate`
    pub async fn check_in(&self, ticket_number: &str) -> Result<(), Error> {
        self.require_token()?;
        debug!(ticket_number, "checking ticket in");
        self.post_empty(
            Service::Tickets,
            &["api", "tickets", ticket_number, "validate"],
        )
        .await
    }
}
