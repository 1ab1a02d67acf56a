// ── Hub facade ──
//
// Single entry point for front ends: owns the backend client and the
// signed-in session, and turns wire records into domain types.

use std::collections::HashMap;

use futures_util::future::join_all;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use eventhub_api::BackendClient;

use crate::codec::{self, EncodeError};
use crate::config::ClientConfig;
use crate::document::TicketDocument;
use crate::error::CoreError;
use crate::model::{AuthContext, Event, RecordId, Ticket};
use crate::validation::{self, ValidatedTicket, ValidationError};

// ── TicketBook ───────────────────────────────────────────────────────

/// The signed-in user's tickets with the events they belong to.
///
/// Events that could not be fetched are missing from `events`.
#[derive(Debug, Clone, Default)]
pub struct TicketBook {
    pub tickets: Vec<Ticket>,
    pub events: HashMap<RecordId, Event>,
}

/// Tickets for one event, as grouped on the dashboard.
#[derive(Debug, Clone)]
pub struct TicketGroup {
    pub event_id: RecordId,
    pub event: Option<Event>,
    pub tickets: Vec<Ticket>,
}

impl TicketGroup {
    pub fn total_price(&self) -> f64 {
        self.tickets.iter().map(|t| t.price).sum()
    }
}

impl TicketBook {
    pub fn event_for(&self, ticket: &Ticket) -> Option<&Event> {
        self.events.get(&ticket.event_id)
    }

    /// Find a ticket by full number or short display form.
    pub fn find(&self, identifier: &str) -> Result<&Ticket, CoreError> {
        let mut matches = self.tickets.iter().filter(|t| t.matches(identifier));
        let first = matches.next().ok_or_else(|| CoreError::TicketNotFound {
            identifier: identifier.to_owned(),
        })?;
        // A full number is unique even if its short form collides.
        if first.ticket_number == identifier.trim() {
            return Ok(first);
        }
        let rest = matches.count();
        if rest > 0 {
            return Err(CoreError::AmbiguousTicket {
                identifier: identifier.to_owned(),
                matches: rest + 1,
            });
        }
        Ok(first)
    }

    /// How many of the user's tickets are for `event_id`.
    pub fn count_for_event(&self, event_id: &RecordId) -> usize {
        self.tickets.iter().filter(|t| &t.event_id == event_id).count()
    }

    /// Tickets grouped by event, groups in order of first appearance.
    pub fn groups(&self) -> Vec<TicketGroup> {
        let mut order: Vec<RecordId> = Vec::new();
        let mut by_event: HashMap<&RecordId, Vec<Ticket>> = HashMap::new();
        for ticket in &self.tickets {
            let bucket = by_event.entry(&ticket.event_id).or_default();
            if bucket.is_empty() {
                order.push(ticket.event_id.clone());
            }
            bucket.push(ticket.clone());
        }
        order
            .into_iter()
            .map(|event_id| TicketGroup {
                tickets: by_event.remove(&event_id).unwrap_or_default(),
                event: self.events.get(&event_id).cloned(),
                event_id,
            })
            .collect()
    }
}

// ── Hub ──────────────────────────────────────────────────────────────

pub struct Hub {
    client: BackendClient,
    origin: Url,
    session: Option<AuthContext>,
}

impl Hub {
    /// Build the HTTP client for `config`. Does not contact the backend.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = BackendClient::new(config.service_urls(), &config.transport())?;
        Ok(Self::with_client(client, config.origin.clone()))
    }

    pub fn with_client(client: BackendClient, origin: Url) -> Self {
        Self {
            client,
            origin,
            session: None,
        }
    }

    /// Resume a previously stored session.
    #[must_use]
    pub fn with_session(mut self, session: AuthContext) -> Self {
        self.client.set_token(session.token.clone());
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&AuthContext> {
        self.session.as_ref()
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Public origin validation links point at.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn require_session(&self) -> Result<&AuthContext, CoreError> {
        self.session.as_ref().ok_or(CoreError::NotLoggedIn)
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthContext, CoreError> {
        let response = self.client.login(email, password).await?;
        let session = AuthContext::from(response);
        info!(email, role = %session.role, "logged in");
        self.client.set_token(session.token.clone());
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Forget the session. Returns it, if there was one.
    pub fn logout(&mut self) -> Option<AuthContext> {
        self.client.clear_token();
        self.session.take()
    }

    // ── Events ───────────────────────────────────────────────────────

    pub async fn list_events(&self) -> Result<Vec<Event>, CoreError> {
        let events = self.client.list_events().await?;
        Ok(events.into_iter().map(Event::from).collect())
    }

    pub async fn search_events(&self, keyword: &str) -> Result<Vec<Event>, CoreError> {
        let events = self.client.search_events(keyword).await?;
        Ok(events.into_iter().map(Event::from).collect())
    }

    pub async fn events_in_category(&self, category: &str) -> Result<Vec<Event>, CoreError> {
        let events = self.client.events_by_category(category).await?;
        Ok(events.into_iter().map(Event::from).collect())
    }

    pub async fn event(&self, id: &RecordId) -> Result<Event, CoreError> {
        match self.client.get_event(id).await {
            Ok(event) => Ok(event.into()),
            Err(e) if e.is_not_found() => Err(CoreError::EventNotFound {
                identifier: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // ── Tickets ──────────────────────────────────────────────────────

    /// The session user's tickets and their events.
    ///
    /// Events are fetched concurrently, once per distinct id. A failed
    /// event lookup leaves that event out rather than failing the list.
    pub async fn my_tickets(&self) -> Result<TicketBook, CoreError> {
        let session = self.require_session()?;
        let tickets: Vec<Ticket> = self
            .client
            .user_tickets(&session.user_id)
            .await?
            .into_iter()
            .map(Ticket::from)
            .collect();

        let mut event_ids: Vec<&RecordId> = Vec::new();
        for ticket in &tickets {
            if !ticket.event_id.is_empty() && !event_ids.contains(&&ticket.event_id) {
                event_ids.push(&ticket.event_id);
            }
        }
        debug!(
            tickets = tickets.len(),
            events = event_ids.len(),
            "fetching events for tickets"
        );

        let results = join_all(event_ids.iter().map(|id| self.client.get_event(id))).await;
        let mut events = HashMap::with_capacity(event_ids.len());
        for (id, result) in event_ids.into_iter().zip(results) {
            match result {
                Ok(event) => {
                    events.insert(id.clone(), Event::from(event));
                }
                Err(e) => warn!(event_id = %id, error = %e, "event lookup failed"),
            }
        }

        Ok(TicketBook { tickets, events })
    }

    pub async fn grouped_tickets(&self) -> Result<Vec<TicketGroup>, CoreError> {
        Ok(self.my_tickets().await?.groups())
    }

    /// Validation link for one of the user's tickets. `origin` defaults to
    /// the configured one.
    pub async fn share_link(
        &self,
        identifier: &str,
        origin: Option<&Url>,
    ) -> Result<Url, CoreError> {
        let book = self.my_tickets().await?;
        let ticket = book.find(identifier)?;
        encode_link(ticket, book.event_for(ticket), origin.unwrap_or(&self.origin))
    }

    /// Printable document for one of the user's tickets, showing how many
    /// tickets the user holds for the same event.
    pub async fn ticket_document(&self, identifier: &str) -> Result<TicketDocument, CoreError> {
        let book = self.my_tickets().await?;
        let ticket = book.find(identifier)?;
        let event = book.event_for(ticket);
        let count = u32::try_from(book.count_for_event(&ticket.event_id)).unwrap_or(u32::MAX);
        let link = encode_link(ticket, event, &self.origin)?;
        Ok(TicketDocument::new(ticket.clone(), event.cloned(), count).with_validation_url(link))
    }

    /// Validate a scanned link, falling back to the backend when the
    /// embedded payload is missing or unusable.
    pub async fn validate(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<ValidatedTicket, ValidationError> {
        validation::resolve_validation_url(&self.client, url, cancel).await
    }

    /// Mark a ticket as used at the venue. Organizer accounts only.
    pub async fn check_in(&self, ticket_number: &str) -> Result<(), CoreError> {
        let session = self.require_session()?;
        if !session.role.is_organizer() {
            return Err(CoreError::PermissionDenied {
                action: "check-in".into(),
                role: session.role.to_string(),
            });
        }
        match self.client.check_in(ticket_number).await {
            Ok(()) => {
                info!(ticket_number, "ticket checked in");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(CoreError::TicketNotFound {
                identifier: ticket_number.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

fn encode_link(ticket: &Ticket, event: Option<&Event>, origin: &Url) -> Result<Url, CoreError> {
    codec::encode_validation_url(ticket, event, origin).map_err(|e: EncodeError| {
        CoreError::Encode {
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ticket(number: &str, event_id: i64) -> Ticket {
        Ticket {
            id: None,
            ticket_number: number.into(),
            registration_id: None,
            event_id: RecordId::Number(event_id),
            user_id: RecordId::Number(7),
            status: "ACTIVE".into(),
            price: 10.0,
            seat_number: None,
            issued_at: None,
            created_at: None,
            has_qr_image: false,
        }
    }

    fn book() -> TicketBook {
        let mut events = HashMap::new();
        events.insert(
            RecordId::Number(1),
            Event {
                id: RecordId::Number(1),
                title: "One".into(),
                active: true,
                ..Event::default()
            },
        );
        TicketBook {
            tickets: vec![
                ticket("aaaaaaaa-0001", 1),
                ticket("bbbbbbbb-0002", 2),
                ticket("aaaaaaaa-0003", 1),
            ],
            events,
        }
    }

    #[test]
    fn find_by_full_number() {
        let book = book();
        assert_eq!(
            book.find("bbbbbbbb-0002").unwrap().ticket_number,
            "bbbbbbbb-0002"
        );
        assert_eq!(
            book.find("aaaaaaaa-0003").unwrap().ticket_number,
            "aaaaaaaa-0003"
        );
    }

    #[test]
    fn find_by_short_number() {
        let book = book();
        assert_eq!(
            book.find("BBBBBBBB").unwrap().ticket_number,
            "bbbbbbbb-0002"
        );
    }

    #[test]
    fn colliding_short_number_is_ambiguous() {
        let err = book().find("AAAAAAAA").unwrap_err();
        assert!(matches!(err, CoreError::AmbiguousTicket { matches: 2, .. }));
    }

    #[test]
    fn unknown_ticket_is_not_found() {
        let err = book().find("zzzz").unwrap_err();
        assert!(matches!(err, CoreError::TicketNotFound { .. }));
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let groups = book().groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].event_id, RecordId::Number(1));
        assert_eq!(groups[0].tickets.len(), 2);
        assert_eq!(groups[0].event.as_ref().unwrap().title, "One");
        assert!((groups[0].total_price() - 20.0).abs() < f64::EPSILON);
        assert_eq!(groups[1].event_id, RecordId::Number(2));
        assert!(groups[1].event.is_none());
    }

    #[test]
    fn count_for_event() {
        assert_eq!(book().count_for_event(&RecordId::Number(1)), 2);
        assert_eq!(book().count_for_event(&RecordId::Number(9)), 0);
    }
}
