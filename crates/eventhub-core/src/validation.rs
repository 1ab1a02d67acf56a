// ── Ticket validation flow ──
//
// Offline-first: a validation link's embedded payload is used when it
// decodes; otherwise the ticket is fetched from the backend, then its
// event. A failed event lookup still yields a result with `event: None`.

use std::future::Future;

use chrono::Utc;
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use eventhub_api::BackendClient;

use crate::codec;
use crate::error::CoreError;
use crate::model::{Event, RecordId, Ticket, Validity};

/// Backend lookups the validation flow falls back to.
pub trait TicketLookup {
    fn ticket_by_number(
        &self,
        ticket_number: &str,
    ) -> impl Future<Output = Result<Ticket, CoreError>> + Send;

    fn event_by_id(&self, id: &RecordId) -> impl Future<Output = Result<Event, CoreError>> + Send;
}

impl TicketLookup for BackendClient {
    async fn ticket_by_number(&self, ticket_number: &str) -> Result<Ticket, CoreError> {
        Ok(self.ticket_for_validation(ticket_number).await?.into())
    }

    async fn event_by_id(&self, id: &RecordId) -> Result<Event, CoreError> {
        Ok(self.get_event(id).await?.into())
    }
}

/// Lookup that refuses every request. Used when network access is
/// disabled, so only embedded payloads can validate.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

impl TicketLookup for OfflineLookup {
    async fn ticket_by_number(&self, _ticket_number: &str) -> Result<Ticket, CoreError> {
        Err(CoreError::Offline)
    }

    async fn event_by_id(&self, _id: &RecordId) -> Result<Event, CoreError> {
        Err(CoreError::Offline)
    }
}

/// Where a validated ticket's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValidationSource {
    /// Decoded from the link itself. Unauthenticated.
    Embedded,
    /// Fetched from the ticket service.
    Backend,
}

/// Result of a successful validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedTicket {
    pub ticket: Ticket,
    /// `None` when the event could not be fetched.
    pub event: Option<Event>,
    pub source: ValidationSource,
    pub validity: Validity,
}

impl ValidatedTicket {
    fn new(ticket: Ticket, event: Option<Event>, source: ValidationSource) -> Self {
        let validity = ticket.validity();
        Self {
            ticket,
            event,
            source,
            validity,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    pub fn is_verified(&self) -> bool {
        self.source == ValidationSource::Backend
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Ticket {ticket_number} not found or invalid")]
    NotFound {
        ticket_number: String,
        #[source]
        source: CoreError,
    },

    #[error("Could not reach the ticket service to validate {ticket_number}")]
    Network {
        ticket_number: String,
        #[source]
        source: CoreError,
    },

    #[error("Not a ticket validation link: {url}")]
    InvalidLink { url: String },

    #[error("Validation cancelled")]
    Cancelled,
}

impl ValidationError {
    fn from_lookup(ticket_number: &str, source: CoreError) -> Self {
        let ticket_number = ticket_number.to_owned();
        if source.is_network() {
            Self::Network {
                ticket_number,
                source,
            }
        } else {
            Self::NotFound {
                ticket_number,
                source,
            }
        }
    }
}

/// Validate `ticket_number`, preferring the embedded payload `data`.
pub async fn resolve_validation<L: TicketLookup>(
    lookup: &L,
    ticket_number: &str,
    data: Option<&str>,
) -> Result<ValidatedTicket, ValidationError> {
    if let Some(data) = data {
        match codec::decode_records(data, ticket_number, Utc::now()) {
            Ok((ticket, event)) => {
                debug!(ticket_number, "validated from embedded payload");
                return Ok(ValidatedTicket::new(
                    ticket,
                    Some(event),
                    ValidationSource::Embedded,
                ));
            }
            Err(e) => debug!(ticket_number, error = %e, "embedded payload unusable, asking backend"),
        }
    }

    let ticket = lookup
        .ticket_by_number(ticket_number)
        .await
        .map_err(|e| ValidationError::from_lookup(ticket_number, e))?;

    let event = if ticket.event_id.is_empty() {
        None
    } else {
        match lookup.event_by_id(&ticket.event_id).await {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(ticket_number, event_id = %ticket.event_id, error = %e, "event lookup failed");
                None
            }
        }
    };

    Ok(ValidatedTicket::new(ticket, event, ValidationSource::Backend))
}

/// Validate a scanned link of the form `/validate/<ticketNumber>?d=...`.
pub async fn resolve_validation_url<L: TicketLookup>(
    lookup: &L,
    url: &Url,
    cancel: &CancellationToken,
) -> Result<ValidatedTicket, ValidationError> {
    let link = codec::parse_validation_url(url).ok_or_else(|| ValidationError::InvalidLink {
        url: url.to_string(),
    })?;
    resolve_validation_with_cancel(lookup, &link.ticket_number, link.data.as_deref(), cancel).await
}

/// [`resolve_validation`], abandoned as soon as `cancel` fires.
pub async fn resolve_validation_with_cancel<L: TicketLookup>(
    lookup: &L,
    ticket_number: &str,
    data: Option<&str>,
    cancel: &CancellationToken,
) -> Result<ValidatedTicket, ValidationError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ValidationError::Cancelled),
        result = resolve_validation(lookup, ticket_number, data) => result,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    #[derive(Default)]
    struct FakeLookup {
        tickets: HashMap<String, Ticket>,
        events: HashMap<RecordId, Event>,
        event_error: bool,
        network_down: bool,
        calls: AtomicUsize,
    }

    impl TicketLookup for FakeLookup {
        async fn ticket_by_number(&self, ticket_number: &str) -> Result<Ticket, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.network_down {
                return Err(CoreError::ConnectionFailed {
                    url: "http://localhost:8080".into(),
                    reason: "connection refused".into(),
                });
            }
            self.tickets
                .get(ticket_number)
                .cloned()
                .ok_or_else(|| CoreError::NotFound {
                    path: format!("/api/tickets/validate/{ticket_number}"),
                })
        }

        async fn event_by_id(&self, id: &RecordId) -> Result<Event, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.event_error {
                return Err(CoreError::Api {
                    message: "boom".into(),
                    status: Some(500),
                });
            }
            self.events
                .get(id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound {
                    path: format!("/api/events/{id}"),
                })
        }
    }

    struct NeverLookup;

    impl TicketLookup for NeverLookup {
        async fn ticket_by_number(&self, _ticket_number: &str) -> Result<Ticket, CoreError> {
            std::future::pending().await
        }

        async fn event_by_id(&self, _id: &RecordId) -> Result<Event, CoreError> {
            std::future::pending().await
        }
    }

    fn backend_ticket(number: &str, status: &str) -> Ticket {
        Ticket {
            id: Some(1),
            ticket_number: number.into(),
            registration_id: None,
            event_id: RecordId::Number(42),
            user_id: RecordId::Number(7),
            status: status.into(),
            price: 25.0,
            seat_number: None,
            issued_at: None,
            created_at: None,
            has_qr_image: true,
        }
    }

    fn seeded() -> FakeLookup {
        let mut lookup = FakeLookup::default();
        lookup
            .tickets
            .insert("t-1".into(), backend_ticket("t-1", "CONFIRMED"));
        lookup.events.insert(
            RecordId::Number(42),
            Event {
                id: RecordId::Number(42),
                title: "Backend Con".into(),
                active: true,
                ..Event::default()
            },
        );
        lookup
    }

    #[tokio::test]
    async fn embedded_payload_needs_no_backend() {
        let lookup = seeded();
        let data = URL_SAFE_NO_PAD.encode(r#"{"tn":"t-1","et":"Demo Con","s":"ACTIVE"}"#);

        let result = resolve_validation(&lookup, "t-1", Some(&data)).await.unwrap();

        assert_eq!(result.source, ValidationSource::Embedded);
        assert!(result.is_valid());
        assert!(!result.is_verified());
        assert_eq!(result.event.unwrap().title, "Demo Con");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bad_base64_falls_back_to_backend() {
        let lookup = seeded();

        let result = resolve_validation(&lookup, "t-1", Some("%%%"))
            .await
            .unwrap();

        assert_eq!(result.source, ValidationSource::Backend);
        assert_eq!(result.event.unwrap().title, "Backend Con");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bad_json_falls_back_to_backend() {
        let lookup = seeded();
        let data = URL_SAFE_NO_PAD.encode("{not json");

        let result = resolve_validation(&lookup, "t-1", Some(&data)).await.unwrap();

        assert_eq!(result.source, ValidationSource::Backend);
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn missing_payload_uses_backend() {
        let lookup = seeded();
        let result = resolve_validation(&lookup, "t-1", None).await.unwrap();
        assert!(result.is_verified());
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let lookup = seeded();
        let err = resolve_validation(&lookup, "nope", None).await.unwrap_err();
        assert!(
            matches!(err, ValidationError::NotFound { ref ticket_number, .. } if ticket_number == "nope"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn connection_failure_is_a_network_error() {
        let lookup = FakeLookup {
            network_down: true,
            ..FakeLookup::default()
        };
        let err = resolve_validation(&lookup, "t-1", None).await.unwrap_err();
        assert!(matches!(err, ValidationError::Network { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn event_failure_keeps_the_ticket() {
        let mut lookup = seeded();
        lookup.event_error = true;

        let result = resolve_validation(&lookup, "t-1", None).await.unwrap();

        assert_eq!(result.ticket.ticket_number, "t-1");
        assert!(result.event.is_none());
    }

    #[tokio::test]
    async fn pending_status_is_reported() {
        let mut lookup = seeded();
        lookup
            .tickets
            .insert("t-2".into(), backend_ticket("t-2", "USED"));

        let result = resolve_validation(&lookup, "t-2", None).await.unwrap();

        assert_eq!(result.validity, Validity::Pending);
    }

    #[tokio::test]
    async fn offline_lookup_reports_network() {
        let err = resolve_validation(&OfflineLookup, "t-1", None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ValidationError::Network { source: CoreError::Offline, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn full_link_is_parsed_before_lookup() {
        let lookup = seeded();
        let cancel = CancellationToken::new();

        let url = Url::parse("https://example.com/validate/t-1").unwrap();
        let result = resolve_validation_url(&lookup, &url, &cancel).await.unwrap();
        assert_eq!(result.ticket.ticket_number, "t-1");

        let bad = Url::parse("https://example.com/events/42").unwrap();
        let err = resolve_validation_url(&lookup, &bad, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLink { .. }));
    }

    #[tokio::test]
    async fn cancellation_abandons_the_lookup() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolve_validation_with_cancel(&NeverLookup, "t-1", None, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationError::Cancelled));
    }
}
