// ── Ticket QR payload codec ──
//
// A validation link carries a self-contained snapshot of the ticket so a
// scanner can render it without network access:
//
//     <origin>/validate/<ticketNumber>?d=<base64(JSON)>
//
// The JSON uses short keys to keep QR codes small. The key set and order
// are an external contract shared by every producer and consumer of
// validation links:
//
//     tn  ticket number      el  event location
//     ei  event id           s   ticket status
//     et  event title        p   price
//     ed  event start date   ui  user id
//
// Links are produced with standard padded base64, the alphabet the web
// validation page reads with `atob`. The value is percent-escaped in the
// query string. Decoding also accepts the URL-safe alphabet, missing
// padding, and `+` turned into a space by unescaped query strings.
//
// The payload is NOT authenticated: anyone can mint a link that decodes
// to arbitrary ticket data. Callers must present embedded results as an
// unverified snapshot.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::model::{Event, RecordId, Ticket};

/// Query parameter that carries the encoded payload.
pub const DATA_PARAM: &str = "d";

/// Path segment that precedes the ticket number.
pub const VALIDATE_SEGMENT: &str = "validate";

/// Title used when a ticket is shared before its event is known.
const UNKNOWN_EVENT_TITLE: &str = "Event";

// ── Errors ──────────────────────────────────────────────────────────

/// Why an embedded payload could not be used.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not UTF-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload JSON is not an object")]
    NotAnObject,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("origin '{0}' cannot carry a path")]
    InvalidOrigin(String),

    #[error("failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Payload ─────────────────────────────────────────────────────────

/// Point-in-time snapshot of a ticket and its event, as embedded in a
/// validation link. Never mutated: a new payload is built every time a
/// ticket is shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationPayload {
    #[serde(rename = "tn")]
    pub ticket_number: String,
    #[serde(rename = "ei")]
    pub event_id: RecordId,
    #[serde(rename = "et")]
    pub event_title: String,
    #[serde(rename = "ed")]
    pub event_start_date: String,
    #[serde(rename = "el")]
    pub event_location: String,
    #[serde(rename = "s")]
    pub status: String,
    #[serde(rename = "p", serialize_with = "serialize_price")]
    pub price: f64,
    #[serde(rename = "ui")]
    pub user_id: RecordId,
}

impl ValidationPayload {
    /// Snapshot a ticket and its event. Unknown event fields become
    /// `"Event"` (title) or empty strings.
    pub fn from_records(ticket: &Ticket, event: Option<&Event>) -> Self {
        Self {
            ticket_number: ticket.ticket_number.clone(),
            event_id: ticket.event_id.clone(),
            event_title: event
                .map(|e| e.title.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_EVENT_TITLE)
                .to_owned(),
            event_start_date: event
                .and_then(|e| e.start_date.clone())
                .unwrap_or_default(),
            event_location: event.and_then(|e| e.location.clone()).unwrap_or_default(),
            status: ticket.status.clone(),
            price: ticket.price,
            user_id: ticket.user_id.clone(),
        }
    }

    /// Compact JSON with the short keys in contract order.
    pub fn to_json(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The `d` parameter value.
    pub fn encode(&self) -> Result<String, EncodeError> {
        Ok(STANDARD.encode(self.to_json()?))
    }

    /// Build `<origin>/validate/<ticketNumber>?d=<encoded>`.
    ///
    /// Any path on `origin` is kept as a prefix; its query and fragment
    /// are dropped. `+`, `/` and `=` in the payload are percent-escaped.
    pub fn to_url(&self, origin: &Url) -> Result<Url, EncodeError> {
        let encoded = self.encode()?;
        let mut url = origin.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| EncodeError::InvalidOrigin(origin.to_string()))?
            .pop_if_empty()
            .extend([VALIDATE_SEGMENT, self.ticket_number.as_str()]);
        url.query_pairs_mut().append_pair(DATA_PARAM, &encoded);
        Ok(url)
    }

    /// Decode a `d` parameter value.
    ///
    /// Keys that are missing or carry an unexpected type fall back to
    /// defaults (empty strings, zero price, empty ids) instead of failing;
    /// only undecodable text or non-object JSON is an error.
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        let bytes = decode_base64(encoded)?;
        let text = String::from_utf8(bytes)?;
        let value: Value = serde_json::from_str(&text)?;
        Self::from_json(&value)
    }

    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        let Value::Object(map) = value else {
            return Err(DecodeError::NotAnObject);
        };
        Ok(Self {
            ticket_number: text(map, "tn").unwrap_or_default(),
            event_id: id(map, "ei").unwrap_or_default(),
            event_title: text(map, "et").unwrap_or_default(),
            event_start_date: text(map, "ed").unwrap_or_default(),
            event_location: text(map, "el").unwrap_or_default(),
            status: text(map, "s").unwrap_or_default(),
            price: number(map, "p").unwrap_or_default(),
            user_id: id(map, "ui").unwrap_or_default(),
        })
    }

    /// Rebuild display records from the snapshot.
    ///
    /// The payload does not carry an issue timestamp, so `issued_at` is set
    /// to `now`. `path_ticket_number` fills in for a missing `tn`.
    pub fn into_records(self, path_ticket_number: &str, now: DateTime<Utc>) -> (Ticket, Event) {
        let ticket_number = if self.ticket_number.is_empty() {
            path_ticket_number.to_owned()
        } else {
            self.ticket_number
        };
        let ticket = Ticket {
            id: None,
            ticket_number,
            registration_id: None,
            event_id: self.event_id.clone(),
            user_id: self.user_id,
            status: self.status,
            price: self.price,
            seat_number: None,
            issued_at: Some(now),
            created_at: None,
            has_qr_image: false,
        };
        let event = Event {
            id: self.event_id,
            title: self.event_title,
            location: non_empty(self.event_location),
            start_date: non_empty(self.event_start_date),
            active: true,
            ..Event::default()
        };
        (ticket, event)
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// Produce the validation link for a ticket. Pure: no I/O.
pub fn encode_validation_url(
    ticket: &Ticket,
    event: Option<&Event>,
    origin: &Url,
) -> Result<Url, EncodeError> {
    ValidationPayload::from_records(ticket, event).to_url(origin)
}

/// Decode a `d` parameter into display records.
pub fn decode_records(
    encoded: &str,
    path_ticket_number: &str,
    now: DateTime<Utc>,
) -> Result<(Ticket, Event), DecodeError> {
    ValidationPayload::decode(encoded).map(|p| p.into_records(path_ticket_number, now))
}

/// The parts of a validation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationLink {
    pub ticket_number: String,
    /// Raw `d` value, if present and non-empty.
    pub data: Option<String>,
}

/// Split a validation link into ticket number and payload.
///
/// Returns `None` unless the path contains `/validate/<ticketNumber>`.
/// The ticket number is percent-decoded.
pub fn parse_validation_url(url: &Url) -> Option<ValidationLink> {
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == VALIDATE_SEGMENT)?;
    let segment = segments.next().filter(|s| !s.is_empty())?;
    let ticket_number = percent_decode_str(segment)
        .decode_utf8()
        .map_or_else(|_| segment.to_owned(), std::borrow::Cow::into_owned);
    let data = url
        .query_pairs()
        .find(|(key, _)| key == DATA_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty());
    Some(ValidationLink {
        ticket_number,
        data,
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Largest magnitude below which every integer is exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole prices are written as integers (`25`, not `25.0`).
#[allow(
    clippy::trivially_copy_pass_by_ref,
    clippy::float_cmp,
    clippy::as_conversions,
    clippy::cast_possible_truncation
)]
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if price.fract() == 0.0 && price.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

/// Accept either base64 alphabet, with or without padding.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = encoded
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' | ' ' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized)
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn id(map: &Map<String, Value>, key: &str) -> Option<RecordId> {
    match map.get(key)? {
        Value::Number(n) => Some(
            n.as_i64()
                .map_or_else(|| RecordId::Text(n.to_string()), RecordId::Number),
        ),
        Value::String(s) => Some(RecordId::Text(s.clone())),
        _ => None,
    }
}

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
