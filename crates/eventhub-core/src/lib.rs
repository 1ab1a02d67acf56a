//! Domain layer between `eventhub-api` and the `eventhub` CLI.
//!
//! - **[`codec`]** -- the Ticket QR payload codec: builds and reads the
//!   `/validate/<ticketNumber>?d=<base64(JSON)>` links printed on tickets.
//!
//! - **[`validation`]** -- offline-first validation of a scanned link, with
//!   backend fallback through the [`TicketLookup`] seam and cancellation
//!   via `CancellationToken`.
//!
//! - **[`Hub`]** -- facade owning the [`BackendClient`] and the signed-in
//!   [`AuthContext`]: login, the user's tickets with their events, share
//!   links, printable [`TicketDocument`]s, and organizer check-in.
//!
//! - **Domain model** ([`model`]) -- `Ticket`, `Event`, `RecordId`, and
//!   status classification.

pub mod codec;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod format;
pub mod hub;
pub mod model;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::{
    DecodeError, EncodeError, ValidationLink, ValidationPayload, decode_records,
    encode_validation_url, parse_validation_url,
};
pub use config::{ClientConfig, TlsVerification};
pub use document::TicketDocument;
pub use error::CoreError;
pub use hub::{Hub, TicketBook, TicketGroup};
pub use validation::{
    OfflineLookup, TicketLookup, ValidatedTicket, ValidationError, ValidationSource,
    resolve_validation, resolve_validation_url, resolve_validation_with_cancel,
};

pub use eventhub_api::BackendClient;
pub use model::{
    AuthContext, Event, RecordId, Role, Ticket, TicketStatus, Validity, classify_status,
    short_ticket_number,
};
