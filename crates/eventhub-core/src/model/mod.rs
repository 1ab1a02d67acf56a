// ── Domain model ──
//
// Typed records for tickets, events, and the signed-in session. The
// wire shapes live in `eventhub_api::models`; `crate::convert` maps them
// into these types.

pub mod event;
pub mod session;
pub mod status;
pub mod ticket;

pub use eventhub_api::RecordId;
pub use event::Event;
pub use session::{AuthContext, Role};
pub use status::{TicketStatus, Validity, classify_status};
pub use ticket::{Ticket, short_ticket_number};

/// Placeholder shown for event fields that are unknown.
pub const PLACEHOLDER: &str = "TBD";
