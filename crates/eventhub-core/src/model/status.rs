// ── Ticket status & validity ──

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle statuses the ticket service is known to emit.
///
/// The wire value stays a plain string on [`Ticket`](super::Ticket) since
/// the backend may add statuses; this enum is only used to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TicketStatus {
    Active,
    Confirmed,
    Pending,
    Used,
    Cancelled,
}

/// How a ticket should be presented at the gate.
///
/// Anything that is not positively valid gets a neutral "check status"
/// treatment rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Validity {
    Valid,
    Pending,
}

/// Classify a raw status string. `ACTIVE` and `CONFIRMED` (any case,
/// surrounding whitespace ignored) are valid; everything else is pending.
pub fn classify_status(status: &str) -> Validity {
    match TicketStatus::from_str(status.trim()) {
        Ok(TicketStatus::Active | TicketStatus::Confirmed) => Validity::Valid,
        _ => Validity::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_and_confirmed_are_valid() {
        for status in ["ACTIVE", "CONFIRMED", "active", "Confirmed", " ACTIVE "] {
            assert_eq!(classify_status(status), Validity::Valid, "{status:?}");
        }
    }

    #[test]
    fn everything_else_is_pending() {
        for status in ["PENDING", "USED", "CANCELLED", "", "ACTIVATED", "valid"] {
            assert_eq!(classify_status(status), Validity::Pending, "{status:?}");
        }
    }

    #[test]
    fn status_round_trips_through_strum() {
        assert_eq!(TicketStatus::Used.to_string(), "USED");
        assert_eq!("cancelled".parse::<TicketStatus>().ok(), Some(TicketStatus::Cancelled));
    }
}
