// ── Event domain type ──

use serde::{Deserialize, Serialize};

use super::{PLACEHOLDER, RecordId};

/// An event as shown on ticket and validation screens.
///
/// `start_date` keeps the backend's raw ISO-8601 text so that validation
/// links reproduce it exactly; use [`crate::format`] to render it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
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
    pub image_url: Option<String>,
    pub active: bool,
}

impl Event {
    /// Title, or the placeholder when the snapshot carried none.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            PLACEHOLDER
        } else {
            &self.title
        }
    }

    /// Venue, or the placeholder when unknown.
    pub fn display_location(&self) -> &str {
        self.location
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(PLACEHOLDER)
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_tickets == Some(0)
    }
}
