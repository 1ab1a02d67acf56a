// Event service endpoints

use tracing::debug;

use crate::client::{BackendClient, Service};
use crate::error::Error;
use crate::models::{EventRecord, RecordId};

impl BackendClient {
    /// List all events.
    ///
    /// `GET /api/events`
    pub async fn list_events(&self) -> Result<Vec<EventRecord>, Error> {
        debug!("listing events");
        self.get_json(Service::Events, &["api", "events"]).await
    }

    /// Fetch one event.
    ///
    /// `GET /api/events/{id}`
    pub async fn get_event(&self, id: &RecordId) -> Result<EventRecord, Error> {
        let id = id.to_string();
        debug!(event_id = %id, "fetching event");
        self.get_json(Service::Events, &["api", "events", &id]).await
    }

    /// Events whose category matches exactly.
    ///
    /// `GET /api/events/category/{category}`
    pub async fn events_by_category(&self, category: &str) -> Result<Vec<EventRecord>, Error> {
        debug!(category, "listing events by category");
        self.get_json(Service::Events, &["api", "events", "category", category])
            .await
    }

    /// Keyword search over event titles and descriptions.
    ///
    /// `GET /api/events/search/{keyword}`
    pub async fn search_events(&self, keyword: &str) -> Result<Vec<EventRecord>, Error> {
        debug!(keyword, "searching events");
        self.get_json(Service::Events, &["api", "events", "search", keyword])
            .await
    }
}
