// eventhub-api: Async Rust client for the EventHub ticketing backend

pub mod auth;
pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod tickets;
pub mod transport;

pub use client::{BackendClient, Service, ServiceUrls};
pub use error::Error;
pub use models::{
    AuthResponse, EventRecord, LoginRequest, RecordId, SignupRequest, TicketRecord,
};
pub use transport::{TlsMode, TransportConfig};
