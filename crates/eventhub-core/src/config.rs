// ── Runtime connection configuration ──
//
// These types describe *how* to reach the EventHub backend and which
// public origin validation links point at. They never touch disk: the CLI
// builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use eventhub_api::transport::{TlsMode, TransportConfig};
use eventhub_api::ServiceUrls;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for talking to one EventHub deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway URL every service defaults to (e.g. `http://localhost:8080`).
    pub backend: Url,
    /// Direct auth service URL, bypassing the gateway.
    pub auth_url: Option<Url>,
    /// Direct event service URL, bypassing the gateway.
    pub events_url: Option<Url>,
    /// Direct ticket service URL, bypassing the gateway.
    pub tickets_url: Option<Url>,
    /// Public site origin that serves `/validate/...` pages.
    pub origin: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config with every service behind `backend` and default settings.
    pub fn new(backend: Url, origin: Url) -> Self {
        Self {
            backend,
            auth_url: None,
            events_url: None,
            tickets_url: None,
            origin,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn service_urls(&self) -> ServiceUrls {
        let mut urls = ServiceUrls::gateway(self.backend.clone());
        if let Some(ref url) = self.auth_url {
            urls.auth = url.clone();
        }
        if let Some(ref url) = self.events_url {
            urls.events = url.clone();
        }
        if let Some(ref url) = self.tickets_url {
            urls.tickets = url.clone();
        }
        urls
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn service_overrides_replace_gateway() {
        let mut config = ClientConfig::new(
            Url::parse("http://localhost:8080").unwrap(),
            Url::parse("http://localhost:3000").unwrap(),
        );
        config.tickets_url = Some(Url::parse("http://localhost:8084").unwrap());

        let urls = config.service_urls();
        assert_eq!(urls.auth.as_str(), "http://localhost:8080/");
        assert_eq!(urls.events.as_str(), "http://localhost:8080/");
        assert_eq!(urls.tickets.as_str(), "http://localhost:8084/");
    }

    #[test]
    fn transport_mirrors_tls_choice() {
        let mut config = ClientConfig::new(
            Url::parse("https://api.example.com").unwrap(),
            Url::parse("https://example.com").unwrap(),
        );
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }
}
