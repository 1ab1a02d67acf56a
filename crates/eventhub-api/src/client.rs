// Backend HTTP client
//
// Wraps `reqwest::Client` with per-service URL routing, bearer token
// injection, and status-to-error mapping. Endpoint groups (auth, events,
// tickets) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Backend service an endpoint belongs to.
///
/// The services can sit behind one gateway or be reached directly, so each
/// gets its own base URL in [`ServiceUrls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Events,
    Tickets,
}

/// Base URL per backend service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub auth: Url,
    pub events: Url,
    pub tickets: Url,
}

impl ServiceUrls {
    /// Route every service through a single gateway URL.
    pub fn gateway(base: Url) -> Self {
        Self {
            auth: base.clone(),
            events: base.clone(),
            tickets: base,
        }
    }

    pub fn base(&self, service: Service) -> &Url {
        match service {
            Service::Auth => &self.auth,
            Service::Events => &self.events,
            Service::Tickets => &self.tickets,
        }
    }
}

/// HTTP client for the EventHub backend.
///
/// Every endpoint goes through the same generic JSON request path, so
/// status handling and logging are uniform across services. The bearer
/// token is optional: public endpoints (event listing, ticket validation)
/// work without it.
pub struct BackendClient {
    http: reqwest::Client,
    urls: ServiceUrls,
    token: Option<SecretString>,
}

impl BackendClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(urls: ServiceUrls, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            urls,
            token: None,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, urls: ServiceUrls) -> Self {
        Self {
            http,
            urls,
            token: None,
        }
    }

    /// Attach a bearer token to every subsequent request.
    pub fn set_token(&mut self, token: SecretString) {
        debug!("bearer token set");
        self.token = Some(token);
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn require_token(&self) -> Result<(), Error> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(Error::MissingToken)
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{service base}/{segments...}`, percent-encoding each segment.
    pub fn endpoint(&self, service: Service, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.urls.base(service).clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body as `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        segments: &[&str],
    ) -> Result<T, Error> {
        let url = self.endpoint(service, segments)?;
        debug!("GET {}", url);
        let resp = self.authorize(self.http.get(url)).send().await?;
        Self::parse_json(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        service: Service,
        segments: &[&str],
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.endpoint(service, segments)?;
        debug!("POST {}", url);
        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        Self::parse_json(resp).await
    }

    /// Send a bodiless POST and expect no meaningful response body.
    pub async fn post_empty(&self, service: Service, segments: &[&str]) -> Result<(), Error> {
        let url = self.endpoint(service, segments)?;
        debug!("POST {}", url);
        let resp = self.authorize(self.http.post(url)).send().await?;
        Self::check_status(resp).await.map(|_| ())
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        trace!(len = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Map non-success statuses to typed errors, passing successful
    /// responses through untouched.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let path = resp.url().path().to_owned();
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        debug!(status = status.as_u16(), %path, %message, "backend returned an error");

        Err(match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { path },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Pull a human-readable message out of a backend error body.
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message.or(parsed.error),
        Err(_) => Some(preview(body).to_owned()),
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::with_client(
            reqwest::Client::new(),
            ServiceUrls::gateway(Url::parse(base).unwrap()),
        )
    }

    #[test]
    fn endpoint_appends_segments() {
        let c = client("http://localhost:8080");
        let url = c.endpoint(Service::Tickets, &["api", "tickets", "validate", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/tickets/validate/abc");
    }

    #[test]
    fn endpoint_keeps_base_path_and_escapes() {
        let c = client("https://gateway.example.com/backend/");
        let url = c.endpoint(Service::Events, &["api", "events", "search", "rock & roll"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://gateway.example.com/backend/api/events/search/rock%20&%20roll"
        );
    }

    #[test]
    fn per_service_routing() {
        let mut urls = ServiceUrls::gateway(Url::parse("http://localhost:8080").unwrap());
        urls.tickets = Url::parse("http://localhost:8084").unwrap();
        let c = BackendClient::with_client(reqwest::Client::new(), urls);
        let url = c.endpoint(Service::Tickets, &["api", "tickets", "1"]).unwrap();
        assert_eq!(url.port(), Some(8084));
        let url = c.endpoint(Service::Auth, &["api", "auth", "login"]).unwrap();
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"message":"Ticket not found","error":"Not Found"}"#).as_deref(),
            Some("Ticket not found")
        );
        assert_eq!(
            error_message(r#"{"error":"Internal Server Error"}"#).as_deref(),
            Some("Internal Server Error")
        );
        assert_eq!(error_message("").as_deref(), None);
        assert_eq!(error_message("plain text").as_deref(), Some("plain text"));
    }
}
