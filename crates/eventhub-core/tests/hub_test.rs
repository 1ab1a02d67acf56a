#![allow(clippy::unwrap_used)]
// Integration tests for `Hub` and the validation fallback against a
// mocked backend.

use secrecy::SecretString;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventhub_api::ServiceUrls;
use eventhub_core::{
    AuthContext, BackendClient, CoreError, Hub, RecordId, Role, ValidationError,
    ValidationSource, Validity, parse_validation_url,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn origin() -> Url {
    Url::parse("https://tickets.example.com").unwrap()
}

async fn setup() -> (MockServer, Hub) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BackendClient::with_client(reqwest::Client::new(), ServiceUrls::gateway(base_url));
    (server, Hub::with_client(client, origin()))
}

fn session(role: Role) -> AuthContext {
    AuthContext {
        token: SecretString::from("jwt-token".to_string()),
        user_id: RecordId::Number(7),
        display_name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        role,
    }
}

async fn mount_user_tickets(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tickets/user/7"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "ticketNumber": "abcdef12-0000-4000-8000-000000000001",
                "eventId": 42,
                "userId": 7,
                "status": "ACTIVE",
                "price": 19.99
            },
            {
                "id": 2,
                "ticketNumber": "12345678-0000-4000-8000-000000000002",
                "eventId": 42,
                "userId": 7,
                "status": "ACTIVE",
                "price": 19.99
            },
            {
                "id": 3,
                "ticketNumber": "99999999-0000-4000-8000-000000000003",
                "eventId": 43,
                "userId": 7,
                "status": "PENDING",
                "price": 5.0
            }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/events/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "title": "Demo Con",
            "location": "Hall A",
            "startDate": "2025-12-01T10:00:00"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/events/43"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn login_stores_session_and_token() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "token": "jwt-token",
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "ORGANIZER"
        })))
        .mount(&server)
        .await;

    let ctx = hub
        .login("ada@example.com", &SecretString::from("pw".to_string()))
        .await
        .unwrap();

    assert_eq!(ctx.role, Role::Organizer);
    assert_eq!(hub.session().unwrap().display_name, "Ada Lovelace");
    assert!(hub.client().has_token());

    assert!(hub.logout().is_some());
    assert!(hub.session().is_none());
    assert!(!hub.client().has_token());
}

#[tokio::test]
async fn tickets_require_a_session() {
    let (_server, hub) = setup().await;
    let err = hub.my_tickets().await.unwrap_err();
    assert!(matches!(err, CoreError::NotLoggedIn));
}

// ── Tickets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn my_tickets_tolerates_event_failures() {
    let (server, hub) = setup().await;
    let hub = hub.with_session(session(Role::User));
    mount_user_tickets(&server).await;

    let book = hub.my_tickets().await.unwrap();

    assert_eq!(book.tickets.len(), 3);
    assert_eq!(book.events.len(), 1);
    assert_eq!(book.events[&RecordId::Number(42)].title, "Demo Con");
    assert!(!book.events.contains_key(&RecordId::Number(43)));

    let groups = hub.grouped_tickets().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].tickets.len(), 2);
}

#[tokio::test]
async fn share_link_embeds_ticket_and_event() {
    let (server, hub) = setup().await;
    let hub = hub.with_session(session(Role::User));
    mount_user_tickets(&server).await;

    let url = hub.share_link("ABCDEF12", None).await.unwrap();

    assert_eq!(
        url.path(),
        "/validate/abcdef12-0000-4000-8000-000000000001"
    );
    let link = parse_validation_url(&url).unwrap();
    let (ticket, event) = eventhub_core::decode_records(
        link.data.as_deref().unwrap(),
        &link.ticket_number,
        chrono::Utc::now(),
    )
    .unwrap();
    assert_eq!(ticket.event_id, RecordId::Number(42));
    assert_eq!(event.title, "Demo Con");
    assert_eq!(event.start_date.as_deref(), Some("2025-12-01T10:00:00"));
}

#[tokio::test]
async fn ticket_document_counts_tickets_for_the_event() {
    let (server, hub) = setup().await;
    let hub = hub.with_session(session(Role::User));
    mount_user_tickets(&server).await;

    let doc = hub.ticket_document("abcdef12").await.unwrap();
    let html = doc.render();

    assert_eq!(doc.file_name(), "ticket-demo-con-ABCDEF12.html");
    assert!(html.contains("2 Tickets"));
    assert!(html.contains("$39.98"));
    assert!(html.contains("https://tickets.example.com/validate/abcdef12-"));
}

#[tokio::test]
async fn check_in_is_for_organizers() {
    let (_server, hub) = setup().await;
    let hub = hub.with_session(session(Role::User));

    let err = hub.check_in("abc").await.unwrap_err();

    assert!(matches!(err, CoreError::PermissionDenied { ref role, .. } if role == "USER"));
}

#[tokio::test]
async fn organizer_check_in_hits_backend() {
    let (server, hub) = setup().await;
    let hub = hub.with_session(session(Role::Organizer));

    Mock::given(method("POST"))
        .and(path("/api/tickets/abc/validate"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ticketNumber": "abc",
            "status": "USED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    hub.check_in("abc").await.unwrap();
}

#[tokio::test]
async fn check_in_unknown_ticket() {
    let (server, hub) = setup().await;
    let hub = hub.with_session(session(Role::Admin));

    Mock::given(method("POST"))
        .and(path("/api/tickets/nope/validate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = hub.check_in("nope").await.unwrap_err();
    assert!(matches!(err, CoreError::TicketNotFound { .. }));
}

// ── Validation fallback ─────────────────────────────────────────────

#[tokio::test]
async fn validate_without_payload_uses_backend() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tickets/validate/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ticketNumber": "t-1",
            "eventId": 42,
            "userId": 7,
            "status": "CONFIRMED",
            "price": 10.0
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "title": "Demo Con"
        })))
        .mount(&server)
        .await;

    let url = Url::parse("https://tickets.example.com/validate/t-1").unwrap();
    let result = hub.validate(&url, &CancellationToken::new()).await.unwrap();

    assert_eq!(result.source, ValidationSource::Backend);
    assert_eq!(result.validity, Validity::Valid);
    assert_eq!(result.event.unwrap().title, "Demo Con");
}

#[tokio::test]
async fn validate_corrupt_payload_falls_back() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tickets/validate/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ticketNumber": "t-1",
            "eventId": 42,
            "status": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/42"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = Url::parse("https://tickets.example.com/validate/t-1?d=%25%25%25").unwrap();
    let result = hub.validate(&url, &CancellationToken::new()).await.unwrap();

    assert_eq!(result.source, ValidationSource::Backend);
    assert!(result.event.is_none());
}

#[tokio::test]
async fn validate_unknown_ticket_is_not_found() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tickets/validate/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = Url::parse("https://tickets.example.com/validate/missing").unwrap();
    let err = hub
        .validate(&url, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ValidationError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn validate_unreachable_backend_is_network() {
    // Nothing listens on port 1.
    let urls = ServiceUrls::gateway(Url::parse("http://127.0.0.1:1").unwrap());
    let hub = Hub::with_client(BackendClient::with_client(reqwest::Client::new(), urls), origin());

    let url = Url::parse("https://tickets.example.com/validate/t-1").unwrap();
    let err = hub
        .validate(&url, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ValidationError::Network { .. }), "{err:?}");
}
