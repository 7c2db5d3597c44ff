use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use tourism_api::config::AppConfig;
use tourism_api::db;
use tourism_api::handlers;
use tourism_api::services::email::{EmailProvider, OutboundEmail};
use tourism_api::services::messaging::MessagingProvider;
use tourism_api::services::notifications::Notifier;
use tourism_api::state::AppState;

const ADMIN_EMAIL: &str = "admin@misba.test";
const ADMIN_PHONE: &str = "+15559999999";
const TOKEN: &str = "test-token";

// ── Mock Providers ──

type SentEmails = Arc<Mutex<Vec<OutboundEmail>>>;
type SentSms = Arc<Mutex<Vec<(String, String)>>>;

#[derive(Clone, Copy, PartialEq)]
enum Behaviour {
    Succeed,
    Fail,
    Stall,
}

struct MockEmail {
    sent: SentEmails,
    behaviour: Behaviour,
}

#[async_trait]
impl EmailProvider for MockEmail {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => anyhow::bail!("smtp connection refused"),
            Behaviour::Stall => std::future::pending().await,
        }
    }
}

struct MockSms {
    sent: SentSms,
    behaviour: Behaviour,
}

#[async_trait]
impl MessagingProvider for MockSms {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => anyhow::bail!("twilio returned 503"),
            Behaviour::Stall => std::future::pending().await,
        }
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: TOKEN.to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_phone: ADMIN_PHONE.to_string(),
        business_name: "Misba Tourism".to_string(),
        support_phone: "+91 63838 55638".to_string(),
        email_from_address: "noreply@misba.test".to_string(),
        email_from_name: "Misba Tourism".to_string(),
        smtp_host: String::new(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        smtp_use_tls: false,
        twilio_account_sid: String::new(),
        twilio_auth_token: String::new(),
        twilio_phone_number: String::new(),
        cors_allowed_origins: vec![],
    }
}

struct Harness {
    app: Router,
    emails: SentEmails,
    sms: SentSms,
}

fn harness_with(behaviour: Behaviour) -> Harness {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let emails: SentEmails = Arc::new(Mutex::new(vec![]));
    let sms: SentSms = Arc::new(Mutex::new(vec![]));

    let email_provider: Arc<dyn EmailProvider> = Arc::new(MockEmail {
        sent: Arc::clone(&emails),
        behaviour,
    });
    let sms_provider: Arc<dyn MessagingProvider> = Arc::new(MockSms {
        sent: Arc::clone(&sms),
        behaviour,
    });
    let notifier = Notifier::new(&config, Some(email_provider), Some(sms_provider));

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        notifier,
    });
    Harness {
        app: handlers::router(state),
        emails,
        sms,
    }
}

fn harness() -> Harness {
    harness_with(Behaviour::Succeed)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value, auth: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if auth {
        builder = builder.header("Authorization", format!("Bearer {TOKEN}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, auth: bool) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if auth {
        builder = builder.header("Authorization", format!("Bearer {TOKEN}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Lets detached notification tasks run until `done` holds or a deadline passes.
async fn settle(done: impl Fn() -> bool) {
    for _ in 0..100 {
        if done() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    // Give any stragglers a chance to show up before asserting exact counts.
    tokio::time::sleep(Duration::from_millis(50)).await;
}

fn booking_body() -> serde_json::Value {
    serde_json::json!({
        "booking_type": "cottage",
        "customer_name": "Jane Doe",
        "customer_email": "jane@example.com",
        "customer_phone": "+15550001111",
        "start_date": "2026-12-20",
        "number_of_guests": 2
    })
}

fn contact_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Amir Khan",
        "email": "amir@example.com",
        "subject": "Group tour",
        "message": "Do you run tours for 20 people?"
    })
}

fn taxi_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Innova Crysta",
        "description": "Comfortable seven seater",
        "vehicle_type": "SUV",
        "capacity": 7,
        "price_per_km": "18.50"
    })
}

// ── Booking Tests ──

#[tokio::test]
async fn test_booking_created_and_retrievable() {
    let h = harness();

    let (status, json) = send(&h.app, json_request("POST", "/api/bookings", booking_body(), false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["booking_type"], "cottage");
    assert_eq!(json["end_date"], serde_json::Value::Null);

    let id = json["id"].as_i64().unwrap();
    let (status, json) = send(&h.app, get_request(&format!("/api/bookings/{id}"), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["customer_email"], "jane@example.com");
}

#[tokio::test]
async fn test_booking_dispatches_two_emails_and_two_sms() {
    let h = harness();

    let (status, _) = send(&h.app, json_request("POST", "/api/bookings", booking_body(), false)).await;
    assert_eq!(status, StatusCode::CREATED);

    settle(|| h.emails.lock().unwrap().len() >= 2 && h.sms.lock().unwrap().len() >= 2).await;

    let emails = h.emails.lock().unwrap();
    assert_eq!(emails.len(), 2);
    assert!(emails.iter().any(|e| e.recipients == vec!["jane@example.com"]));
    assert!(emails.iter().any(|e| e.recipients == vec![ADMIN_EMAIL]));

    let sms = h.sms.lock().unwrap();
    assert_eq!(sms.len(), 2);
    assert!(sms.iter().any(|(to, _)| to == ADMIN_PHONE));
    assert!(sms.iter().any(|(to, _)| to == "+15550001111"));
}

#[tokio::test]
async fn test_booking_without_phone_skips_customer_sms() {
    let h = harness();
    let mut body = booking_body();
    body.as_object_mut().unwrap().remove("customer_phone");

    let (status, _) = send(&h.app, json_request("POST", "/api/bookings", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);

    settle(|| h.emails.lock().unwrap().len() >= 2 && !h.sms.lock().unwrap().is_empty()).await;

    assert_eq!(h.emails.lock().unwrap().len(), 2);
    let sms = h.sms.lock().unwrap();
    assert_eq!(sms.len(), 1);
    assert_eq!(sms[0].0, ADMIN_PHONE);
}

#[tokio::test]
async fn test_booking_content_greeting_and_missing_end_date() {
    let h = harness();

    let (status, _) = send(&h.app, json_request("POST", "/api/bookings", booking_body(), false)).await;
    assert_eq!(status, StatusCode::CREATED);

    settle(|| h.emails.lock().unwrap().len() >= 2).await;

    let emails = h.emails.lock().unwrap();
    let customer = emails
        .iter()
        .find(|e| e.recipients == vec!["jane@example.com"])
        .unwrap();
    assert!(customer.text_body.contains("JANE"));
    assert_eq!(customer.subject, "BOOKING RECEIVED - MISBA TOURISM");

    let admin = emails.iter().find(|e| e.recipients == vec![ADMIN_EMAIL]).unwrap();
    assert!(admin.text_body.contains("End Date: N/A"));
    assert_eq!(admin.subject, "NEW COTTAGE BOOKING REQUEST - JANE DOE");
}

#[tokio::test]
async fn test_booking_succeeds_when_providers_fail() {
    let h = harness_with(Behaviour::Fail);

    let (status, json) = send(&h.app, json_request("POST", "/api/bookings", booking_body(), false)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_i64().unwrap();

    settle(|| h.emails.lock().unwrap().len() >= 2 && h.sms.lock().unwrap().len() >= 2).await;
    assert_eq!(h.emails.lock().unwrap().len(), 2);

    let (status, _) = send(&h.app, get_request(&format!("/api/bookings/{id}"), true)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_does_not_wait_for_stalled_providers() {
    let h = harness_with(Behaviour::Stall);

    let res = tokio::time::timeout(
        Duration::from_secs(2),
        send(&h.app, json_request("POST", "/api/bookings", booking_body(), false)),
    )
    .await
    .expect("booking creation blocked on a stalled notification");
    assert_eq!(res.0, StatusCode::CREATED);

    // The stalled deliveries were still attempted.
    settle(|| h.emails.lock().unwrap().len() >= 2).await;
    assert_eq!(h.emails.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_booking_missing_email_rejected_without_notifications() {
    let h = harness();
    let mut body = booking_body();
    body.as_object_mut().unwrap().remove("customer_email");

    let (status, json) = send(&h.app, json_request("POST", "/api/bookings", body, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["customer_email"].is_array());

    settle(|| false).await;
    assert!(h.emails.lock().unwrap().is_empty());
    assert!(h.sms.lock().unwrap().is_empty());

    let (_, list) = send(&h.app, get_request("/api/bookings", true)).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_booking_malformed_json_rejected() {
    let h = harness();
    let req = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"booking_type\": \"boat\""))
        .unwrap();

    let (status, _) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unknown_booking_type_rejected() {
    let h = harness();
    let mut body = booking_body();
    body["booking_type"] = serde_json::json!("boat");

    let (status, _) = send(&h.app, json_request("POST", "/api/bookings", body, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unknown_reference_rejected() {
    let h = harness();
    let mut body = booking_body();
    body["cottage"] = serde_json::json!(999);

    let (status, json) = send(&h.app, json_request("POST", "/api/bookings", body, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["cottage"].is_array());
}

#[tokio::test]
async fn test_public_booking_cannot_set_status() {
    let h = harness();
    let mut body = booking_body();
    body["status"] = serde_json::json!("confirmed");

    let (status, json) = send(&h.app, json_request("POST", "/api/bookings", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn test_booking_status_updated_by_admin() {
    let h = harness();
    let (_, json) = send(&h.app, json_request("POST", "/api/bookings", booking_body(), false)).await;
    let id = json["id"].as_i64().unwrap();
    let uri = format!("/api/bookings/{id}");

    let patch = serde_json::json!({ "status": "confirmed" });
    let (status, _) = send(&h.app, json_request("PATCH", &uri, patch.clone(), false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = send(&h.app, json_request("PATCH", &uri, patch, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["customer_name"], "Jane Doe");
}

#[tokio::test]
async fn test_booking_list_requires_auth() {
    let h = harness();

    let (status, _) = send(&h.app, get_request("/api/bookings", false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/bookings")
        .header("Authorization", "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&h.app, get_request("/api/bookings", true)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_booking_not_found() {
    let h = harness();
    let (status, _) = send(&h.app, get_request("/api/bookings/4242", true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Contact Tests ──

#[tokio::test]
async fn test_contact_without_phone_only_admin_sms() {
    let h = harness();

    let (status, json) = send(&h.app, json_request("POST", "/api/contacts", contact_body(), false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["phone"], serde_json::Value::Null);

    settle(|| h.emails.lock().unwrap().len() >= 2 && !h.sms.lock().unwrap().is_empty()).await;

    let sms = h.sms.lock().unwrap();
    assert_eq!(sms.len(), 1);
    assert_eq!(sms[0].0, ADMIN_PHONE);

    let emails = h.emails.lock().unwrap();
    assert_eq!(emails.len(), 2);
    let customer = emails
        .iter()
        .find(|e| e.recipients == vec!["amir@example.com"])
        .unwrap();
    assert!(customer.text_body.contains("HELLO AMIR,"));
}

#[tokio::test]
async fn test_contact_with_phone_sends_customer_sms() {
    let h = harness();
    let mut body = contact_body();
    body["phone"] = serde_json::json!("+15550002222");

    let (status, _) = send(&h.app, json_request("POST", "/api/contacts", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);

    settle(|| h.sms.lock().unwrap().len() >= 2).await;
    let sms = h.sms.lock().unwrap();
    assert_eq!(sms.len(), 2);
    assert!(sms.iter().any(|(to, _)| to == "+15550002222"));
}

#[tokio::test]
async fn test_contact_invalid_email_rejected() {
    let h = harness();
    let mut body = contact_body();
    body["email"] = serde_json::json!("not-an-email");

    let (status, json) = send(&h.app, json_request("POST", "/api/contacts", body, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["email"].is_array());

    settle(|| false).await;
    assert!(h.emails.lock().unwrap().is_empty());
}

// ── Newsletter Tests ──

#[tokio::test]
async fn test_newsletter_subscription_is_idempotent() {
    let h = harness();
    let body = serde_json::json!({ "email": "reader@example.com" });

    let (status, json) = send(&h.app, json_request("POST", "/api/newsletters", body.clone(), false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Successfully subscribed to our newsletter!");

    settle(|| !h.emails.lock().unwrap().is_empty()).await;

    let again = serde_json::json!({ "email": "  Reader@Example.com " });
    let (status, json) = send(&h.app, json_request("POST", "/api/newsletters", again, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "You are already subscribed to our newsletter!");

    settle(|| false).await;

    let emails = h.emails.lock().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].recipients, vec!["reader@example.com"]);
    assert_eq!(emails[0].subject, "Welcome to Misba Tourism Newsletter!");
    assert!(h.sms.lock().unwrap().is_empty());
    drop(emails);

    let (_, list) = send(&h.app, get_request("/api/newsletters", true)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_newsletter_requires_email() {
    let h = harness();

    let (status, json) = send(&h.app, json_request("POST", "/api/newsletters", serde_json::json!({}), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Email is required");
}

#[tokio::test]
async fn test_newsletter_inactive_subscriber_reactivated() {
    let h = harness();
    let body = serde_json::json!({ "email": "reader@example.com" });

    let (_, _) = send(&h.app, json_request("POST", "/api/newsletters", body.clone(), false)).await;
    let (_, list) = send(&h.app, get_request("/api/newsletters", true)).await;
    let id = list[0]["id"].as_i64().unwrap();

    let (status, json) = send(
        &h.app,
        json_request(
            "PATCH",
            &format!("/api/newsletters/{id}"),
            serde_json::json!({ "is_active": false }),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_active"], false);

    let (status, _) = send(&h.app, json_request("POST", "/api/newsletters", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);

    settle(|| h.emails.lock().unwrap().len() >= 2).await;
    assert_eq!(h.emails.lock().unwrap().len(), 2);

    let (_, list) = send(&h.app, get_request("/api/newsletters", true)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["is_active"], true);
}

// ── Catalog Tests ──

#[tokio::test]
async fn test_catalog_reads_public_writes_authenticated() {
    let h = harness();

    let (status, _) = send(&h.app, json_request("POST", "/api/taxis", taxi_body(), false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = send(&h.app, json_request("POST", "/api/taxis", taxi_body(), true)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["price_per_km"], "18.50");
    assert_eq!(json["available"], true);
    let id = json["id"].as_i64().unwrap();

    let (status, list) = send(&h.app, get_request("/api/taxis", false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&h.app, get_request(&format!("/api/taxis/{id}"), false)).await;
    assert_eq!(status, StatusCode::OK);

    // Catalog writes never notify anyone.
    settle(|| false).await;
    assert!(h.emails.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_update_and_delete() {
    let h = harness();
    let cottage = serde_json::json!({
        "name": "Hilltop Cottage",
        "description": "Two bedroom cottage with a view",
        "location": "Munnar",
        "bedrooms": 2,
        "max_guests": 4,
        "price_per_night": "4500.00",
        "amenities": "WiFi, Fireplace"
    });

    let (status, json) = send(&h.app, json_request("POST", "/api/cottages", cottage, true)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_i64().unwrap();
    let uri = format!("/api/cottages/{id}");

    let (status, json) = send(&h.app, json_request("PATCH", &uri, serde_json::json!({ "available": false }), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["available"], false);
    assert_eq!(json["location"], "Munnar");

    // PUT requires the full representation.
    let (status, json) = send(&h.app, json_request("PUT", &uri, serde_json::json!({ "name": "Renamed" }), true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["location"].is_array());

    let req = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .header("Authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&h.app, get_request(&uri, false)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_reference_to_package() {
    let h = harness();
    let package = serde_json::json!({
        "name": "Kerala Backwaters",
        "description": "Houseboat and beaches",
        "duration_days": 5,
        "destinations": "Alleppey, Kovalam",
        "price": "32000",
        "includes": "Stay, meals, transfers"
    });
    let (status, json) = send(&h.app, json_request("POST", "/api/packages", package, true)).await;
    assert_eq!(status, StatusCode::CREATED);
    let package_id = json["id"].as_i64().unwrap();

    let mut body = booking_body();
    body["booking_type"] = serde_json::json!("package");
    body["package"] = serde_json::json!(package_id);
    let (status, json) = send(&h.app, json_request("POST", "/api/bookings", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["package"], package_id);
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, json) = send(&h.app, get_request("/health", false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_booking_with_channels_disabled() {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        notifier: Notifier::new(&config, None, None),
        config,
    });
    let app = handlers::router(state);

    let (status, _) = send(&app, json_request("POST", "/api/bookings", booking_body(), false)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_catalog_routes_share_access_rules() {
    let h = harness();
    let package = serde_json::json!({
        "name": "Nilgiri Trails",
        "description": "Tea estates and hill stations",
        "duration_days": 3,
        "destinations": "Ooty, Coonoor",
        "price": "12500.00",
        "includes": "Stay, breakfast"
    });
    let (_, json) = send(&h.app, json_request("POST", "/api/packages", package, true)).await;
    let uri = format!("/api/packages/{}", json["id"].as_i64().unwrap());

    let (status, _) = send(&h.app, json_request("PATCH", &uri, serde_json::json!({ "duration_days": 4 }), false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap();
    let (status, _) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = send(&h.app, json_request("PATCH", &uri, serde_json::json!({ "duration_days": 4 }), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["duration_days"], 4);
    assert_eq!(json["price"], "12500.00");

    for missing in ["/api/taxis/77", "/api/cottages/77", "/api/packages/77"] {
        let (status, json) = send(&h.app, get_request(missing, false)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("77"));
    }
}

#[tokio::test]
async fn test_contact_html_body_escapes_user_input() {
    let h = harness();
    let mut body = contact_body();
    body["subject"] = serde_json::json!("<b>Group</b> & family");

    let (status, _) = send(&h.app, json_request("POST", "/api/contacts", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);

    settle(|| h.emails.lock().unwrap().len() >= 2).await;

    let emails = h.emails.lock().unwrap();
    let admin = emails.iter().find(|e| e.recipients == vec![ADMIN_EMAIL]).unwrap();
    assert!(admin.html_body.contains("&lt;b&gt;Group&lt;/b&gt; &amp; family"));
    assert!(!admin.html_body.contains("<b>Group</b>"));
    assert!(admin.text_body.contains("Subject: <b>Group</b> & family"));
}
