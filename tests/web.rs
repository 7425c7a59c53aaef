use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use contactmanager::config::AlertDispatch;
use contactmanager::db::{Database, SqliteContactRepository};
use contactmanager::mail::DisabledMailer;
use contactmanager::notify::BroadcastHub;
use contactmanager::service::ContactService;
use contactmanager::web::{router, AppState, HealthResponse, Views};

fn app() -> Router {
    let db = Database::open_memory().unwrap();
    let hub = BroadcastHub::default();
    let service = ContactService::new(
        Arc::new(SqliteContactRepository::new(Arc::new(db))),
        Arc::new(hub.clone()),
        Arc::new(DisabledMailer),
        AlertDispatch::Inline,
    );
    router(AppState::new(Arc::new(service), hub, Views::new().unwrap()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// First contact id found in a rendered list.
fn first_id(list_html: &str) -> String {
    let start = list_html.find("data-id=\"").unwrap() + "data-id=\"".len();
    list_html[start..start + 36].to_string()
}

const ANN_LEE: &str = r#"{
    "Id": "",
    "Title": "",
    "FirstName": "Ann",
    "LastName": "Lee",
    "DateOfBirth": "",
    "Emails": [{"Type": "home", "Email": "a@x.com"}],
    "Addresses": []
}"#;

#[tokio::test]
async fn index_renders_page_shell() {
    let (status, body) = send(&app(), get("/Contacts/Index")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("/Contacts/GetContacts"));
}

#[tokio::test]
async fn root_redirects_to_index() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/Contacts/Index");
}

#[tokio::test]
async fn health_reports_contact_count() {
    let app = app();
    send(&app, post_json("/Contacts/SaveContact", ANN_LEE)).await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.contact_count, 1);
    assert!(health.uptime_secs < 60);
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn empty_list_renders() {
    let (status, body) = send(&app(), get("/Contacts/GetContacts")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No contacts"));
}

#[tokio::test]
async fn new_contact_form_is_blank() {
    let (status, body) = send(&app(), get("/Contacts/NewContact")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("New contact"));
    assert!(body.contains("name=\"Id\" value=\"\""));
}

#[tokio::test]
async fn create_list_and_edit() {
    let app = app();

    let (status, body) = send(&app, post_json("/Contacts/SaveContact", ANN_LEE)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (_, list) = send(&app, get("/Contacts/GetContacts")).await;
    assert!(list.contains("Ann Lee"));
    let id = first_id(&list);

    let (status, form) = send(&app, get(&format!("/Contacts/EditContact?id={}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains("Edit contact"));
    assert!(form.contains("value=\"a@x.com\""));
    assert_eq!(form.matches("data-field=\"Email\"").count(), 1);
}

#[tokio::test]
async fn resave_with_no_emails_clears_them() {
    let app = app();
    send(&app, post_json("/Contacts/SaveContact", ANN_LEE)).await;
    let (_, list) = send(&app, get("/Contacts/GetContacts")).await;
    let id = first_id(&list);

    let update = format!(
        r#"{{"Id": "{}", "FirstName": "Ann", "LastName": "Lee", "Emails": [], "Addresses": []}}"#,
        id
    );
    let (status, _) = send(&app, post_json("/Contacts/SaveContact", &update)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, form) = send(&app, get(&format!("/Contacts/EditContact?id={}", id))).await;
    assert!(!form.contains("a@x.com"));
    assert_eq!(form.matches("data-field=\"Email\"").count(), 0);
}

#[tokio::test]
async fn delete_then_edit_is_not_found() {
    let app = app();
    send(&app, post_json("/Contacts/SaveContact", ANN_LEE)).await;
    let (_, list) = send(&app, get("/Contacts/GetContacts")).await;
    let id = first_id(&list);

    let (status, body) = send(&app, get(&format!("/Contacts/DeleteContact?id={}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, body) = send(&app, get(&format!("/Contacts/EditContact?id={}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("class=\"error\""));
    assert!(body.contains(&id));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();
    let missing = Uuid::new_v4();

    let (status, body) = send(&app, get(&format!("/Contacts/EditContact?id={}", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Contact not found"));

    let (status, _) = send(&app, get(&format!("/Contacts/DeleteContact?id={}", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let payload = format!(r#"{{"Id": "{}", "FirstName": "Ghost"}}"#, missing);
    let (status, _) = send(&app, post_json("/Contacts/SaveContact", &payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, get("/Contacts/GetContacts")).await;
    assert!(!list.contains("Ghost"));
}

#[tokio::test]
async fn unparseable_and_missing_ids_are_not_found() {
    let app = app();

    let (status, _) = send(&app, get("/Contacts/EditContact?id=42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/Contacts/EditContact")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/Contacts/DeleteContact")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, post_json("/Contacts/SaveContact", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("class=\"error\""));

    let (status, _) = send(
        &app,
        post_json("/Contacts/SaveContact", r#"{"DateOfBirth": "yesterday"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_is_sorted_by_first_name() {
    let app = app();
    for name in ["Zed", "Bob", "amy"] {
        let payload = format!(r#"{{"FirstName": "{}"}}"#, name);
        send(&app, post_json("/Contacts/SaveContact", &payload)).await;
    }

    let (_, list) = send(&app, get("/Contacts/GetContacts")).await;
    let amy = list.find("amy").unwrap();
    let bob = list.find("Bob").unwrap();
    let zed = list.find("Zed").unwrap();
    assert!(amy < bob && bob < zed);
}

#[tokio::test]
async fn save_pushes_update_event() {
    let app = app();

    let response = app.clone().oneshot(get("/Contacts/Events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let (status, _) = send(&app, post_json("/Contacts/SaveContact", ANN_LEE)).await;
    assert_eq!(status, StatusCode::OK);

    let mut body = response.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.contains("event: Update"));
}
