use std::sync::Arc;

use axum::{
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use leadbook_core::{store::UserStore, user::NewUser};
use leadbook_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

const EMAIL: &str = "ana@example.com";
const PASSWORD: &str = "correct horse";

async fn make_state(allow_signup: bool) -> AppState<SqliteStore> {
  state_with(ServerConfig {
    store_path: PathBuf::from(":memory:"),
    allow_signup,
    ..ServerConfig::default()
  })
  .await
}

async fn state_with(config: ServerConfig) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .add_user(NewUser {
      email:         EMAIL.to_string(),
      full_name:     "Ana Lima".to_string(),
      password_hash: auth::hash_password(PASSWORD).unwrap(),
    })
    .await
    .unwrap();

  AppState {
    store:  Arc::new(store),
    config: Arc::new(config),
  }
}

async fn send(
  state:  &AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  token:  Option<&str>,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = router(state.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn login(state: &AppState<SqliteStore>) -> String {
  let (status, body) = send(
    state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": EMAIL, "password": PASSWORD })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["token"].as_str().unwrap().to_string()
}

async fn create_lead(state: &AppState<SqliteStore>, token: &str, body: Value) -> Value {
  let (status, lead) = send(state, "POST", "/api/leads", Some(token), Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "{lead}");
  lead
}

// ── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_returns_token_and_user() {
  let state = make_state(false).await;
  let (status, body) = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": "ANA@example.com", "password": PASSWORD })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["full_name"], "Ana Lima");
  assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

  let token = body["token"].as_str().unwrap();
  let (status, me) = send(&state, "GET", "/auth/me", Some(token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["email"], EMAIL);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
  let state = make_state(false).await;
  let (status, _) = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": EMAIL, "password": "not it" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn api_requires_session() {
  let state = make_state(false).await;
  let req = Request::builder()
    .uri("/api/leads")
    .body(Body::empty())
    .unwrap();
  let resp = router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let challenge = resp.headers().get(header::WWW_AUTHENTICATE).unwrap();
  assert_eq!(challenge, "Bearer realm=\"leadbook\"");

  let (status, _) = send(&state, "GET", "/api/leads", Some("made-up"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_invalidates_token() {
  let state = make_state(false).await;
  let token = login(&state).await;

  let (status, _) = send(&state, "POST", "/auth/logout", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&state, "GET", "/api/dashboard", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_disabled_by_default() {
  let state = make_state(false).await;
  let (status, _) = send(
    &state,
    "POST",
    "/auth/signup",
    None,
    Some(json!({ "email": "bo@example.com", "full_name": "Bo", "password": "long enough" })),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signup_creates_account_and_session() {
  let state = make_state(true).await;
  let (status, body) = send(
    &state,
    "POST",
    "/auth/signup",
    None,
    Some(json!({ "email": "bo@example.com", "full_name": "Bo Berg", "password": "long enough" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  let token = body["token"].as_str().unwrap();

  let (status, me) = send(&state, "GET", "/auth/me", Some(token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["full_name"], "Bo Berg");

  let (status, _) = send(
    &state,
    "POST",
    "/auth/signup",
    None,
    Some(json!({ "email": EMAIL, "full_name": "Again", "password": "long enough" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, _) = send(
    &state,
    "POST",
    "/auth/signup",
    None,
    Some(json!({ "email": "cy@example.com", "full_name": "Cy", "password": "short" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Leads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_lead_defaults_status_and_owner() {
  let state = make_state(false).await;
  let token = login(&state).await;

  let lead = create_lead(
    &state,
    &token,
    json!({ "name": "Jane Doe", "email": "jane@acme.test", "company": "Acme", "phone": "  " }),
  )
  .await;
  assert_eq!(lead["status"], "new");
  assert_eq!(lead["responsible_name"], "Ana Lima");
  assert_eq!(lead["phone"], Value::Null);

  let id = lead["lead_id"].as_str().unwrap();
  let (status, fetched) = send(&state, "GET", &format!("/api/leads/{id}"), Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["name"], "Jane Doe");
}

#[tokio::test]
async fn create_lead_without_name_is_bad_request() {
  let state = make_state(false).await;
  let token = login(&state).await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/leads",
    Some(token.as_str()),
    Some(json!({ "name": "   ", "email": "x@y.z" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("name"));

  let (_, leads) = send(&state, "GET", "/api/leads", Some(token.as_str()), None).await;
  assert_eq!(leads.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn list_filters_by_term_and_status() {
  let state = make_state(false).await;
  let token = login(&state).await;

  create_lead(&state, &token, json!({ "name": "Jane Doe", "company": "Acme" })).await;
  create_lead(&state, &token, json!({ "name": "John Roe", "status": "hot" })).await;
  create_lead(&state, &token, json!({ "name": "Acme Buyer", "status": "hot" })).await;

  let (status, all) = send(&state, "GET", "/api/leads", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<_> = all
    .as_array()
    .unwrap()
    .iter()
    .map(|l| l["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, ["Acme Buyer", "John Roe", "Jane Doe"]);

  let (_, acme) = send(&state, "GET", "/api/leads?q=ACME", Some(token.as_str()), None).await;
  assert_eq!(acme.as_array().unwrap().len(), 2);

  let (_, hot) = send(&state, "GET", "/api/leads?status=hot", Some(token.as_str()), None).await;
  assert_eq!(hot.as_array().unwrap().len(), 2);

  let (_, both) = send(&state, "GET", "/api/leads?q=acme&status=hot", Some(token.as_str()), None).await;
  assert_eq!(both.as_array().unwrap().len(), 1);
  assert_eq!(both[0]["name"], "Acme Buyer");

  let (status, _) = send(&state, "GET", "/api/leads?status=cold", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_updates_one_field() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let lead = create_lead(&state, &token, json!({ "name": "Jane Doe", "email": "jane@acme.test" })).await;
  let uri = format!("/api/leads/{}", lead["lead_id"].as_str().unwrap());

  let (status, updated) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "status", "value": "won" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["status"], "won");
  assert_eq!(updated["email"], "jane@acme.test");

  let (status, cleared) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "email", "value": null })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(cleared["email"], Value::Null);
  assert_eq!(cleared["status"], "won");

  let (status, _) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "name", "value": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_lead_is_not_found() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let uri = format!("/api/leads/{}", uuid::Uuid::new_v4());

  let (status, _) = send(&state, "GET", &uri, Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "status", "value": "hot" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&state, "GET", &format!("{uri}/notes"), Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn notes_and_contacts_record_author() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let lead = create_lead(&state, &token, json!({ "name": "Jane Doe" })).await;
  let base = format!("/api/leads/{}", lead["lead_id"].as_str().unwrap());

  let (status, note) = send(
    &state,
    "POST",
    &format!("{base}/notes"),
    Some(token.as_str()),
    Some(json!({ "content": "Asked for a quote" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{note}");
  assert_eq!(note["author_name"], "Ana Lima");

  let (status, _) = send(
    &state,
    "POST",
    &format!("{base}/notes"),
    Some(token.as_str()),
    Some(json!({ "content": "  " })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, contact) = send(
    &state,
    "POST",
    &format!("{base}/contacts"),
    Some(token.as_str()),
    Some(json!({ "contact_type": "call", "description": "Left a voicemail" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{contact}");
  assert_eq!(contact["contact_type"], "call");

  let (_, notes) = send(&state, "GET", &format!("{base}/notes"), Some(token.as_str()), None).await;
  assert_eq!(notes.as_array().unwrap().len(), 1);
  let (_, contacts) = send(&state, "GET", &format!("{base}/contacts"), Some(token.as_str()), None).await;
  assert_eq!(contacts[0]["description"], "Left a voicemail");
}

// ── Dashboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_tracks_status_changes() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let lead = create_lead(&state, &token, json!({ "name": "Jane Doe" })).await;

  let (status, before) = send(&state, "GET", "/api/dashboard", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(before["total"], 1);
  assert_eq!(before["by_status"]["new"], 1);
  assert_eq!(before["recent"][0]["name"], "Jane Doe");

  let uri = format!("/api/leads/{}", lead["lead_id"].as_str().unwrap());
  send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "status", "value": "won" })),
  )
  .await;

  let (_, after) = send(&state, "GET", "/api/dashboard", Some(token.as_str()), None).await;
  assert_eq!(after["total"], 1);
  assert_eq!(after["by_status"]["new"], 0);
  assert_eq!(after["by_status"]["won"], 1);
}

#[tokio::test]
async fn statuses_listed_in_lifecycle_order() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let (status, body) = send(&state, "GET", "/api/statuses", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<_> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["status"].as_str().unwrap())
    .collect();
  assert_eq!(names, ["new", "qualifying", "hot", "lost", "won"]);
}

// ── Input checks ────────────────────────────────────────────────────────────

#[tokio::test]
async fn responsible_must_be_an_existing_user() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let stranger = uuid::Uuid::new_v4();

  let (status, body) = send(
    &state,
    "POST",
    "/api/leads",
    Some(token.as_str()),
    Some(json!({ "name": "Jane Doe", "responsible_id": stranger })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
  assert!(body["error"].as_str().unwrap().contains(&stranger.to_string()));
  let (_, leads) = send(&state, "GET", "/api/leads", Some(token.as_str()), None).await;
  assert_eq!(leads.as_array().unwrap().len(), 0);

  let lead = create_lead(&state, &token, json!({ "name": "Jane Doe" })).await;
  let uri = format!("/api/leads/{}", lead["lead_id"].as_str().unwrap());

  let (status, _) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "responsible_id", "value": stranger })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, cleared) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "responsible_id", "value": null })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(cleared["responsible_name"], Value::Null);

  let (_, me) = send(&state, "GET", "/auth/me", Some(token.as_str()), None).await;
  let (status, reassigned) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "responsible_id", "value": me["user_id"] })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(reassigned["responsible_name"], "Ana Lima");
}

#[tokio::test]
async fn malformed_input_gets_json_bad_request() {
  let state = make_state(false).await;
  let token = login(&state).await;
  let lead = create_lead(&state, &token, json!({ "name": "Jane Doe" })).await;
  let uri = format!("/api/leads/{}", lead["lead_id"].as_str().unwrap());

  // `send` only succeeds when each body parses as JSON.
  let (status, body) = send(
    &state,
    "PATCH",
    &uri,
    Some(token.as_str()),
    Some(json!({ "field": "status", "value": "cold" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) =
    send(&state, "GET", "/api/leads/not-a-uuid", Some(token.as_str()), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = send(
    &state,
    "POST",
    &format!("{uri}/notes"),
    Some(token.as_str()),
    Some(json!({ "text": "wrong key" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": EMAIL })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

// ── Configuration ───────────────────────────────────────────────────────────

#[test]
fn session_ttl_must_be_positive_and_bounded() {
  let with_ttl = |session_ttl_hours| ServerConfig {
    session_ttl_hours,
    ..ServerConfig::default()
  };
  assert!(ServerConfig::default().validate().is_ok());
  assert!(with_ttl(1).validate().is_ok());
  assert!(with_ttl(MAX_SESSION_TTL_HOURS).validate().is_ok());

  for bad in [0, -1, MAX_SESSION_TTL_HOURS + 1, i64::MAX / 2, i64::MAX, i64::MIN] {
    assert!(with_ttl(bad).validate().is_err(), "accepted ttl {bad}");
    assert_eq!(with_ttl(bad).session_expiry(chrono::Utc::now()), None);
  }
}

#[tokio::test]
async fn unusable_ttl_fails_login_instead_of_issuing_dead_token() {
  for ttl in [-1, i64::MAX / 2] {
    let state = state_with(ServerConfig {
      session_ttl_hours: ttl,
      ..ServerConfig::default()
    })
    .await;
    let (status, body) = send(
      &state,
      "POST",
      "/auth/login",
      None,
      Some(json!({ "email": EMAIL, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "ttl {ttl}");
    assert!(body.get("token").is_none());
  }
}
