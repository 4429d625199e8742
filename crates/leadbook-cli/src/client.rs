//! Async HTTP client wrapping the Leadbook JSON API.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use leadbook_core::{
  contact::{ContactEvent, NewContactEvent},
  dashboard::DashboardSummary,
  filter::StatusFilter,
  lead::{Lead, LeadUpdate, NewLead},
  note::{NewNote, Note},
  user::User,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the Leadbook server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    Option<String>,
}

/// What `POST /auth/login` hands back.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
  pub user:       User,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the Leadbook JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    // No request timeout: a call waits as long as the server takes.
    let client = Client::builder()
      .user_agent(concat!("leadbook/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req`, turning any non-2xx reply into an error carrying the
  /// server's message.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED && self.config.token.is_some() {
      bail!("session expired or signed out; run `leadbook login`");
    }
    let message = match resp.json::<ErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => status.to_string(),
    };
    Err(anyhow!("{what} → {status}: {message}"))
  }

  async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    self
      .send(req, what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `POST /auth/login`
  pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
    let req = self
      .client
      .post(self.url("/auth/login"))
      .json(&json!({ "email": email, "password": password }));
    self.fetch(req, "POST /auth/login").await
  }

  /// `POST /auth/logout`
  pub async fn logout(&self) -> Result<()> {
    self
      .send(self.client.post(self.url("/auth/logout")), "POST /auth/logout")
      .await?;
    Ok(())
  }

  /// `GET /auth/me`
  pub async fn me(&self) -> Result<User> {
    self
      .fetch(self.client.get(self.url("/auth/me")), "GET /auth/me")
      .await
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  /// `GET /api/dashboard`
  pub async fn dashboard(&self) -> Result<DashboardSummary> {
    self
      .fetch(self.client.get(self.url("/api/dashboard")), "GET /dashboard")
      .await
  }

  /// `GET /api/leads?q=<term>&status=<filter>`
  pub async fn list_leads(&self, term: &str, status: StatusFilter) -> Result<Vec<Lead>> {
    let req = self
      .client
      .get(self.url("/api/leads"))
      .query(&[("q", term.to_string()), ("status", status.to_string())]);
    self.fetch(req, "GET /leads").await
  }

  /// `GET /api/leads/:id`
  pub async fn get_lead(&self, id: Uuid) -> Result<Lead> {
    let req = self.client.get(self.url(&format!("/api/leads/{id}")));
    self.fetch(req, "GET /leads/:id").await
  }

  /// `POST /api/leads`
  pub async fn create_lead(&self, lead: &NewLead) -> Result<Lead> {
    let req = self.client.post(self.url("/api/leads")).json(&json!({
      "name":           lead.name,
      "email":          lead.email,
      "phone":          lead.phone,
      "company":        lead.company,
      "source":         lead.source,
      "status":         lead.status,
      "notes":          lead.notes,
      "responsible_id": lead.responsible_id,
    }));
    self.fetch(req, "POST /leads").await
  }

  /// `PATCH /api/leads/:id`
  pub async fn update_lead(&self, id: Uuid, update: &LeadUpdate) -> Result<Lead> {
    let req = self
      .client
      .patch(self.url(&format!("/api/leads/{id}")))
      .json(update);
    self.fetch(req, "PATCH /leads/:id").await
  }

  // ── History ───────────────────────────────────────────────────────────────

  /// `GET /api/leads/:id/notes`
  pub async fn list_notes(&self, lead_id: Uuid) -> Result<Vec<Note>> {
    let req = self.client.get(self.url(&format!("/api/leads/{lead_id}/notes")));
    self.fetch(req, "GET /leads/:id/notes").await
  }

  /// `POST /api/leads/:id/notes`
  pub async fn add_note(&self, note: &NewNote) -> Result<Note> {
    let req = self
      .client
      .post(self.url(&format!("/api/leads/{}/notes", note.lead_id)))
      .json(&json!({ "content": note.content }));
    self.fetch(req, "POST /leads/:id/notes").await
  }

  /// `GET /api/leads/:id/contacts`
  pub async fn list_contacts(&self, lead_id: Uuid) -> Result<Vec<ContactEvent>> {
    let req = self.client.get(self.url(&format!("/api/leads/{lead_id}/contacts")));
    self.fetch(req, "GET /leads/:id/contacts").await
  }

  /// `POST /api/leads/:id/contacts`
  pub async fn add_contact(&self, contact: &NewContactEvent) -> Result<ContactEvent> {
    let req = self
      .client
      .post(self.url(&format!("/api/leads/{}/contacts", contact.lead_id)))
      .json(&json!({
        "contact_type": contact.contact_type,
        "description":  contact.description,
      }));
    self.fetch(req, "POST /leads/:id/contacts").await
  }
}
