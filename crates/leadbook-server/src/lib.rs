//! HTTP server for Leadbook.
//!
//! Mounts the session endpoints under `/auth` and the JSON API from
//! [`leadbook_api`] under `/api`, guarded by bearer-token sessions, over any
//! [`UserStore`].

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use leadbook_core::store::UserStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Longest session lifetime accepted: ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366 * 10;

/// Runtime server configuration, deserialised from `config.toml` and
/// `LEADBOOK_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  pub session_ttl_hours: i64,
  pub allow_signup:      bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8080,
      store_path:        PathBuf::from("leadbook.db"),
      session_ttl_hours: 24 * 7,
      allow_signup:      false,
    }
  }
}

impl ServerConfig {
  /// Reject settings the server cannot run with.
  pub fn validate(&self) -> Result<(), Error> {
    if self.session_ttl_hours <= 0 {
      return Err(Error::Config(format!(
        "session_ttl_hours must be positive, got {}",
        self.session_ttl_hours
      )));
    }
    if self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
      return Err(Error::Config(format!(
        "session_ttl_hours must be at most {MAX_SESSION_TTL_HOURS}, got {}",
        self.session_ttl_hours
      )));
    }
    Ok(())
  }

  /// When a session opened at `from` stops being valid. `None` when the TTL
  /// is outside `1..=MAX_SESSION_TTL_HOURS` or the instant is out of range.
  pub fn session_expiry(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
      return None;
    }
    Duration::try_hours(self.session_ttl_hours).and_then(|ttl| from.checked_add_signed(ttl))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the auth handlers and session middleware.
#[derive(Clone)]
pub struct AppState<S: UserStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: UserStore + Clone + 'static,
{
  let api = leadbook_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::require_session::<S>),
  );

  Router::new()
    .route("/auth/login",  post(auth::login::<S>))
    .route("/auth/signup", post(auth::signup::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/me",     get(auth::me))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
