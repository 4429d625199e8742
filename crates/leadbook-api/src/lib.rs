//! JSON REST API for Leadbook.
//!
//! Exposes an axum [`Router`] backed by any [`leadbook_core::store::LeadStore`].
//! Handlers that record an owner or author read the signed-in user from a
//! [`CurrentUser`](leadbook_core::user::CurrentUser) request extension, so the
//! router must be mounted behind a layer that inserts one. TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", leadbook_api::api_router(store.clone()).layer(auth_layer))
//! ```

pub mod contacts;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod leads;
pub mod notes;

use std::sync::Arc;

use axum::{Router, routing::get};
use leadbook_core::store::LeadStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: LeadStore + 'static,
{
  Router::new()
    // Leads
    .route("/leads", get(leads::list::<S>).post(leads::create::<S>))
    .route("/leads/{id}", get(leads::get_one::<S>).patch(leads::update::<S>))
    // History
    .route(
      "/leads/{id}/notes",
      get(notes::list::<S>).post(notes::create::<S>),
    )
    .route(
      "/leads/{id}/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::summary::<S>))
    .route("/statuses", get(dashboard::statuses))
    .with_state(store)
}
