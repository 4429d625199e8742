//! The `LeadStore` and `UserStore` traits.
//!
//! Traits are implemented by storage backends (e.g. `leadbook-store-sqlite`).
//! Higher layers (`leadbook-api`, `leadbook-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  contact::{ContactEvent, NewContactEvent},
  lead::{Lead, LeadUpdate, NewLead},
  note::{NewNote, Note},
  user::{NewUser, Session, User, UserCredentials},
};

// ─── Leads ───────────────────────────────────────────────────────────────────

/// Abstraction over the lead record store.
///
/// Every method is one round trip. Nothing is retried and no write is
/// version-checked: the last update committed wins.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LeadStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Leads ─────────────────────────────────────────────────────────────

  /// All leads with the responsible user's name joined, newest first.
  fn list_leads(
    &self,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + '_;

  /// Retrieve a lead by id. Returns `None` if not found.
  fn get_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  /// Persist a new lead. The id and timestamps are assigned by the store.
  fn create_lead(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Overwrite one field and refresh `updated_at`.
  /// Returns `None` if no lead has this id.
  fn update_lead(
    &self,
    id: Uuid,
    update: LeadUpdate,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  // ── Notes & contact events — append-only ──────────────────────────────

  /// Notes for a lead with author names joined, newest first.
  fn list_notes(
    &self,
    lead_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  fn add_note(
    &self,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  /// Contact events for a lead with author names joined, newest first.
  fn list_contacts(
    &self,
    lead_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ContactEvent>, Self::Error>> + Send + '_;

  fn add_contact(
    &self,
    input: NewContactEvent,
  ) -> impl Future<Output = Result<ContactEvent, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Retrieve a user by id, e.g. to check a lead's responsible party
  /// before assigning it.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// The identity half of the store, used by the authentication layer.
///
/// Shares its error type with [`LeadStore`]: users and leads live in the same
/// backend.
pub trait UserStore: LeadStore {
  /// Create a user. Fails if the email is already registered.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up a user and password hash by email, ignoring case.
  fn find_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;

  /// Record a new session keyed by the digest of its bearer token.
  fn open_session(
    &self,
    user_id: Uuid,
    token_digest: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Resolve an unexpired session to its user.
  fn session_user(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Sign out. Returns `false` if no such session was open.
  fn close_session(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
