//! Users and sessions.
//!
//! Users are referenced weakly from leads, notes and contact events; their
//! names are resolved for display only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  /// Login name; unique, compared case-insensitively.
  pub email:      String,
  pub full_name:  String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::UserStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub full_name:     String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// A user together with their stored password hash. Never serialised.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

/// An open sign-in session. Only a digest of the bearer token is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token_digest: String,
  pub user_id:      Uuid,
  pub created_at:   DateTime<Utc>,
  pub expires_at:   DateTime<Utc>,
}

/// The authenticated user for the current request.
///
/// Inserted as a request extension by the server's auth layer and extracted
/// explicitly by the handlers that need an author or owner.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);
