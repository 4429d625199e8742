//! Free-text notes attached to a lead.
//!
//! Notes are immutable once written; there is no edit or delete operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub note_id:     Uuid,
  pub lead_id:     Uuid,
  /// `None` once the authoring user has been removed.
  pub author_id:   Option<Uuid>,
  /// Display name of the author, joined on read.
  pub author_name: Option<String>,
  pub content:     String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::LeadStore::add_note`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
  pub lead_id:   Uuid,
  pub author_id: Option<Uuid>,
  pub content:   String,
}
