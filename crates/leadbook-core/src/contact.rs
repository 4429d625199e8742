//! Contact events — logged interactions (call, email, meeting) with a lead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable record of one interaction with a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
  pub contact_id:   Uuid,
  pub lead_id:      Uuid,
  pub author_id:    Option<Uuid>,
  pub author_name:  Option<String>,
  /// Free-text label such as "call" or "meeting"; not a closed set.
  pub contact_type: String,
  pub description:  String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::LeadStore::add_contact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactEvent {
  pub lead_id:      Uuid,
  pub author_id:    Option<Uuid>,
  pub contact_type: String,
  pub description:  String,
}
