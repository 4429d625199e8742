//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision so that lexical order in SQL matches chronological order. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use leadbook_core::{
  contact::ContactEvent,
  lead::{Lead, LeadUpdate},
  note::Note,
  status::RecordedStatus,
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time truncated to the precision the store keeps, so values
/// returned from a write compare equal to the same row read back.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── LeadUpdate ───────────────────────────────────────────────────────────────

/// The `leads` column an update writes, and the value to bind to it.
pub fn encode_update(update: &LeadUpdate) -> (&'static str, Option<String>) {
  let value = match update {
    LeadUpdate::Name(name) => Some(name.clone()),
    LeadUpdate::Email(v)
    | LeadUpdate::Phone(v)
    | LeadUpdate::Company(v)
    | LeadUpdate::Source(v)
    | LeadUpdate::Notes(v) => v.clone(),
    LeadUpdate::Status(status) => Some(status.to_string()),
    LeadUpdate::ResponsibleId(id) => id.map(encode_uuid),
  };
  (update.field(), value)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `leads` row joined with the responsible user.
pub struct RawLead {
  pub lead_id:          String,
  pub name:             String,
  pub email:            Option<String>,
  pub phone:            Option<String>,
  pub company:          Option<String>,
  pub source:           Option<String>,
  pub notes:            Option<String>,
  pub status:           String,
  pub responsible_id:   Option<String>,
  pub responsible_name: Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawLead {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lead_id:          row.get(0)?,
      name:             row.get(1)?,
      email:            row.get(2)?,
      phone:            row.get(3)?,
      company:          row.get(4)?,
      source:           row.get(5)?,
      notes:            row.get(6)?,
      status:           row.get(7)?,
      responsible_id:   row.get(8)?,
      responsible_name: row.get(9)?,
      created_at:       row.get(10)?,
      updated_at:       row.get(11)?,
    })
  }

  pub fn into_lead(self) -> Result<Lead> {
    Ok(Lead {
      lead_id:          decode_uuid(&self.lead_id)?,
      name:             self.name,
      email:            self.email,
      phone:            self.phone,
      company:          self.company,
      source:           self.source,
      notes:            self.notes,
      status:           RecordedStatus::from_raw(&self.status),
      responsible_id:   decode_opt_uuid(self.responsible_id)?,
      responsible_name: self.responsible_name,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read from a `lead_notes` row joined with its author.
pub struct RawNote {
  pub note_id:     String,
  pub lead_id:     String,
  pub author_id:   Option<String>,
  pub author_name: Option<String>,
  pub content:     String,
  pub created_at:  String,
}

impl RawNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      note_id:     row.get(0)?,
      lead_id:     row.get(1)?,
      author_id:   row.get(2)?,
      author_name: row.get(3)?,
      content:     row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      note_id:     decode_uuid(&self.note_id)?,
      lead_id:     decode_uuid(&self.lead_id)?,
      author_id:   decode_opt_uuid(self.author_id)?,
      author_name: self.author_name,
      content:     self.content,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `lead_contacts` row joined with its author.
pub struct RawContact {
  pub contact_id:   String,
  pub lead_id:      String,
  pub author_id:    Option<String>,
  pub author_name:  Option<String>,
  pub contact_type: String,
  pub description:  String,
  pub created_at:   String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:   row.get(0)?,
      lead_id:      row.get(1)?,
      author_id:    row.get(2)?,
      author_name:  row.get(3)?,
      contact_type: row.get(4)?,
      description:  row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn into_contact(self) -> Result<ContactEvent> {
    Ok(ContactEvent {
      contact_id:   decode_uuid(&self.contact_id)?,
      lead_id:      decode_uuid(&self.lead_id)?,
      author_id:    decode_opt_uuid(self.author_id)?,
      author_name:  self.author_name,
      contact_type: self.contact_type,
      description:  self.description,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub full_name:  String,
  pub created_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      email:      row.get(1)?,
      full_name:  row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      email:      self.email,
      full_name:  self.full_name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use leadbook_core::status::LeadStatus;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let b = a + chrono::Duration::milliseconds(5);
    let c = a + chrono::Duration::seconds(1);
    let (ea, eb, ec) = (encode_dt(a), encode_dt(b), encode_dt(c));
    assert!(ea < eb && eb < ec, "{ea} {eb} {ec}");
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn update_columns_and_values() {
    assert_eq!(
      encode_update(&LeadUpdate::Status(LeadStatus::Won)),
      ("status", Some("won".to_owned()))
    );
    assert_eq!(encode_update(&LeadUpdate::Phone(None)), ("phone", None));
    let id = Uuid::new_v4();
    assert_eq!(
      encode_update(&LeadUpdate::ResponsibleId(Some(id))),
      ("responsible_id", Some(id.to_string()))
    );
  }
}
