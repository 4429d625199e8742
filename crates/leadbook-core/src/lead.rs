//! Lead — a sales prospect tracked through the status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{LeadStatus, RecordedStatus};

// ─── Lead ────────────────────────────────────────────────────────────────────

/// A lead as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
  pub lead_id:          Uuid,
  pub name:             String,
  pub email:            Option<String>,
  pub phone:            Option<String>,
  pub company:          Option<String>,
  /// Where the lead came from, e.g. "Website" or "Referral".
  pub source:           Option<String>,
  /// General free-text remarks kept on the lead itself.
  pub notes:            Option<String>,
  pub status:           RecordedStatus,
  /// The user nominally owning this lead.
  pub responsible_id:   Option<Uuid>,
  /// Display name of the responsible user, joined on read; never written.
  pub responsible_name: Option<String>,
  /// Store-assigned; never changes after creation.
  pub created_at:       DateTime<Utc>,
  /// Refreshed by the store on every update.
  pub updated_at:       DateTime<Utc>,
}

impl Lead {
  /// Whether any searchable field contains `needle`, which must already be
  /// lowercase. Missing optional fields never match.
  pub fn matches_term(&self, needle: &str) -> bool {
    std::iter::once(Some(self.name.as_str()))
      .chain([
        self.email.as_deref(),
        self.phone.as_deref(),
        self.company.as_deref(),
      ])
      .flatten()
      .any(|field| field.to_lowercase().contains(needle))
  }
}

// ─── NewLead ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::LeadStore::create_lead`].
/// The identifier and both timestamps are always set by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLead {
  pub name:           String,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub company:        Option<String>,
  pub source:         Option<String>,
  pub status:         LeadStatus,
  pub notes:          Option<String>,
  pub responsible_id: Option<Uuid>,
}

impl NewLead {
  /// Convenience constructor with every optional field empty and status
  /// [`LeadStatus::New`].
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }
}

// ─── LeadUpdate ──────────────────────────────────────────────────────────────

/// A write of exactly one lead field.
///
/// Serialised as `{"field": "<name>", "value": <value>}`. No version check is
/// made; the last update committed wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LeadUpdate {
  Name(String),
  Email(Option<String>),
  Phone(Option<String>),
  Company(Option<String>),
  Source(Option<String>),
  Notes(Option<String>),
  Status(LeadStatus),
  ResponsibleId(Option<Uuid>),
}

impl LeadUpdate {
  /// The field name, matching the serde tag.
  pub fn field(&self) -> &'static str {
    match self {
      Self::Name(_) => "name",
      Self::Email(_) => "email",
      Self::Phone(_) => "phone",
      Self::Company(_) => "company",
      Self::Source(_) => "source",
      Self::Notes(_) => "notes",
      Self::Status(_) => "status",
      Self::ResponsibleId(_) => "responsible_id",
    }
  }

  /// Build an update from a field name and its textual value, as typed on a
  /// command line. An empty value clears an optional field.
  pub fn from_text(field: &str, value: &str) -> crate::Result<Option<Self>> {
    let text = || (!value.is_empty()).then(|| value.to_owned());
    let update = match field {
      "name" => Self::Name(value.to_owned()),
      "email" => Self::Email(text()),
      "phone" => Self::Phone(text()),
      "company" => Self::Company(text()),
      "source" => Self::Source(text()),
      "notes" => Self::Notes(text()),
      "status" => Self::Status(
        value
          .parse()
          .map_err(|_| crate::Error::UnknownStatus(value.to_owned()))?,
      ),
      "responsible_id" => Self::ResponsibleId(
        text()
          .map(|id| id.parse::<Uuid>())
          .transpose()
          .map_err(|_| crate::Error::InvalidUserId(value.to_owned()))?,
      ),
      _ => return Ok(None),
    };
    Ok(Some(update))
  }
}
