//! The lead status lifecycle.
//!
//! A lead is always in exactly one of five states. There is no transition
//! graph: any state may be replaced by any other through a direct update.
//! Each state maps to a display label and an emphasis category used purely
//! for presentation.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ─── LeadStatus ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeadStatus {
  #[default]
  New,
  Qualifying,
  Hot,
  Lost,
  Won,
}

impl LeadStatus {
  /// Human-readable label shown on badges and in tables.
  pub fn label(self) -> &'static str {
    match self {
      Self::New => "New",
      Self::Qualifying => "Qualifying",
      Self::Hot => "Hot",
      Self::Lost => "Lost",
      Self::Won => "Won",
    }
  }

  pub fn emphasis(self) -> Emphasis {
    match self {
      Self::New => Emphasis::Info,
      Self::Qualifying => Emphasis::Warning,
      Self::Hot => Emphasis::Primary,
      Self::Lost => Emphasis::Negative,
      Self::Won => Emphasis::Positive,
    }
  }

  pub fn badge(self) -> StatusBadge {
    StatusBadge {
      label:    self.label(),
      emphasis: self.emphasis(),
    }
  }
}

// ─── Presentation ────────────────────────────────────────────────────────────

/// The presentation tier a status is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
  Info,
  Warning,
  Primary,
  Negative,
  Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
  pub label:    &'static str,
  pub emphasis: Emphasis,
}

/// Map a raw status string to its badge.
///
/// Total: anything that is not one of the five known values renders as
/// [`LeadStatus::New`].
pub fn classify(status: &str) -> StatusBadge {
  status.parse::<LeadStatus>().unwrap_or_default().badge()
}

// ─── RecordedStatus ──────────────────────────────────────────────────────────

/// The status column exactly as read back from the store.
///
/// Writes through this application are always a [`LeadStatus`], but the
/// store is shared; rows written elsewhere may carry any string. Those are
/// kept verbatim rather than failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedStatus {
  Known(LeadStatus),
  Unrecognized(String),
}

impl RecordedStatus {
  pub fn from_raw(raw: &str) -> Self {
    match raw.parse::<LeadStatus>() {
      Ok(status) => Self::Known(status),
      Err(_) => Self::Unrecognized(raw.to_owned()),
    }
  }

  pub fn known(&self) -> Option<LeadStatus> {
    match self {
      Self::Known(status) => Some(*status),
      Self::Unrecognized(_) => None,
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Known(status) => status.as_ref(),
      Self::Unrecognized(raw) => raw,
    }
  }

  pub fn badge(&self) -> StatusBadge { classify(self.as_str()) }
}

impl Default for RecordedStatus {
  fn default() -> Self { Self::Known(LeadStatus::default()) }
}

impl From<LeadStatus> for RecordedStatus {
  fn from(status: LeadStatus) -> Self { Self::Known(status) }
}

impl PartialEq<LeadStatus> for RecordedStatus {
  fn eq(&self, other: &LeadStatus) -> bool { self.known() == Some(*other) }
}
