//! Error types for `leadbook-core`.

use thiserror::Error;

/// A client-side validation failure, raised before any store round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("lead name is required")]
  MissingName,

  #[error("note content is required")]
  EmptyNote,

  #[error("contact type is required")]
  MissingContactType,

  #[error("contact description is required")]
  MissingContactDescription,

  #[error("unknown lead status: {0:?}")]
  UnknownStatus(String),

  #[error("not a user id: {0:?}")]
  InvalidUserId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
