//! Error type for `leadbook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row was written and then could not be read back.
  #[error("row vanished after write: {0}")]
  MissingRow(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
