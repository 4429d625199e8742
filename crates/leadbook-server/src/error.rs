//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("sign-up is disabled")]
  SignupDisabled,
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("invalid configuration: {0}")]
  Config(String),
  #[error("password hashing failed: {0}")]
  PasswordHash(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::SignupDisabled => StatusCode::FORBIDDEN,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Config(_) | Error::PasswordHash(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if matches!(self, Error::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"leadbook\""),
      );
    }
    res
  }
}
