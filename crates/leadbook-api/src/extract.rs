//! Extractors that reject bad input with `400 {"error": ...}` like every
//! other API error, instead of axum's plain-text 4xx responses.

use axum::{
  extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection},
  },
  response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// [`axum::Json`] with an [`ApiError`] rejection. Also usable as a response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
  fn into_response(self) -> Response { axum::Json(self.0).into_response() }
}

/// [`axum::extract::Path`] with an [`ApiError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}
