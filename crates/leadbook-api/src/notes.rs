//! Handlers for `/leads/:id/notes`.

use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use leadbook_core::{
  note::{NewNote, Note},
  store::LeadStore,
  user::CurrentUser,
  validate,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Json, Path},
  leads::require_lead,
};

/// `GET /leads/:id/notes` — newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(lead_id): Path<Uuid>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: LeadStore,
{
  require_lead(store.as_ref(), lead_id).await?;
  let notes = store
    .list_notes(lead_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(notes))
}

#[derive(Debug, Deserialize)]
pub struct NewNoteBody {
  pub content: String,
}

/// `POST /leads/:id/notes` — the signed-in user is recorded as author.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Extension(CurrentUser(user)): Extension<CurrentUser>,
  Path(lead_id): Path<Uuid>,
  Json(body): Json<NewNoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore,
{
  let input = validate::new_note(NewNote {
    lead_id,
    author_id: Some(user.user_id),
    content: body.content,
  })?;
  require_lead(store.as_ref(), lead_id).await?;

  let note = store
    .add_note(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(note)))
}
