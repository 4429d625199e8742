//! Handlers for `/leads/:id/contacts` — the interaction log.

use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use leadbook_core::{
  contact::{ContactEvent, NewContactEvent},
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

/// `GET /leads/:id/contacts` — newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(lead_id): Path<Uuid>,
) -> Result<Json<Vec<ContactEvent>>, ApiError>
where
  S: LeadStore,
{
  require_lead(store.as_ref(), lead_id).await?;
  let contacts = store
    .list_contacts(lead_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(contacts))
}

#[derive(Debug, Deserialize)]
pub struct NewContactBody {
  pub contact_type: String,
  pub description:  String,
}

/// `POST /leads/:id/contacts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Extension(CurrentUser(user)): Extension<CurrentUser>,
  Path(lead_id): Path<Uuid>,
  Json(body): Json<NewContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore,
{
  let input = validate::new_contact(NewContactEvent {
    lead_id,
    author_id: Some(user.user_id),
    contact_type: body.contact_type,
    description: body.description,
  })?;
  require_lead(store.as_ref(), lead_id).await?;

  let contact = store
    .add_contact(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(contact)))
}
