//! Handlers for `/leads` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/leads` | Optional `?q=<term>&status=<status\|all>` |
//! | `POST`  | `/leads` | Body: [`NewLeadBody`]; returns 201 + stored lead |
//! | `GET`   | `/leads/:id` | 404 if not found |
//! | `PATCH` | `/leads/:id` | Body: `{"field":"status","value":"won"}` |

use std::sync::Arc;

use axum::{
  Extension,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use leadbook_core::{
  filter::{StatusFilter, filter_leads},
  lead::{Lead, LeadUpdate, NewLead},
  status::LeadStatus,
  store::LeadStore,
  user::CurrentUser,
  validate,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Json, Path},
};

/// Fetch a lead or fail with 404.
pub(crate) async fn require_lead<S>(store: &S, id: Uuid) -> Result<Lead, ApiError>
where
  S: LeadStore,
{
  store
    .get_lead(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("lead {id} not found")))
}

/// A responsible party must name an existing user; otherwise the write is
/// rejected with 400 before it reaches the store.
async fn check_responsible<S>(store: &S, responsible_id: Option<Uuid>) -> Result<(), ApiError>
where
  S: LeadStore,
{
  let Some(id) = responsible_id else {
    return Ok(());
  };
  store
    .get_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| ApiError::BadRequest(format!("no user with id {id}")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive search over name, email, phone and company.
  pub q:      Option<String>,
  /// A status name, or `all` (the default).
  pub status: Option<String>,
}

/// `GET /leads[?q=...][&status=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Lead>>, ApiError>
where
  S: LeadStore,
{
  let status: StatusFilter = params
    .status
    .as_deref()
    .map(str::parse::<StatusFilter>)
    .transpose()?
    .unwrap_or_default();
  let term = params.q.unwrap_or_default();

  let leads = store
    .list_leads()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let matching = filter_leads(&leads, &term, status)
    .into_iter()
    .cloned()
    .collect();
  Ok(Json(matching))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /leads`.
#[derive(Debug, Deserialize)]
pub struct NewLeadBody {
  pub name:           String,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub company:        Option<String>,
  pub source:         Option<String>,
  pub status:         Option<LeadStatus>,
  pub notes:          Option<String>,
  /// Defaults to the signed-in user.
  pub responsible_id: Option<Uuid>,
}

impl NewLeadBody {
  fn into_new_lead(self, current: &CurrentUser) -> NewLead {
    NewLead {
      name:           self.name,
      email:          self.email,
      phone:          self.phone,
      company:        self.company,
      source:         self.source,
      status:         self.status.unwrap_or_default(),
      notes:          self.notes,
      responsible_id: self.responsible_id.or(Some(current.0.user_id)),
    }
  }
}

/// `POST /leads` — returns 201 + the stored [`Lead`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Extension(current): Extension<CurrentUser>,
  Json(body): Json<NewLeadBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore,
{
  let input = validate::new_lead(body.into_new_lead(&current))?;
  check_responsible(store.as_ref(), input.responsible_id).await?;
  let lead = store
    .create_lead(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(lead_id = %lead.lead_id, user = %current.0.email, "lead created");
  Ok((StatusCode::CREATED, Json(lead)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /leads/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore,
{
  Ok(Json(require_lead(store.as_ref(), id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /leads/:id` — overwrite one field. No version check is made.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<LeadUpdate>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore,
{
  let update = validate::lead_update(body)?;
  if let LeadUpdate::ResponsibleId(responsible_id) = &update {
    check_responsible(store.as_ref(), *responsible_id).await?;
  }
  let field = update.field();
  let lead = store
    .update_lead(id, update)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("lead {id} not found")))?;
  tracing::info!(lead_id = %id, field, "lead updated");
  Ok(Json(lead))
}
