//! Handlers for `GET /dashboard` and `GET /statuses`.

use std::sync::Arc;

use axum::{Json, extract::State};
use leadbook_core::{
  dashboard::{DashboardSummary, aggregate},
  status::{Emphasis, LeadStatus},
  store::LeadStore,
};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error::ApiError;

/// `GET /dashboard` — totals, per-status counts and the five newest leads.
pub async fn summary<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<DashboardSummary>, ApiError>
where
  S: LeadStore,
{
  let leads = store
    .list_leads()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(aggregate(&leads)))
}

#[derive(Debug, Serialize)]
pub struct StatusEntry {
  pub status:   LeadStatus,
  pub label:    &'static str,
  pub emphasis: Emphasis,
}

/// `GET /statuses` — every status in lifecycle order, with its badge.
pub async fn statuses() -> Json<Vec<StatusEntry>> {
  Json(
    LeadStatus::iter()
      .map(|status| StatusEntry {
        status,
        label: status.label(),
        emphasis: status.emphasis(),
      })
      .collect(),
  )
}
