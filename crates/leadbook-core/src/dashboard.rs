//! Dashboard aggregation: per-status counts and the most recent leads.

use serde::{Deserialize, Serialize};

use crate::{lead::Lead, status::LeadStatus};

/// How many leads the "recent leads" preview shows.
pub const RECENT_LIMIT: usize = 5;

/// One counter per known status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
  pub new:        usize,
  pub qualifying: usize,
  pub hot:        usize,
  pub lost:       usize,
  pub won:        usize,
}

impl StatusCounts {
  pub fn get(&self, status: LeadStatus) -> usize {
    match status {
      LeadStatus::New => self.new,
      LeadStatus::Qualifying => self.qualifying,
      LeadStatus::Hot => self.hot,
      LeadStatus::Lost => self.lost,
      LeadStatus::Won => self.won,
    }
  }

  fn slot_mut(&mut self, status: LeadStatus) -> &mut usize {
    match status {
      LeadStatus::New => &mut self.new,
      LeadStatus::Qualifying => &mut self.qualifying,
      LeadStatus::Hot => &mut self.hot,
      LeadStatus::Lost => &mut self.lost,
      LeadStatus::Won => &mut self.won,
    }
  }

  /// Sum of all five buckets. Can be less than the total lead count.
  pub fn sum(&self) -> usize {
    self.new + self.qualifying + self.hot + self.lost + self.won
  }
}

/// The computed dashboard read model — never stored, always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
  pub total:     usize,
  pub by_status: StatusCounts,
  /// Up to [`RECENT_LIMIT`] leads, newest first.
  pub recent:    Vec<Lead>,
}

/// Aggregate a full, unordered lead collection.
///
/// A lead whose stored status is not one of the five known values counts
/// toward `total` but toward no bucket.
pub fn aggregate(leads: &[Lead]) -> DashboardSummary {
  let mut by_status = StatusCounts::default();
  for lead in leads {
    if let Some(status) = lead.status.known() {
      *by_status.slot_mut(status) += 1;
    }
  }

  // `sort_by` is stable, so equal timestamps keep their input order.
  let mut newest: Vec<&Lead> = leads.iter().collect();
  newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  let recent = newest.into_iter().take(RECENT_LIMIT).cloned().collect();

  DashboardSummary {
    total: leads.len(),
    by_status,
    recent,
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Duration, TimeZone, Utc};
  use strum::IntoEnumIterator;
  use uuid::Uuid;

  use super::*;
  use crate::status::RecordedStatus;

  fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
  }

  fn lead(name: &str, status: RecordedStatus, created_at: DateTime<Utc>) -> Lead {
    Lead {
      lead_id: Uuid::new_v4(),
      name: name.into(),
      email: None,
      phone: None,
      company: None,
      source: None,
      notes: None,
      status,
      responsible_id: None,
      responsible_name: None,
      created_at,
      updated_at: created_at,
    }
  }

  fn known(name: &str, status: LeadStatus, minutes: i64) -> Lead {
    lead(name, status.into(), at(minutes))
  }

  #[test]
  fn empty_collection() {
    let summary = aggregate(&[]);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.by_status, StatusCounts::default());
    assert!(summary.recent.is_empty());
  }

  #[test]
  fn counts_each_status() {
    let leads = vec![
      known("a", LeadStatus::New, 0),
      known("b", LeadStatus::New, 1),
      known("c", LeadStatus::Hot, 2),
      known("d", LeadStatus::Won, 3),
      known("e", LeadStatus::Lost, 4),
      known("f", LeadStatus::Qualifying, 5),
    ];
    let summary = aggregate(&leads);
    assert_eq!(summary.total, 6);
    assert_eq!(summary.by_status.new, 2);
    assert_eq!(summary.by_status.hot, 1);
    assert_eq!(summary.by_status.get(LeadStatus::Won), 1);
    assert_eq!(summary.by_status.sum(), summary.total);
  }

  #[test]
  fn unrecognized_status_counts_toward_total_only() {
    let leads = vec![
      known("a", LeadStatus::New, 0),
      lead("legacy", RecordedStatus::Unrecognized("archived".into()), at(1)),
    ];
    let summary = aggregate(&leads);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.by_status.sum(), 1);

    let invalid = leads.iter().filter(|l| l.status.known().is_none()).count();
    assert_eq!(summary.by_status.sum() + invalid, summary.total);
  }

  #[test]
  fn recent_is_newest_five() {
    let leads: Vec<Lead> = (0..8)
      .map(|i| known(&format!("lead-{i}"), LeadStatus::New, i))
      .collect();
    let summary = aggregate(&leads);
    let names: Vec<&str> = summary.recent.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["lead-7", "lead-6", "lead-5", "lead-4", "lead-3"]);
  }

  #[test]
  fn recent_ties_keep_input_order() {
    let leads = vec![
      known("first", LeadStatus::New, 10),
      known("second", LeadStatus::Hot, 10),
      known("older", LeadStatus::Won, 0),
    ];
    let summary = aggregate(&leads);
    let names: Vec<&str> = summary.recent.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["first", "second", "older"]);
  }

  #[test]
  fn inserting_a_lead_bumps_total_and_bucket() {
    let mut leads: Vec<Lead> = LeadStatus::iter()
      .enumerate()
      .map(|(i, s)| known(&format!("seed-{i}"), s, i as i64))
      .collect();
    let before = aggregate(&leads);

    let jane = known("Jane Doe", LeadStatus::New, 60);
    let jane_id = jane.lead_id;
    leads.push(jane);
    let after = aggregate(&leads);

    assert_eq!(after.total, before.total + 1);
    assert_eq!(after.by_status.new, before.by_status.new + 1);
    assert_eq!(after.recent[0].lead_id, jane_id);
  }

  #[test]
  fn status_change_moves_one_count() {
    let mut leads = vec![
      known("a", LeadStatus::New, 0),
      known("b", LeadStatus::New, 1),
      known("c", LeadStatus::Won, 2),
    ];
    let before = aggregate(&leads);

    leads[0].status = LeadStatus::Won.into();
    let after = aggregate(&leads);

    assert_eq!(after.by_status.new, before.by_status.new - 1);
    assert_eq!(after.by_status.won, before.by_status.won + 1);
    assert_eq!(after.total, before.total);
  }
}
