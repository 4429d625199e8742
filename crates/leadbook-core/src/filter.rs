//! Lead list filtering: free-text search composed with a status filter.

use std::{fmt, str::FromStr};

use crate::{Error, lead::Lead, status::LeadStatus};

/// The status half of a lead list query. `All` is the inert sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
  #[default]
  All,
  Only(LeadStatus),
}

impl FromStr for StatusFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "" | "all" => Ok(Self::All),
      other => other
        .parse()
        .map(Self::Only)
        .map_err(|_| Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(status) => write!(f, "{status}"),
    }
  }
}

/// Select the leads matching `term` and `status`, preserving input order.
///
/// An empty `term` matches everything; otherwise name, email, phone or
/// company must contain it, ignoring case.
pub fn filter_leads<'a>(
  leads: &'a [Lead],
  term: &str,
  status: StatusFilter,
) -> Vec<&'a Lead> {
  let needle = term.to_lowercase();
  leads
    .iter()
    .filter(|lead| needle.is_empty() || lead.matches_term(&needle))
    .filter(|lead| match status {
      StatusFilter::All => true,
      StatusFilter::Only(wanted) => lead.status == wanted,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::status::RecordedStatus;

  fn lead(name: &str, company: Option<&str>, status: LeadStatus) -> Lead {
    let now = Utc::now();
    Lead {
      lead_id:          Uuid::new_v4(),
      name:             name.into(),
      email:            None,
      phone:            None,
      company:          company.map(Into::into),
      source:           None,
      notes:            None,
      status:           status.into(),
      responsible_id:   None,
      responsible_name: None,
      created_at:       now,
      updated_at:       now,
    }
  }

  fn sample() -> Vec<Lead> {
    vec![
      lead("Acme Corp", None, LeadStatus::Hot),
      lead("Jane Doe", Some("Initech"), LeadStatus::New),
      lead("John Roe", Some("acme labs"), LeadStatus::Won),
      lead("Mary Major", None, LeadStatus::New),
    ]
  }

  fn names(leads: Vec<&Lead>) -> Vec<&str> {
    leads.into_iter().map(|l| l.name.as_str()).collect()
  }

  #[test]
  fn inert_filters_are_identity() {
    let leads = sample();
    let out = filter_leads(&leads, "", StatusFilter::All);
    assert_eq!(out.len(), leads.len());
    assert!(out.iter().zip(&leads).all(|(a, b)| a.lead_id == b.lead_id));
  }

  #[test]
  fn search_is_case_insensitive_and_order_preserving() {
    let leads = sample();
    assert_eq!(
      names(filter_leads(&leads, "acme", StatusFilter::All)),
      ["Acme Corp", "John Roe"]
    );
    assert_eq!(names(filter_leads(&leads, "JANE", StatusFilter::All)), ["Jane Doe"]);
  }

  #[test]
  fn missing_fields_do_not_match() {
    let leads = sample();
    assert!(filter_leads(&leads, "initech", StatusFilter::All).len() == 1);
    assert!(filter_leads(&leads, "@", StatusFilter::All).is_empty());
  }

  #[test]
  fn status_and_search_compose() {
    let leads = sample();
    let only_new = StatusFilter::Only(LeadStatus::New);
    assert_eq!(
      names(filter_leads(&leads, "", only_new)),
      ["Jane Doe", "Mary Major"]
    );
    assert_eq!(names(filter_leads(&leads, "mary", only_new)), ["Mary Major"]);
    assert!(filter_leads(&leads, "acme", only_new).is_empty());
  }

  #[test]
  fn unrecognized_status_never_matches_a_status_filter() {
    let mut leads = sample();
    leads[0].status = RecordedStatus::Unrecognized("archived".into());
    let out = filter_leads(&leads, "acme corp", StatusFilter::Only(LeadStatus::New));
    assert!(out.is_empty());
    assert_eq!(filter_leads(&leads, "acme corp", StatusFilter::All).len(), 1);
  }

  #[test]
  fn parse_status_filter() {
    assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    assert_eq!(
      "hot".parse::<StatusFilter>().unwrap(),
      StatusFilter::Only(LeadStatus::Hot)
    );
    assert_eq!(
      "closed".parse::<StatusFilter>(),
      Err(Error::UnknownStatus("closed".into()))
    );
    assert_eq!(StatusFilter::Only(LeadStatus::Lost).to_string(), "lost");
  }
}
