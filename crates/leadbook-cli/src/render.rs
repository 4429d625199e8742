//! Plain-text views of dashboards, lead tables and lead histories.
//!
//! Every function returns a `String` so output can be checked in tests.
//! `paint` switches ANSI colour on for status badges.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use crossterm::style::{Color, Stylize};
use leadbook_core::{
  contact::ContactEvent,
  dashboard::DashboardSummary,
  lead::Lead,
  note::Note,
  status::{Emphasis, LeadStatus, RecordedStatus},
  user::User,
};
use strum::IntoEnumIterator;

const NAME_WIDTH: usize = 24;
const COMPANY_WIDTH: usize = 18;

fn color(emphasis: Emphasis) -> Color {
  match emphasis {
    Emphasis::Info => Color::Blue,
    Emphasis::Warning => Color::Yellow,
    Emphasis::Primary => Color::Magenta,
    Emphasis::Negative => Color::Red,
    Emphasis::Positive => Color::Green,
  }
}

/// `[Label]`, padded to the widest label so table columns stay aligned.
pub fn badge(status: &RecordedStatus, paint: bool) -> String {
  let badge = status.badge();
  let text = format!("{:<12}", format!("[{}]", badge.label));
  if paint {
    text.with(color(badge.emphasis)).to_string()
  } else {
    text
  }
}

/// Truncate to `width` characters, marking the cut with `…`.
fn fit(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_string();
  }
  let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
  out.push('…');
  out
}

fn date(at: &DateTime<Utc>) -> String { at.format("%d/%m/%Y").to_string() }

fn date_time(at: &DateTime<Utc>) -> String { at.format("%d/%m/%Y %H:%M").to_string() }

fn or_dash(value: Option<&str>) -> &str { value.unwrap_or("-") }

// ─── Views ───────────────────────────────────────────────────────────────────

pub fn user(user: &User) -> String {
  format!("{} <{}>\n", user.full_name, user.email)
}

/// One row per lead: short id, name, company, badge, creation date.
pub fn lead_table(leads: &[Lead], paint: bool) -> String {
  if leads.is_empty() {
    return "No leads found.\n".to_string();
  }
  let mut out = String::new();
  for lead in leads {
    let id = lead.lead_id.to_string();
    let _ = writeln!(
      out,
      "{}  {:<NAME_WIDTH$}  {:<COMPANY_WIDTH$}  {}  {}",
      &id[..8],
      fit(&lead.name, NAME_WIDTH),
      fit(or_dash(lead.company.as_deref()), COMPANY_WIDTH),
      badge(&lead.status, paint),
      date(&lead.created_at),
    );
  }
  out
}

pub fn dashboard(summary: &DashboardSummary, paint: bool) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Total leads: {}", summary.total);
  for status in LeadStatus::iter() {
    let _ = writeln!(
      out,
      "  {} {:>5}",
      badge(&RecordedStatus::Known(status), paint),
      summary.by_status.get(status),
    );
  }
  let _ = writeln!(out, "\nRecent leads:");
  out.push_str(&lead_table(&summary.recent, paint));
  out
}

/// Every field of a lead followed by its notes and contact log.
pub fn lead_detail(
  lead: &Lead,
  notes: &[Note],
  contacts: &[ContactEvent],
  paint: bool,
) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}  {}", lead.name, badge(&lead.status, paint).trim_end());
  let _ = writeln!(out, "  id:          {}", lead.lead_id);
  let _ = writeln!(out, "  email:       {}", or_dash(lead.email.as_deref()));
  let _ = writeln!(out, "  phone:       {}", or_dash(lead.phone.as_deref()));
  let _ = writeln!(out, "  company:     {}", or_dash(lead.company.as_deref()));
  let _ = writeln!(out, "  source:      {}", or_dash(lead.source.as_deref()));
  let _ = writeln!(out, "  responsible: {}", or_dash(lead.responsible_name.as_deref()));
  let _ = writeln!(out, "  created:     {}", date_time(&lead.created_at));
  if let Some(remarks) = &lead.notes {
    let _ = writeln!(out, "  remarks:     {remarks}");
  }

  let _ = writeln!(out, "\nNotes ({}):", notes.len());
  for note in notes {
    let _ = writeln!(
      out,
      "  {}  {}: {}",
      date_time(&note.created_at),
      or_dash(note.author_name.as_deref()),
      note.content,
    );
  }

  let _ = writeln!(out, "\nContacts ({}):", contacts.len());
  for contact in contacts {
    let _ = writeln!(
      out,
      "  {}  [{}] {}: {}",
      date_time(&contact.created_at),
      contact.contact_type,
      or_dash(contact.author_name.as_deref()),
      contact.description,
    );
  }
  out
}

/// The valid status names, for error hints.
pub fn status_names() -> String {
  LeadStatus::iter()
    .map(|status| status.to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use leadbook_core::dashboard::aggregate;
  use uuid::Uuid;

  use super::*;

  fn lead(name: &str, status: &str) -> Lead {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
    Lead {
      lead_id:          Uuid::new_v4(),
      name:             name.to_string(),
      email:            None,
      phone:            None,
      company:          Some("Acme".to_string()),
      source:           None,
      notes:            None,
      status:           RecordedStatus::from_raw(status),
      responsible_id:   None,
      responsible_name: Some("Ana Lima".to_string()),
      created_at:       at,
      updated_at:       at,
    }
  }

  #[test]
  fn badge_uses_label_and_falls_back_to_new() {
    assert_eq!(badge(&RecordedStatus::from_raw("won"), false).trim_end(), "[Won]");
    assert_eq!(badge(&RecordedStatus::from_raw("archived"), false).trim_end(), "[New]");
  }

  #[test]
  fn fit_truncates_long_text() {
    assert_eq!(fit("short", 10), "short");
    assert_eq!(fit("a very long company name", 8), "a very …");
    assert_eq!(fit("a very long company name", 8).chars().count(), 8);
  }

  #[test]
  fn table_lists_each_lead() {
    let leads = [lead("Jane Doe", "hot"), lead("John Roe", "new")];
    let table = lead_table(&leads, false);
    assert_eq!(table.lines().count(), 2);
    assert!(table.contains("Jane Doe"));
    assert!(table.contains("[Hot]"));
    assert!(table.contains("09/03/2024"));
    assert_eq!(lead_table(&[], false), "No leads found.\n");
  }

  #[test]
  fn dashboard_shows_every_bucket() {
    let summary = aggregate(&[lead("Jane Doe", "new"), lead("John Roe", "won")]);
    let text = dashboard(&summary, false);
    assert!(text.starts_with("Total leads: 2\n"));
    for label in ["[New]", "[Qualifying]", "[Hot]", "[Lost]", "[Won]"] {
      assert!(text.contains(label), "missing {label}");
    }
    assert!(text.contains("Jane Doe"));
  }

  #[test]
  fn detail_includes_history() {
    let l = lead("Jane Doe", "qualifying");
    let note = Note {
      note_id:     Uuid::new_v4(),
      lead_id:     l.lead_id,
      author_id:   None,
      author_name: Some("Ana Lima".to_string()),
      content:     "Asked for a quote".to_string(),
      created_at:  l.created_at,
    };
    let contact = ContactEvent {
      contact_id:   Uuid::new_v4(),
      lead_id:      l.lead_id,
      author_id:    None,
      author_name:  None,
      contact_type: "call".to_string(),
      description:  "Left a voicemail".to_string(),
      created_at:   l.created_at,
    };
    let text = lead_detail(&l, &[note], &[contact], false);
    assert!(text.contains("Jane Doe  [Qualifying]"));
    assert!(text.contains("responsible: Ana Lima"));
    assert!(text.contains("Ana Lima: Asked for a quote"));
    assert!(text.contains("[call] -: Left a voicemail"));
    assert!(text.contains("09/03/2024 14:30"));
  }

  #[test]
  fn status_names_in_lifecycle_order() {
    assert_eq!(status_names(), "new, qualifying, hot, lost, won");
  }
}
