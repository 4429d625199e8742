//! Required-field checks run before any write reaches the store.
//!
//! Each function consumes its input and hands back the normalised value:
//! optional text fields that are blank become `None`.

use crate::{
  Error, Result,
  contact::NewContactEvent,
  lead::{LeadUpdate, NewLead},
  note::NewNote,
};

fn is_blank(s: &str) -> bool { s.trim().is_empty() }

fn optional(value: Option<String>) -> Option<String> {
  value.filter(|v| !is_blank(v))
}

pub fn new_lead(input: NewLead) -> Result<NewLead> {
  if is_blank(&input.name) {
    return Err(Error::MissingName);
  }
  Ok(NewLead {
    email: optional(input.email),
    phone: optional(input.phone),
    company: optional(input.company),
    source: optional(input.source),
    notes: optional(input.notes),
    ..input
  })
}

pub fn lead_update(update: LeadUpdate) -> Result<LeadUpdate> {
  Ok(match update {
    LeadUpdate::Name(name) if is_blank(&name) => return Err(Error::MissingName),
    LeadUpdate::Email(v) => LeadUpdate::Email(optional(v)),
    LeadUpdate::Phone(v) => LeadUpdate::Phone(optional(v)),
    LeadUpdate::Company(v) => LeadUpdate::Company(optional(v)),
    LeadUpdate::Source(v) => LeadUpdate::Source(optional(v)),
    LeadUpdate::Notes(v) => LeadUpdate::Notes(optional(v)),
    other => other,
  })
}

pub fn new_note(input: NewNote) -> Result<NewNote> {
  if is_blank(&input.content) {
    return Err(Error::EmptyNote);
  }
  Ok(input)
}

pub fn new_contact(input: NewContactEvent) -> Result<NewContactEvent> {
  if is_blank(&input.contact_type) {
    return Err(Error::MissingContactType);
  }
  if is_blank(&input.description) {
    return Err(Error::MissingContactDescription);
  }
  Ok(input)
}
