//! [`SqliteStore`] — the SQLite implementation of [`LeadStore`] and
//! [`UserStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use leadbook_core::{
  contact::{ContactEvent, NewContactEvent},
  lead::{Lead, LeadUpdate, NewLead},
  note::{NewNote, Note},
  store::{LeadStore, UserStore},
  user::{NewUser, Session, User, UserCredentials},
};

use crate::{
  encode::{
    RawContact, RawLead, RawNote, RawUser, encode_dt, encode_update, encode_uuid, now,
  },
  schema::SCHEMA,
  Error, Result,
};

const LEAD_SELECT: &str = "
  SELECT l.lead_id, l.name, l.email, l.phone, l.company, l.source, l.notes,
         l.status, l.responsible_id, u.full_name, l.created_at, l.updated_at
  FROM leads l
  LEFT JOIN users u ON u.user_id = l.responsible_id";

const NOTE_SELECT: &str = "
  SELECT n.note_id, n.lead_id, n.user_id, u.full_name, n.content, n.created_at
  FROM lead_notes n
  LEFT JOIN users u ON u.user_id = n.user_id";

const CONTACT_SELECT: &str = "
  SELECT c.contact_id, c.lead_id, c.user_id, u.full_name,
         c.contact_type, c.description, c.created_at
  FROM lead_contacts c
  LEFT JOIN users u ON u.user_id = c.user_id";

const USER_COLUMNS: &str = "user_id, email, full_name, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Leadbook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read one lead, with the responsible user's name joined.
  async fn fetch_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLead> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{LEAD_SELECT} WHERE l.lead_id = ?1"),
              rusqlite::params![id_str],
              RawLead::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLead::into_lead).transpose()
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for SqliteStore {
  type Error = Error;

  // ── Leads ─────────────────────────────────────────────────────────────────

  async fn list_leads(&self) -> Result<Vec<Lead>> {
    let raws: Vec<RawLead> = self
      .conn
      .call(|conn| {
        // rowid breaks ties between leads created in the same microsecond.
        let mut stmt = conn.prepare(&format!(
          "{LEAD_SELECT} ORDER BY l.created_at DESC, l.rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawLead::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    self.fetch_lead(id).await
  }

  async fn create_lead(&self, input: NewLead) -> Result<Lead> {
    let lead_id = Uuid::new_v4();
    let at_str = encode_dt(now());

    let id_str          = encode_uuid(lead_id);
    let status_str      = input.status.to_string();
    let responsible_str = input.responsible_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO leads (
             lead_id, name, email, phone, company, source, notes,
             status, responsible_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            id_str,
            input.name,
            input.email,
            input.phone,
            input.company,
            input.source,
            input.notes,
            status_str,
            responsible_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(%lead_id, "lead created");
    self.fetch_lead(lead_id).await?.ok_or(Error::MissingRow(lead_id))
  }

  async fn update_lead(&self, id: Uuid, update: LeadUpdate) -> Result<Option<Lead>> {
    let (column, value) = encode_update(&update);
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        // `column` comes from a fixed set of field names, never from input.
        let sql =
          format!("UPDATE leads SET {column} = ?1, updated_at = ?2 WHERE lead_id = ?3");
        Ok(conn.execute(&sql, rusqlite::params![value, at_str, id_str])?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    tracing::debug!(lead_id = %id, field = update.field(), "lead updated");
    self.fetch_lead(id).await
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn list_notes(&self, lead_id: Uuid) -> Result<Vec<Note>> {
    let lead_str = encode_uuid(lead_id);

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{NOTE_SELECT} WHERE n.lead_id = ?1 ORDER BY n.created_at DESC, n.rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![lead_str], RawNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn add_note(&self, input: NewNote) -> Result<Note> {
    let note_id    = Uuid::new_v4();
    let id_str     = encode_uuid(note_id);
    let lead_str   = encode_uuid(input.lead_id);
    let author_str = input.author_id.map(encode_uuid);
    let at_str     = encode_dt(now());
    let content    = input.content;

    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lead_notes (note_id, lead_id, user_id, content, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, lead_str, author_str, content, at_str],
        )?;
        Ok(
          conn
            .query_row(
              &format!("{NOTE_SELECT} WHERE n.note_id = ?1"),
              rusqlite::params![id_str],
              RawNote::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::MissingRow(note_id))?.into_note()
  }

  // ── Contact events ────────────────────────────────────────────────────────

  async fn list_contacts(&self, lead_id: Uuid) -> Result<Vec<ContactEvent>> {
    let lead_str = encode_uuid(lead_id);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{CONTACT_SELECT} WHERE c.lead_id = ?1 ORDER BY c.created_at DESC, c.rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![lead_str], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn add_contact(&self, input: NewContactEvent) -> Result<ContactEvent> {
    let contact_id = Uuid::new_v4();
    let id_str     = encode_uuid(contact_id);
    let lead_str   = encode_uuid(input.lead_id);
    let author_str = input.author_id.map(encode_uuid);
    let at_str     = encode_dt(now());

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lead_contacts
             (contact_id, lead_id, user_id, contact_type, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            lead_str,
            author_str,
            input.contact_type,
            input.description,
            at_str,
          ],
        )?;
        Ok(
          conn
            .query_row(
              &format!("{CONTACT_SELECT} WHERE c.contact_id = ?1"),
              rusqlite::params![id_str],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::MissingRow(contact_id))?.into_contact()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      email:      input.email,
      full_name:  input.full_name,
      created_at: now(),
    };

    let id_str    = encode_uuid(user.user_id);
    let email     = user.email.clone();
    let full_name = user.full_name.clone();
    let at_str    = encode_dt(user.created_at);
    let hash      = input.password_hash;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, full_name, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, full_name, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn find_credentials<'a>(&'a self, email: &'a str) -> Result<Option<UserCredentials>> {
    let email = email.to_owned();

    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
              rusqlite::params![email],
              |row| Ok((RawUser::from_row(row)?, row.get(4)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(user, password_hash)| {
        Ok::<_, Error>(UserCredentials { user: user.into_user()?, password_hash })
      })
      .transpose()
  }

  async fn open_session(
    &self,
    user_id:      Uuid,
    token_digest: String,
    expires_at:   DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session {
      token_digest,
      user_id,
      created_at: now(),
      expires_at,
    };

    let digest      = session.token_digest.clone();
    let user_str    = encode_uuid(user_id);
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        // Opportunistically drop sessions that can no longer be used.
        conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![created_str],
        )?;
        conn.execute(
          "INSERT INTO sessions (token_digest, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![digest, user_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn session_user(&self, token_digest: String) -> Result<Option<User>> {
    let now_str = encode_dt(now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.email, u.full_name, u.created_at
               FROM sessions s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.token_digest = ?1 AND s.expires_at > ?2",
              rusqlite::params![token_digest, now_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn close_session(&self, token_digest: String) -> Result<bool> {
    let removed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![token_digest],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
