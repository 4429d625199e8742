//! SQL schema for the Leadbook SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    full_name     TEXT NOT NULL,
    password_hash TEXT NOT NULL,       -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Only the SHA-256 digest of a bearer token is ever stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    expires_at   TEXT NOT NULL
);

-- status has no CHECK constraint: rows written by other clients are read
-- back verbatim.
CREATE TABLE IF NOT EXISTS leads (
    lead_id        TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    email          TEXT,
    phone          TEXT,
    company        TEXT,
    source         TEXT,
    notes          TEXT,
    status         TEXT NOT NULL DEFAULT 'new',
    responsible_id TEXT REFERENCES users(user_id) ON DELETE SET NULL,
    created_at     TEXT NOT NULL,   -- RFC 3339 UTC, fixed width; store-assigned
    updated_at     TEXT NOT NULL
);

-- Notes and contact events are append-only and die with their lead.
CREATE TABLE IF NOT EXISTS lead_notes (
    note_id    TEXT PRIMARY KEY,
    lead_id    TEXT NOT NULL REFERENCES leads(lead_id) ON DELETE CASCADE,
    user_id    TEXT REFERENCES users(user_id) ON DELETE SET NULL,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS lead_contacts (
    contact_id   TEXT PRIMARY KEY,
    lead_id      TEXT NOT NULL REFERENCES leads(lead_id) ON DELETE CASCADE,
    user_id      TEXT REFERENCES users(user_id) ON DELETE SET NULL,
    contact_type TEXT NOT NULL,
    description  TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS leads_created_idx    ON leads(created_at);
CREATE INDEX IF NOT EXISTS notes_lead_idx       ON lead_notes(lead_id, created_at);
CREATE INDEX IF NOT EXISTS contacts_lead_idx    ON lead_contacts(lead_id, created_at);
CREATE INDEX IF NOT EXISTS sessions_user_idx    ON sessions(user_id);

PRAGMA user_version = 1;
";
