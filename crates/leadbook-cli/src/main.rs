//! `leadbook` — command-line client for a Leadbook server.
//!
//! # Usage
//!
//! ```
//! leadbook --url http://localhost:8080 login --email ana@example.com
//! leadbook dashboard
//! leadbook leads --search acme --status hot
//! leadbook set 1b4e28ba-2fa1-11d2-883f-0016d3cca427 status won
//! ```
//!
//! `login` stores the session token in the config file so later commands
//! can reuse it.

mod client;
mod render;

use std::{
  io::{self, BufRead, IsTerminal, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use leadbook_core::{
  contact::NewContactEvent,
  filter::StatusFilter,
  lead::{LeadUpdate, NewLead},
  note::NewNote,
  status::LeadStatus,
  validate,
};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "leadbook", about = "Command-line client for Leadbook")]
struct Args {
  /// Path to the TOML config file (url, token).
  /// Defaults to ~/.config/leadbook/config.toml.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the leadbook server (default: http://localhost:8080).
  #[arg(long, env = "LEADBOOK_URL")]
  url: Option<String>,

  /// Session token, overriding the one saved by `login`.
  #[arg(long, env = "LEADBOOK_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Sign in; the password is read from stdin.
  Login {
    #[arg(long)]
    email: String,
  },
  /// End the current session.
  Logout,
  /// Show the signed-in user.
  Whoami,
  /// Totals per status and the newest leads.
  Dashboard,
  /// List leads, newest first.
  Leads {
    /// Case-insensitive text matched against name, email, phone, company.
    #[arg(short, long, default_value = "")]
    search: String,
    /// A status name, or `all`.
    #[arg(long, default_value = "all")]
    status: String,
  },
  /// Show one lead with its notes and contact history.
  Show { id: Uuid },
  /// Register a new lead.
  New {
    #[arg(long)]
    name:    String,
    #[arg(long)]
    email:   Option<String>,
    #[arg(long)]
    phone:   Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    source:  Option<String>,
    #[arg(long)]
    status:  Option<LeadStatus>,
    /// Free-text remarks stored on the lead.
    #[arg(long)]
    notes:   Option<String>,
  },
  /// Change one field of a lead. An empty VALUE clears optional fields.
  Set {
    id:    Uuid,
    /// name, email, phone, company, source, notes, status or responsible_id.
    field: String,
    value: String,
  },
  /// Append a note to a lead.
  Note { id: Uuid, text: String },
  /// Log an interaction with a lead.
  Contact {
    id:   Uuid,
    /// e.g. call, email, meeting.
    #[arg(long)]
    kind: String,
    text: String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the TOML config file. `login` writes `token` back into it.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
struct ConfigFile {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  url:   String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  token: String,
}

impl ConfigFile {
  fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }

  fn save(&self, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    }
    let raw = toml::to_string(self).context("serialising config file")?;
    std::fs::write(path, raw).with_context(|| format!("writing config file {}", path.display()))
  }
}

fn default_config_path() -> PathBuf {
  std::env::var("HOME")
    .map(|home| PathBuf::from(home).join(".config/leadbook/config.toml"))
    .unwrap_or_else(|_| PathBuf::from("leadbook.toml"))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  if let Err(e) = run(Args::parse()).await {
    eprintln!("error: {e:#}");
    std::process::exit(1);
  }
}

async fn run(args: Args) -> Result<()> {
  let config_path = args.config.clone().unwrap_or_else(default_config_path);
  let mut file_cfg = ConfigFile::load(&config_path)?;

  // CLI flags and env override the config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone())),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  let paint = io::stdout().is_terminal();

  match args.command {
    Command::Login { email } => {
      let password = read_password()?;
      let session = client.login(&email, &password).await?;
      file_cfg.token = session.token;
      file_cfg.save(&config_path)?;
      println!(
        "Signed in as {} until {}.",
        session.user.full_name,
        session.expires_at.format("%d/%m/%Y %H:%M")
      );
    }

    Command::Logout => {
      client.logout().await?;
      if !file_cfg.token.is_empty() {
        file_cfg.token.clear();
        file_cfg.save(&config_path)?;
      }
      println!("Signed out.");
    }

    Command::Whoami => print!("{}", render::user(&client.me().await?)),

    Command::Dashboard => print!("{}", render::dashboard(&client.dashboard().await?, paint)),

    Command::Leads { search, status } => {
      let status: StatusFilter = status.parse().map_err(|e| {
        anyhow!("{e}; expected one of: all, {}", render::status_names())
      })?;
      let leads = client.list_leads(&search, status).await?;
      print!("{}", render::lead_table(&leads, paint));
    }

    Command::Show { id } => {
      let lead = client.get_lead(id).await?;
      let (notes, contacts) =
        tokio::try_join!(client.list_notes(id), client.list_contacts(id))?;
      print!("{}", render::lead_detail(&lead, &notes, &contacts, paint));
    }

    Command::New { name, email, phone, company, source, status, notes } => {
      let input = validate::new_lead(NewLead {
        email,
        phone,
        company,
        source,
        status: status.unwrap_or_default(),
        notes,
        ..NewLead::new(name)
      })?;
      let lead = client.create_lead(&input).await?;
      println!("Created lead {} ({}).", lead.name, lead.lead_id);
    }

    Command::Set { id, field, value } => {
      let update = LeadUpdate::from_text(&field, &value)?
        .ok_or_else(|| anyhow!("unknown field {field:?}"))?;
      let update = validate::lead_update(update)?;
      let lead = client.update_lead(id, &update).await?;
      println!("Updated {} on {}.", update.field(), lead.name);
    }

    Command::Note { id, text } => {
      let input = validate::new_note(NewNote {
        lead_id:   id,
        author_id: None,
        content:   text,
      })?;
      client.add_note(&input).await?;
      println!("Note added.");
    }

    Command::Contact { id, kind, text } => {
      let input = validate::new_contact(NewContactEvent {
        lead_id:      id,
        author_id:    None,
        contact_type: kind,
        description:  text,
      })?;
      client.add_contact(&input).await?;
      println!("Contact logged.");
    }
  }

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> Result<String> {
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
