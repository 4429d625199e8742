//! leadbook-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus any
//! `LEADBOOK_*` environment overrides, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Creating the first account
//!
//! Sign-up over HTTP is off by default. Create users from the shell instead:
//!
//! ```
//! leadbook-server add-user --email ana@example.com --full-name "Ana Lima"
//! ```

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use leadbook_server::{AppState, ServerConfig, auth};
use leadbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Leadbook lead-tracking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Create a user account. The password is read from stdin.
  AddUser {
    #[arg(long)]
    email:     String,
    #[arg(long)]
    full_name: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LEADBOOK").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate().context("invalid configuration")?;

  let home = std::env::var_os("HOME").map(PathBuf::from);
  let store_path = expand_tilde(&server_cfg.store_path, home.as_deref());
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::AddUser { email, full_name } => {
      let password = read_password()?;
      let user = auth::register(&store, &email, &full_name, &password)
        .await
        .context("failed to create user")?;
      println!("created {} <{}> ({})", user.full_name, user.email, user.user_id);
      Ok(())
    }
    Command::Serve => serve(store, server_cfg).await,
  }
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  if server_cfg.allow_signup {
    tracing::warn!("open sign-up is enabled");
  }

  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = leadbook_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Prompt on stderr and read one line from stdin, so stdout stays clean
/// for the created user's details.
fn read_password() -> anyhow::Result<String> {
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\r', '\n']).to_string();
  anyhow::ensure!(!password.is_empty(), "no password given on stdin");
  Ok(password)
}

/// Resolve a leading `~` against `home`, leaving any other path unchanged.
fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tilde_expands_against_home() {
    let home = Path::new("/home/ana");
    assert_eq!(
      expand_tilde(Path::new("~/leadbook/crm.db"), Some(home)),
      PathBuf::from("/home/ana/leadbook/crm.db")
    );
    assert_eq!(expand_tilde(Path::new("~"), Some(home)), PathBuf::from("/home/ana"));
    assert_eq!(
      expand_tilde(Path::new("/var/lib/leadbook.db"), Some(home)),
      PathBuf::from("/var/lib/leadbook.db")
    );
    assert_eq!(
      expand_tilde(Path::new("~/crm.db"), None),
      PathBuf::from("~/crm.db")
    );
  }
}
