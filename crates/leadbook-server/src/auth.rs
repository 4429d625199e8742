//! Password sign-in, bearer-token sessions, and the extractor and middleware
//! that turn a token into the current user.
//!
//! Tokens are 32 random bytes handed to the client once, base64url-encoded.
//! The store only ever sees their SHA-256 digest.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Utc};
use leadbook_api::extract::Json;
use leadbook_core::{
  store::UserStore,
  user::{CurrentUser, NewUser, User},
};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AppState, error::Error};

const TOKEN_BYTES: usize = 32;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 8;

// ─── Primitives ──────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  B64.encode(bytes)
}

/// The form in which a token is stored and looked up.
pub fn digest_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or(Error::Unauthorized)
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler means the request carried a live session token.
pub struct Authenticated {
  pub user:         User,
  pub token_digest: String,
}

/// Resolve the bearer token in `headers` to its user.
pub async fn authenticate<S>(headers: &HeaderMap, store: &S) -> Result<Authenticated, Error>
where
  S: UserStore,
{
  let token_digest = digest_token(bearer_token(headers)?);
  let user = store
    .session_user(token_digest.clone())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::Unauthorized)?;
  Ok(Authenticated { user, token_digest })
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: UserStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state.store.as_ref()).await
  }
}

/// Middleware guarding the JSON API: rejects the request with 401 unless it
/// carries a live session, and hands the user to handlers as [`CurrentUser`].
pub async fn require_session<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: UserStore + Clone + 'static,
{
  let auth = authenticate(req.headers(), state.store.as_ref()).await?;
  req.extensions_mut().insert(CurrentUser(auth.user));
  Ok(next.run(req).await)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub email:     String,
  pub full_name: String,
  pub password:  String,
}

/// Returned by sign-in and sign-up. `token` is shown exactly once.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
  pub user:       User,
}

async fn start_session<S>(state: &AppState<S>, user: User) -> Result<SessionResponse, Error>
where
  S: UserStore,
{
  let token = generate_token();
  let expires_at = state.config.session_expiry(Utc::now()).ok_or_else(|| {
    Error::Config(format!(
      "session_ttl_hours out of range: {}",
      state.config.session_ttl_hours
    ))
  })?;
  state
    .store
    .open_session(user.user_id, digest_token(&token), expires_at)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(SessionResponse { token, expires_at, user })
}

/// `POST /auth/login` — body: `{"email":"...","password":"..."}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, Error>
where
  S: UserStore + Clone + 'static,
{
  let creds = state
    .store
    .find_credentials(body.email.trim())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let Some(creds) = creds.filter(|c| verify_password(&body.password, &c.password_hash))
  else {
    tracing::warn!(email = %body.email, "failed sign-in attempt");
    return Err(Error::Unauthorized);
  };

  let session = start_session(&state, creds.user).await?;
  tracing::info!(user = %session.user.email, "signed in");
  Ok(Json(session))
}

/// Check the fields of a new account before anything is hashed or stored.
pub fn validate_account(email: &str, full_name: &str, password: &str) -> Result<(), Error> {
  if !email.contains('@') {
    return Err(Error::BadRequest("a valid email is required".into()));
  }
  if full_name.trim().is_empty() {
    return Err(Error::BadRequest("full name is required".into()));
  }
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

/// Create an account, refusing duplicates by email.
pub async fn register<S>(store: &S, email: &str, full_name: &str, password: &str) -> Result<User, Error>
where
  S: UserStore,
{
  let email = email.trim();
  validate_account(email, full_name, password)?;

  let existing = store
    .find_credentials(email)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(Error::Conflict(format!("{email} is already registered")));
  }

  let user = store
    .add_user(NewUser {
      email:         email.to_owned(),
      full_name:     full_name.trim().to_owned(),
      password_hash: hash_password(password)?,
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!(user = %user.email, "account created");
  Ok(user)
}

/// `POST /auth/signup` — only when `allow_signup` is set. Signs the new user
/// in straight away.
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, Error>
where
  S: UserStore + Clone + 'static,
{
  if !state.config.allow_signup {
    return Err(Error::SignupDisabled);
  }
  let user = register(state.store.as_ref(), &body.email, &body.full_name, &body.password).await?;
  let session = start_session(&state, user).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /auth/logout` — closes the session that authenticated this request.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
) -> Result<StatusCode, Error>
where
  S: UserStore + Clone + 'static,
{
  state
    .store
    .close_session(auth.token_digest)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!(user = %auth.user.email, "signed out");
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
pub async fn me(auth: Authenticated) -> Json<User> { Json(auth.user) }
