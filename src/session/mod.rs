//! Authentication state.
//!
//! `SessionStore` is the one authority on whether the user is logged in: the
//! route guard asks it directly, and its persisted record is only ever written
//! or cleared through it.

mod storage;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::{Account, ApiError, AuthSession, Authenticator};

pub use storage::{PersistedSession, SessionStorage};

type LoginResult = Result<AuthSession, ApiError>;

pub struct SessionStore {
  auth: Arc<dyn Authenticator>,
  storage: SessionStorage,
  ttl_minutes: u32,
  token: Option<String>,
  account: Option<Account>,
  expires_at: Option<DateTime<Utc>>,
  loading: bool,
  error: Option<String>,
  pending: Option<oneshot::Receiver<LoginResult>>,
}

impl SessionStore {
  pub fn new(auth: Arc<dyn Authenticator>, storage: SessionStorage, ttl_minutes: u32) -> Self {
    Self {
      auth,
      storage,
      ttl_minutes,
      token: None,
      account: None,
      expires_at: None,
      loading: false,
      error: None,
      pending: None,
    }
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn account(&self) -> Option<&Account> {
    self.account.as_ref()
  }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    self.expires_at
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Holding a token that has not lapsed
  pub fn is_authenticated(&self) -> bool {
    self.is_authenticated_at(Utc::now())
  }

  pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
    self.token.is_some() && self.expires_at.is_some_and(|t| now < t)
  }

  /// Pick up a session persisted by an earlier run. Expired records are deleted.
  ///
  /// Returns whether a live session was restored.
  pub fn restore(&mut self) -> bool {
    let persisted = match self.storage.load() {
      Ok(persisted) => persisted,
      Err(e) => {
        warn!(error = %e, "ignoring unreadable stored session");
        None
      }
    };

    match persisted {
      Some(session) if !session.is_expired_at(Utc::now()) => {
        info!(username = %session.account.username, "restored session");
        self.token = Some(session.token);
        self.account = Some(session.account);
        self.expires_at = Some(session.expires_at);
        true
      }
      Some(_) => {
        info!("stored session expired");
        self.forget();
        false
      }
      None => false,
    }
  }

  /// Start a login. The outcome is applied by `poll()` or `settle()`.
  pub fn login(&mut self, username: &str, password: &str) {
    info!(username, "logging in");
    self.loading = true;
    self.error = None;

    let future = self
      .auth
      .login(username.to_string(), password.to_string(), self.ttl_minutes);
    let (tx, rx) = oneshot::channel();
    // Replacing the receiver disowns any earlier attempt
    self.pending = Some(rx);

    tokio::spawn(async move {
      let _ = tx.send(future.await);
    });
  }

  /// Apply a finished login attempt. Returns `true` if state changed.
  pub fn poll(&mut self) -> bool {
    let Some(rx) = self.pending.as_mut() else {
      return false;
    };

    match rx.try_recv() {
      Ok(result) => {
        self.pending = None;
        self.complete_login(result);
        true
      }
      Err(oneshot::error::TryRecvError::Empty) => false,
      Err(oneshot::error::TryRecvError::Closed) => {
        self.pending = None;
        self.complete_login(Err(ApiError::Rejected("Login was cancelled".to_string())));
        true
      }
    }
  }

  /// Wait for a pending login to finish.
  pub async fn settle(&mut self) {
    if let Some(rx) = self.pending.take() {
      let result = rx
        .await
        .unwrap_or_else(|_| Err(ApiError::Rejected("Login was cancelled".to_string())));
      self.complete_login(result);
    }
  }

  /// Drop the token, account and error, and the persisted record.
  pub fn logout(&mut self) {
    info!("logging out");
    self.pending = None;
    self.loading = false;
    self.error = None;
    self.forget();
  }

  fn complete_login(&mut self, result: LoginResult) {
    self.loading = false;

    match result {
      Ok(session) => {
        let expires_at = Utc::now() + Duration::minutes(i64::from(self.ttl_minutes));
        let persisted = PersistedSession {
          token: session.token,
          account: session.account,
          expires_at,
        };
        if let Err(e) = self.storage.save(&persisted) {
          warn!(error = %e, "session will not survive a restart");
        }

        info!(username = %persisted.account.username, %expires_at, "logged in");
        self.token = Some(persisted.token);
        self.account = Some(persisted.account);
        self.expires_at = Some(expires_at);
        self.error = None;
      }
      Err(e) => {
        warn!(error = %e, "login failed");
        let message = match e {
          ApiError::Rejected(message) => message,
          other => other.to_string(),
        };
        self.forget();
        self.error = Some(message);
      }
    }
  }

  fn forget(&mut self) {
    self.token = None;
    self.account = None;
    self.expires_at = None;
    if let Err(e) = self.storage.clear() {
      warn!(error = %e, "failed to clear stored session");
    }
  }
}
