//! Persisted session record.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, OptionalExtension};

use crate::api::Account;
use crate::db::Database;

/// What survives a restart: the token, whose it is, and when it lapses
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSession {
  pub token: String,
  pub account: Account,
  pub expires_at: DateTime<Utc>,
}

impl PersistedSession {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }
}

/// SQLite-backed home of the single session row
pub struct SessionStorage {
  db: Database,
}

impl SessionStorage {
  pub fn new(db: Database) -> Self {
    Self { db }
  }

  /// Storage at the default data location
  pub fn open() -> Result<Self> {
    Ok(Self::new(Database::open()?))
  }

  pub fn in_memory() -> Result<Self> {
    Ok(Self::new(Database::in_memory()?))
  }

  pub fn load(&self) -> Result<Option<PersistedSession>> {
    let row: Option<(String, String, String)> = self
      .db
      .conn()
      .query_row(
        "SELECT token, account, expires_at FROM session WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read session: {}", e))?;

    let Some((token, account, expires_at)) = row else {
      return Ok(None);
    };

    let account: Account =
      serde_json::from_str(&account).map_err(|e| eyre!("Failed to parse stored account: {}", e))?;
    let expires_at = DateTime::parse_from_rfc3339(&expires_at)
      .map_err(|e| eyre!("Failed to parse session expiry '{}': {}", expires_at, e))?
      .with_timezone(&Utc);

    Ok(Some(PersistedSession {
      token,
      account,
      expires_at,
    }))
  }

  pub fn save(&self, session: &PersistedSession) -> Result<()> {
    let account = serde_json::to_string(&session.account)
      .map_err(|e| eyre!("Failed to serialize account: {}", e))?;

    self
      .db
      .conn()
      .execute(
        "INSERT OR REPLACE INTO session (id, token, account, expires_at, saved_at)
         VALUES (1, ?, ?, ?, datetime('now'))",
        params![session.token, account, session.expires_at.to_rfc3339()],
      )
      .map_err(|e| eyre!("Failed to store session: {}", e))?;

    Ok(())
  }

  pub fn clear(&self) -> Result<()> {
    self
      .db
      .conn()
      .execute("DELETE FROM session", [])
      .map_err(|e| eyre!("Failed to clear session: {}", e))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn record(expires_at: DateTime<Utc>) -> PersistedSession {
    PersistedSession {
      token: "tok".to_string(),
      account: Account {
        id: 1,
        username: "emilys".to_string(),
        ..Account::default()
      },
      expires_at,
    }
  }

  #[test]
  fn test_empty_storage_loads_none() {
    let storage = SessionStorage::in_memory().unwrap();
    assert_eq!(storage.load().unwrap(), None);
  }

  #[test]
  fn test_save_load_clear() {
    let storage = SessionStorage::in_memory().unwrap();
    let expires = DateTime::parse_from_rfc3339("2030-01-01T12:00:00Z")
      .unwrap()
      .with_timezone(&Utc);

    storage.save(&record(expires)).unwrap();
    assert_eq!(storage.load().unwrap(), Some(record(expires)));

    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);
  }

  #[test]
  fn test_save_replaces_previous() {
    let storage = SessionStorage::in_memory().unwrap();
    let now = Utc::now();
    storage.save(&record(now)).unwrap();

    let mut newer = record(now + Duration::hours(1));
    newer.token = "tok2".to_string();
    storage.save(&newer).unwrap();

    assert_eq!(storage.load().unwrap().unwrap().token, "tok2");
  }

  #[test]
  fn test_expiry() {
    let now = Utc::now();
    assert!(record(now).is_expired_at(now));
    assert!(!record(now + Duration::minutes(1)).is_expired_at(now));
  }
}
