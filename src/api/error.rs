//! Error taxonomy for calls against the remote API.

use thiserror::Error;

/// Errors produced by the API client.
///
/// Stores never propagate these; they render them into their `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Connection, TLS, timeout or body read failure
  #[error("network error: {0}")]
  Transport(#[from] reqwest::Error),

  /// Non-success HTTP status
  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },

  /// Credentials were refused by the auth endpoint
  #[error("{0}")]
  Rejected(String),

  /// Body did not match the expected shape
  #[error("invalid response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("invalid url: {0}")]
  Url(#[from] url::ParseError),
}

impl ApiError {
  /// Build a status error, preferring the server's `message` when present.
  pub fn status(status: u16, message: Option<String>) -> Self {
    Self::Status {
      status,
      message: message.unwrap_or_else(|| "request failed".to_string()),
    }
  }
}
