use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

use super::api_types::{
  normalize_categories, ApiCategoryEntry, ApiErrorBody, ApiListEnvelope, ApiLoginRequest,
  ApiLoginResponse,
};
use super::error::ApiError;
use super::request::{endpoint, Collection, ListRequest};
use super::types::{AuthSession, Page, ProductDetail, UserDetail};

/// HTTP client for the dashboard's REST API
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid API base URL {}: {}", config.base_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("API base URL {} cannot carry a path", base_url));
    }

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("d9s/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Fetch one page of a collection
  pub async fn fetch_page<T: DeserializeOwned>(
    &self,
    collection: Collection,
    request: &ListRequest,
  ) -> Result<Page<T>, ApiError> {
    let url = request.url(&self.base_url, collection)?;
    let envelope: ApiListEnvelope<T> = self.get_json(url).await?;
    Ok(envelope.into())
  }

  /// Fetch product category slugs
  pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
    let url = endpoint(&self.base_url, &["products", "categories"])?;
    let entries: Vec<ApiCategoryEntry> = self.get_json(url).await?;
    Ok(normalize_categories(entries))
  }

  /// Get a single user by id
  pub async fn get_user(&self, id: u64) -> Result<UserDetail, ApiError> {
    let url = endpoint(&self.base_url, &["users", &id.to_string()])?;
    self.get_json(url).await
  }

  /// Get a single product by id
  pub async fn get_product(&self, id: u64) -> Result<ProductDetail, ApiError> {
    let url = endpoint(&self.base_url, &["products", &id.to_string()])?;
    self.get_json(url).await
  }

  /// Exchange credentials for an access token
  pub async fn login(
    &self,
    username: &str,
    password: &str,
    expires_in_mins: u32,
  ) -> Result<AuthSession, ApiError> {
    let url = endpoint(&self.base_url, &["auth", "login"])?;
    debug!(%url, username, "POST login");

    let response = self
      .http
      .post(url)
      .json(&ApiLoginRequest {
        username,
        password,
        expires_in_mins,
      })
      .send()
      .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
      let message = error_message(&body).unwrap_or_else(|| "Login failed".to_string());
      return Err(ApiError::Rejected(message));
    }

    let login: ApiLoginResponse = serde_json::from_slice(&body)?;
    Ok(login.into())
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
    debug!(%url, "GET");

    let response = self.http.get(url).send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
      return Err(ApiError::status(status.as_u16(), error_message(&body)));
    }

    Ok(serde_json::from_slice(&body)?)
  }
}

/// Pull `message` out of an error body, if it has one.
fn error_message(body: &[u8]) -> Option<String> {
  serde_json::from_slice::<ApiErrorBody>(body)
    .ok()
    .and_then(|b| b.message)
    .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(base_url: &str) -> ApiConfig {
    ApiConfig {
      base_url: base_url.to_string(),
      timeout_secs: 5,
    }
  }

  #[test]
  fn test_error_message() {
    assert_eq!(
      error_message(br#"{"message":"Invalid credentials"}"#),
      Some("Invalid credentials".to_string())
    );
    assert_eq!(error_message(br#"{"message":""}"#), None);
    assert_eq!(error_message(b"<html>bad gateway</html>"), None);
  }

  #[test]
  fn test_new_rejects_invalid_base() {
    assert!(ApiClient::new(&config("not a url")).is_err());
    assert!(ApiClient::new(&config("mailto:admin@example.com")).is_err());
  }

  #[test]
  fn test_new_accepts_base() {
    let client = ApiClient::new(&config("https://dummyjson.com")).unwrap();
    assert_eq!(client.base_url().as_str(), "https://dummyjson.com/");
  }
}
