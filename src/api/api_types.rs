//! Serde types matching the remote API's wire format.
//!
//! Kept apart from the domain types so envelope quirks (collection-named item
//! arrays, two category shapes) are resolved once at the boundary.

use serde::{Deserialize, Serialize};

use super::types::{Account, AuthSession, Page};

// ============================================================================
// List envelope
// ============================================================================

/// `{ <collection>: [...], total, skip, limit }`
///
/// The item array is named after the collection (`users`, `products`);
/// a generic `items` key is accepted too.
#[derive(Debug, Deserialize)]
pub struct ApiListEnvelope<T> {
  #[serde(alias = "users", alias = "products")]
  pub items: Vec<T>,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub skip: u64,
  #[serde(default)]
  pub limit: u64,
}

impl<T> From<ApiListEnvelope<T>> for Page<T> {
  fn from(envelope: ApiListEnvelope<T>) -> Self {
    Page {
      items: envelope.items,
      total: envelope.total,
      skip: envelope.skip,
      limit: envelope.limit,
    }
  }
}

// ============================================================================
// Categories
// ============================================================================

/// One element of `GET /products/categories`.
///
/// Older API versions return bare slugs, newer ones `{ slug, name, url }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiCategoryEntry {
  Slug(String),
  Object { slug: String },
}

impl ApiCategoryEntry {
  pub fn into_slug(self) -> String {
    match self {
      Self::Slug(slug) | Self::Object { slug } => slug,
    }
  }
}

/// Normalize a category response into plain slugs.
pub fn normalize_categories(entries: Vec<ApiCategoryEntry>) -> Vec<String> {
  entries.into_iter().map(ApiCategoryEntry::into_slug).collect()
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoginRequest<'a> {
  pub username: &'a str,
  pub password: &'a str,
  pub expires_in_mins: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoginResponse {
  #[serde(alias = "token")]
  pub access_token: String,
  #[serde(flatten)]
  pub account: Account,
}

impl From<ApiLoginResponse> for AuthSession {
  fn from(response: ApiLoginResponse) -> Self {
    AuthSession {
      token: response.access_token,
      account: response.account,
    }
  }
}

/// Error body returned alongside non-2xx statuses
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
  pub message: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::{Product, User};

  #[test]
  fn test_envelope_uses_collection_field() {
    let body = r#"{"users":[{"id":1,"firstName":"Emily","lastName":"Johnson"}],"total":208,"skip":0,"limit":1}"#;
    let envelope: ApiListEnvelope<User> = serde_json::from_str(body).unwrap();
    let page: Page<User> = envelope.into();

    assert_eq!(page.total, 208);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].full_name(), "Emily Johnson");
  }

  #[test]
  fn test_envelope_accepts_generic_items() {
    let body = r#"{"items":[{"id":7,"title":"Lipstick","price":12.99}],"total":1,"skip":0,"limit":10}"#;
    let envelope: ApiListEnvelope<Product> = serde_json::from_str(body).unwrap();
    assert_eq!(envelope.items[0].title, "Lipstick");
    assert_eq!(envelope.limit, 10);
  }

  #[test]
  fn test_categories_as_strings() {
    let body = r#"["beauty","fragrances","smartphones"]"#;
    let entries: Vec<ApiCategoryEntry> = serde_json::from_str(body).unwrap();
    assert_eq!(
      normalize_categories(entries),
      vec!["beauty", "fragrances", "smartphones"]
    );
  }

  #[test]
  fn test_categories_as_objects() {
    let body = r#"[
      {"slug":"beauty","name":"Beauty","url":"https://dummyjson.com/products/category/beauty"},
      {"slug":"home-decoration","name":"Home Decoration","url":"x"}
    ]"#;
    let entries: Vec<ApiCategoryEntry> = serde_json::from_str(body).unwrap();
    assert_eq!(normalize_categories(entries), vec!["beauty", "home-decoration"]);
  }

  #[test]
  fn test_login_response_into_session() {
    let body = r#"{
      "accessToken":"abc.def","refreshToken":"zzz","id":1,"username":"emilys",
      "email":"emily.johnson@x.dummyjson.com","firstName":"Emily","lastName":"Johnson",
      "gender":"female","image":"https://dummyjson.com/icon/emilys/128"
    }"#;
    let response: ApiLoginResponse = serde_json::from_str(body).unwrap();
    let session: AuthSession = response.into();

    assert_eq!(session.token, "abc.def");
    assert_eq!(session.account.username, "emilys");
    assert_eq!(session.account.first_name, "Emily");
  }

  #[test]
  fn test_login_request_wire_names() {
    let request = ApiLoginRequest {
      username: "emilys",
      password: "emilyspass",
      expires_in_mins: 60,
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["expiresInMins"], 60);
    assert_eq!(json["username"], "emilys");
  }
}
