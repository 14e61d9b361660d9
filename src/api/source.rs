//! Seams between the stores and the network.
//!
//! Stores hold these as trait objects so tests can substitute canned sources.

use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::{Collection, ListRequest};
use super::types::{AuthSession, Page};

/// Something that can resolve a list request into a page of `T`
pub trait ListSource<T>: Send + Sync {
  fn fetch_page(&self, request: ListRequest) -> BoxFuture<'static, Result<Page<T>, ApiError>>;
}

/// Something that can list product categories
pub trait CategorySource: Send + Sync {
  fn fetch_categories(&self) -> BoxFuture<'static, Result<Vec<String>, ApiError>>;
}

/// Something that can exchange credentials for a session
pub trait Authenticator: Send + Sync {
  fn login(
    &self,
    username: String,
    password: String,
    expires_in_mins: u32,
  ) -> BoxFuture<'static, Result<AuthSession, ApiError>>;
}

/// A collection served by the remote API
#[derive(Clone)]
pub struct RemoteList {
  client: ApiClient,
  collection: Collection,
}

impl RemoteList {
  pub fn new(client: ApiClient, collection: Collection) -> Self {
    Self { client, collection }
  }
}

impl<T> ListSource<T> for RemoteList
where
  T: DeserializeOwned + Send + 'static,
{
  fn fetch_page(&self, request: ListRequest) -> BoxFuture<'static, Result<Page<T>, ApiError>> {
    let client = self.client.clone();
    let collection = self.collection;
    async move { client.fetch_page(collection, &request).await }.boxed()
  }
}

impl CategorySource for ApiClient {
  fn fetch_categories(&self) -> BoxFuture<'static, Result<Vec<String>, ApiError>> {
    let client = self.clone();
    async move { client.categories().await }.boxed()
  }
}

impl Authenticator for ApiClient {
  fn login(
    &self,
    username: String,
    password: String,
    expires_in_mins: u32,
  ) -> BoxFuture<'static, Result<AuthSession, ApiError>> {
    let client = self.clone();
    async move { ApiClient::login(&client, &username, &password, expires_in_mins).await }.boxed()
  }
}
