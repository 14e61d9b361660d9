//! Client for the remote users/products API.

pub mod api_types;
pub mod client;
pub mod error;
pub mod request;
pub mod source;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::{Collection, ListRequest};
pub use source::{Authenticator, CategorySource, ListSource, RemoteList};
pub use types::{Account, AuthSession, Page, Product, ProductDetail, User, UserDetail};
