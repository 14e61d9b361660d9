//! Client-side state for the list views.
//!
//! One [`Stores`] container is built per authenticated session and handed to
//! the views explicitly; logging out resets it.

mod categories;
mod fetch;
mod params;

use std::sync::Arc;

use crate::api::{ApiClient, Collection, Product, RemoteList, User};
use crate::cache::PageCache;
use crate::config::Config;

pub use categories::CategoryList;
pub use fetch::{FetchStore, LoadOutcome};
pub use params::{QueryParams, ALL_CATEGORIES};

/// The list stores of one session
pub struct Stores {
  pub users: FetchStore<User>,
  pub products: FetchStore<Product>,
  pub categories: CategoryList,
}

impl Stores {
  /// Stores backed by the remote API
  pub fn remote(client: &ApiClient, config: &Config) -> Self {
    let page_size = config.list.page_size;
    Self {
      users: FetchStore::new(
        Collection::Users,
        Arc::new(RemoteList::new(client.clone(), Collection::Users)),
        page_size,
        PageCache::from_config(&config.cache),
      ),
      products: FetchStore::new(
        Collection::Products,
        Arc::new(RemoteList::new(client.clone(), Collection::Products)),
        page_size,
        PageCache::from_config(&config.cache),
      ),
      categories: CategoryList::new(Arc::new(client.clone())),
    }
  }

  /// Back to a freshly constructed state
  pub fn reset(&mut self) {
    self.users.reset();
    self.products.reset();
    self.categories.reset();
  }

  /// Apply completed requests; returns whether anything changed.
  pub fn poll(&mut self) -> bool {
    let users = self.users.poll();
    let products = self.products.poll();
    let categories = self.categories.poll();
    users || products || categories
  }
}
