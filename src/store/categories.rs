use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::api::CategorySource;
use crate::query::{Query, QueryState};

use super::params::ALL_CATEGORIES;

/// Product categories for the category picker.
///
/// Failures are not surfaced: the list is simply empty.
pub struct CategoryList {
  query: Query<Vec<String>>,
}

impl CategoryList {
  pub fn new(source: Arc<dyn CategorySource>) -> Self {
    let query = Query::new(move || {
      let future = source.fetch_categories();
      async move {
        match future.await {
          Ok(categories) => Ok(categories),
          Err(e) => {
            warn!(error = %e, "failed to load product categories");
            Ok(Vec::new())
          }
        }
      }
    })
    .with_stale_time(Duration::from_secs(60 * 60));

    Self { query }
  }

  /// Fetch unless a fresh list is already loaded or loading.
  pub fn load(&mut self) {
    if matches!(self.query.state(), QueryState::Idle) || self.query.is_stale() {
      self.query.fetch();
    }
  }

  pub fn poll(&mut self) -> bool {
    self.query.poll()
  }

  pub async fn settle(&mut self) {
    self.query.wait().await;
  }

  pub fn reset(&mut self) {
    self.query.reset();
  }

  pub fn categories(&self) -> &[String] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  /// The category after `current` in picker order, wrapping through "all".
  ///
  /// `None` stands for "all".
  pub fn next_after(&self, current: Option<&str>) -> Option<String> {
    let categories = self.categories();
    let position = match current {
      None | Some(ALL_CATEGORIES) => None,
      Some(c) => categories.iter().position(|s| s == c),
    };

    let next = match position {
      None => 0,
      Some(i) => i + 1,
    };
    categories.get(next).cloned()
  }
}
