//! Paginated, cached list store.
//!
//! A `FetchStore<T>` turns its mutable [`QueryParams`] into the page a view
//! displays. Cache hits resolve synchronously inside [`FetchStore::load`];
//! misses spawn one request whose completion arrives over a channel and is
//! applied by [`FetchStore::poll`] (from the view's tick) or
//! [`FetchStore::settle`].
//!
//! Every `load()` takes a new generation number. A completion whose
//! generation is no longer current is still written to the cache, since it is
//! the right answer for its own key, but it never touches the displayed page.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Collection, ListSource, Page};
use crate::cache::{CacheKey, PageCache};

use super::params::QueryParams;

/// What `load()` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// Served from the cache, state already updated
  Cached,
  /// A request was spawned
  Fetching,
}

struct Completion<T> {
  generation: u64,
  key: CacheKey,
  result: Result<Page<T>, ApiError>,
}

pub struct FetchStore<T> {
  collection: Collection,
  source: Arc<dyn ListSource<T>>,
  default_page_size: u64,
  params: QueryParams,
  items: Vec<T>,
  total: u64,
  loading: bool,
  error: Option<String>,
  cache: PageCache<T>,
  generation: u64,
  in_flight: usize,
  tx: mpsc::UnboundedSender<Completion<T>>,
  rx: mpsc::UnboundedReceiver<Completion<T>>,
}

impl<T> FetchStore<T>
where
  T: Clone + Send + 'static,
{
  pub fn new(
    collection: Collection,
    source: Arc<dyn ListSource<T>>,
    page_size: u64,
    cache: PageCache<T>,
  ) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      collection,
      source,
      default_page_size: page_size.max(1),
      params: QueryParams::with_page_size(page_size),
      items: Vec::new(),
      total: 0,
      loading: false,
      error: None,
      cache,
      generation: 0,
      in_flight: 0,
      tx,
      rx,
    }
  }

  pub fn collection(&self) -> Collection {
    self.collection
  }

  pub fn params(&self) -> &QueryParams {
    &self.params
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn total(&self) -> u64 {
    self.total
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn cached_pages(&self) -> usize {
    self.cache.len()
  }

  /// 1-based page for the current offset
  pub fn page(&self) -> u64 {
    self.params.offset / self.params.page_size + 1
  }

  /// Number of pages for the last resolved total (at least 1)
  pub fn page_count(&self) -> u64 {
    self.total.div_ceil(self.params.page_size).max(1)
  }

  pub fn set_search_text(&mut self, text: impl Into<String>) {
    self.params.set_search_text(text);
  }

  /// Filter by category. Ignored for collections without category endpoints.
  pub fn set_category(&mut self, category: Option<String>) {
    if !self.collection.supports_category() {
      warn!(collection = %self.collection, "category filter not supported, ignoring");
      return;
    }
    self.params.set_category(category);
  }

  pub fn set_pagination(&mut self, offset: u64, page_size: u64) {
    self.params.set_pagination(offset, page_size);
  }

  /// Change rows per page, going back to the first page.
  pub fn set_page_size(&mut self, page_size: u64) {
    self.set_pagination(0, page_size);
  }

  /// Advance one page if there is one. Returns whether params changed.
  pub fn next_page(&mut self) -> bool {
    if self.page() >= self.page_count() {
      return false;
    }
    let size = self.params.page_size;
    self.set_pagination(self.params.offset + size, size);
    true
  }

  /// Go back one page if not on the first. Returns whether params changed.
  pub fn prev_page(&mut self) -> bool {
    if self.params.offset == 0 {
      return false;
    }
    let size = self.params.page_size;
    self.set_pagination(self.params.offset.saturating_sub(size), size);
    true
  }

  /// Resolve the current params, from cache or by spawning a request.
  ///
  /// Never fails; request errors end up in [`FetchStore::error`].
  pub fn load(&mut self) -> LoadOutcome {
    self.generation += 1;
    let key = CacheKey::for_params(self.collection, &self.params);

    if let Some(page) = self.cache.get(&key) {
      debug!(collection = %self.collection, key = key.as_str(), "cache hit");
      self.items = page.items.clone();
      self.total = page.total;
      self.error = None;
      // Anything still in flight is now superseded
      self.loading = false;
      return LoadOutcome::Cached;
    }

    let request = self.params.to_request();
    info!(collection = %self.collection, ?request, generation = self.generation, "fetching");

    self.loading = true;
    self.error = None;
    self.in_flight += 1;

    let future = self.source.fetch_page(request);
    let tx = self.tx.clone();
    let generation = self.generation;
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the store may have been reset or dropped
      let _ = tx.send(Completion {
        generation,
        key,
        result,
      });
    });

    LoadOutcome::Fetching
  }

  /// Apply any completed requests without blocking.
  ///
  /// Returns `true` if the displayed state changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(completion) = self.rx.try_recv() {
      changed |= self.apply(completion);
    }
    changed
  }

  /// Wait for every in-flight request to complete and apply it.
  pub async fn settle(&mut self) {
    while self.in_flight > 0 {
      match self.rx.recv().await {
        Some(completion) => {
          self.apply(completion);
        }
        None => break,
      }
    }
  }

  /// Drop params, state and cache, and disown in-flight requests.
  pub fn reset(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.tx = tx;
    self.rx = rx;
    self.in_flight = 0;
    self.generation += 1;
    self.params = QueryParams::with_page_size(self.default_page_size);
    self.items.clear();
    self.total = 0;
    self.loading = false;
    self.error = None;
    self.cache.clear();
  }

  fn apply(&mut self, completion: Completion<T>) -> bool {
    self.in_flight = self.in_flight.saturating_sub(1);
    let current = completion.generation == self.generation;

    match completion.result {
      Ok(page) => {
        if current {
          self.cache.insert(completion.key, page.items.clone(), page.total);
          self.items = page.items;
          self.total = page.total;
          self.loading = false;
          self.error = None;
          true
        } else {
          debug!(
            collection = %self.collection,
            generation = completion.generation,
            latest = self.generation,
            "discarding superseded response"
          );
          self.cache.insert(completion.key, page.items, page.total);
          false
        }
      }
      Err(e) => {
        warn!(collection = %self.collection, error = %e, current, "fetch failed");
        if !current {
          return false;
        }
        self.error = Some(format!("Failed to fetch {}: {}", self.collection, e));
        self.loading = false;
        true
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::ListRequest;
  use futures::future::{BoxFuture, FutureExt};
  use std::collections::VecDeque;
  use std::sync::Mutex;
  use std::time::Duration;

  type Canned = (Duration, Result<Page<u32>, ApiError>);

  /// List source that replays canned responses and records requests.
  #[derive(Default)]
  struct FakeSource {
    responses: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<ListRequest>>,
  }

  impl FakeSource {
    fn push_ok(&self, items: Vec<u32>, total: u64) {
      self.push_delayed(Duration::ZERO, Ok(page(items, total)));
    }

    fn push_err(&self, status: u16) {
      self.push_delayed(Duration::ZERO, Err(ApiError::status(status, None)));
    }

    fn push_delayed(&self, delay: Duration, result: Result<Page<u32>, ApiError>) {
      self.responses.lock().unwrap().push_back((delay, result));
    }

    fn requests(&self) -> Vec<ListRequest> {
      self.requests.lock().unwrap().clone()
    }
  }

  impl ListSource<u32> for FakeSource {
    fn fetch_page(&self, request: ListRequest) -> BoxFuture<'static, Result<Page<u32>, ApiError>> {
      self.requests.lock().unwrap().push(request);
      let (delay, result) = self
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((Duration::ZERO, Err(ApiError::status(500, Some("no canned response".into())))));
      async move {
        tokio::time::sleep(delay).await;
        result
      }
      .boxed()
    }
  }

  fn page(items: Vec<u32>, total: u64) -> Page<u32> {
    let limit = items.len() as u64;
    Page {
      items,
      total,
      skip: 0,
      limit,
    }
  }

  fn store(collection: Collection) -> (FetchStore<u32>, Arc<FakeSource>) {
    let source = Arc::new(FakeSource::default());
    let store = FetchStore::new(collection, source.clone(), 10, PageCache::new(16, None));
    (store, source)
  }

  #[tokio::test]
  async fn test_unfiltered_first_page() {
    let (mut store, source) = store(Collection::Products);
    source.push_ok((1..=10).collect(), 194);

    assert_eq!(store.load(), LoadOutcome::Fetching);
    assert!(store.is_loading());
    store.settle().await;

    assert_eq!(source.requests(), vec![ListRequest::All { limit: 10, skip: 0 }]);
    assert!(!store.is_loading());
    assert_eq!(store.items().len(), 10);
    assert_eq!(store.total(), 194);
    assert_eq!(store.page(), 1);
    assert_eq!(store.page_count(), 20);
  }

  #[tokio::test]
  async fn test_repeat_load_served_from_cache() {
    let (mut store, source) = store(Collection::Users);
    source.push_ok(vec![1, 2, 3], 3);

    store.load();
    store.settle().await;
    let first = store.items().to_vec();

    assert_eq!(store.load(), LoadOutcome::Cached);
    assert_eq!(source.requests().len(), 1);
    assert_eq!(store.items(), first.as_slice());
    assert_eq!(store.total(), 3);
  }

  #[tokio::test]
  async fn test_search_resets_offset_and_uses_search_endpoint() {
    let (mut store, source) = store(Collection::Products);
    source.push_ok(vec![1], 1);

    store.set_pagination(30, 10);
    store.set_search_text("phone");
    assert_eq!(store.params().offset, 0);

    store.load();
    store.settle().await;
    assert_eq!(
      source.requests(),
      vec![ListRequest::Search {
        query: "phone".to_string(),
        limit: 10,
        skip: 0
      }]
    );
  }

  #[tokio::test]
  async fn test_search_wins_over_category() {
    let (mut store, source) = store(Collection::Products);
    source.push_ok(vec![1], 1);

    store.set_search_text("phone");
    store.set_category(Some("smartphones".to_string()));
    store.load();
    store.settle().await;

    assert!(matches!(source.requests()[0], ListRequest::Search { .. }));
  }

  #[tokio::test]
  async fn test_category_endpoint_and_all_sentinel() {
    let (mut store, source) = store(Collection::Products);
    source.push_ok(vec![1], 1);
    source.push_ok(vec![2], 1);

    store.set_category(Some("smartphones".to_string()));
    store.load();
    store.settle().await;

    store.set_category(Some("all".to_string()));
    store.load();
    store.settle().await;

    assert_eq!(
      source.requests(),
      vec![
        ListRequest::Category {
          slug: "smartphones".to_string(),
          limit: 10,
          skip: 0
        },
        ListRequest::All { limit: 10, skip: 0 },
      ]
    );
  }

  #[test]
  fn test_category_ignored_for_users() {
    let (mut store, _source) = store(Collection::Users);
    store.set_pagination(20, 10);
    store.set_category(Some("beauty".to_string()));
    assert_eq!(store.params().category, None);
    assert_eq!(store.params().offset, 20);
  }

  #[tokio::test]
  async fn test_failure_keeps_previous_page() {
    let (mut store, source) = store(Collection::Users);
    source.push_ok(vec![1, 2], 2);
    source.push_err(503);

    store.load();
    store.settle().await;

    store.set_pagination(10, 10);
    store.load();
    store.settle().await;

    assert!(!store.is_loading());
    assert_eq!(store.items(), &[1, 2]);
    assert_eq!(store.total(), 2);
    assert_eq!(
      store.error(),
      Some("Failed to fetch users: HTTP 503: request failed")
    );
  }

  #[tokio::test]
  async fn test_failure_is_not_cached() {
    let (mut store, source) = store(Collection::Users);
    source.push_err(500);
    source.push_ok(vec![7], 1);

    store.load();
    store.settle().await;
    assert!(store.error().is_some());

    assert_eq!(store.load(), LoadOutcome::Fetching);
    store.settle().await;
    assert_eq!(store.items(), &[7]);
  }

  #[tokio::test]
  async fn test_success_clears_error() {
    let (mut store, source) = store(Collection::Products);
    source.push_err(500);
    source.push_ok(vec![5], 1);

    store.load();
    store.settle().await;
    assert!(store.error().is_some());

    store.set_search_text("x");
    store.load();
    assert_eq!(store.error(), None);
    store.settle().await;
    assert_eq!(store.error(), None);
    assert_eq!(store.items(), &[5]);
  }

  #[tokio::test]
  async fn test_cache_hit_clears_error() {
    let (mut store, source) = store(Collection::Users);
    source.push_ok(vec![1], 1);
    source.push_err(500);

    store.load();
    store.settle().await;
    store.set_pagination(10, 10);
    store.load();
    store.settle().await;
    assert!(store.error().is_some());

    store.set_pagination(0, 10);
    assert_eq!(store.load(), LoadOutcome::Cached);
    assert_eq!(store.error(), None);
  }

  #[tokio::test]
  async fn test_stale_response_does_not_overwrite_newer() {
    let (mut store, source) = store(Collection::Products);
    source.push_delayed(Duration::from_millis(50), Ok(page(vec![1, 1, 1], 30)));
    source.push_delayed(Duration::ZERO, Ok(page(vec![2, 2, 2], 30)));

    store.load();
    store.set_pagination(10, 10);
    store.load();
    store.settle().await;

    // The slow first response lands last but is discarded for display
    assert_eq!(store.items(), &[2, 2, 2]);
    assert!(!store.is_loading());

    // ...and still cached under its own key
    store.set_pagination(0, 10);
    assert_eq!(store.load(), LoadOutcome::Cached);
    assert_eq!(store.items(), &[1, 1, 1]);
    assert_eq!(source.requests().len(), 2);
  }

  #[tokio::test]
  async fn test_stale_failure_is_ignored() {
    let (mut store, source) = store(Collection::Users);
    source.push_delayed(Duration::from_millis(50), Err(ApiError::status(500, None)));
    source.push_delayed(Duration::ZERO, Ok(page(vec![4], 1)));

    store.load();
    store.set_search_text("emily");
    store.load();
    store.settle().await;

    assert_eq!(store.error(), None);
    assert_eq!(store.items(), &[4]);
  }

  #[tokio::test]
  async fn test_cache_hit_supersedes_in_flight() {
    let (mut store, source) = store(Collection::Users);
    source.push_ok(vec![1], 20);
    source.push_delayed(Duration::from_millis(30), Ok(page(vec![2], 20)));

    store.load();
    store.settle().await;

    store.next_page();
    assert_eq!(store.load(), LoadOutcome::Fetching);
    assert!(store.is_loading());

    store.prev_page();
    assert_eq!(store.load(), LoadOutcome::Cached);
    assert!(!store.is_loading());

    store.settle().await;
    assert_eq!(store.items(), &[1]);
    assert!(!store.is_loading());
  }

  #[tokio::test]
  async fn test_poll_before_completion_is_noop() {
    let (mut store, source) = store(Collection::Users);
    source.push_delayed(Duration::from_millis(50), Ok(page(vec![1], 1)));

    store.load();
    assert!(!store.poll());
    assert!(store.is_loading());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.poll());
    assert!(!store.is_loading());
  }

  #[tokio::test]
  async fn test_paging_helpers() {
    let (mut store, source) = store(Collection::Products);
    source.push_ok(vec![0; 10], 25);

    assert!(!store.prev_page());
    store.load();
    store.settle().await;
    assert_eq!(store.page_count(), 3);

    assert!(store.next_page());
    assert!(store.next_page());
    assert_eq!(store.params().offset, 20);
    assert_eq!(store.page(), 3);
    assert!(!store.next_page());

    assert!(store.prev_page());
    assert_eq!(store.params().offset, 10);

    store.set_page_size(25);
    assert_eq!(store.params().offset, 0);
    assert_eq!(store.params().page_size, 25);
  }

  #[tokio::test]
  async fn test_reset_clears_everything() {
    let (mut store, source) = store(Collection::Products);
    source.push_ok(vec![1], 1);
    source.push_ok(vec![1], 1);

    store.set_search_text("x");
    store.load();
    store.settle().await;
    assert_eq!(store.cached_pages(), 1);

    store.reset();
    assert_eq!(store.params(), &QueryParams::with_page_size(10));
    assert!(store.items().is_empty());
    assert_eq!(store.total(), 0);
    assert_eq!(store.cached_pages(), 0);

    store.set_search_text("x");
    assert_eq!(store.load(), LoadOutcome::Fetching);
    store.settle().await;
    assert_eq!(source.requests().len(), 2);
  }
}
