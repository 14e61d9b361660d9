//! Bounded in-memory cache of resolved pages.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::config::CacheConfig;

use super::key::CacheKey;

/// A cached result page
#[derive(Debug, Clone)]
pub struct CachedPage<T> {
  pub items: Vec<T>,
  pub total: u64,
  cached_at: Instant,
}

impl<T> CachedPage<T> {
  fn is_expired(&self, ttl: Option<Duration>) -> bool {
    ttl.is_some_and(|ttl| self.cached_at.elapsed() >= ttl)
  }
}

/// LRU page cache with an optional time-to-live.
///
/// Entries are write-once: inserting under a key that already holds a live
/// entry keeps the existing entry.
pub struct PageCache<T> {
  entries: LruCache<CacheKey, CachedPage<T>>,
  ttl: Option<Duration>,
}

impl<T> PageCache<T> {
  pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
    let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
    Self {
      entries: LruCache::new(capacity),
      ttl,
    }
  }

  pub fn from_config(config: &CacheConfig) -> Self {
    Self::new(config.max_entries, config.ttl_secs.map(Duration::from_secs))
  }

  /// Look up a live entry, marking it most recently used.
  pub fn get(&mut self, key: &CacheKey) -> Option<&CachedPage<T>> {
    let expired = self
      .entries
      .peek(key)
      .is_some_and(|entry| entry.is_expired(self.ttl));
    if expired {
      self.entries.pop(key);
      return None;
    }
    self.entries.get(key)
  }

  /// Store a page unless a live entry already exists. Returns whether it was written.
  pub fn insert(&mut self, key: CacheKey, items: Vec<T>, total: u64) -> bool {
    let live = self
      .entries
      .peek(&key)
      .is_some_and(|entry| !entry.is_expired(self.ttl));
    if live {
      return false;
    }

    self.entries.put(
      key,
      CachedPage {
        items,
        total,
        cached_at: Instant::now(),
      },
    );
    true
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }
}
