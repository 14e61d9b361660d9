//! Request cache for the list stores.
//!
//! This module provides:
//! - Deterministic keys derived from a store's full query parameter tuple
//! - A bounded LRU page cache with an optional time-to-live
//! - Write-once entries: a cached page is never updated in place

mod key;
mod page_cache;

pub use key::CacheKey;
pub use page_cache::{CachedPage, PageCache};
