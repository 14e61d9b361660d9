//! Cache keys derived from a store's query parameters.

use sha2::{Digest, Sha256};

use crate::api::Collection;
use crate::store::QueryParams;

/// Deterministic key for one query parameter tuple.
///
/// The parameters are first written to a canonical string in which text
/// fields are length-prefixed and a missing category is spelled differently
/// from an empty one, so no two tuples share a canonical form. The canonical
/// string is then hashed for a stable, fixed-length key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
  pub fn for_params(collection: Collection, params: &QueryParams) -> Self {
    let canonical = canonical(collection, params);

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Self(hex::encode(hasher.finalize()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

fn canonical(collection: Collection, params: &QueryParams) -> String {
  let category = match &params.category {
    Some(c) => format!("+{}:{}", c.len(), c),
    None => "-".to_string(),
  };
  format!(
    "{}|{}|{}|{}:{}|{}",
    collection.path(),
    params.offset,
    params.page_size,
    params.search_text.len(),
    params.search_text,
    category
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn params(offset: u64, page_size: u64, search: &str, category: Option<&str>) -> QueryParams {
    QueryParams {
      offset,
      page_size,
      search_text: search.to_string(),
      category: category.map(String::from),
    }
  }

  fn key(p: &QueryParams) -> CacheKey {
    CacheKey::for_params(Collection::Products, p)
  }

  #[test]
  fn test_identical_params_same_key() {
    let a = params(10, 10, "phone", Some("smartphones"));
    let b = params(10, 10, "phone", Some("smartphones"));
    assert_eq!(key(&a), key(&b));
    assert_eq!(key(&a).as_str().len(), 64);
  }

  #[test]
  fn test_each_field_changes_key() {
    let base = params(0, 10, "", None);
    let variants = [
      params(10, 10, "", None),
      params(0, 25, "", None),
      params(0, 10, "a", None),
      params(0, 10, "", Some("beauty")),
    ];
    for v in &variants {
      assert_ne!(key(&base), key(v), "{:?}", v);
    }
  }

  #[test]
  fn test_missing_and_empty_category_differ() {
    assert_ne!(key(&params(0, 10, "", None)), key(&params(0, 10, "", Some(""))));
  }

  #[test]
  fn test_separator_in_text_is_not_ambiguous() {
    // A naive "{search}-{category}" join would collide here
    let a = params(0, 10, "a-b", Some("c"));
    let b = params(0, 10, "a", Some("b-c"));
    assert_ne!(key(&a), key(&b));

    let c = params(0, 10, "x|1", None);
    let d = params(0, 10, "x", Some("1"));
    assert_ne!(key(&c), key(&d));
  }

  #[test]
  fn test_numeric_fields_not_confused() {
    // "1" + "10" vs "11" + "0" style concatenation collisions
    assert_ne!(key(&params(1, 10, "", None)), key(&params(11, 0, "", None)));
  }

  #[test]
  fn test_collection_scopes_key() {
    let p = params(0, 10, "", None);
    assert_ne!(
      CacheKey::for_params(Collection::Users, &p),
      CacheKey::for_params(Collection::Products, &p)
    );
  }

  #[test]
  fn test_grid_of_distinct_tuples_has_distinct_keys() {
    let mut seen = HashSet::new();
    let mut count = 0;
    for offset in [0, 5, 10] {
      for page_size in [5, 10] {
        for search in ["", "a", "phone"] {
          for category in [None, Some("all"), Some("beauty")] {
            seen.insert(key(&params(offset, page_size, search, category)));
            count += 1;
          }
        }
      }
    }
    assert_eq!(seen.len(), count);
  }
}
