use crate::api::ListRequest;

/// Category value that means "no category filter"
pub const ALL_CATEGORIES: &str = "all";

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// What a list store is currently asking the remote source for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
  pub offset: u64,
  pub page_size: u64,
  pub search_text: String,
  pub category: Option<String>,
}

impl Default for QueryParams {
  fn default() -> Self {
    Self::with_page_size(DEFAULT_PAGE_SIZE)
  }
}

impl QueryParams {
  pub fn with_page_size(page_size: u64) -> Self {
    Self {
      offset: 0,
      page_size: page_size.max(1),
      search_text: String::new(),
      category: None,
    }
  }

  /// Change the search text; pagination restarts.
  pub fn set_search_text(&mut self, text: impl Into<String>) {
    self.search_text = text.into();
    self.offset = 0;
  }

  /// Change the category filter; pagination restarts. An empty name clears it.
  pub fn set_category(&mut self, category: Option<String>) {
    self.category = category.filter(|c| !c.is_empty());
    self.offset = 0;
  }

  /// Set offset and page size verbatim.
  pub fn set_pagination(&mut self, offset: u64, page_size: u64) {
    self.offset = offset;
    self.page_size = page_size.max(1);
  }

  /// Pick the endpoint shape: search first, then category, then the plain list.
  pub fn to_request(&self) -> ListRequest {
    let limit = self.page_size;
    let skip = self.offset;

    if !self.search_text.is_empty() {
      return ListRequest::Search {
        query: self.search_text.clone(),
        limit,
        skip,
      };
    }

    match self.category.as_deref() {
      Some(slug) if slug != ALL_CATEGORIES => ListRequest::Category {
        slug: slug.to_string(),
        limit,
        skip,
      },
      _ => ListRequest::All { limit, skip },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_search_text_resets_offset() {
    let mut params = QueryParams::default();
    params.set_pagination(40, 10);
    params.set_search_text("phone");
    assert_eq!(params.offset, 0);
    assert_eq!(params.page_size, 10);
    assert_eq!(params.search_text, "phone");
  }

  #[test]
  fn test_category_resets_offset() {
    let mut params = QueryParams::default();
    params.set_pagination(30, 5);
    params.set_category(Some("beauty".to_string()));
    assert_eq!(params.offset, 0);
    assert_eq!(params.page_size, 5);
    assert_eq!(params.category.as_deref(), Some("beauty"));
  }

  #[test]
  fn test_empty_category_clears() {
    let mut params = QueryParams::default();
    params.set_category(Some("beauty".to_string()));
    params.set_category(Some(String::new()));
    assert_eq!(params.category, None);
  }

  #[test]
  fn test_pagination_leaves_filters_alone() {
    let mut params = QueryParams::default();
    params.set_search_text("kiwi");
    params.set_category(Some("groceries".to_string()));
    params.set_pagination(20, 25);

    assert_eq!(params.offset, 20);
    assert_eq!(params.page_size, 25);
    assert_eq!(params.search_text, "kiwi");
    assert_eq!(params.category.as_deref(), Some("groceries"));
  }

  #[test]
  fn test_zero_page_size_clamped() {
    let mut params = QueryParams::default();
    params.set_pagination(0, 0);
    assert_eq!(params.page_size, 1);
  }

  #[test]
  fn test_request_unfiltered() {
    let params = QueryParams::default();
    assert_eq!(params.to_request(), ListRequest::All { limit: 10, skip: 0 });
  }

  #[test]
  fn test_request_search_wins_over_category() {
    let mut params = QueryParams::default();
    params.set_category(Some("smartphones".to_string()));
    params.set_search_text("phone");
    assert_eq!(
      params.to_request(),
      ListRequest::Search {
        query: "phone".to_string(),
        limit: 10,
        skip: 0
      }
    );
  }

  #[test]
  fn test_request_category() {
    let mut params = QueryParams::default();
    params.set_category(Some("smartphones".to_string()));
    params.set_pagination(10, 10);
    assert_eq!(
      params.to_request(),
      ListRequest::Category {
        slug: "smartphones".to_string(),
        limit: 10,
        skip: 10
      }
    );
  }

  #[test]
  fn test_request_all_sentinel() {
    let mut params = QueryParams::default();
    params.set_category(Some(ALL_CATEGORIES.to_string()));
    assert_eq!(params.to_request(), ListRequest::All { limit: 10, skip: 0 });
  }
}
