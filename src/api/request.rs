//! Request shapes for the collection endpoints and their URLs.

use std::fmt;

use url::Url;

use super::error::ApiError;

/// Remote collections the dashboard browses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Users,
  Products,
}

impl Collection {
  /// First path segment of the collection's endpoints
  pub fn path(self) -> &'static str {
    match self {
      Self::Users => "users",
      Self::Products => "products",
    }
  }

  /// Whether `/{collection}/category/{slug}` exists
  pub fn supports_category(self) -> bool {
    matches!(self, Self::Products)
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.path())
  }
}

/// One of the three list endpoint shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
  /// `GET /{collection}?limit=&skip=`
  All { limit: u64, skip: u64 },
  /// `GET /{collection}/search?q=&limit=&skip=`
  Search { query: String, limit: u64, skip: u64 },
  /// `GET /{collection}/category/{slug}?limit=&skip=`
  Category { slug: String, limit: u64, skip: u64 },
}

impl ListRequest {
  fn paging(&self) -> (u64, u64) {
    match self {
      Self::All { limit, skip }
      | Self::Search { limit, skip, .. }
      | Self::Category { limit, skip, .. } => (*limit, *skip),
    }
  }

  /// Resolve against the API base URL.
  pub fn url(&self, base: &Url, collection: Collection) -> Result<Url, ApiError> {
    let mut url = base.clone();
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
      segments.pop_if_empty().push(collection.path());
      match self {
        Self::All { .. } => {}
        Self::Search { .. } => {
          segments.push("search");
        }
        Self::Category { slug, .. } => {
          segments.push("category").push(slug);
        }
      }
    }

    let (limit, skip) = self.paging();
    {
      let mut query = url.query_pairs_mut();
      if let Self::Search { query: q, .. } = self {
        query.append_pair("q", q);
      }
      query
        .append_pair("limit", &limit.to_string())
        .append_pair("skip", &skip.to_string());
    }

    Ok(url)
  }
}

/// URL of a single path below the base, e.g. `["users", "5"]`.
pub fn endpoint(base: &Url, parts: &[&str]) -> Result<Url, ApiError> {
  let mut url = base.clone();
  url
    .path_segments_mut()
    .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
    .pop_if_empty()
    .extend(parts);
  Ok(url)
}
