//! Key handling and titles shared by the paginated list views.

use crossterm::event::{KeyCode, KeyEvent};

use crate::store::FetchStore;

/// Choices offered by `+` / `-`
pub const PAGE_SIZES: [u64; 4] = [5, 10, 25, 50];

/// Next size up (or down) from `current`, clamped to the ends of PAGE_SIZES.
pub fn step_page_size(current: u64, larger: bool) -> u64 {
  if larger {
    PAGE_SIZES
      .iter()
      .copied()
      .find(|&s| s > current)
      .unwrap_or(PAGE_SIZES[PAGE_SIZES.len() - 1])
  } else {
    PAGE_SIZES
      .iter()
      .rev()
      .copied()
      .find(|&s| s < current)
      .unwrap_or(PAGE_SIZES[0])
  }
}

/// Apply `n`, `p`, `+`, `-` or `r` to `store`, loading when params change.
///
/// Returns `false` for any other key.
pub fn handle_paging_key<T>(key: &KeyEvent, store: &mut FetchStore<T>) -> bool
where
  T: Clone + Send + 'static,
{
  let changed = match key.code {
    KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => store.next_page(),
    KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => store.prev_page(),
    KeyCode::Char('+') | KeyCode::Char('=') => {
      let size = step_page_size(store.params().page_size, true);
      let changed = size != store.params().page_size;
      store.set_page_size(size);
      changed
    }
    KeyCode::Char('-') => {
      let size = step_page_size(store.params().page_size, false);
      let changed = size != store.params().page_size;
      store.set_page_size(size);
      changed
    }
    // Failed pages are never cached, so loading again retries them
    KeyCode::Char('r') => true,
    _ => return false,
  };

  if changed {
    store.load();
  }
  true
}

/// Block title for a list: name, filters and position.
pub fn list_title<T>(label: &str, store: &FetchStore<T>) -> String
where
  T: Clone + Send + 'static,
{
  let params = store.params();
  let mut title = format!(" {}", label);

  if let Some(category) = &params.category {
    title.push_str(&format!(" [{}]", category));
  }
  if !params.search_text.is_empty() {
    title.push_str(&format!(" /{}", params.search_text));
  }

  title.push_str(&format!(
    " page {} of {} (total {})",
    store.page(),
    store.page_count(),
    store.total()
  ));

  if store.is_loading() {
    title.push_str(" loading...");
  }
  title.push(' ');
  title
}
