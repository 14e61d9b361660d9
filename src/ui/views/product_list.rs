use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::Product;
use crate::app::Context;
use crate::guard::Route;
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_price, rating_color, stock_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

use super::paging::{handle_paging_key, list_title};

/// Paginated product table with search and a category filter
pub struct ProductListView {
  list_state: ListState,
  search: SearchInput,
}

impl ProductListView {
  pub fn new(ctx: &mut Context) -> Self {
    ctx.stores.categories.load();
    ctx.stores.products.load();
    Self {
      list_state: ListState::default().with_selected(Some(0)),
      search: SearchInput::new(),
    }
  }

  /// Move the filter to the next category ("all" follows the last one).
  fn cycle_category(ctx: &mut Context) {
    let stores = &mut ctx.stores;
    let next = stores
      .categories
      .next_after(stores.products.params().category.as_deref());
    stores.products.set_category(next);
    stores.products.load();
  }

  fn row(product: &Product) -> ListItem<'static> {
    let brand = product.brand.as_deref().unwrap_or("-");
    ListItem::new(Line::from(vec![
      Span::styled(format!("{:>4} ", product.id), Style::default().fg(Color::DarkGray)),
      Span::styled(
        format!("{:<32}", truncate(&product.title, 32)),
        Style::default().fg(Color::Cyan),
      ),
      Span::styled(
        format!(" {:<18}", truncate(&product.category, 18)),
        Style::default().fg(Color::DarkGray),
      ),
      Span::raw(format!(" {:<16}", truncate(brand, 16))),
      Span::raw(format!(" {:>10}", format_price(product.price))),
      Span::styled(
        format!(" {:>5.2}", product.rating),
        Style::default().fg(rating_color(product.rating)),
      ),
      Span::styled(
        format!(" {:>5}", product.stock),
        Style::default().fg(stock_color(product.stock)),
      ),
    ]))
  }
}

impl View for ProductListView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> ViewAction {
    let current = ctx.stores.products.params().search_text.clone();
    match self.search.handle_key(key, &current) {
      KeyResult::Event(SearchEvent::Submitted(query)) => {
        let products = &mut ctx.stores.products;
        products.set_search_text(query);
        products.load();
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    if handle_paging_key(&key, &mut ctx.stores.products) {
      self.list_state.select(Some(0));
      return ViewAction::None;
    }

    if key.code == KeyCode::Char('c') {
      Self::cycle_category(ctx);
      self.list_state.select(Some(0));
      return ViewAction::None;
    }

    let products = &mut ctx.stores.products;
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Enter => {
        let selected = self.list_state.selected().and_then(|i| products.items().get(i));
        if let Some(product) = selected {
          return ViewAction::Navigate(Route::ProductDetail(product.id));
        }
      }
      KeyCode::Esc if !products.params().search_text.is_empty() => {
        products.set_search_text("");
        products.load();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
    let products = &ctx.stores.products;
    ensure_valid_selection(&mut self.list_state, products.items().len());

    let block = Block::default()
      .title(list_title("Products", products))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(error) = products.error() {
      let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", error))
        .block(block)
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
    } else if products.items().is_empty() {
      let content = if products.is_loading() {
        "Loading products..."
      } else {
        "No products found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
    } else {
      let items: Vec<ListItem> = products.items().iter().map(Self::row).collect();
      let list = List::new(items)
        .block(block)
        .highlight_style(
          Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
      frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Products".to_string()
  }

  fn route(&self) -> Route {
    Route::Products
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("c", "category").with_priority(25),
      ShortcutInfo::new("n/p", "page").with_priority(30),
      ShortcutInfo::new("+/-", "page size").with_priority(40),
      ShortcutInfo::new("r", "retry").with_priority(50),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
