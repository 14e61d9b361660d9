use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::Context;
use crate::guard::Route;
use crate::store::FetchStore;
use crate::ui::view::{ShortcutInfo, View, ViewAction};

const SECTIONS: [(&str, Route); 2] = [("Users", Route::Users), ("Products", Route::Products)];

/// Landing screen: a greeting and the size of each collection.
pub struct DashboardView {
  list_state: ListState,
}

impl DashboardView {
  pub fn new(ctx: &mut Context) -> Self {
    load_if_empty(&mut ctx.stores.users);
    load_if_empty(&mut ctx.stores.products);

    let mut list_state = ListState::default();
    list_state.select(Some(0));
    Self { list_state }
  }
}

fn load_if_empty<T: Clone + Send + 'static>(store: &mut FetchStore<T>) {
  if store.items().is_empty() && !store.is_loading() {
    store.load();
  }
}

fn total_label<T: Clone + Send + 'static>(store: &FetchStore<T>) -> (String, Color) {
  if let Some(error) = store.error() {
    (error.to_string(), Color::Red)
  } else if store.is_loading() && store.total() == 0 {
    ("loading...".to_string(), Color::DarkGray)
  } else {
    (store.total().to_string(), Color::Yellow)
  }
}

impl View for DashboardView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('u') => return ViewAction::Navigate(Route::Users),
      KeyCode::Char('p') => return ViewAction::Navigate(Route::Products),
      KeyCode::Char('r') => {
        ctx.stores.users.load();
        ctx.stores.products.load();
      }
      KeyCode::Enter => {
        let selected = self.list_state.selected().unwrap_or(0);
        if let Some((_, route)) = SECTIONS.get(selected) {
          return ViewAction::Navigate(route.clone());
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
    crate::ui::ensure_valid_selection(&mut self.list_state, SECTIONS.len());

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(3), Constraint::Min(1)])
      .split(area);

    let name = ctx
      .session
      .account()
      .map(|a| a.first_name.as_str())
      .filter(|n| !n.is_empty())
      .unwrap_or("admin");
    let greeting = Paragraph::new(Line::from(vec![
      Span::raw("Welcome back, "),
      Span::styled(name.to_string(), Style::default().fg(Color::Cyan).bold()),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(greeting, chunks[0]);

    let totals = [
      total_label(&ctx.stores.users),
      total_label(&ctx.stores.products),
    ];
    let items: Vec<ListItem> = SECTIONS
      .iter()
      .zip(totals)
      .map(|((label, _), (total, color))| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<12}", label), Style::default().fg(Color::Cyan)),
          Span::styled(total, Style::default().fg(color)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(
        Block::default()
          .title(" Dashboard ")
          .title_alignment(Alignment::Center)
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Blue)),
      )
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    "Dashboard".to_string()
  }

  fn route(&self) -> Route {
    Route::Dashboard
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("u", "users").with_priority(20),
      ShortcutInfo::new("p", "products").with_priority(30),
      ShortcutInfo::new("r", "retry").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
