use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::User;
use crate::app::Context;
use crate::guard::Route;
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{ShortcutInfo, View, ViewAction};

use super::paging::{handle_paging_key, list_title};

/// Paginated, searchable table of users
pub struct UserListView {
  list_state: ListState,
  search: SearchInput,
}

impl UserListView {
  pub fn new(ctx: &mut Context) -> Self {
    ctx.stores.users.load();
    Self {
      list_state: ListState::default().with_selected(Some(0)),
      search: SearchInput::new(),
    }
  }

  fn row(user: &User) -> ListItem<'static> {
    let company = user.company.as_ref().map(|c| c.name.as_str()).unwrap_or("");
    ListItem::new(Line::from(vec![
      Span::styled(format!("{:>4} ", user.id), Style::default().fg(Color::DarkGray)),
      Span::styled(
        format!("{:<22}", truncate(&user.full_name(), 22)),
        Style::default().fg(Color::Cyan),
      ),
      Span::raw(format!(" {:<30}", truncate(&user.email, 30))),
      Span::styled(
        format!(" {:<7}", truncate(&user.gender, 7)),
        Style::default().fg(Color::DarkGray),
      ),
      Span::raw(format!(" {:<18}", truncate(&user.phone, 18))),
      Span::styled(format!(" {}", truncate(company, 28)), Style::default().fg(Color::Yellow)),
    ]))
  }
}

impl View for UserListView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> ViewAction {
    let users = &mut ctx.stores.users;

    match self.search.handle_key(key, &users.params().search_text) {
      KeyResult::Event(SearchEvent::Submitted(query)) => {
        users.set_search_text(query);
        users.load();
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    if handle_paging_key(&key, users) {
      self.list_state.select(Some(0));
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Enter => {
        let selected = self.list_state.selected().and_then(|i| users.items().get(i));
        if let Some(user) = selected {
          return ViewAction::Navigate(Route::UserDetail(user.id));
        }
      }
      KeyCode::Esc if !users.params().search_text.is_empty() => {
        users.set_search_text("");
        users.load();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
    let users = &ctx.stores.users;
    ensure_valid_selection(&mut self.list_state, users.items().len());

    let block = Block::default()
      .title(list_title("Users", users))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(error) = users.error() {
      let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", error))
        .block(block)
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
    } else if users.items().is_empty() {
      let content = if users.is_loading() {
        "Loading users..."
      } else {
        "No users found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
    } else {
      let items: Vec<ListItem> = users.items().iter().map(Self::row).collect();
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
    "Users".to_string()
  }

  fn route(&self) -> Route {
    Route::Users
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("n/p", "page").with_priority(30),
      ShortcutInfo::new("+/-", "page size").with_priority(40),
      ShortcutInfo::new("r", "retry").with_priority(50),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
