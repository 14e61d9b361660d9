use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::api::{ApiClient, UserDetail};
use crate::app::Context;
use crate::guard::Route;
use crate::query::{Query, QueryState};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

use super::detail_line;

/// One user's full record
pub struct UserDetailView {
  id: u64,
  query: Query<UserDetail>,
}

impl UserDetailView {
  pub fn new(id: u64, api: ApiClient) -> Self {
    let mut query = Query::new(move || {
      let api = api.clone();
      async move { api.get_user(id).await.map_err(|e| e.to_string()) }
    });

    query.fetch();

    Self { id, query }
  }

  fn lines(user: &UserDetail) -> Vec<Line<'static>> {
    let address = user
      .address
      .as_ref()
      .map(|a| format!("{}, {}, {} {}", a.address, a.city, a.state, a.postal_code))
      .unwrap_or_else(|| "-".to_string());
    let company = user
      .company
      .as_ref()
      .map(|c| format!("{} ({}, {})", c.name, c.title, c.department))
      .unwrap_or_else(|| "-".to_string());

    vec![
      Line::from(Span::styled(
        format!("{} {}", user.first_name, user.last_name),
        Style::default().fg(Color::Cyan).bold(),
      )),
      Line::raw(""),
      detail_line("Username", user.username.clone()),
      detail_line("Email", user.email.clone()),
      detail_line("Phone", user.phone.clone()),
      detail_line("Gender", user.gender.clone()),
      detail_line("Age", user.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())),
      detail_line("Birth date", user.birth_date.clone().unwrap_or_else(|| "-".to_string())),
      detail_line("Blood group", user.blood_group.clone().unwrap_or_else(|| "-".to_string())),
      detail_line("Address", address),
      detail_line("Company", company),
    ]
  }
}

impl View for UserDetailView {
  fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Context) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => {
        self.query.refetch();
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &Context) {
    let title = match self.query.state() {
      QueryState::Loading => format!(" User {} (loading...) ", self.id),
      _ => format!(" User {} ", self.id),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match self.query.state() {
      QueryState::Success(user) => Paragraph::new(Self::lines(user)),
      QueryState::Error(e) => Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", e))
        .style(Style::default().fg(Color::Red)),
      _ => Paragraph::new("Loading user...").style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: true }), area);
  }

  fn breadcrumb_label(&self) -> String {
    match self.query.data() {
      Some(user) => format!("{} {}", user.first_name, user.last_name),
      None => format!("User {}", self.id),
    }
  }

  fn route(&self) -> Route {
    Route::UserDetail(self.id)
  }

  fn tick(&mut self, _ctx: &mut Context) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("r", "refresh").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
