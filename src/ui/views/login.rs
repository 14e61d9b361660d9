use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Context;
use crate::config::Config;
use crate::guard::Route;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
  Username,
  Password,
}

/// Username/password form. Leaving this screen after a successful login is
/// the guard's job: the app redirects once the session becomes valid.
pub struct LoginView {
  username: TextInput,
  password: TextInput,
  focus: Field,
}

impl LoginView {
  pub fn new() -> Self {
    let (username, password) = Config::login_hint();
    let username = TextInput::with_value(username.unwrap_or_default());
    let password = TextInput::with_value(password.unwrap_or_default());
    let focus = if username.is_empty() {
      Field::Username
    } else {
      Field::Password
    };
    Self {
      username,
      password,
      focus,
    }
  }

  fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      Field::Username => Field::Password,
      Field::Password => Field::Username,
    };
  }

  fn submit(&mut self, ctx: &mut Context) {
    if ctx.session.is_loading() {
      return;
    }
    if self.username.is_empty() {
      self.focus = Field::Username;
      return;
    }
    if self.password.is_empty() {
      self.focus = Field::Password;
      return;
    }
    ctx.session.login(self.username.value().trim(), self.password.value());
  }

  fn field_line<'a>(&self, label: &'a str, value: String, field: Field) -> Line<'a> {
    let style = if self.focus == field {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
      Span::styled(format!("{:<10}", label), style),
      Span::raw(value),
    ])
  }
}

impl Default for LoginView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for LoginView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> ViewAction {
    match key.code {
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
        self.toggle_focus();
        return ViewAction::None;
      }
      KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }

    let input = match self.focus {
      Field::Username => &mut self.username,
      Field::Password => &mut self.password,
    };

    if let InputResult::Submitted(_) = input.handle_key(key) {
      match self.focus {
        Field::Username => self.focus = Field::Password,
        Field::Password => self.submit(ctx),
      }
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
    let width = 50.min(area.width);
    let height = 9.min(area.height);
    let form = Rect::new(
      area.x + (area.width - width) / 2,
      area.y + (area.height - height) / 2,
      width,
      height,
    );

    frame.render_widget(Clear, form);
    let block = Block::default()
      .title(" Sign in ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let status = if ctx.session.is_loading() {
      Line::styled("Signing in...", Style::default().fg(Color::DarkGray))
    } else if let Some(error) = ctx.session.error() {
      Line::styled(error.to_string(), Style::default().fg(Color::Red))
    } else {
      Line::styled(
        "Enter to submit, Tab to switch field, Esc to quit",
        Style::default().fg(Color::DarkGray),
      )
    };

    let lines = vec![
      Line::raw(""),
      self.field_line("Username", self.username.value().to_string(), Field::Username),
      Line::raw(""),
      self.field_line("Password", self.password.masked(), Field::Password),
      Line::raw(""),
      status,
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    // Cursor after the label column of the focused row
    let (row, input) = match self.focus {
      Field::Username => (1, &self.username),
      Field::Password => (3, &self.password),
    };
    if inner.height > row {
      let x = inner.x + 10 + input.cursor_position() as u16;
      frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Login".to_string()
  }

  fn route(&self) -> Route {
    Route::Login
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "next field").with_priority(10),
      ShortcutInfo::new("enter", "sign in").with_priority(20),
      ShortcutInfo::new("esc", "quit").with_priority(90),
    ]
  }
}
