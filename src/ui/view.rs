use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::app::Context;
use crate::guard::Route;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Go to a route; the app runs it past the guard first
  Navigate(Route),
  /// Pop current view from stack (go back)
  Pop,
  /// End the session and return to the login screen
  Logout,
  Quit,
}

/// Trait for view behavior
///
/// Views own their widgets and hand parameter changes to the stores in
/// `Context`. They never construct other views; navigation goes through
/// `ViewAction::Navigate` so that every screen change passes the guard.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// The route this view is mounted at
  fn route(&self) -> Route;

  /// Called on each tick, after the stores have been polled
  fn tick(&mut self, _ctx: &mut Context) {}

  /// Whether plain characters are text input (disables the `:` overlay)
  fn captures_input(&self) -> bool {
    false
  }

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
