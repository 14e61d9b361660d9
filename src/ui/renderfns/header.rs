use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use url::Url;

use crate::ui::view::ShortcutInfo;

/// Draw the header bar with logo, API host, account and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  account: Option<&str>,
  shortcuts: &[ShortcutInfo],
) {
  let separator = Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(" d9s ", Style::default().fg(Color::Cyan).bold()),
    separator.clone(),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    separator,
    match account {
      Some(name) => Span::styled(format!(" {} ", name), Style::default().fg(Color::Yellow).bold()),
      None => Span::styled(" signed out ", Style::default().fg(Color::DarkGray)),
    },
    Span::raw(" "),
  ];

  let mut shortcuts: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  shortcuts.sort_by_key(|s| s.priority);
  for shortcut in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Configured title, else the API host (with a non-default port)
pub fn header_title(configured: Option<&str>, base_url: &Url) -> String {
  if let Some(title) = configured {
    return title.to_string();
  }
  match (base_url.host_str(), base_url.port()) {
    (Some(host), Some(port)) => format!("{}:{}", host, port),
    (Some(host), None) => host.to_string(),
    _ => base_url.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_title_from_host() {
    let url = Url::parse("https://dummyjson.com").unwrap();
    assert_eq!(header_title(None, &url), "dummyjson.com");

    let url = Url::parse("http://localhost:8080/api").unwrap();
    assert_eq!(header_title(None, &url), "localhost:8080");
  }

  #[test]
  fn test_header_title_configured() {
    let url = Url::parse("https://dummyjson.com").unwrap();
    assert_eq!(header_title(Some("staging"), &url), "staging");
  }
}
