use ratatui::prelude::Color;

/// Truncate to at most `max_len` characters, ending in "..." when cut
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    return s.to_string();
  }
  let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
  format!("{}...", kept)
}

/// Red when out of stock, yellow when low
pub fn stock_color(stock: i64) -> Color {
  match stock {
    i64::MIN..=0 => Color::Red,
    1..=10 => Color::Yellow,
    _ => Color::Green,
  }
}

pub fn rating_color(rating: f64) -> Color {
  if rating >= 4.5 {
    Color::Green
  } else if rating >= 3.0 {
    Color::White
  } else {
    Color::Red
  }
}

pub fn format_price(price: f64) -> String {
  format!("${:.2}", price)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Crème brûlée set", 8), "Crème...");
  }

  #[test]
  fn test_stock_color() {
    assert_eq!(stock_color(0), Color::Red);
    assert_eq!(stock_color(4), Color::Yellow);
    assert_eq!(stock_color(99), Color::Green);
  }

  #[test]
  fn test_rating_color() {
    assert_eq!(rating_color(4.9), Color::Green);
    assert_eq!(rating_color(3.2), Color::White);
    assert_eq!(rating_color(2.1), Color::Red);
  }

  #[test]
  fn test_format_price() {
    assert_eq!(format_price(9.5), "$9.50");
  }
}
