use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::api::{ApiClient, ProductDetail};
use crate::app::Context;
use crate::guard::Route;
use crate::query::{Query, QueryState};
use crate::ui::renderfns::{format_price, rating_color, stock_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

use super::detail_line;

pub struct ProductDetailView {
  id: u64,
  query: Query<ProductDetail>,
}

impl ProductDetailView {
  pub fn new(id: u64, api: ApiClient) -> Self {
    let mut query = Query::new(move || {
      let api = api.clone();
      async move { api.get_product(id).await.map_err(|e| e.to_string()) }
    });

    query.fetch();

    Self { id, query }
  }

  fn lines(product: &ProductDetail) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let dimensions = product
      .dimensions
      .as_ref()
      .map(|d| format!("{} x {} x {}", d.width, d.height, d.depth))
      .unwrap_or_else(|| "-".to_string());

    vec![
      Line::from(Span::styled(
        product.title.clone(),
        Style::default().fg(Color::Cyan).bold(),
      )),
      Line::raw(""),
      detail_line("Brand", product.brand.clone().unwrap_or_else(|| "-".to_string())),
      detail_line("Category", product.category.clone()),
      detail_line("Price", format_price(product.price)),
      detail_line("Discount", format!("{:.2}%", product.discount_percentage)),
      Line::from(vec![
        Span::styled(format!("{:<14}", "Rating"), label),
        Span::styled(
          format!("{:.2}", product.rating),
          Style::default().fg(rating_color(product.rating)),
        ),
      ]),
      Line::from(vec![
        Span::styled(format!("{:<14}", "Stock"), label),
        Span::styled(
          product.stock.to_string(),
          Style::default().fg(stock_color(product.stock)),
        ),
      ]),
      detail_line("Dimensions", dimensions),
      detail_line(
        "Warranty",
        product.warranty_information.clone().unwrap_or_else(|| "-".to_string()),
      ),
      detail_line(
        "Shipping",
        product.shipping_information.clone().unwrap_or_else(|| "-".to_string()),
      ),
      detail_line("Images", product.images.len().to_string()),
      Line::raw(""),
      Line::raw(product.description.clone()),
    ]
  }
}

impl View for ProductDetailView {
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
      QueryState::Loading => format!(" Product {} (loading...) ", self.id),
      _ => format!(" Product {} ", self.id),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match self.query.state() {
      QueryState::Success(product) => Paragraph::new(Self::lines(product)),
      QueryState::Error(e) => Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", e))
        .style(Style::default().fg(Color::Red)),
      _ => Paragraph::new("Loading product...").style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: true }), area);
  }

  fn breadcrumb_label(&self) -> String {
    self
      .query
      .data()
      .map(|p| p.title.clone())
      .unwrap_or_else(|| format!("Product {}", self.id))
  }

  fn route(&self) -> Route {
    Route::ProductDetail(self.id)
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
