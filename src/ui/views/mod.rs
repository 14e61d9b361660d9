mod dashboard;
mod login;
mod paging;
mod product_detail;
mod product_list;
mod user_detail;
mod user_list;

pub use dashboard::DashboardView;
pub use login::LoginView;
pub use product_detail::ProductDetailView;
pub use product_list::ProductListView;
pub use user_detail::UserDetailView;
pub use user_list::UserListView;

use ratatui::prelude::*;

/// `Label         value` row used by the detail views
fn detail_line(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("{:<14}", label), Style::default().fg(Color::DarkGray)),
    Span::raw(value),
  ])
}
