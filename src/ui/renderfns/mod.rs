pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::{draw_header, header_title};
pub use utils::{format_price, rating_color, stock_color, truncate};
