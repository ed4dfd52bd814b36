pub mod format;
pub mod page;

pub use format::{NumberFormat, format_count};
pub use page::{render_table, render_view};
