pub mod dashboard;

pub use dashboard::{Dashboard, views};
