//! Plain-text helpers: heading-scoped section extraction and item cleaning

mod clean;
mod section;

pub use clean::clean_item;
pub use section::{extract_section, heading_of};
