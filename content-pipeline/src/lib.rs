pub mod excerpt;
pub mod markdown;
pub mod query;
pub mod sections;
pub mod transform;

pub use excerpt::excerpt;
pub use markdown::{escape_html, render};
pub use query::{run_query, CategoryFilter, FeedQuery, SortMode, TimeRange};
pub use sections::{extract_sections, extract_tags};
pub use transform::{display_flair, transform};
