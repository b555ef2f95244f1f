pub mod kv;
pub mod store;
pub mod trophies;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use store::{baseline_score, EngagementStore};
pub use trophies::{Trophy, POPULAR_POST_THRESHOLD};
