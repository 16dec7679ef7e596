//! Win-count tracking and its persistence boundary.

mod counts;
mod store;

pub use counts::WinCounts;
pub use store::{JsonFileStore, MemoryStore, WinCountStore};
