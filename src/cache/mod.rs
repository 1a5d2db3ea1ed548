//! Disk-backed prompt/response cache.

pub mod store;

pub use store::{CacheMap, CacheStore};
