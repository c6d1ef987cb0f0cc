//! Bounded, recency-ordered caching.

mod lru;

pub use lru::LruCache;
