//! FFXIV Market Data Crate
//!
//! This crate is the data-access layer for the profit estimator: it fetches
//! item metadata from XIVAPI and market sale history from Universalis,
//! keeps the most recently used results in bounded LRU caches, and paces
//! outbound requests to stay under each API's published rate limit.
//!
//! # Architecture
//!
//! ```text
//! +------------------+      +---------------------+
//! |  XivApiClient    |      |  UniversalisClient  |
//! |  items + icons   |      |  history by scope   |
//! +------------------+      +---------------------+
//!          |                          |
//!          v                          v
//!   +-------------+            +-------------+
//!   |  LruCache   |            |  LruCache   |
//!   +-------------+            +-------------+
//!          |                          |
//!          v                          v
//!   +--------------------------------------+
//!   |        ApiGateway (per API)          |
//!   |  RateLimiter -> Transport (reqwest)  |
//!   +--------------------------------------+
//! ```
//!
//! Every outbound call goes through an [`ApiGateway`], which acquires its
//! [`RateLimiter`] before running the request. Clients own their caches
//! exclusively and collapse transport/decode failures into `None` at the
//! public boundary.
//!
//! # Core Types
//!
//! - [`XivApiClient`] - item definitions and icon bytes, cached by item id
//! - [`UniversalisClient`] - sale history cached by `(item id, Scope)`,
//!   plus uncached datacenter/world listings
//! - [`Scope`] - where a price applies: a world, a datacenter, or a region
//! - [`LruCache`] - fixed-capacity, recency-ordered cache
//! - [`ReferenceDataService`] - load-or-refresh of the datacenter/world
//!   lists against an external [`ReferenceDataStore`]

pub mod cache;
pub mod client;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod reference;

pub use cache::LruCache;
pub use client::universalis::{HistoryKey, UniversalisClient, UniversalisConfig};
pub use client::xivapi::{XivApiClient, XivApiConfig};
pub use errors::FetchError;
pub use gateway::{ApiGateway, HttpTransport, RateLimiter, Transport};
pub use models::{DataCenter, HistoryView, Item, SaleView, Scope, World};
pub use reference::{
    MemoryReferenceStore, ReferenceData, ReferenceDataService, ReferenceDataStore,
};
