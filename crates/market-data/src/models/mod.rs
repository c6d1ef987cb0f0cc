//! Data models for items, worlds, and market history.

mod history;
mod item;
mod scope;
mod world;

pub use history::{HistoryView, SaleView};
pub use item::Item;
pub use scope::Scope;
pub use world::{DataCenter, World};
