use serde::{Deserialize, Serialize};

/// An item definition from the catalog API.
///
/// Immutable once fetched; the cache only ever moves it, never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item id.
    pub id: i32,

    /// Display name.
    pub name: String,

    /// Icon path relative to the API base, e.g. `/i/049000/049383.png`.
    pub icon: String,

    /// Ids of the items produced by recipes this item results from.
    pub recipe_results: Vec<i32>,
}
