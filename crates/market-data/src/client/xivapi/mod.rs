//! XIVAPI item catalog client.
//!
//! Fetches item definitions (name, icon path, recipe linkage) and the icon
//! bytes themselves, with one LRU cache for each. Item and icon are treated
//! as a unit: a lookup only succeeds once both are in hand, and the icon is
//! stored under the item's id because the two share a lifecycle -- icon
//! bytes are large and rarely re-requested once rendered, so they ride on
//! the item cache's recency rather than having an independent policy.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::LruCache;
use crate::errors::FetchError;
use crate::gateway::{ApiGateway, Transport};
use crate::models::Item;

const DEFAULT_BASE_URL: &str = "https://xivapi.com";
const DEFAULT_REQUESTS_PER_SECOND: u32 = 20;
const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Field-selection filter sent with every item request. The response keys
/// arrive snake_cased because of the `snake_case=1` flag.
const ITEM_COLUMNS: &str = "ID,Name,Icon,GameContentLinks.Recipe.ItemResult";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from `/item/{id}` with the columns filter applied.
#[derive(Debug, Deserialize)]
struct ItemResponse {
    id: i32,
    name: String,
    icon: String,
    game_content_links: GameContentLinks,
}

#[derive(Debug, Deserialize)]
struct GameContentLinks {
    recipe: RecipeLinks,
}

#[derive(Debug, Deserialize)]
struct RecipeLinks {
    item_result: Vec<i32>,
}

impl From<ItemResponse> for Item {
    fn from(response: ItemResponse) -> Self {
        Item {
            id: response.id,
            name: response.name,
            icon: response.icon,
            recipe_results: response.game_content_links.recipe.item_result,
        }
    }
}

// ============================================================================
// XivApiClient
// ============================================================================

/// Configuration for the item catalog client.
///
/// The published rate limit is 20 requests per second; the ceiling is
/// configuration, not a constant, so deployments can back off further.
#[derive(Clone, Debug)]
pub struct XivApiConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Outbound request ceiling per second.
    pub requests_per_second: u32,
    /// Capacity of the item cache and of the icon cache.
    pub cache_capacity: usize,
}

impl Default for XivApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Item catalog client backed by an item cache and an icon cache.
pub struct XivApiClient {
    gateway: ApiGateway,
    items: Mutex<LruCache<i32, Item>>,
    icons: Mutex<LruCache<i32, Vec<u8>>>,
}

impl XivApiClient {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(XivApiConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: XivApiConfig) -> Self {
        let gateway = ApiGateway::new(config.base_url.clone(), config.requests_per_second);
        Self::from_parts(config, gateway)
    }

    /// Create a client over a caller-supplied transport (fake gateways in
    /// tests, shared transports in applications).
    pub fn with_transport(config: XivApiConfig, transport: Arc<dyn Transport>) -> Self {
        let gateway = ApiGateway::with_transport(
            config.base_url.clone(),
            config.requests_per_second,
            transport,
        );
        Self::from_parts(config, gateway)
    }

    fn from_parts(config: XivApiConfig, gateway: ApiGateway) -> Self {
        Self {
            gateway,
            items: Mutex::new(LruCache::new(config.cache_capacity)),
            icons: Mutex::new(LruCache::new(config.cache_capacity)),
        }
    }

    /// Look up an item, fetching it (and its icon) on a cache miss.
    ///
    /// A cached item is returned without any network activity. On a miss,
    /// the item is fetched and then its icon; nothing is cached until both
    /// are in hand, so an icon failure discards the fetched item and the
    /// whole call returns `None` -- item and icon are a unit.
    pub async fn get_item(&self, id: i32) -> Option<Item> {
        if let Some(item) = self.lock_items().get(&id).cloned() {
            debug!(id, "item cache hit");
            return Some(item);
        }

        let item = match self.fetch_item(id).await {
            Ok(item) => item,
            Err(error) => {
                warn!(id, %error, "item fetch failed");
                return None;
            }
        };

        let bytes = match self.fetch_icon(&item.icon).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(id, icon = %item.icon, %error, "icon fetch failed");
                return None;
            }
        };

        self.lock_items().set(id, item.clone());
        self.lock_icons().set(id, bytes);
        Some(item)
    }

    /// The cached icon bytes for an item. Pure cache read, no network.
    pub fn cached_icon(&self, id: i32) -> Option<Vec<u8>> {
        self.lock_icons().get(&id).cloned()
    }

    /// Promote an item (and its icon) to most recently used.
    ///
    /// Returns whether the item was cached. Called by presentation when an
    /// item is brought back on screen.
    pub fn mark_viewed(&self, id: i32) -> bool {
        let hit = self.lock_items().touch(&id);
        self.lock_icons().touch(&id);
        hit
    }

    /// Cached items in recency order, most recent first.
    pub fn recent_items(&self) -> Vec<(i32, Item)> {
        self.lock_items()
            .entries()
            .map(|(id, item)| (*id, item.clone()))
            .collect()
    }

    async fn fetch_item(&self, id: i32) -> Result<Item, FetchError> {
        let url = format!(
            "{}/item/{}?columns={}&snake_case=1",
            self.gateway.base_url(),
            id,
            ITEM_COLUMNS
        );
        debug!(%url, "fetching item");

        let response: ItemResponse = self
            .gateway
            .execute(|transport| async move {
                let body = transport.get(&url).await?;
                Ok(serde_json::from_slice(&body)?)
            })
            .await?;

        Ok(response.into())
    }

    async fn fetch_icon(&self, icon_path: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}", self.gateway.base_url(), icon_path);
        debug!(%url, "fetching icon");

        self.gateway
            .execute(|transport| async move { transport.get(&url).await })
            .await
    }

    /// Lock the item cache, recovering from poison. A panic mid-insert
    /// leaves at worst a stale recency order, which is harmless here.
    fn lock_items(&self) -> MutexGuard<'_, LruCache<i32, Item>> {
        self.items.lock().unwrap_or_else(|poisoned| {
            warn!("item cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_icons(&self) -> MutexGuard<'_, LruCache<i32, Vec<u8>>> {
        self.icons.lock().unwrap_or_else(|poisoned| {
            warn!("icon cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for XivApiClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
