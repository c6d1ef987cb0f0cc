//! Universalis market history client.
//!
//! Sale-history views are cached under a composite `(item id, Scope)` key,
//! so the same item priced on different worlds, datacenters, or regions
//! occupies distinct entries. Datacenter and world listings are fetched
//! uncached -- they change rarely, are requested about once per session,
//! and their persistence belongs to the reference-data store, not here.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::LruCache;
use crate::errors::FetchError;
use crate::gateway::{ApiGateway, Transport};
use crate::models::{DataCenter, HistoryView, Scope, World};

const DEFAULT_BASE_URL: &str = "https://universalis.app/api/v2";
const DEFAULT_REQUESTS_PER_SECOND: u32 = 25;
const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Cache key for one sale-history view: the item and where it is priced.
pub type HistoryKey = (i32, Scope);

/// Configuration for the market history client.
///
/// The published rate limit is 25 requests per second; like the base URL
/// it is a parameter, not a constant.
#[derive(Clone, Debug)]
pub struct UniversalisConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Outbound request ceiling per second.
    pub requests_per_second: u32,
    /// Capacity of the history cache.
    pub cache_capacity: usize,
}

impl Default for UniversalisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Market history client backed by one scope-keyed LRU cache.
pub struct UniversalisClient {
    gateway: ApiGateway,
    history: Mutex<LruCache<HistoryKey, HistoryView>>,
}

impl UniversalisClient {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(UniversalisConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: UniversalisConfig) -> Self {
        let gateway = ApiGateway::new(config.base_url.clone(), config.requests_per_second);
        Self::from_parts(config, gateway)
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: UniversalisConfig, transport: Arc<dyn Transport>) -> Self {
        let gateway = ApiGateway::with_transport(
            config.base_url.clone(),
            config.requests_per_second,
            transport,
        );
        Self::from_parts(config, gateway)
    }

    fn from_parts(config: UniversalisConfig, gateway: ApiGateway) -> Self {
        Self {
            gateway,
            history: Mutex::new(LruCache::new(config.cache_capacity)),
        }
    }

    /// The sale history for an item under a scope, fetched on a cache miss.
    ///
    /// A hit promotes the entry to most recently used. Entries only ever
    /// leave the cache through capacity eviction; there is no expiry.
    pub async fn get_history(&self, item_id: i32, scope: Scope) -> Option<HistoryView> {
        let key = (item_id, scope);
        {
            let mut cache = self.lock_history();
            if cache.touch(&key) {
                debug!(item_id, scope = %key.1, "history cache hit");
                return cache.get(&key).cloned();
            }
        }

        let view = match self.fetch_history(item_id, &key.1).await {
            Ok(view) => view,
            Err(error) => {
                warn!(item_id, scope = %key.1, %error, "history fetch failed");
                return None;
            }
        };
        self.lock_history().set(key, view.clone());
        Some(view)
    }

    /// The datacenter listing. Uncached; every call fetches.
    pub async fn get_datacenters(&self) -> Option<Vec<DataCenter>> {
        match self.fetch_list("/data-centers").await {
            Ok(datacenters) => Some(datacenters),
            Err(error) => {
                warn!(%error, "datacenter fetch failed");
                None
            }
        }
    }

    /// The world listing. Uncached; every call fetches.
    pub async fn get_worlds(&self) -> Option<Vec<World>> {
        match self.fetch_list("/worlds").await {
            Ok(worlds) => Some(worlds),
            Err(error) => {
                warn!(%error, "world fetch failed");
                None
            }
        }
    }

    /// Cached history views in recency order, most recent first.
    pub fn cached_history(&self) -> Vec<(HistoryKey, HistoryView)> {
        self.lock_history()
            .entries()
            .map(|(key, view)| (key.clone(), view.clone()))
            .collect()
    }

    async fn fetch_history(&self, item_id: i32, scope: &Scope) -> Result<HistoryView, FetchError> {
        let url = format!("{}/history/{}/{}", self.gateway.base_url(), scope, item_id);
        debug!(%url, "fetching sale history");

        self.gateway
            .execute(|transport| async move {
                let body = transport.get(&url).await?;
                Ok(serde_json::from_slice(&body)?)
            })
            .await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let url = format!("{}{}", self.gateway.base_url(), path);
        debug!(%url, "fetching listing");

        self.gateway
            .execute(|transport| async move {
                let body = transport.get(&url).await?;
                Ok(serde_json::from_slice(&body)?)
            })
            .await
    }

    fn lock_history(&self) -> MutexGuard<'_, LruCache<HistoryKey, HistoryView>> {
        self.history.lock().unwrap_or_else(|poisoned| {
            warn!("history cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for UniversalisClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::transport::testing::FakeTransport;

    const RINASCITA_SWORD_ID: i32 = 37742;

    fn history_json(item_id: i32, scope_field: &str) -> String {
        format!(r#"{{"itemID": {}, {}, "lastUploadTime": 1675103269483}}"#, item_id, scope_field)
    }

    fn client_with(transport: Arc<FakeTransport>) -> UniversalisClient {
        UniversalisClient::with_transport(UniversalisConfig::default(), transport)
    }

    #[test]
    fn test_default_config() {
        let config = UniversalisConfig::default();
        assert_eq!(config.base_url, "https://universalis.app/api/v2");
        assert_eq!(config.requests_per_second, 25);
        assert_eq!(config.cache_capacity, 10);
    }

    #[tokio::test]
    async fn test_history_miss_fetches_then_hit_does_not() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/history/67/37742",
            history_json(RINASCITA_SWORD_ID, r#""worldID": 67"#).into_bytes(),
        );
        let client = client_with(transport.clone());

        let view = client
            .get_history(RINASCITA_SWORD_ID, Scope::World(67))
            .await
            .unwrap();
        assert!(view.is_valid());
        assert_eq!(view.world_id, Some(67));
        assert_eq!(
            transport.calls(),
            vec!["https://universalis.app/api/v2/history/67/37742"]
        );

        let again = client
            .get_history(RINASCITA_SWORD_ID, Scope::World(67))
            .await
            .unwrap();
        assert_eq!(again, view);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scopes_occupy_distinct_entries() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/history/Gaia/37742",
            history_json(RINASCITA_SWORD_ID, r#""dcName": "Gaia""#).into_bytes(),
        );
        transport.respond(
            "/history/Elemental/37742",
            history_json(RINASCITA_SWORD_ID, r#""dcName": "Elemental""#).into_bytes(),
        );
        let client = client_with(transport.clone());

        let gaia = client
            .get_history(RINASCITA_SWORD_ID, Scope::Datacenter("Gaia".to_string()))
            .await
            .unwrap();
        let elemental = client
            .get_history(
                RINASCITA_SWORD_ID,
                Scope::Datacenter("Elemental".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(gaia.dc_name.as_deref(), Some("Gaia"));
        assert_eq!(elemental.dc_name.as_deref(), Some("Elemental"));
        assert_eq!(transport.call_count(), 2);
        assert_eq!(client.cached_history().len(), 2);
    }

    #[tokio::test]
    async fn test_region_scope_builds_the_same_path_shape() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/history/Japan/5",
            history_json(5, r#""regionName": "Japan""#).into_bytes(),
        );
        let client = client_with(transport.clone());

        let view = client
            .get_history(5, Scope::Region("Japan".to_string()))
            .await
            .unwrap();
        assert_eq!(view.region_name.as_deref(), Some("Japan"));
        assert_eq!(
            transport.calls(),
            vec!["https://universalis.app/api/v2/history/Japan/5"]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_collapses_to_none_and_caches_nothing() {
        let transport = Arc::new(FakeTransport::new());
        transport.fail("/history/67/37742", 500);
        let client = client_with(transport.clone());

        assert!(client
            .get_history(RINASCITA_SWORD_ID, Scope::World(67))
            .await
            .is_none());
        assert!(client.cached_history().is_empty());

        // No negative caching: the next call fetches again.
        assert!(client
            .get_history(RINASCITA_SWORD_ID, Scope::World(67))
            .await
            .is_none());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_listings_are_uncached() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/data-centers",
            br#"[{"name":"Gaia","region":"Japan","worlds":[43,46]}]"#.to_vec(),
        );
        transport.respond("/worlds", br#"[{"id":43,"name":"Alexander"}]"#.to_vec());
        let client = client_with(transport.clone());

        let datacenters = client.get_datacenters().await.unwrap();
        assert_eq!(datacenters[0].name.as_deref(), Some("Gaia"));
        let worlds = client.get_worlds().await.unwrap();
        assert_eq!(worlds[0].id, 43);

        client.get_datacenters().await.unwrap();
        client.get_worlds().await.unwrap();
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_eviction_is_capacity_driven() {
        let config = UniversalisConfig {
            cache_capacity: 2,
            ..UniversalisConfig::default()
        };
        let transport = Arc::new(FakeTransport::new());
        for id in 1..=3 {
            transport.respond(
                &format!("/history/67/{}", id),
                history_json(id, r#""worldID": 67"#).into_bytes(),
            );
        }
        let client = UniversalisClient::with_transport(config, transport.clone());

        for id in 1..=3 {
            client.get_history(id, Scope::World(67)).await.unwrap();
        }
        assert_eq!(client.cached_history().len(), 2);

        // Item 1 was evicted, so it fetches again.
        client.get_history(1, Scope::World(67)).await.unwrap();
        assert_eq!(transport.call_count(), 4);
    }
}
