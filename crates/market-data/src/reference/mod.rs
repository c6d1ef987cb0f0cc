//! Reference data: the datacenter and world lists.
//!
//! These change about as often as the game ships an expansion, so they are
//! fetched once per session at most. The service prefers whatever an
//! external store persisted from a previous run and only goes to the
//! network when the store is empty or a refresh is forced, overwriting the
//! store with the fresh lists afterwards.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::universalis::UniversalisClient;
use crate::models::{DataCenter, World};

/// The persisted datacenter and world lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub datacenters: Vec<DataCenter>,
    pub worlds: Vec<World>,
}

impl ReferenceData {
    /// The worlds belonging to the named datacenter, in the datacenter's
    /// member order. Unknown names and unknown world ids yield nothing.
    pub fn worlds_of_datacenter(&self, name: &str) -> Vec<World> {
        let Some(datacenter) = self
            .datacenters
            .iter()
            .find(|dc| dc.name.as_deref() == Some(name))
        else {
            return Vec::new();
        };

        datacenter
            .worlds
            .iter()
            .filter_map(|id| self.worlds.iter().find(|world| world.id == *id))
            .cloned()
            .collect()
    }
}

/// External persistence collaborator for reference data.
///
/// The real implementation lives outside this crate (the app's relational
/// store); [`MemoryReferenceStore`] covers tests and cache-less setups.
#[async_trait]
pub trait ReferenceDataStore: Send + Sync {
    /// The previously saved lists, if any.
    async fn load(&self) -> Option<ReferenceData>;

    /// Overwrite the saved lists.
    async fn save(&self, data: &ReferenceData);

    /// Drop the saved lists.
    async fn clear(&self);
}

/// In-process store: holds one snapshot for the life of the process.
#[derive(Default)]
pub struct MemoryReferenceStore {
    data: Mutex<Option<ReferenceData>>,
}

impl MemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReferenceDataStore for MemoryReferenceStore {
    async fn load(&self) -> Option<ReferenceData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn save(&self, data: &ReferenceData) {
        *self.data.lock().unwrap_or_else(|e| e.into_inner()) = Some(data.clone());
    }

    async fn clear(&self) {
        *self.data.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Composes the market client and a store into load-or-refresh semantics.
pub struct ReferenceDataService {
    client: Arc<UniversalisClient>,
    store: Arc<dyn ReferenceDataStore>,
}

impl ReferenceDataService {
    pub fn new(client: Arc<UniversalisClient>, store: Arc<dyn ReferenceDataStore>) -> Self {
        Self { client, store }
    }

    /// Return the stored lists, or fetch fresh ones when the store is
    /// empty or `force_refresh` is set.
    ///
    /// A successful fetch overwrites the store. If either fetch fails the
    /// call returns `None` and the store is left untouched.
    pub async fn load_or_refresh(&self, force_refresh: bool) -> Option<ReferenceData> {
        if !force_refresh {
            if let Some(data) = self.store.load().await {
                debug!(
                    datacenters = data.datacenters.len(),
                    worlds = data.worlds.len(),
                    "reference data loaded from store"
                );
                return Some(data);
            }
        }

        let Some(datacenters) = self.client.get_datacenters().await else {
            warn!("reference refresh failed: no datacenter listing");
            return None;
        };
        let Some(worlds) = self.client.get_worlds().await else {
            warn!("reference refresh failed: no world listing");
            return None;
        };

        let data = ReferenceData {
            datacenters,
            worlds,
        };
        self.store.save(&data).await;
        debug!(
            datacenters = data.datacenters.len(),
            worlds = data.worlds.len(),
            "reference data refreshed and saved"
        );
        Some(data)
    }

    /// Drop the persisted lists; the next load will fetch.
    pub async fn clear(&self) {
        self.store.clear().await;
    }
}
