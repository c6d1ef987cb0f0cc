use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded sale from the market API.
///
/// Every field carries a wire default so a sparse entry still decodes;
/// sentinel values (`-1`) mark data the server did not supply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaleView {
    /// Whether the item sold was high-quality.
    pub hq: bool,

    /// Price per unit sold, in gil.
    pub price_per_unit: i32,

    /// Stack size sold.
    pub quantity: i32,

    /// The buyer's character name, if recorded.
    pub buyer_name: Option<String>,

    /// Whether the sale came from a mannequin, if recorded.
    pub on_mannequin: Option<bool>,

    /// Sale time, in seconds since the UNIX epoch.
    pub timestamp: i64,

    /// World name, when the query scope spans several worlds.
    pub world_name: Option<String>,

    /// World id, when the query scope spans several worlds.
    #[serde(rename = "worldID")]
    pub world_id: Option<i32>,
}

impl Default for SaleView {
    fn default() -> Self {
        Self {
            hq: false,
            price_per_unit: -1,
            quantity: -1,
            buyer_name: None,
            on_mannequin: None,
            timestamp: -1,
            world_name: None,
            world_id: None,
        }
    }
}

impl SaleView {
    /// The sale time as a UTC datetime, if the server supplied one.
    pub fn sale_time(&self) -> Option<DateTime<Utc>> {
        if self.timestamp < 0 {
            return None;
        }
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}

/// Sale history for one item under one scope, as returned by
/// `/history/{scope}/{itemId}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryView {
    /// The item id. `-1` when the server returned no usable view.
    #[serde(rename = "itemID")]
    pub item_id: i32,

    /// The world id, for world-scoped queries.
    #[serde(rename = "worldID")]
    pub world_id: Option<i32>,

    /// Last upload time for this endpoint, in milliseconds since the
    /// UNIX epoch.
    pub last_upload_time: i64,

    /// The recorded sales, newest first.
    pub entries: Option<Vec<SaleView>>,

    /// Datacenter name, for datacenter-scoped queries.
    pub dc_name: Option<String>,

    /// Region name, for region-scoped queries.
    pub region_name: Option<String>,

    /// Sale counts by stack size, all qualities.
    pub stack_size_histogram: Option<HashMap<i32, i32>>,

    /// Sale counts by stack size, normal quality only.
    #[serde(rename = "stackSizeHistogramNQ")]
    pub stack_size_histogram_nq: Option<HashMap<i32, i32>>,

    /// Sale counts by stack size, high quality only.
    #[serde(rename = "stackSizeHistogramHQ")]
    pub stack_size_histogram_hq: Option<HashMap<i32, i32>>,

    /// Average sales per day over the last week, all qualities.
    pub regular_sale_velocity: f64,

    /// Average NQ sales per day over the last week.
    pub nq_sale_velocity: f64,

    /// Average HQ sales per day over the last week.
    pub hq_sale_velocity: f64,

    /// World name, for world-scoped queries.
    pub world_name: Option<String>,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            item_id: -1,
            world_id: None,
            last_upload_time: -1,
            entries: None,
            dc_name: None,
            region_name: None,
            stack_size_histogram: None,
            stack_size_histogram_nq: None,
            stack_size_histogram_hq: None,
            regular_sale_velocity: -1.0,
            nq_sale_velocity: -1.0,
            hq_sale_velocity: -1.0,
            world_name: None,
        }
    }
}

impl HistoryView {
    /// Whether the server returned a usable view for the requested item.
    pub fn is_valid(&self) -> bool {
        self.item_id >= 0
    }

    /// The last upload time as a UTC datetime, if present.
    pub fn last_upload(&self) -> Option<DateTime<Utc>> {
        if self.last_upload_time < 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.last_upload_time).single()
    }

    /// The human-readable scope this view answers for: world, datacenter,
    /// or region name, whichever the server filled in.
    pub fn scope_name(&self) -> Option<&str> {
        self.world_name
            .as_deref()
            .or(self.dc_name.as_deref())
            .or(self.region_name.as_deref())
    }
}
