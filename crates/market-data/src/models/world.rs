use std::fmt;

use serde::{Deserialize, Serialize};

/// A game world (server), as returned by the market API's `/worlds` listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// World id.
    pub id: i32,

    /// Display name. Absent for placeholder entries.
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or("No World"))
    }
}

/// A datacenter grouping several worlds, from the `/data-centers` listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenter {
    /// Datacenter name.
    #[serde(default)]
    pub name: Option<String>,

    /// Region the datacenter belongs to (e.g. "Japan", "Europe").
    #[serde(default)]
    pub region: Option<String>,

    /// Ids of the member worlds.
    #[serde(default)]
    pub worlds: Vec<i32>,
}

impl fmt::Display for DataCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or("No Datacenter"))
    }
}
