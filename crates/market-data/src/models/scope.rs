use std::fmt;

use super::World;

/// Where a market history query applies: a single world, an entire
/// datacenter, or an entire region.
///
/// The `Display` form is the path segment the market API expects, so a
/// scope can be formatted straight into a request URL. Scopes also serve
/// as the discriminating half of the history cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A specific world, by id.
    World(i32),
    /// A whole datacenter, by name.
    Datacenter(String),
    /// A whole region, by name.
    Region(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::World(id) => write!(f, "{}", id),
            Scope::Datacenter(name) | Scope::Region(name) => f.write_str(name),
        }
    }
}

impl From<&World> for Scope {
    fn from(world: &World) -> Self {
        Scope::World(world.id)
    }
}

impl From<i32> for Scope {
    fn from(world_id: i32) -> Self {
        Scope::World(world_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_path_segment() {
        assert_eq!(Scope::World(67).to_string(), "67");
        assert_eq!(Scope::Datacenter("Gaia".to_string()).to_string(), "Gaia");
        assert_eq!(Scope::Region("Japan".to_string()).to_string(), "Japan");
    }

    #[test]
    fn test_variants_hash_distinctly() {
        // A datacenter and a region with the same name are different scopes.
        let dc = Scope::Datacenter("Gaia".to_string());
        let region = Scope::Region("Gaia".to_string());
        assert_ne!(dc, region);
    }

    #[test]
    fn test_from_world() {
        let world = World {
            id: 67,
            name: Some("Shiva".to_string()),
        };
        assert_eq!(Scope::from(&world), Scope::World(67));
    }
}
