use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

bitflags! {
    /// Where an item may be placed or used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct PlacementFlags: u32 {
        /// Only outside claimed land (islands, claims).
        const OUTSIDE_CLAIMS = 1 << 0;
        /// Only outside protected regions.
        const OUTSIDE_REGIONS = 1 << 1;
        /// The actor must be allowed to build at the location.
        const REQUIRE_BUILD_ACCESS = 1 << 2;
    }
}

impl PlacementFlags {
    /// Parses a constraint name as written in definition files.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "outside_claims" | "outside-claims" => Some(Self::OUTSIDE_CLAIMS),
            "outside_regions" | "outside-regions" => Some(Self::OUTSIDE_REGIONS),
            "require_build_access" | "require-build-access" | "build_access" => {
                Some(Self::REQUIRE_BUILD_ACCESS)
            }
            _ => None,
        }
    }
}

impl Serialize for PlacementFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for PlacementFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_bits_retain(u32::deserialize(deserializer)?))
    }
}

/// A minimum level in a job plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRequirement {
    pub job: String,
    pub min_level: u32,
}

/// Placement constraints carried by a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConstraints {
    pub flags: PlacementFlags,
    pub required_job: Option<JobRequirement>,
    /// Allowed worlds; `None` means every world.
    pub worlds: Option<BTreeSet<String>>,
}

impl PlacementConstraints {
    #[must_use]
    pub const fn contains(&self, flag: PlacementFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Whether `world` passes the allow-list.
    #[must_use]
    pub fn allows_world(&self, world: &str) -> bool {
        self.worlds.as_ref().is_none_or(|worlds| worlds.contains(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        assert_eq!(PlacementFlags::parse("outside-claims"), Some(PlacementFlags::OUTSIDE_CLAIMS));
        assert_eq!(PlacementFlags::parse("outside_regions"), Some(PlacementFlags::OUTSIDE_REGIONS));
        assert_eq!(PlacementFlags::parse("nowhere"), None);
    }

    #[test]
    fn world_allow_list() {
        let open = PlacementConstraints::default();
        assert!(open.allows_world("world_nether"));

        let closed = PlacementConstraints {
            worlds: Some(BTreeSet::from(["world".to_owned()])),
            ..PlacementConstraints::default()
        };
        assert!(closed.allows_world("world"));
        assert!(!closed.allows_world("world_nether"));
    }
}
