//! SuperiorSkyblock2 integration.
//!
//! Islands are claims. Outside any island the hook abstains; on an island it enforces
//! `outside_claims` and `require_build_access`, and allows actors holding the build
//! privilege.

use std::fmt;
use std::sync::Arc;
use zitems_domain::constants::{SUPERIOR_SKYBLOCK_HOOK, SUPERIOR_SKYBLOCK_PLUGIN};
use zitems_domain::constraints::PlacementFlags;
use zitems_domain::context::{Actor, Location};
use zitems_domain::item::ItemTemplate;
use zitems_domain::verdict::Verdict;
use zitems_hooks::{DecisionProvider, HookDescriptor, PluginDirectory, PluginPresent};

/// Island privilege checked for build access.
pub const BUILD_PRIVILEGE: &str = "BREAK";

/// An island as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    pub id: String,
    pub owner: String,
}

/// Island lookups answered by the host's SuperiorSkyblock2 bridge.
pub trait IslandQuery: Send + Sync + 'static {
    fn island_at(&self, location: &Location) -> Option<Island>;

    /// Whether `actor` holds `privilege` (such as [`BUILD_PRIVILEGE`]) on `island`.
    fn has_privilege(&self, island: &Island, actor: &Actor, privilege: &str) -> bool;
}

pub struct SuperiorSkyblockHook {
    islands: Arc<dyn IslandQuery>,
}

impl fmt::Debug for SuperiorSkyblockHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperiorSkyblockHook").finish_non_exhaustive()
    }
}

impl SuperiorSkyblockHook {
    pub fn new(islands: Arc<dyn IslandQuery>) -> Self {
        Self { islands }
    }
}

impl DecisionProvider for SuperiorSkyblockHook {
    fn evaluate(&self, template: &ItemTemplate, location: &Location, actor: &Actor) -> Verdict {
        let Some(island) = self.islands.island_at(location) else {
            return Verdict::abstain();
        };

        if template.constraints.contains(PlacementFlags::OUTSIDE_CLAIMS) {
            return Verdict::deny(format!("{} cannot be used on the island of {}", template.key, island.owner));
        }

        let privileged = self.islands.has_privilege(&island, actor, BUILD_PRIVILEGE);
        if template.constraints.contains(PlacementFlags::REQUIRE_BUILD_ACCESS) && !privileged {
            return Verdict::deny(format!("{} lacks build access on the island of {}", actor.name, island.owner));
        }
        if privileged { Verdict::allow() } else { Verdict::abstain() }
    }
}

/// Descriptor active while the SuperiorSkyblock2 plugin is enabled.
pub fn descriptor(islands: Arc<dyn IslandQuery>, plugins: Arc<dyn PluginDirectory>) -> HookDescriptor {
    HookDescriptor::new(SUPERIOR_SKYBLOCK_HOOK, SuperiorSkyblockHook::new(islands))
        .with_activation(PluginPresent::new(SUPERIOR_SKYBLOCK_PLUGIN, plugins))
}
