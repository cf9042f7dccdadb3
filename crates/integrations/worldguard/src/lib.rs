//! WorldGuard integration.
//!
//! Outside every region the hook abstains. Inside a region it denies templates restricted to
//! `outside_regions` and actors that cannot build there, and allows everything else.

use std::fmt;
use std::sync::Arc;
use tracing::trace;
use zitems_domain::constants::{WORLDGUARD_HOOK, WORLDGUARD_PLUGIN};
use zitems_domain::constraints::PlacementFlags;
use zitems_domain::context::{Actor, Location};
use zitems_domain::item::ItemTemplate;
use zitems_domain::verdict::Verdict;
use zitems_hooks::{DecisionProvider, HookDescriptor, PluginDirectory, PluginPresent};

/// Region lookups answered by the host's WorldGuard bridge.
pub trait RegionQuery: Send + Sync + 'static {
    /// Ids of the regions covering `location`, highest priority first; empty outside regions.
    fn regions_at(&self, location: &Location) -> Vec<String>;

    /// Whether `actor` may build at `location` according to the region flags.
    fn can_build(&self, actor: &Actor, location: &Location) -> bool;
}

pub struct WorldGuardHook {
    regions: Arc<dyn RegionQuery>,
}

impl fmt::Debug for WorldGuardHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldGuardHook").finish_non_exhaustive()
    }
}

impl WorldGuardHook {
    pub fn new(regions: Arc<dyn RegionQuery>) -> Self {
        Self { regions }
    }
}

impl DecisionProvider for WorldGuardHook {
    fn evaluate(&self, template: &ItemTemplate, location: &Location, actor: &Actor) -> Verdict {
        let regions = self.regions.regions_at(location);
        let Some(region) = regions.first() else {
            return Verdict::abstain();
        };
        trace!(item = %template.key, region, "Location is inside a region");

        if template.constraints.contains(PlacementFlags::OUTSIDE_REGIONS) {
            return Verdict::deny(format!("{} cannot be used inside region '{region}'", template.key));
        }
        if !self.regions.can_build(actor, location) {
            return Verdict::deny(format!("{} cannot build in region '{region}'", actor.name));
        }
        Verdict::allow()
    }
}

/// Descriptor active while the WorldGuard plugin is enabled.
pub fn descriptor(regions: Arc<dyn RegionQuery>, plugins: Arc<dyn PluginDirectory>) -> HookDescriptor {
    HookDescriptor::new(WORLDGUARD_HOOK, WorldGuardHook::new(regions))
        .with_activation(PluginPresent::new(WORLDGUARD_PLUGIN, plugins))
}
