use crate::provider::DecisionProvider;
use crate::registry::HookDescriptor;
use zitems_domain::constants::WORLD_FILTER_HOOK;
use zitems_domain::context::{Actor, Location};
use zitems_domain::item::ItemTemplate;
use zitems_domain::verdict::Verdict;

/// Denies templates whose world allow-list excludes the location's world.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldFilter;

impl WorldFilter {
    /// Always-active descriptor named [`WORLD_FILTER_HOOK`].
    #[must_use]
    pub fn descriptor() -> HookDescriptor {
        HookDescriptor::new(WORLD_FILTER_HOOK, Self)
    }
}

impl DecisionProvider for WorldFilter {
    fn evaluate(&self, template: &ItemTemplate, location: &Location, _actor: &Actor) -> Verdict {
        if template.constraints.allows_world(&location.world) {
            Verdict::abstain()
        } else {
            Verdict::deny(format!("{} cannot be used in world '{}'", template.key, location.world))
        }
    }
}
