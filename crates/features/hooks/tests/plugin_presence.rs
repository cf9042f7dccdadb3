use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use zitems_domain::prelude::*;
use zitems_hooks::{HookDescriptor, HookRegistry, PluginDirectory, PluginPresent, WorldFilter};

#[derive(Debug, Default)]
struct Plugins {
    enabled: RwLock<BTreeSet<String>>,
}

impl Plugins {
    fn enable(&self, name: &str) {
        self.enabled.write().insert(name.to_owned());
    }

    fn disable(&self, name: &str) {
        self.enabled.write().remove(name);
    }
}

impl PluginDirectory for Plugins {
    fn is_enabled(&self, plugin: &str) -> bool {
        self.enabled.read().contains(plugin)
    }
}

fn deny_all(_: &ItemTemplate, _: &Location, _: &Actor) -> Verdict {
    Verdict::deny("region protected")
}

#[test]
fn hooks_follow_their_plugin() {
    let plugins = Arc::new(Plugins::default());
    let registry = HookRegistry::new();
    registry.register(WorldFilter::descriptor());
    registry.register(
        HookDescriptor::new("regions", deny_all)
            .with_activation(PluginPresent::new("WorldGuard", Arc::clone(&plugins) as Arc<dyn PluginDirectory>)),
    );

    let names = |registry: &HookRegistry| -> Vec<String> {
        registry.active_hooks().iter().map(|hook| hook.name().to_owned()).collect()
    };

    assert_eq!(names(&registry), ["world-filter"]);

    plugins.enable("WorldGuard");
    assert_eq!(names(&registry), ["world-filter", "regions"]);

    plugins.disable("WorldGuard");
    assert_eq!(names(&registry), ["world-filter"]);
    assert_eq!(registry.registered(), ["world-filter", "regions"]);
}

#[test]
fn active_hooks_evaluate_their_providers() {
    let registry = HookRegistry::new();
    registry.register(HookDescriptor::new("regions", deny_all));

    let template = ItemTemplate::new(TemplateKey::parse("ruby").unwrap(), "REDSTONE");
    let location = Location::new("world", 10, 64, -3);
    let actor = Actor::new("uuid-1", "Alex");

    let verdicts: Vec<_> = registry
        .active_hooks()
        .iter()
        .map(|hook| hook.provider().evaluate(&template, &location, &actor))
        .collect();
    assert_eq!(verdicts, [Verdict::deny("region protected")]);
}
