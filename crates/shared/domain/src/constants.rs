//! Names shared between the core, the integrations and the host.

/// Recipe namespace used when the configuration does not override it.
pub const DEFAULT_NAMESPACE: &str = "zitems";

/// Plugin names checked by the activation predicates of the bundled hooks.
pub const WORLDGUARD_PLUGIN: &str = "WorldGuard";
pub const SUPERIOR_SKYBLOCK_PLUGIN: &str = "SuperiorSkyblock2";
pub const JOBS_PLUGIN: &str = "Jobs";

/// Hook names as registered in the hook registry.
pub const WORLDGUARD_HOOK: &str = "worldguard";
pub const SUPERIOR_SKYBLOCK_HOOK: &str = "superior-skyblock";
pub const JOBS_HOOK: &str = "jobs";
pub const WORLD_FILTER_HOOK: &str = "world-filter";

/// Largest stack size a template may declare.
pub const MAX_STACK_SIZE: u16 = 99;
/// Stack size used when a definition does not declare one.
pub const DEFAULT_STACK_SIZE: u16 = 64;
