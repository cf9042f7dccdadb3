//! # zItems
//!
//! Facade over the zItems crates. A host plugin builds one [`ZItems`] at startup and keeps it
//! for the lifetime of the server:
//!
//! ```rust,no_run
//! use zitems::ZItems;
//! use zitems::domain::config::ZItemsConfig;
//! use zitems::domain::context::{Actor, Location};
//!
//! let config: ZItemsConfig = zitems::kernel::config::load_config(Some("plugins/zItems/config"))?;
//! let items = ZItems::builder().config(config).build()?;
//!
//! let resolution = items.resolve_key("zitems:ruby_sword", &Location::new("world", 0, 64, 0), &Actor::new("1", "Alex"));
//! if !resolution.is_allowed() {
//!     println!("{}", resolution);
//! }
//!
//! // `/zitems reload`
//! items.reload()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Keep this crate thin: it composes the feature crates and holds no business logic of its own.

mod error;
mod state;

pub use crate::error::{ZItemsError, ZItemsErrorExt};
pub use crate::state::{ReloadSummary, ZItems, ZItemsBuilder, ZItemsInner};

pub use zitems_definitions as definitions;
pub use zitems_domain as domain;
pub use zitems_hooks as hooks;
pub use zitems_instances as instances;
pub use zitems_kernel as kernel;
pub use zitems_recipes as recipes;
pub use zitems_resolution as resolution;

/// Host plugin integrations compiled into this build.
pub mod integrations {
    #[cfg(feature = "jobs")]
    pub use zitems_hook_jobs as jobs;
    #[cfg(feature = "superior-skyblock")]
    pub use zitems_hook_superior_skyblock as superior_skyblock;
    #[cfg(feature = "worldguard")]
    pub use zitems_hook_worldguard as worldguard;

    /// Build-time enabled integrations (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "worldguard")]
        zitems_domain::constants::WORLDGUARD_HOOK,
        #[cfg(feature = "superior-skyblock")]
        zitems_domain::constants::SUPERIOR_SKYBLOCK_HOOK,
        #[cfg(feature = "jobs")]
        zitems_domain::constants::JOBS_HOOK,
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

pub mod prelude {
    pub use crate::{ReloadSummary, ZItems, ZItemsError};
    pub use zitems_definitions::{DefinitionSource, DirectorySource, InMemorySource};
    pub use zitems_domain::prelude::*;
    pub use zitems_hooks::{DecisionProvider, HookDescriptor, PluginDirectory, PluginPresent};
    pub use zitems_recipes::{RecipeBinding, RecipeSink};
    pub use zitems_resolution::Resolution;
}
