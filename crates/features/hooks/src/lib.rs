//! # Hook Registry
//!
//! Optional integrations contribute [`Verdict`]s through the narrow [`DecisionProvider`]
//! trait. Each provider is registered with an [`Activation`] predicate that is evaluated
//! lazily on every query, so hooks follow host plugins as they are enabled and disabled.
//!
//! ```rust
//! use zitems_hooks::{HookDescriptor, HookRegistry};
//! use zitems_domain::prelude::*;
//!
//! let registry = HookRegistry::new();
//! registry.register(HookDescriptor::new(
//!     "no-beacons",
//!     |template: &ItemTemplate, _: &Location, _: &Actor| {
//!         if template.display.material == "BEACON" { Verdict::deny("beacons are disabled") } else { Verdict::abstain() }
//!     },
//! ));
//! assert_eq!(registry.registered(), ["no-beacons"]);
//! ```
//!
//! [`Verdict`]: zitems_domain::verdict::Verdict

mod activation;
mod provider;
mod registry;
mod world_filter;

pub use activation::{Activation, Always, PluginDirectory, PluginPresent};
pub use provider::DecisionProvider;
pub use registry::{HookDescriptor, HookRegistry};
pub use world_filter::WorldFilter;
