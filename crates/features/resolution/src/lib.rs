//! # Resolution Engine
//!
//! Answers "may this actor use this item here?" by consulting every active hook of a
//! [`HookRegistry`](zitems_hooks::HookRegistry) in registration order and combining their
//! verdicts with **deny-overrides**:
//!
//! 1. any `Deny` decides `Deny` (all deny reasons are kept);
//! 2. otherwise any `Allow` decides `Allow`;
//! 3. otherwise the template's `default_decision`, then the engine default.
//!
//! Hooks run inline on the caller thread unless a per-hook timeout is configured, in which
//! case they are evaluated on a [`HookPool`](zitems_runtime::HookPool) and abandoned at the
//! deadline.

mod engine;
mod error;
mod policy;

pub use engine::ResolutionEngine;
pub use error::{ResolutionError, ResolutionErrorExt};
pub use policy::{HookVerdict, Resolution, combine};
