use crate::activation::{Activation, Always};
use crate::provider::DecisionProvider;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error, warn};
use zitems_runtime::panic_message;

/// A named provider together with the predicate that gates it.
#[derive(Clone)]
pub struct HookDescriptor {
    name: Cow<'static, str>,
    provider: Arc<dyn DecisionProvider>,
    activation: Arc<dyn Activation>,
}

impl HookDescriptor {
    /// A hook that is always active.
    pub fn new(name: impl Into<Cow<'static, str>>, provider: impl DecisionProvider) -> Self {
        Self { name: name.into(), provider: Arc::new(provider), activation: Arc::new(Always) }
    }

    #[must_use]
    pub fn with_activation(mut self, activation: impl Activation) -> Self {
        self.activation = Arc::new(activation);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn DecisionProvider> {
        &self.provider
    }

    /// Evaluates the activation predicate; a panic counts as inactive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match catch_unwind(AssertUnwindSafe(|| self.activation.is_active())) {
            Ok(active) => active,
            Err(payload) => {
                error!(hook = %self.name, "Activation predicate panicked: {}", panic_message(payload.as_ref()));
                false
            },
        }
    }
}

impl fmt::Debug for HookDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDescriptor").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Ordered, shared collection of hooks.
///
/// Clones share the same hooks. Registration order is resolution order.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    hooks: Arc<RwLock<Vec<HookDescriptor>>>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook. A hook with the same name is replaced in place and keeps its position.
    ///
    /// Returns `true` when an existing hook was replaced.
    pub fn register(&self, descriptor: HookDescriptor) -> bool {
        let mut hooks = self.hooks.write();
        if let Some(slot) = hooks.iter_mut().find(|hook| hook.name == descriptor.name) {
            warn!(hook = %descriptor.name, "Hook registered twice, replacing the previous registration");
            *slot = descriptor;
            return true;
        }
        debug!(hook = %descriptor.name, position = hooks.len(), "Hook registered");
        hooks.push(descriptor);
        false
    }

    /// Removes the hook named `name`; returns whether it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let mut hooks = self.hooks.write();
        let before = hooks.len();
        hooks.retain(|hook| hook.name != name);
        let removed = hooks.len() != before;
        if removed {
            debug!(hook = name, "Hook unregistered");
        }
        removed
    }

    /// Hooks whose activation holds right now, in registration order.
    ///
    /// Predicates run outside the lock so a slow host lookup never blocks registration.
    #[must_use]
    pub fn active_hooks(&self) -> Vec<HookDescriptor> {
        let hooks = self.hooks.read().clone();
        hooks.into_iter().filter(HookDescriptor::is_active).collect()
    }

    /// Every registered hook name, active or not.
    #[must_use]
    pub fn registered(&self) -> Vec<String> {
        self.hooks.read().iter().map(|hook| hook.name.to_string()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }
}
