use std::fmt;
use std::sync::Arc;

/// Decides, per query, whether a hook takes part in resolution.
pub trait Activation: Send + Sync + 'static {
    fn is_active(&self) -> bool;
}

impl<F> Activation for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn is_active(&self) -> bool {
        self()
    }
}

/// Always active; used for built-in hooks with no external dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Activation for Always {
    fn is_active(&self) -> bool {
        true
    }
}

/// Host view of the plugins currently loaded.
pub trait PluginDirectory: Send + Sync + 'static {
    fn is_enabled(&self, plugin: &str) -> bool;
}

/// Active while the named host plugin is enabled.
///
/// The directory is asked on every query, so a plugin that is disabled at runtime stops being
/// consulted on the next resolution.
#[derive(Clone)]
pub struct PluginPresent {
    plugin: String,
    directory: Arc<dyn PluginDirectory>,
}

impl PluginPresent {
    pub fn new(plugin: impl Into<String>, directory: Arc<dyn PluginDirectory>) -> Self {
        Self { plugin: plugin.into(), directory }
    }

    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }
}

impl fmt::Debug for PluginPresent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginPresent").field("plugin", &self.plugin).finish_non_exhaustive()
    }
}

impl Activation for PluginPresent {
    fn is_active(&self) -> bool {
        self.directory.is_enabled(&self.plugin)
    }
}
