use crate::binding::{BindingPlan, RecipeBinding};
use crate::error::RecipeError;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zitems_domain::constants::DEFAULT_NAMESPACE;
use zitems_domain::item::ItemTemplate;

/// The host's recipe book.
pub trait RecipeSink: Send + Sync + 'static {
    /// Installs one binding.
    ///
    /// # Errors
    /// Returns the host's reason for refusing the binding.
    fn install(&self, binding: &RecipeBinding) -> Result<(), Cow<'static, str>>;

    /// Removes a binding previously installed under `key`.
    fn remove(&self, key: &str);
}

/// The bindings installed by one successful [`RecipeBinder::bind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    pub bindings: Vec<RecipeBinding>,
}

impl BindingSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|binding| binding.key.as_str())
    }
}

/// Keeps the host's recipe book in sync with the catalog.
pub struct RecipeBinder {
    namespace: String,
    sink: Arc<dyn RecipeSink>,
    /// Keys currently installed in the sink.
    installed: Mutex<Vec<String>>,
}

impl fmt::Debug for RecipeBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeBinder")
            .field("namespace", &self.namespace)
            .field("installed", &self.installed.lock().len())
            .finish_non_exhaustive()
    }
}

impl RecipeBinder {
    pub fn new(sink: Arc<dyn RecipeSink>) -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE, sink)
    }

    pub fn with_namespace(namespace: impl Into<String>, sink: Arc<dyn RecipeSink>) -> Self {
        Self { namespace: namespace.into(), sink, installed: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Keys currently installed, in install order.
    #[must_use]
    pub fn installed(&self) -> Vec<String> {
        self.installed.lock().clone()
    }

    /// Derives bindings without touching the sink.
    pub fn plan<'a>(&self, templates: impl IntoIterator<Item = &'a ItemTemplate>) -> BindingPlan {
        BindingPlan::derive(&self.namespace, templates)
    }

    /// Installs every non-colliding binding of `templates`.
    ///
    /// A binding whose key is already installed is replaced.
    ///
    /// # Errors
    /// - [`RecipeError::Conflict`] naming every colliding template; the others are installed.
    /// - [`RecipeError::Sink`] naming every binding the host refused.
    pub fn bind<'a>(&self, templates: impl IntoIterator<Item = &'a ItemTemplate>) -> Result<BindingSet, RecipeError> {
        let plan = self.plan(templates);
        let mut installed = self.installed.lock();
        self.install(&mut installed, plan)
    }

    /// Removes every binding this binder installed.
    pub fn unbind_all(&self) -> usize {
        let mut installed = self.installed.lock();
        self.uninstall(&mut installed)
    }

    /// `unbind_all` followed by `bind`, under one lock so concurrent rebinds never mix sets.
    ///
    /// # Errors
    /// Same as [`RecipeBinder::bind`].
    pub fn rebind<'a>(&self, templates: impl IntoIterator<Item = &'a ItemTemplate>) -> Result<BindingSet, RecipeError> {
        let plan = self.plan(templates);
        let mut installed = self.installed.lock();
        self.uninstall(&mut installed);
        self.install(&mut installed, plan)
    }

    fn uninstall(&self, installed: &mut Vec<String>) -> usize {
        for key in installed.iter() {
            self.sink.remove(key);
        }
        let removed = installed.len();
        installed.clear();
        debug!(removed, "Recipes unbound");
        removed
    }

    fn install(&self, installed: &mut Vec<String>, plan: BindingPlan) -> Result<BindingSet, RecipeError> {
        let colliding = plan.colliding_keys();
        let BindingPlan { bindings, collisions } = plan;
        let mut set = BindingSet::default();
        let mut refused: Vec<(String, Cow<'static, str>)> = Vec::new();

        for binding in bindings {
            if let Some(position) = installed.iter().position(|key| *key == binding.key) {
                self.sink.remove(&binding.key);
                installed.remove(position);
            }
            match self.sink.install(&binding) {
                Ok(()) => {
                    debug!(recipe = %binding.key, "Recipe installed");
                    installed.push(binding.key.clone());
                    set.bindings.push(binding);
                },
                Err(reason) => {
                    warn!(recipe = %binding.key, "Host refused recipe: {reason}");
                    refused.push((binding.key, reason));
                },
            }
        }

        for collision in &collisions {
            let keys: Vec<&str> = collision.templates.iter().map(|k| k.as_str()).collect();
            warn!(kind = %collision.kind, shape = %collision.shape, "Recipe collision between {}", keys.join(", "));
        }
        info!(
            installed = set.len(),
            collisions = collisions.len(),
            refused = refused.len(),
            namespace = %self.namespace,
            "Recipes bound"
        );

        if !colliding.is_empty() {
            return Err(RecipeError::Conflict { keys: colliding, context: None });
        }
        if !refused.is_empty() {
            let message = refused.iter().map(|(key, reason)| format!("{key}: {reason}")).collect::<Vec<_>>().join("; ");
            let keys = refused.into_iter().map(|(key, _)| key).collect();
            return Err(RecipeError::Sink { keys, message, context: None });
        }
        Ok(set)
    }
}
