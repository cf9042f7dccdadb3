use crate::error::ZItemsError;
use parking_lot::Mutex;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{error, info, warn};
use zitems_definitions::{DefinitionSource, DefinitionStore, DirectorySource, ReloadReport};
use zitems_domain::config::ZItemsConfig;
use zitems_domain::context::{Actor, Location};
use zitems_domain::instance::{ItemInstance, Overrides};
use zitems_hooks::{HookDescriptor, HookRegistry, WorldFilter};
use zitems_instances::ItemFactory;
use zitems_kernel::keys::KeyGuard;
use zitems_recipes::{BindingSet, RecipeBinder, RecipeError, RecipeSink};
use zitems_resolution::{Resolution, ResolutionEngine};

/// Outcome of [`ZItems::reload`].
#[derive(Debug)]
pub struct ReloadSummary {
    pub report: ReloadReport,
    /// `None` when no recipe sink is attached or recipes are disabled.
    pub recipes: Option<Result<BindingSet, RecipeError>>,
}

#[derive(Debug)]
pub struct ZItemsInner {
    pub config: ZItemsConfig,
    pub store: DefinitionStore,
    pub hooks: HookRegistry,
    pub engine: ResolutionEngine,
    pub factory: ItemFactory,
    binder: Option<RecipeBinder>,
    /// Serializes catalog swaps with the recipe rebind that follows them.
    reloading: Mutex<()>,
}

/// The assembled registry a host plugin talks to.
///
/// Cheap to clone; every clone shares the catalog, the hooks and the recipe bindings.
#[derive(Debug, Clone)]
pub struct ZItems {
    inner: Arc<ZItemsInner>,
}

impl ZItems {
    #[must_use]
    pub fn builder() -> ZItemsBuilder {
        ZItemsBuilder::default()
    }

    #[must_use]
    pub fn binder(&self) -> Option<&RecipeBinder> {
        self.inner.binder.as_ref()
    }

    /// Reloads definitions and, when that succeeds, rebinds recipes against the new catalog.
    ///
    /// # Errors
    /// Returns [`ZItemsError::Definitions`] when the new definitions are invalid; the previous
    /// catalog and the installed recipes stay untouched.
    pub fn reload(&self) -> Result<ReloadSummary, ZItemsError> {
        let _reloading = self.reloading.lock();
        let report = self.store.reload()?;
        let recipes = self.bind_recipes(true);
        info!(generation = report.generation, templates = report.templates, "zItems reloaded");
        Ok(ReloadSummary { report, recipes })
    }

    /// Resolves the use of the item `key` (plain or namespaced) at `location` by `actor`.
    ///
    /// Unknown or malformed keys resolve to a deny carrying the reason.
    #[must_use]
    pub fn resolve_key(&self, key: &str, location: &Location, actor: &Actor) -> Resolution {
        let template = match KeyGuard::verify(key, &self.config.recipes.namespace) {
            Ok(key) => self.store.get(key.as_str()),
            Err(err) => return Resolution::rejected(err.to_string()),
        };
        match template {
            Some(template) => self.engine.resolve_shared(&template, location, actor),
            None => {
                warn!(item = key, "Resolution requested for an unknown item");
                Resolution::rejected(format!("unknown item '{key}'"))
            },
        }
    }

    /// Creates `amount` items of `key` for a give command.
    ///
    /// # Errors
    /// Returns [`ZItemsError::Key`] for a malformed or foreign key and
    /// [`ZItemsError::Instance`] when the factory refuses the request.
    pub fn give(&self, key: &str, amount: u16, overrides: Overrides) -> Result<ItemInstance, ZItemsError> {
        let key = KeyGuard::verify(key, &self.config.recipes.namespace)?;
        Ok(self.factory.create_stack(key.as_str(), amount, overrides)?)
    }

    fn bind_recipes(&self, rebind: bool) -> Option<Result<BindingSet, RecipeError>> {
        let binder = self.binder.as_ref()?;
        let catalog = self.store.snapshot();
        let templates = catalog.iter().map(|template| &**template);
        let result = if rebind { binder.rebind(templates) } else { binder.bind(templates) };
        if let Err(err) = &result {
            error!("Recipe binding incomplete: {err}");
        }
        Some(result)
    }
}

impl Deref for ZItems {
    type Target = ZItemsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Default)]
pub struct ZItemsBuilder {
    config: Option<ZItemsConfig>,
    source: Option<Box<dyn DefinitionSource>>,
    recipe_sink: Option<Arc<dyn RecipeSink>>,
    hooks: Vec<HookDescriptor>,
    lenient: bool,
}

impl fmt::Debug for ZItemsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZItemsBuilder")
            .field("config", &self.config)
            .field("source", &self.source)
            .field("recipe_sink", &self.recipe_sink.is_some())
            .field("hooks", &self.hooks.iter().map(HookDescriptor::name).collect::<Vec<_>>())
            .field("lenient", &self.lenient)
            .finish()
    }
}

impl ZItemsBuilder {
    #[must_use]
    pub fn config(mut self, config: ZItemsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Definition source; defaults to the configured definitions folder.
    #[must_use]
    pub fn source(mut self, source: impl DefinitionSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn recipe_sink(mut self, sink: Arc<dyn RecipeSink>) -> Self {
        self.recipe_sink = Some(sink);
        self
    }

    /// Registers an additional hook after the built-in world filter.
    #[must_use]
    pub fn hook(mut self, descriptor: HookDescriptor) -> Self {
        self.hooks.push(descriptor);
        self
    }

    /// Registers multiple hooks at once.
    #[must_use]
    pub fn hooks<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = HookDescriptor>,
    {
        self.hooks.extend(descriptors);
        self
    }

    /// Starts with an empty catalog instead of failing when the first load is invalid.
    #[must_use]
    pub const fn lenient(mut self, enabled: bool) -> Self {
        self.lenient = enabled;
        self
    }

    /// # Errors
    /// - [`ZItemsError::Definitions`] when the initial load fails and the builder is not lenient.
    /// - [`ZItemsError::Resolution`] when the hook evaluation pool cannot be built.
    pub fn build(self) -> Result<ZItems, ZItemsError> {
        let config = self.config.unwrap_or_default();
        let source: Box<dyn DefinitionSource> = match self.source {
            Some(source) => source,
            None => Box::new(DirectorySource::new(&config.definitions.path)),
        };

        let store = DefinitionStore::empty(source, config.schema.clone());
        if let Err(err) = store.reload() {
            if !self.lenient {
                return Err(err.into());
            }
            error!("Starting with no items: {err}");
        }

        let hooks = HookRegistry::new();
        hooks.register(WorldFilter::descriptor());
        for descriptor in self.hooks {
            hooks.register(descriptor);
        }

        let engine = ResolutionEngine::from_config(hooks.clone(), &config.resolution)?;
        let factory = ItemFactory::new(store.clone());
        let binder = self
            .recipe_sink
            .filter(|_| config.recipes.enabled)
            .map(|sink| RecipeBinder::with_namespace(config.recipes.namespace.clone(), sink));

        let inner = ZItemsInner { config, store, hooks, engine, factory, binder, reloading: Mutex::new(()) };
        let items = ZItems { inner: Arc::new(inner) };
        items.bind_recipes(false);
        info!(
            templates = items.store.snapshot().len(),
            hooks = items.hooks.len(),
            recipes = items.binder.as_ref().map_or(0, |b| b.installed().len()),
            "zItems ready"
        );
        Ok(items)
    }
}
