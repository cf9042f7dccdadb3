use crate::catalog::{Catalog, CatalogDiff};
use crate::error::DefinitionError;
use crate::loader::load;
use crate::source::DefinitionSource;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{info, warn};
use zitems_domain::config::AttributeSchema;
use zitems_domain::item::ItemTemplate;

/// Summary of a successful reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadReport {
    pub generation: u64,
    pub templates: usize,
    pub diff: CatalogDiff,
}

#[derive(Debug)]
struct StoreInner {
    source: Box<dyn DefinitionSource>,
    schema: AttributeSchema,
    active: RwLock<Arc<Catalog>>,
    /// Serializes reloads so generations stay monotonic.
    reload_lock: Mutex<()>,
}

/// Shared handle to the active catalog.
///
/// Readers clone the current `Arc<Catalog>` under a short read lock and never observe a
/// partially loaded catalog. [`DefinitionStore::reload`] validates the whole source first
/// and swaps only on success.
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    inner: Arc<StoreInner>,
}

impl DefinitionStore {
    /// Loads the source once and fails if anything is invalid.
    ///
    /// # Errors
    /// Returns the [`DefinitionError`] of the initial load.
    pub fn open(
        source: impl DefinitionSource + 'static,
        schema: AttributeSchema,
    ) -> Result<Self, DefinitionError> {
        let catalog = load(&source, &schema)?.with_generation(1);
        Ok(Self::with_catalog(Box::new(source), schema, catalog))
    }

    /// Starts with an empty catalog; call [`DefinitionStore::reload`] to populate it.
    ///
    /// Hosts use this to keep running (with no items) when the first load fails.
    pub fn empty(source: impl DefinitionSource + 'static, schema: AttributeSchema) -> Self {
        Self::with_catalog(Box::new(source), schema, Catalog::empty())
    }

    fn with_catalog(source: Box<dyn DefinitionSource>, schema: AttributeSchema, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                source,
                schema,
                active: RwLock::new(Arc::new(catalog)),
                reload_lock: Mutex::new(()),
            }),
        }
    }

    /// The active catalog. Holding the returned `Arc` pins that generation.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.inner.active.read())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<ItemTemplate>> {
        self.inner.active.read().get(key).cloned()
    }

    #[must_use]
    pub fn schema(&self) -> &AttributeSchema {
        &self.inner.schema
    }

    /// Re-reads the source and swaps the catalog if, and only if, every entry is valid.
    ///
    /// # Errors
    /// Returns every issue of the failed load; the previous catalog stays active.
    pub fn reload(&self) -> Result<ReloadReport, DefinitionError> {
        let _reload = self.inner.reload_lock.lock();

        let candidate = match load(self.inner.source.as_ref(), &self.inner.schema) {
            Ok(candidate) => candidate,
            Err(err) => {
                warn!(
                    source = %self.inner.source.describe(),
                    issues = err.issues().len(),
                    "Reload rejected, keeping previous definitions: {err}"
                );
                return Err(err);
            },
        };

        let previous = self.snapshot();
        let generation = previous.generation() + 1;
        let candidate = Arc::new(candidate.with_generation(generation));
        let diff = CatalogDiff::between(&previous, &candidate);

        *self.inner.active.write() = Arc::clone(&candidate);

        info!(
            generation,
            templates = candidate.len(),
            added = diff.added.len(),
            removed = diff.removed.len(),
            changed = diff.changed.len(),
            "Definitions reloaded"
        );
        Ok(ReloadReport { generation, templates: candidate.len(), diff })
    }
}
