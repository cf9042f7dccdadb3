use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use std::path::Path;
use std::sync::Arc;
use zitems_domain::item::ItemTemplate;
use zitems_domain::key::TemplateKey;

/// One fully validated generation of templates.
///
/// Catalogs are immutable once built; the store swaps whole catalogs on reload.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: FxHashMap<TemplateKey, Arc<ItemTemplate>>,
    /// Keys in ascending order, for stable iteration.
    order: Vec<TemplateKey>,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub(crate) fn new(templates: Vec<ItemTemplate>) -> Self {
        let mut order: Vec<TemplateKey> = templates.iter().map(|t| t.key.clone()).collect();
        order.sort();
        let templates = templates.into_iter().map(|t| (t.key.clone(), Arc::new(t))).collect();
        Self { templates, order, generation: 0, loaded_at: Utc::now() }
    }

    /// A catalog with no templates, used before the first successful load.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub(crate) const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<ItemTemplate>> {
        self.templates.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemTemplate>> {
        self.order.iter().filter_map(|key| self.templates.get(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &TemplateKey> {
        self.order.iter()
    }

    /// Templates whose definition file sits directly in `folder`.
    pub fn folder<'a>(&'a self, folder: &'a Path) -> impl Iterator<Item = &'a Arc<ItemTemplate>> {
        self.iter().filter(move |t| t.folder.as_deref() == Some(folder))
    }

    /// Increases by one on every successful reload; the first load is generation 1.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Whether both catalogs hold the same templates, ignoring generation and timestamps.
    #[must_use]
    pub fn same_templates(&self, other: &Self) -> bool {
        self.order == other.order
            && self.order.iter().all(|key| self.templates.get(key) == other.templates.get(key))
    }
}

/// What changed between two catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDiff {
    pub added: Vec<TemplateKey>,
    pub removed: Vec<TemplateKey>,
    pub changed: Vec<TemplateKey>,
}

impl CatalogDiff {
    #[must_use]
    pub fn between(old: &Catalog, new: &Catalog) -> Self {
        let mut diff = Self::default();
        for key in new.keys() {
            match old.get(key.as_str()) {
                None => diff.added.push(key.clone()),
                Some(previous) if new.get(key.as_str()) != Some(previous) => {
                    diff.changed.push(key.clone());
                },
                Some(_) => {},
            }
        }
        diff.removed = old.keys().filter(|key| !new.contains(key.as_str())).cloned().collect();
        diff
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}
