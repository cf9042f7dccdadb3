use crate::constants::DEFAULT_NAMESPACE;
use crate::effect::Effect;
use crate::item::AttributeKind;
use crate::verdict::Decision;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level zItems settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZItemsConfigInner {
    /// Verbose logging of loads, bindings and resolutions.
    pub debug: bool,
    pub definitions: DefinitionsConfig,
    pub schema: AttributeSchema,
    pub resolution: ResolutionConfig,
    pub recipes: RecipesConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ZItemsConfig {
    #[serde(flatten, default)]
    inner: Arc<ZItemsConfigInner>,
}

impl Deref for ZItemsConfig {
    type Target = ZItemsConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ZItemsConfig {
    fn deref_mut(&mut self) -> &mut ZItemsConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where item definitions live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefinitionsConfig {
    pub path: PathBuf,
}

/// Declared attribute types and the effect types the host can handle.
///
/// Attributes listed in `kinds` must match their type. Undeclared attributes are accepted
/// with whatever type they carry unless `strict` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttributeSchema {
    pub strict: bool,
    pub kinds: BTreeMap<String, AttributeKind>,
    /// Effect types registered by host handlers, on top of the bundled ones.
    pub effect_types: BTreeSet<String>,
}

impl AttributeSchema {
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.kinds.get(name).copied()
    }

    #[must_use]
    pub fn declare(mut self, name: impl Into<String>, kind: AttributeKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    /// Registers an additional effect type, upper-cased like effect kinds.
    #[must_use]
    pub fn declare_effect_type(mut self, kind: &str) -> Self {
        self.effect_types.insert(kind.trim().to_ascii_uppercase());
        self
    }

    #[must_use]
    pub fn knows_effect_type(&self, kind: &str) -> bool {
        Effect::is_builtin_kind(kind) || self.effect_types.iter().any(|known| known.eq_ignore_ascii_case(kind))
    }

    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Resolution engine knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Outcome when every hook abstains and the template has no override.
    pub default_decision: Decision,
    /// Per-hook evaluation deadline; `None` evaluates inline without a deadline.
    pub hook_timeout_ms: Option<u64>,
    /// Worker count of the evaluation pool; detected from the hardware when absent.
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecipesConfig {
    pub enabled: bool,
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("items") }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self { default_decision: Decision::Allow, hook_timeout_ms: None, workers: None }
    }
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self { enabled: true, namespace: DEFAULT_NAMESPACE.to_owned() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
