use crate::item::{AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Effect types handled by the bundled effect handlers.
pub const BUILTIN_EFFECT_TYPES: &[&str] = &[
    "ABSORPTION",
    "ATTRIBUTES_APPLICATOR",
    "AUTO_SELL",
    "EMPTY",
    "ENCHANTS_APPLICATOR",
    "FARMING_HOE",
    "HAMMER",
    "INFINITE_BUCKET",
    "MELT_MINING",
    "SELL_STICK",
    "SILK_SPAWNER",
    "UNBREAKABLE",
    "VEIN_MINING",
    "XP_BOOST",
];

/// Longest accepted effect id.
pub const MAX_EFFECT_ID_LEN: usize = 64;

/// A configured effect: `kind` selects the handler, `settings` parameterize it.
///
/// Two effects with the same `id` are the same effect, whatever their settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    pub kind: String,
    pub settings: AttributeMap,
}

impl Effect {
    /// The handler type is normalized to upper case.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: &str) -> Self {
        Self { id: id.into(), kind: kind.trim().to_ascii_uppercase(), settings: AttributeMap::new() }
    }

    #[must_use]
    pub fn with_setting(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.settings.insert(name.into(), value);
        self
    }

    /// Lower-case ASCII letters, digits, `_`, `-` and `.`.
    #[must_use]
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_EFFECT_ID_LEN
            && id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'-' | b'.'))
    }

    #[must_use]
    pub fn is_builtin_kind(kind: &str) -> bool {
        BUILTIN_EFFECT_TYPES.contains(&kind)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

/// Why a template refuses an additional effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectRefusal {
    /// The template does not accept effects beyond its own.
    NotAllowed,
    /// The effect id is listed in the template's `disabled_effects`.
    Disabled,
    /// The item already carries an effect with this id.
    AlreadyPresent,
}

impl fmt::Display for EffectRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAllowed => "additional effects are not allowed on this item",
            Self::Disabled => "effect is disabled on this item",
            Self::AlreadyPresent => "effect is already present",
        })
    }
}
