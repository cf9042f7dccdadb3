use crate::constants::DEFAULT_STACK_SIZE;
use crate::constraints::PlacementConstraints;
use crate::effect::{Effect, EffectRefusal};
use crate::key::TemplateKey;
use crate::recipe::RecipeDefinition;
use crate::verdict::Decision;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Named attributes of a template or an instance, ordered by name.
pub type AttributeMap = BTreeMap<String, AttributeValue>;
/// Enchantment name to level.
pub type Enchantments = BTreeMap<String, u16>;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl AttributeValue {
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Int(_) => AttributeKind::Int,
            Self::Float(_) => AttributeKind::Float,
            Self::Text(_) => AttributeKind::Text,
            Self::Bool(_) => AttributeKind::Bool,
        }
    }

    /// Coerces the value to `kind` when that is lossless (integer literals for floats).
    #[must_use]
    pub fn coerce(self, kind: AttributeKind) -> Option<Self> {
        match (self, kind) {
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(v), AttributeKind::Float) => Some(Self::Float(v as f64)),
            (value, kind) if value.kind() == kind => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// The declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Int,
    Float,
    Text,
    Bool,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bool => "bool",
        })
    }
}

bitflags! {
    /// Crafting stations that refuse the item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct ItemRestrictions: u8 {
        const NO_ANVIL = 1 << 0;
        const NO_GRINDSTONE = 1 << 1;
        const NO_ENCHANTING = 1 << 2;
    }
}

impl From<&str> for ItemRestrictions {
    fn from(s: &str) -> Self {
        match s {
            "anvil" => Self::NO_ANVIL,
            "grindstone" => Self::NO_GRINDSTONE,
            "enchanting" => Self::NO_ENCHANTING,
            "all" | "*" => Self::all(),
            _ => Self::empty(),
        }
    }
}

impl Serialize for ItemRestrictions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for ItemRestrictions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// What players see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMeta {
    pub material: String,
    pub name: Option<String>,
    pub lore: Vec<String>,
    pub custom_model_data: Option<i32>,
}

/// Immutable definition of an item, produced once per catalog generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub key: TemplateKey,
    pub display: DisplayMeta,
    pub attributes: AttributeMap,
    pub enchantments: Enchantments,
    /// Effects every instance carries.
    pub effects: Vec<Effect>,
    /// Whether instances may carry effects beyond `effects`.
    pub allow_additional_effects: bool,
    /// Effect ids instances may never add.
    pub disabled_effects: BTreeSet<String>,
    pub constraints: PlacementConstraints,
    /// Outcome when every consulted hook abstains; falls back to the engine default.
    pub default_decision: Option<Decision>,
    pub restrictions: ItemRestrictions,
    pub max_stack_size: u16,
    pub recipe: Option<RecipeDefinition>,
    /// The template this one inherited from, kept for diagnostics.
    pub base: Option<TemplateKey>,
    /// Directory (relative to the definitions root) the definition was found in.
    pub folder: Option<PathBuf>,
    pub origin: String,
}

impl ItemTemplate {
    /// A bare template with defaults, mostly useful for tests and programmatic hosts.
    #[must_use]
    pub fn new(key: TemplateKey, material: impl Into<String>) -> Self {
        Self {
            origin: format!("memory:{key}"),
            key,
            display: DisplayMeta {
                material: material.into(),
                name: None,
                lore: Vec::new(),
                custom_model_data: None,
            },
            attributes: AttributeMap::new(),
            enchantments: Enchantments::new(),
            effects: Vec::new(),
            allow_additional_effects: true,
            disabled_effects: BTreeSet::new(),
            constraints: PlacementConstraints::default(),
            default_decision: None,
            restrictions: ItemRestrictions::empty(),
            max_stack_size: DEFAULT_STACK_SIZE,
            recipe: None,
            base: None,
            folder: None,
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn has_effect(&self, id: &str) -> bool {
        self.effects.iter().any(|effect| effect.id == id)
    }

    /// Checks whether an instance may carry `effect` on top of the template's own effects.
    ///
    /// # Errors
    /// Returns the [`EffectRefusal`] explaining why the effect cannot be added.
    pub fn accepts_effect(&self, effect: &Effect) -> Result<(), EffectRefusal> {
        if self.has_effect(&effect.id) {
            Err(EffectRefusal::AlreadyPresent)
        } else if !self.allow_additional_effects {
            Err(EffectRefusal::NotAllowed)
        } else if self.disabled_effects.contains(&effect.id) {
            Err(EffectRefusal::Disabled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_coerces_to_float_only() {
        assert_eq!(AttributeValue::Int(3).coerce(AttributeKind::Float), Some(AttributeValue::Float(3.0)));
        assert_eq!(AttributeValue::Float(1.5).coerce(AttributeKind::Int), None);
        assert_eq!(AttributeValue::Text("x".into()).coerce(AttributeKind::Bool), None);
        assert_eq!(AttributeValue::Bool(true).coerce(AttributeKind::Bool), Some(AttributeValue::Bool(true)));
    }

    #[test]
    fn additional_effects_follow_the_template_policy() {
        let mut template = ItemTemplate::new(TemplateKey::parse("ruby_pick").unwrap(), "DIAMOND_PICKAXE");
        template.effects.push(Effect::new("hammer", "HAMMER"));
        template.disabled_effects.insert("vein".to_owned());

        assert_eq!(template.accepts_effect(&Effect::new("hammer", "HAMMER")), Err(EffectRefusal::AlreadyPresent));
        assert_eq!(template.accepts_effect(&Effect::new("vein", "VEIN_MINING")), Err(EffectRefusal::Disabled));
        assert!(template.accepts_effect(&Effect::new("smelt", "MELT_MINING")).is_ok());

        template.allow_additional_effects = false;
        assert_eq!(template.accepts_effect(&Effect::new("smelt", "MELT_MINING")), Err(EffectRefusal::NotAllowed));
    }

    #[test]
    fn restrictions_parse_station_names() {
        assert_eq!(ItemRestrictions::from("anvil"), ItemRestrictions::NO_ANVIL);
        assert_eq!(ItemRestrictions::from("*"), ItemRestrictions::all());
        assert!(ItemRestrictions::from("loom").is_empty());
    }
}
