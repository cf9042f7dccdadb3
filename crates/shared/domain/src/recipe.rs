use crate::key::TemplateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Recipe families understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeKind {
    Shaped,
    Shapeless,
    Furnace,
    Blasting,
    Smoking,
    Campfire,
    Stonecutting,
}

impl RecipeKind {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "shaped" | "crafting_shaped" => Self::Shaped,
            "shapeless" | "crafting_shapeless" => Self::Shapeless,
            "furnace" => Self::Furnace,
            "blasting" => Self::Blasting,
            "smoking" => Self::Smoking,
            "campfire" | "campfire_cooking" => Self::Campfire,
            "stonecutting" => Self::Stonecutting,
            _ => return None,
        })
    }

    /// Cooking recipes take one input and a cooking time.
    #[must_use]
    pub const fn is_cooking(self) -> bool {
        matches!(self, Self::Furnace | Self::Blasting | Self::Smoking | Self::Campfire)
    }

    /// Default cooking time in ticks, matching vanilla values.
    #[must_use]
    pub const fn default_cooking_time(self) -> u32 {
        match self {
            Self::Furnace => 200,
            Self::Blasting | Self::Smoking => 100,
            Self::Campfire => 600,
            Self::Shaped | Self::Shapeless | Self::Stonecutting => 0,
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shaped => "shaped",
            Self::Shapeless => "shapeless",
            Self::Furnace => "furnace",
            Self::Blasting => "blasting",
            Self::Smoking => "smoking",
            Self::Campfire => "campfire",
            Self::Stonecutting => "stonecutting",
        })
    }
}

/// One recipe input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    /// A vanilla material, stored lower-case.
    Material(String),
    /// A material tag such as `logs`.
    Tag(String),
    /// Another zItems template.
    Item(TemplateKey),
}

impl Ingredient {
    /// Parses `item:<key>`, `tag:<id>`, `material:<id>` or a bare material id.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (prefix, id) = raw.split_once(':').unwrap_or(("material", raw));
        if id.is_empty() {
            return None;
        }
        match prefix {
            "material" | "minecraft" => Some(Self::Material(id.to_ascii_lowercase())),
            "tag" => Some(Self::Tag(id.to_ascii_lowercase())),
            "item" | "zitems" => TemplateKey::parse(id).map(Self::Item),
            _ => None,
        }
    }

    #[must_use]
    pub const fn item_key(&self) -> Option<&TemplateKey> {
        match self {
            Self::Item(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material(id) => write!(f, "material:{id}"),
            Self::Tag(id) => write!(f, "tag:{id}"),
            Self::Item(key) => write!(f, "item:{key}"),
        }
    }
}

/// Recipe data as declared by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDefinition {
    pub kind: RecipeKind,
    /// Rows of legend characters for shaped recipes; a space is an empty slot.
    pub pattern: Vec<String>,
    pub legend: BTreeMap<char, Ingredient>,
    /// Inputs for shapeless, cooking and stonecutting recipes.
    pub ingredients: Vec<Ingredient>,
    pub amount: u16,
    pub group: Option<String>,
    pub category: Option<String>,
    pub cooking_time: Option<u32>,
    pub experience: Option<f32>,
    pub priority: i32,
}

impl RecipeDefinition {
    /// Every template referenced through `item:` inputs.
    pub fn referenced_items(&self) -> impl Iterator<Item = &TemplateKey> {
        self.legend.values().chain(self.ingredients.iter()).filter_map(Ingredient::item_key)
    }
}
