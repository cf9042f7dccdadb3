//! Serde mirror of the definition file layout.
//!
//! ```toml
//! key = "ruby_sword"
//! base = "ruby_tool"
//! material = "DIAMOND_SWORD"
//! name = "Ruby Sword"
//! lore = ["Forged from rubies"]
//! max_stack_size = 1
//! default_decision = "deny"
//! restrictions = ["anvil"]
//! allow_additional_effects = true
//! disabled_effects = ["vein_miner"]
//!
//! [attributes]
//! damage = 9.5
//!
//! [enchantments]
//! sharpness = 5
//!
//! [[effects]]
//! id = "ruby_smelt"
//! type = "MELT_MINING"
//! settings = { chance = 0.5 }
//!
//! [constraints]
//! placement = ["outside_claims"]
//! worlds = ["world"]
//! job = { name = "miner", level = 10 }
//!
//! [recipe]
//! type = "shaped"
//! pattern = [" R ", " R ", " S "]
//! ingredients = { R = "item:ruby", S = "stick" }
//! ```

use crate::source::{Format, RawEntry};
use serde::Deserialize;
use std::collections::BTreeMap;
use zitems_domain::verdict::Decision;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawDefinition {
    pub key: Option<String>,
    pub base: Option<String>,
    pub material: Option<String>,
    pub name: Option<String>,
    pub lore: Option<Vec<String>>,
    pub custom_model_data: Option<i32>,
    pub max_stack_size: Option<i64>,
    pub default_decision: Option<Decision>,
    pub restrictions: Option<Vec<String>>,
    pub attributes: BTreeMap<String, RawAttribute>,
    pub enchantments: BTreeMap<String, i64>,
    pub effects: Option<Vec<RawEffect>>,
    pub allow_additional_effects: Option<bool>,
    pub disabled_effects: Option<Vec<String>>,
    pub constraints: Option<RawConstraints>,
    pub recipe: Option<RawRecipe>,
}

impl RawDefinition {
    /// Layers `self` over `base`: scalar fields and lists fall back to the base, maps are
    /// merged with the child's entries winning. Recipes are never inherited.
    pub fn inherit(&self, base: &Self) -> Self {
        let mut attributes = base.attributes.clone();
        attributes.extend(self.attributes.clone());
        let mut enchantments = base.enchantments.clone();
        enchantments.extend(self.enchantments.clone());

        Self {
            key: self.key.clone(),
            base: self.base.clone(),
            material: self.material.clone().or_else(|| base.material.clone()),
            name: self.name.clone().or_else(|| base.name.clone()),
            lore: self.lore.clone().or_else(|| base.lore.clone()),
            custom_model_data: self.custom_model_data.or(base.custom_model_data),
            max_stack_size: self.max_stack_size.or(base.max_stack_size),
            default_decision: self.default_decision.or(base.default_decision),
            restrictions: self.restrictions.clone().or_else(|| base.restrictions.clone()),
            attributes,
            enchantments,
            effects: self.effects.clone().or_else(|| base.effects.clone()),
            allow_additional_effects: self.allow_additional_effects.or(base.allow_additional_effects),
            disabled_effects: self.disabled_effects.clone().or_else(|| base.disabled_effects.clone()),
            constraints: self.constraints.clone().or_else(|| base.constraints.clone()),
            recipe: self.recipe.clone(),
        }
    }
}

/// Attribute literal; the variant follows the literal's type in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAttribute {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawEffect {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub settings: BTreeMap<String, RawAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawConstraints {
    pub placement: Vec<String>,
    pub worlds: Option<Vec<String>>,
    pub job: Option<RawJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawJob {
    pub name: String,
    pub level: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawRecipe {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub pattern: Vec<String>,
    pub ingredients: Option<RawIngredients>,
    pub amount: Option<i64>,
    pub group: Option<String>,
    pub category: Option<String>,
    pub cooking_time: Option<i64>,
    pub experience: Option<f64>,
    pub priority: Option<i32>,
}

/// A legend for shaped recipes, a list for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawIngredients {
    Legend(BTreeMap<String, String>),
    List(Vec<String>),
}

/// Parses an entry according to its format.
pub(crate) fn parse_entry(entry: &RawEntry) -> Result<RawDefinition, String> {
    let content = entry.content.as_deref().map_err(|e| format!("unreadable: {e}"))?;
    match entry.format {
        Format::Toml => toml::from_str(content).map_err(|e| e.message().to_owned()),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_definition_in_every_format() {
        let toml = RawEntry::new(
            "a.toml",
            Format::Toml,
            "key = \"ruby\"\nmaterial = \"REDSTONE\"\n[attributes]\nshine = 2\nrare = true\n",
        );
        let yaml = RawEntry::new(
            "a.yml",
            Format::Yaml,
            "key: ruby\nmaterial: REDSTONE\nattributes:\n  shine: 2\n  rare: true\n",
        );
        let json = RawEntry::new(
            "a.json",
            Format::Json,
            r#"{"key":"ruby","material":"REDSTONE","attributes":{"shine":2,"rare":true}}"#,
        );

        let parsed: Vec<_> = [toml, yaml, json].iter().map(|e| parse_entry(e).unwrap()).collect();
        assert_eq!(parsed[0], parsed[1]);
        assert_eq!(parsed[1], parsed[2]);
        assert_eq!(parsed[0].attributes.get("shine"), Some(&RawAttribute::Int(2)));
        assert_eq!(parsed[0].attributes.get("rare"), Some(&RawAttribute::Bool(true)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let entry = RawEntry::new("a.toml", Format::Toml, "key = \"a\"\nmaterail = \"STONE\"\n");
        let err = parse_entry(&entry).unwrap_err();
        assert!(err.contains("materail"), "{err}");
    }

    #[test]
    fn child_wins_over_base() {
        let base = RawDefinition {
            material: Some("IRON_SWORD".into()),
            name: Some("Base".into()),
            attributes: BTreeMap::from([
                ("damage".into(), RawAttribute::Int(5)),
                ("speed".into(), RawAttribute::Float(1.6)),
            ]),
            recipe: Some(RawRecipe::default()),
            effects: Some(vec![RawEffect { id: Some("smelt".into()), ..RawEffect::default() }]),
            allow_additional_effects: Some(false),
            ..RawDefinition::default()
        };
        let child = RawDefinition {
            key: Some("child".into()),
            name: Some("Child".into()),
            attributes: BTreeMap::from([("damage".into(), RawAttribute::Int(8))]),
            ..RawDefinition::default()
        };

        let merged = child.inherit(&base);
        assert_eq!(merged.material.as_deref(), Some("IRON_SWORD"));
        assert_eq!(merged.name.as_deref(), Some("Child"));
        assert_eq!(merged.attributes.get("damage"), Some(&RawAttribute::Int(8)));
        assert_eq!(merged.attributes.get("speed"), Some(&RawAttribute::Float(1.6)));
        assert!(merged.recipe.is_none());
        assert_eq!(merged.effects.as_ref().map(Vec::len), Some(1));
        assert_eq!(merged.allow_additional_effects, Some(false));
    }

    #[test]
    fn effects_parse_from_array_tables() {
        let entry = RawEntry::new(
            "a.toml",
            Format::Toml,
            "key = \"pick\"\n[[effects]]\nid = \"hammer\"\ntype = \"HAMMER\"\nsettings = { radius = 1 }\n",
        );
        let raw = parse_entry(&entry).unwrap();
        let effects = raw.effects.unwrap();
        assert_eq!(effects[0].kind.as_deref(), Some("HAMMER"));
        assert_eq!(effects[0].settings.get("radius"), Some(&RawAttribute::Int(1)));
    }
}
