use crate::effect::Effect;
use crate::item::{AttributeMap, AttributeValue, Enchantments, ItemTemplate};
use crate::key::TemplateKey;
use serde::{Deserialize, Serialize};

/// Per-instance values that win over the template's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub attributes: AttributeMap,
    pub enchantments: Enchantments,
    /// Effects added on top of the template's, in the order they were applied.
    pub effects: Vec<Effect>,
}

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_enchantment(mut self, name: impl Into<String>, level: u16) -> Self {
        self.enchantments.insert(name.into(), level);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.enchantments.is_empty() && self.effects.is_empty()
    }
}

/// A concrete item bound to a template by key.
///
/// The instance does not own its template; hosts persist it as opaque bytes and look the
/// template up again when they need display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub template: TemplateKey,
    pub amount: u16,
    pub overrides: Overrides,
}

impl ItemInstance {
    #[must_use]
    pub const fn template_key(&self) -> &TemplateKey {
        &self.template
    }

    /// The template's attributes with this instance's overrides on top.
    #[must_use]
    pub fn attributes(&self, template: &ItemTemplate) -> AttributeMap {
        let mut merged = template.attributes.clone();
        merged.extend(self.overrides.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    #[must_use]
    pub fn enchantments(&self, template: &ItemTemplate) -> Enchantments {
        let mut merged = template.enchantments.clone();
        merged.extend(self.overrides.enchantments.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    /// The template's effects followed by the ones added to this instance.
    #[must_use]
    pub fn effects(&self, template: &ItemTemplate) -> Vec<Effect> {
        template.effects.iter().chain(&self.overrides.effects).cloned().collect()
    }
}
