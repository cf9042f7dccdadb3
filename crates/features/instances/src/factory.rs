use crate::codec;
use crate::error::InstanceError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};
use zitems_definitions::DefinitionStore;
use zitems_domain::effect::{Effect, EffectRefusal};
use zitems_domain::instance::{ItemInstance, Overrides};
use zitems_domain::item::{AttributeMap, AttributeValue, DisplayMeta, Enchantments, ItemRestrictions, ItemTemplate};
use zitems_domain::key::TemplateKey;

const MAX_ENCHANTMENT_LEVEL: u16 = 255;

/// Everything a host needs to render an instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub key: TemplateKey,
    pub amount: u16,
    pub display: DisplayMeta,
    pub attributes: AttributeMap,
    pub enchantments: Enchantments,
    pub effects: Vec<Effect>,
    pub restrictions: ItemRestrictions,
    pub max_stack_size: u16,
}

/// Creates instances from the active catalog.
#[derive(Debug, Clone)]
pub struct ItemFactory {
    store: DefinitionStore,
}

impl ItemFactory {
    #[must_use]
    pub const fn new(store: DefinitionStore) -> Self {
        Self { store }
    }

    /// A single item of `key`.
    ///
    /// # Errors
    /// See [`ItemFactory::create_stack`].
    pub fn create(&self, key: &str, overrides: Overrides) -> Result<ItemInstance, InstanceError> {
        self.create_stack(key, 1, overrides)
    }

    /// A stack of `amount` items of `key`.
    ///
    /// # Errors
    /// - [`InstanceError::UnknownTemplate`] when `key` is not in the catalog.
    /// - [`InstanceError::InvalidAmount`] when `amount` is outside `1..=max_stack_size`.
    /// - [`InstanceError::InvalidOverride`] when an override does not fit the attribute type.
    /// - [`InstanceError::EffectRefused`] when the template does not accept an added effect.
    pub fn create_stack(&self, key: &str, amount: u16, overrides: Overrides) -> Result<ItemInstance, InstanceError> {
        let template = self.template(key)?;
        if amount == 0 || amount > template.max_stack_size {
            return Err(InstanceError::InvalidAmount { amount, max: template.max_stack_size, context: None });
        }
        let overrides = self.check_overrides(&template, overrides)?;
        debug!(
            item = %template.key,
            amount,
            overrides = overrides.attributes.len() + overrides.enchantments.len(),
            effects = overrides.effects.len(),
            "Instance created"
        );
        Ok(ItemInstance { template: template.key.clone(), amount, overrides })
    }

    /// Looks the template up again and merges the instance's overrides onto it.
    ///
    /// # Errors
    /// Returns [`InstanceError::UnknownTemplate`] when the template was removed by a reload.
    pub fn materialize(&self, instance: &ItemInstance) -> Result<ItemView, InstanceError> {
        let template = self.template(instance.template.as_str())?;
        trace!(item = %template.key, "Materializing instance");
        Ok(ItemView {
            key: template.key.clone(),
            amount: instance.amount,
            display: template.display.clone(),
            attributes: instance.attributes(&template),
            enchantments: instance.enchantments(&template),
            effects: instance.effects(&template),
            restrictions: template.restrictions,
            max_stack_size: template.max_stack_size,
        })
    }

    /// # Errors
    /// See [`codec::serialize`].
    pub fn serialize(&self, instance: &ItemInstance) -> Result<Vec<u8>, InstanceError> {
        codec::serialize(instance)
    }

    /// # Errors
    /// See [`codec::deserialize`].
    pub fn deserialize(&self, bytes: &[u8]) -> Result<ItemInstance, InstanceError> {
        codec::deserialize(bytes)
    }

    fn template(&self, key: &str) -> Result<Arc<ItemTemplate>, InstanceError> {
        TemplateKey::parse(key)
            .and_then(|parsed| self.store.get(parsed.as_str()))
            .ok_or_else(|| InstanceError::UnknownTemplate { key: key.to_owned(), context: None })
    }

    /// Coerces override attributes to their declared type; the schema wins over the template.
    /// Added effects must have a known type and fit the template's effect policy.
    fn check_overrides(&self, template: &ItemTemplate, overrides: Overrides) -> Result<Overrides, InstanceError> {
        let schema = self.store.schema();
        let mut checked = Overrides { attributes: AttributeMap::new(), enchantments: overrides.enchantments, effects: Vec::new() };

        for (name, value) in overrides.attributes {
            let expected = schema.kind_of(&name).or_else(|| template.attribute(&name).map(|v| v.kind()));
            let value = match expected {
                Some(kind) => value.clone().coerce(kind).ok_or_else(|| InstanceError::InvalidOverride {
                    name: name.clone(),
                    message: format!("expected {kind}, got {} '{value}'", value.kind()),
                    context: None,
                })?,
                None if schema.strict => {
                    return Err(InstanceError::InvalidOverride {
                        name,
                        message: "attribute is not declared in the schema".to_owned(),
                        context: None,
                    });
                },
                None => value,
            };
            if let AttributeValue::Float(f) = &value
                && !f.is_finite()
            {
                return Err(InstanceError::InvalidOverride {
                    name,
                    message: format!("{f} is not a finite number"),
                    context: None,
                });
            }
            checked.attributes.insert(name, value);
        }

        if let Some((name, level)) =
            checked.enchantments.iter().find(|(_, level)| **level == 0 || **level > MAX_ENCHANTMENT_LEVEL)
        {
            return Err(InstanceError::InvalidOverride {
                name: name.clone(),
                message: format!("enchantment level must be between 1 and {MAX_ENCHANTMENT_LEVEL}, got {level}"),
                context: None,
            });
        }

        for mut effect in overrides.effects {
            effect.kind.make_ascii_uppercase();
            let refused = |reason: String| InstanceError::EffectRefused {
                effect: effect.id.clone(),
                item: template.key.to_string(),
                reason,
                context: None,
            };
            if !schema.knows_effect_type(&effect.kind) {
                return Err(refused(format!("unknown effect type '{}'", effect.kind)));
            }
            if checked.effects.iter().any(|added| added.id == effect.id) {
                return Err(refused(EffectRefusal::AlreadyPresent.to_string()));
            }
            template.accepts_effect(&effect).map_err(|refusal| refused(refusal.to_string()))?;
            checked.effects.push(effect);
        }
        Ok(checked)
    }
}
