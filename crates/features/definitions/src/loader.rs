//! Turns raw entries into a validated [`Catalog`], collecting every issue on the way.

use crate::catalog::Catalog;
use crate::error::{DefinitionError, Issue, IssueKind};
use crate::raw::{RawAttribute, RawConstraints, RawDefinition, RawEffect, RawIngredients, RawRecipe, parse_entry};
use crate::source::{DefinitionSource, RawEntry};
use fxhash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use zitems_domain::config::AttributeSchema;
use zitems_domain::constants::{DEFAULT_STACK_SIZE, MAX_STACK_SIZE};
use zitems_domain::constraints::{JobRequirement, PlacementConstraints, PlacementFlags};
use zitems_domain::effect::Effect;
use zitems_domain::item::{AttributeMap, AttributeValue, DisplayMeta, Enchantments, ItemRestrictions, ItemTemplate};
use zitems_domain::key::TemplateKey;
use zitems_domain::recipe::{Ingredient, RecipeDefinition, RecipeKind};

const MAX_ENCHANTMENT_LEVEL: i64 = 255;
const MAX_RECIPE_AMOUNT: i64 = 64;

/// Reads `source` and validates every entry against `schema`.
///
/// # Errors
/// Returns [`DefinitionError::Validation`] listing every malformed entry, or a source
/// error when the source itself cannot be read.
pub fn load(source: &dyn DefinitionSource, schema: &AttributeSchema) -> Result<Catalog, DefinitionError> {
    let entries = source.read()?;
    let catalog = load_entries(&entries, schema)?;
    info!(source = %source.describe(), templates = catalog.len(), "Loaded item definitions");
    Ok(catalog)
}

/// Validates already-read entries.
///
/// # Errors
/// Returns [`DefinitionError::Validation`] with all issues when any entry is invalid.
pub fn load_entries(entries: &[RawEntry], schema: &AttributeSchema) -> Result<Catalog, DefinitionError> {
    let mut issues = Vec::new();

    // 1. syntax and keys
    let mut parsed: Vec<(&RawEntry, TemplateKey, RawDefinition)> = Vec::with_capacity(entries.len());
    let mut seen: FxHashMap<TemplateKey, &str> = FxHashMap::default();
    for entry in entries {
        let raw = match parse_entry(entry) {
            Ok(raw) => raw,
            Err(message) => {
                issues.push(Issue::new(&entry.origin, None, IssueKind::Syntax, message));
                continue;
            },
        };
        let Some(raw_key) = raw.key.as_deref() else {
            issues.push(Issue::new(&entry.origin, None, IssueKind::MissingField, "missing required field 'key'"));
            continue;
        };
        let Some(key) = TemplateKey::parse(raw_key) else {
            issues.push(Issue::new(
                &entry.origin,
                Some(raw_key),
                IssueKind::InvalidField,
                format!("'{raw_key}' is not a valid key (lower-case letters, digits, '_', '-', '.', '/')"),
            ));
            continue;
        };
        if let Some(first) = seen.get(&key) {
            issues.push(Issue::new(
                &entry.origin,
                Some(raw_key),
                IssueKind::DuplicateKey,
                format!("duplicate key '{key}', already defined in {first}"),
            ));
            continue;
        }
        seen.insert(key.clone(), &entry.origin);
        parsed.push((entry, key, raw));
    }

    // 2. inheritance
    let by_key: FxHashMap<&TemplateKey, &RawDefinition> = parsed.iter().map(|(_, key, raw)| (key, raw)).collect();
    let mut resolved = Vec::with_capacity(parsed.len());
    for (entry, key, raw) in &parsed {
        match resolve_inheritance(key, raw, &by_key) {
            Ok(merged) => resolved.push((*entry, key.clone(), merged)),
            Err((kind, message)) => issues.push(Issue::new(&entry.origin, Some(key.as_str()), kind, message)),
        }
    }

    // 3. field validation
    let mut templates = Vec::with_capacity(resolved.len());
    for (entry, key, raw) in resolved {
        let mut ctx = EntryContext { entry, key: &key, issues: &mut issues };
        if let Some(template) = build_template(&mut ctx, &raw, schema) {
            templates.push(template);
        }
    }

    // 4. cross references
    for template in &templates {
        let Some(recipe) = &template.recipe else { continue };
        for reference in recipe.referenced_items() {
            if !seen.contains_key(reference) {
                issues.push(Issue::new(
                    &template.origin,
                    Some(template.key.as_str()),
                    IssueKind::UnknownReference,
                    format!("recipe ingredient references unknown item '{reference}'"),
                ));
            }
        }
    }

    if !issues.is_empty() {
        debug!(issues = issues.len(), "Definition validation failed");
        return Err(DefinitionError::Validation { issues, context: None });
    }

    Ok(Catalog::new(templates))
}

/// Follows the `base` chain of one definition and layers it from the root down.
fn resolve_inheritance(
    key: &TemplateKey,
    raw: &RawDefinition,
    by_key: &FxHashMap<&TemplateKey, &RawDefinition>,
) -> Result<RawDefinition, (IssueKind, String)> {
    let mut chain = vec![raw];
    let mut visited: FxHashSet<TemplateKey> = FxHashSet::default();
    visited.insert(key.clone());
    let mut path = vec![key.to_string()];

    let mut current = raw;
    while let Some(base) = current.base.as_deref() {
        let Some(base_key) = TemplateKey::parse(base) else {
            return Err((IssueKind::UnknownReference, format!("base '{base}' is not a known item")));
        };
        path.push(base_key.to_string());
        if !visited.insert(base_key.clone()) {
            return Err((IssueKind::InheritanceCycle, format!("inheritance cycle: {}", path.join(" -> "))));
        }
        let Some(parent) = by_key.get(&base_key).copied() else {
            return Err((IssueKind::UnknownReference, format!("base '{base}' is not a known item")));
        };
        chain.push(parent);
        current = parent;
    }

    let mut chain = chain.into_iter().rev();
    let root = chain.next().cloned().unwrap_or_default();
    Ok(chain.fold(root, |acc, child| child.inherit(&acc)))
}

struct EntryContext<'a> {
    entry: &'a RawEntry,
    key: &'a TemplateKey,
    issues: &'a mut Vec<Issue>,
}

impl EntryContext<'_> {
    fn report(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(Issue::new(&self.entry.origin, Some(self.key.as_str()), kind, message));
    }
}

fn build_template(ctx: &mut EntryContext<'_>, raw: &RawDefinition, schema: &AttributeSchema) -> Option<ItemTemplate> {
    let before = ctx.issues.len();

    let material = match raw.material.as_deref().map(str::trim) {
        Some(material) if !material.is_empty() => material.to_ascii_uppercase(),
        Some(_) => {
            ctx.report(IssueKind::InvalidField, "field 'material' is empty");
            String::new()
        },
        None => {
            ctx.report(IssueKind::MissingField, "missing required field 'material'");
            String::new()
        },
    };

    let max_stack_size = match raw.max_stack_size {
        None => DEFAULT_STACK_SIZE,
        Some(size) => u16::try_from(size).ok().filter(|s| (1..=MAX_STACK_SIZE).contains(s)).unwrap_or_else(|| {
            ctx.report(IssueKind::InvalidField, format!("max_stack_size must be between 1 and {MAX_STACK_SIZE}, got {size}"));
            DEFAULT_STACK_SIZE
        }),
    };

    let restrictions = build_restrictions(ctx, raw.restrictions.as_deref().unwrap_or_default());
    let attributes = build_attributes(ctx, &raw.attributes, schema);
    let enchantments = build_enchantments(ctx, &raw.enchantments);
    let effects = build_effects(ctx, raw.effects.as_deref().unwrap_or_default(), schema);
    let disabled_effects = build_disabled_effects(ctx, raw.disabled_effects.as_deref().unwrap_or_default());
    let constraints = raw.constraints.as_ref().map(|c| build_constraints(ctx, c)).unwrap_or_default();
    let recipe = raw.recipe.as_ref().and_then(|r| build_recipe(ctx, r));

    if ctx.issues.len() != before {
        return None;
    }

    Some(ItemTemplate {
        key: ctx.key.clone(),
        display: DisplayMeta {
            material,
            name: raw.name.clone(),
            lore: raw.lore.clone().unwrap_or_default(),
            custom_model_data: raw.custom_model_data,
        },
        attributes,
        enchantments,
        effects,
        allow_additional_effects: raw.allow_additional_effects.unwrap_or(true),
        disabled_effects,
        constraints,
        default_decision: raw.default_decision,
        restrictions,
        max_stack_size,
        recipe,
        base: raw.base.as_deref().and_then(TemplateKey::parse),
        folder: ctx.entry.folder.clone(),
        origin: ctx.entry.origin.clone(),
    })
}

fn build_restrictions(ctx: &mut EntryContext<'_>, names: &[String]) -> ItemRestrictions {
    names.iter().fold(ItemRestrictions::empty(), |acc, name| {
        let flag = ItemRestrictions::from(name.to_ascii_lowercase().as_str());
        if flag.is_empty() {
            ctx.report(IssueKind::InvalidField, format!("unknown restriction '{name}'"));
        }
        acc | flag
    })
}

fn build_attributes(
    ctx: &mut EntryContext<'_>,
    raw: &BTreeMap<String, RawAttribute>,
    schema: &AttributeSchema,
) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    for (name, value) in raw {
        let value = match value {
            RawAttribute::Bool(v) => AttributeValue::Bool(*v),
            RawAttribute::Int(v) => AttributeValue::Int(*v),
            RawAttribute::Float(v) if v.is_finite() => AttributeValue::Float(*v),
            RawAttribute::Float(v) => {
                ctx.report(IssueKind::InvalidField, format!("attribute '{name}' is not a finite number ({v})"));
                continue;
            },
            RawAttribute::Text(v) => AttributeValue::Text(v.clone()),
        };

        match schema.kind_of(name) {
            Some(kind) => match value.clone().coerce(kind) {
                Some(coerced) => {
                    attributes.insert(name.clone(), coerced);
                },
                None => ctx.report(
                    IssueKind::AttributeType,
                    format!("attribute '{name}' must be {kind}, got {} '{value}'", value.kind()),
                ),
            },
            None if schema.strict => {
                ctx.report(IssueKind::AttributeType, format!("attribute '{name}' is not declared in the schema"));
            },
            None => {
                attributes.insert(name.clone(), value);
            },
        }
    }
    attributes
}

fn build_enchantments(ctx: &mut EntryContext<'_>, raw: &BTreeMap<String, i64>) -> Enchantments {
    let mut enchantments = Enchantments::new();
    for (name, level) in raw {
        match u16::try_from(*level) {
            Ok(lvl) if (1..=MAX_ENCHANTMENT_LEVEL).contains(level) => {
                enchantments.insert(name.to_ascii_lowercase(), lvl);
            },
            _ => ctx.report(
                IssueKind::InvalidField,
                format!("enchantment '{name}' level must be between 1 and {MAX_ENCHANTMENT_LEVEL}, got {level}"),
            ),
        }
    }
    enchantments
}

fn build_effects(ctx: &mut EntryContext<'_>, raw: &[RawEffect], schema: &AttributeSchema) -> Vec<Effect> {
    let mut effects: Vec<Effect> = Vec::with_capacity(raw.len());
    for (index, entry) in raw.iter().enumerate() {
        let (Some(id), Some(kind)) = (entry.id.as_deref(), entry.kind.as_deref()) else {
            ctx.report(IssueKind::MissingField, format!("effect #{} needs both 'id' and 'type'", index + 1));
            continue;
        };
        if !Effect::is_valid_id(id) {
            ctx.report(IssueKind::InvalidField, format!("'{id}' is not a valid effect id (lower-case letters, digits, '_', '-', '.')"));
            continue;
        }
        if effects.iter().any(|effect| effect.id == id) {
            ctx.report(IssueKind::InvalidField, format!("effect '{id}' is declared twice"));
            continue;
        }

        let mut effect = Effect::new(id, kind);
        if !schema.knows_effect_type(&effect.kind) {
            ctx.report(IssueKind::UnknownReference, format!("effect '{id}' has unknown type '{kind}'"));
            continue;
        }
        for (name, value) in &entry.settings {
            match value {
                RawAttribute::Bool(v) => effect.settings.insert(name.clone(), AttributeValue::Bool(*v)),
                RawAttribute::Int(v) => effect.settings.insert(name.clone(), AttributeValue::Int(*v)),
                RawAttribute::Float(v) if v.is_finite() => effect.settings.insert(name.clone(), AttributeValue::Float(*v)),
                RawAttribute::Float(v) => {
                    ctx.report(IssueKind::InvalidField, format!("effect '{id}' setting '{name}' is not a finite number ({v})"));
                    continue;
                },
                RawAttribute::Text(v) => effect.settings.insert(name.clone(), AttributeValue::Text(v.clone())),
            };
        }
        effects.push(effect);
    }
    effects
}

fn build_disabled_effects(ctx: &mut EntryContext<'_>, raw: &[String]) -> BTreeSet<String> {
    let mut disabled = BTreeSet::new();
    for id in raw {
        if Effect::is_valid_id(id) {
            disabled.insert(id.clone());
        } else {
            ctx.report(IssueKind::InvalidField, format!("disabled effect '{id}' is not a valid effect id"));
        }
    }
    disabled
}

fn build_constraints(ctx: &mut EntryContext<'_>, raw: &RawConstraints) -> PlacementConstraints {
    let mut flags = PlacementFlags::empty();
    for name in &raw.placement {
        match PlacementFlags::parse(&name.to_ascii_lowercase()) {
            Some(flag) => flags |= flag,
            None => ctx.report(IssueKind::InvalidField, format!("unknown placement constraint '{name}'")),
        }
    }

    let required_job = raw.job.as_ref().and_then(|job| {
        if job.name.trim().is_empty() {
            ctx.report(IssueKind::InvalidField, "job requirement has an empty name");
            return None;
        }
        match u32::try_from(job.level) {
            Ok(min_level) => Some(JobRequirement { job: job.name.to_ascii_lowercase(), min_level }),
            Err(_) => {
                ctx.report(IssueKind::InvalidField, format!("job level must not be negative, got {}", job.level));
                None
            },
        }
    });

    let worlds = raw.worlds.as_ref().map(|worlds| worlds.iter().cloned().collect::<BTreeSet<_>>());
    if worlds.as_ref().is_some_and(BTreeSet::is_empty) {
        ctx.report(IssueKind::InvalidField, "constraint 'worlds' is empty; omit it to allow every world");
    }

    PlacementConstraints { flags, required_job, worlds }
}

fn parse_ingredient(ctx: &mut EntryContext<'_>, raw: &str) -> Option<Ingredient> {
    let parsed = Ingredient::parse(raw);
    if parsed.is_none() {
        ctx.report(IssueKind::Recipe, format!("invalid ingredient '{raw}'"));
    }
    parsed
}

fn build_recipe(ctx: &mut EntryContext<'_>, raw: &RawRecipe) -> Option<RecipeDefinition> {
    let before = ctx.issues.len();

    let Some(kind) = raw.kind.as_deref().and_then(RecipeKind::parse) else {
        let got = raw.kind.as_deref().unwrap_or("nothing");
        ctx.report(IssueKind::Recipe, format!("recipe 'type' must be a known recipe kind, got {got}"));
        return None;
    };

    let mut pattern = Vec::new();
    let mut legend = BTreeMap::new();
    let mut ingredients = Vec::new();

    match (kind, &raw.ingredients) {
        (RecipeKind::Shaped, Some(RawIngredients::Legend(map))) => {
            if raw.pattern.is_empty() || raw.pattern.len() > 3 {
                ctx.report(IssueKind::Recipe, "shaped recipe pattern must have 1 to 3 rows");
            }
            for row in &raw.pattern {
                if row.is_empty() || row.chars().count() > 3 {
                    ctx.report(IssueKind::Recipe, format!("pattern row '{row}' must have 1 to 3 columns"));
                }
            }
            for (symbol, value) in map {
                let mut chars = symbol.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != ' ' => {
                        if let Some(ingredient) = parse_ingredient(ctx, value) {
                            legend.insert(c, ingredient);
                        }
                    },
                    _ => ctx.report(IssueKind::Recipe, format!("legend key '{symbol}' must be one non-space character")),
                }
            }
            let used: BTreeSet<char> = raw.pattern.iter().flat_map(|row| row.chars()).filter(|c| *c != ' ').collect();
            if used.is_empty() {
                ctx.report(IssueKind::Recipe, "shaped recipe pattern is empty");
            }
            for symbol in used {
                if !map.contains_key(symbol.to_string().as_str()) {
                    ctx.report(IssueKind::Recipe, format!("pattern symbol '{symbol}' has no ingredient"));
                }
            }
            pattern.clone_from(&raw.pattern);
        },
        (RecipeKind::Shaped, _) => {
            ctx.report(IssueKind::Recipe, "shaped recipe needs an ingredient legend");
        },
        (_, Some(RawIngredients::List(list))) => {
            let expected = if kind == RecipeKind::Shapeless { 1..=9 } else { 1..=1 };
            if !expected.contains(&list.len()) {
                ctx.report(
                    IssueKind::Recipe,
                    format!("{kind} recipe takes {} to {} ingredients, got {}", expected.start(), expected.end(), list.len()),
                );
            }
            ingredients = list.iter().filter_map(|item| parse_ingredient(ctx, item)).collect();
        },
        (_, _) => {
            ctx.report(IssueKind::Recipe, format!("{kind} recipe needs an ingredient list"));
        },
    }

    let amount = match raw.amount {
        None => 1,
        Some(amount) => u16::try_from(amount).ok().filter(|a| (1..=MAX_RECIPE_AMOUNT).contains(&i64::from(*a))).unwrap_or_else(|| {
            ctx.report(IssueKind::Recipe, format!("recipe amount must be between 1 and {MAX_RECIPE_AMOUNT}, got {amount}"));
            1
        }),
    };

    let cooking_time = match (kind.is_cooking(), raw.cooking_time) {
        (true, None) => Some(kind.default_cooking_time()),
        (true, Some(ticks)) => u32::try_from(ticks).ok().filter(|t| *t > 0).or_else(|| {
            ctx.report(IssueKind::Recipe, format!("cooking_time must be positive, got {ticks}"));
            None
        }),
        (false, Some(_)) => {
            ctx.report(IssueKind::Recipe, format!("{kind} recipe does not take a cooking_time"));
            None
        },
        (false, None) => None,
    };

    #[allow(clippy::cast_possible_truncation)]
    let experience = match raw.experience {
        Some(xp) if xp.is_finite() && xp >= 0.0 => Some(xp as f32),
        Some(xp) => {
            ctx.report(IssueKind::Recipe, format!("experience must be a non-negative number, got {xp}"));
            None
        },
        None => None,
    };

    if ctx.issues.len() != before {
        return None;
    }

    Some(RecipeDefinition {
        kind,
        pattern,
        legend,
        ingredients,
        amount,
        group: raw.group.clone(),
        category: raw.category.clone(),
        cooking_time,
        experience,
        priority: raw.priority.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Format;
    use zitems_domain::item::AttributeKind;

    fn entry(origin: &str, toml: &str) -> RawEntry {
        RawEntry::new(origin, Format::Toml, toml)
    }

    fn issues_of(entries: &[RawEntry], schema: &AttributeSchema) -> Vec<Issue> {
        load_entries(entries, schema).unwrap_err().issues().to_vec()
    }

    #[test]
    fn minimal_definition_loads_with_defaults() {
        let catalog = load_entries(&[entry("a", "key = \"ruby\"\nmaterial = \"redstone\"")], &AttributeSchema::default())
            .unwrap();
        let ruby = catalog.get("ruby").unwrap();
        assert_eq!(ruby.display.material, "REDSTONE");
        assert_eq!(ruby.max_stack_size, DEFAULT_STACK_SIZE);
        assert!(ruby.recipe.is_none());
        assert!(ruby.default_decision.is_none());
    }

    #[test]
    fn every_problem_is_reported() {
        let entries = [
            entry("no_key", "material = \"STONE\""),
            entry("bad_syntax", "key = "),
            entry("no_material", "key = \"x\""),
            entry("dup1", "key = \"dup\"\nmaterial = \"STONE\""),
            entry("dup2", "key = \"dup\"\nmaterial = \"STONE\""),
        ];
        let issues = issues_of(&entries, &AttributeSchema::default());
        let kinds: Vec<_> = issues.iter().map(|i| (i.origin.as_str(), i.kind)).collect();
        assert_eq!(
            kinds,
            [
                ("no_key", IssueKind::MissingField),
                ("bad_syntax", IssueKind::Syntax),
                ("dup2", IssueKind::DuplicateKey),
                ("no_material", IssueKind::MissingField),
            ]
        );
        assert!(issues[2].message.contains("dup1"), "duplicate names the first origin");
    }

    #[test]
    fn schema_types_are_enforced() {
        let schema = AttributeSchema::default()
            .declare("damage", AttributeKind::Float)
            .declare("soulbound", AttributeKind::Bool);
        let ok = entry("ok", "key = \"a\"\nmaterial = \"STONE\"\n[attributes]\ndamage = 7\nsoulbound = true");
        let bad = entry("bad", "key = \"b\"\nmaterial = \"STONE\"\n[attributes]\ndamage = \"high\"");

        let catalog = load_entries(std::slice::from_ref(&ok), &schema).unwrap();
        assert_eq!(catalog.get("a").unwrap().attribute("damage"), Some(&AttributeValue::Float(7.0)));

        let issues = issues_of(&[ok, bad], &schema);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::AttributeType);
        assert_eq!(issues[0].key.as_deref(), Some("b"));
    }

    #[test]
    fn strict_schema_rejects_undeclared_attributes() {
        let schema = AttributeSchema::default().strict(true);
        let issues = issues_of(&[entry("a", "key = \"a\"\nmaterial = \"STONE\"\n[attributes]\nmystery = 1")], &schema);
        assert_eq!(issues[0].kind, IssueKind::AttributeType);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let issues = issues_of(
            &[entry("a", "key = \"a\"\nmaterial = \"STONE\"\n[attributes]\nspeed = nan")],
            &AttributeSchema::default(),
        );
        assert_eq!(issues[0].kind, IssueKind::InvalidField);
    }

    #[test]
    fn inheritance_layers_base_fields() {
        let entries = [
            entry("base", "key = \"tool\"\nmaterial = \"IRON_PICKAXE\"\nmax_stack_size = 1\n[attributes]\nspeed = 1.0\ntier = 1"),
            entry("child", "key = \"ruby_pick\"\nbase = \"tool\"\nname = \"Ruby Pick\"\n[attributes]\ntier = 3"),
        ];
        let catalog = load_entries(&entries, &AttributeSchema::default()).unwrap();
        let child = catalog.get("ruby_pick").unwrap();
        assert_eq!(child.display.material, "IRON_PICKAXE");
        assert_eq!(child.max_stack_size, 1);
        assert_eq!(child.attribute("tier"), Some(&AttributeValue::Int(3)));
        assert_eq!(child.attribute("speed"), Some(&AttributeValue::Float(1.0)));
        assert_eq!(child.base.as_ref().map(TemplateKey::as_str), Some("tool"));
    }

    #[test]
    fn inheritance_cycles_and_unknown_bases_are_reported() {
        let entries = [
            entry("a", "key = \"a\"\nbase = \"b\"\nmaterial = \"STONE\""),
            entry("b", "key = \"b\"\nbase = \"a\"\nmaterial = \"STONE\""),
            entry("c", "key = \"c\"\nbase = \"ghost\"\nmaterial = \"STONE\""),
        ];
        let issues = issues_of(&entries, &AttributeSchema::default());
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].kind, IssueKind::InheritanceCycle);
        assert_eq!(issues[0].message, "inheritance cycle: a -> b -> a");
        assert_eq!(issues[2].kind, IssueKind::UnknownReference);
    }

    #[test]
    fn effects_are_validated_and_inherited() {
        let tool = entry(
            "tool",
            "key = \"tool\"\nmaterial = \"IRON_PICKAXE\"\nallow_additional_effects = false\n[[effects]]\nid = \"smelt\"\ntype = \"melt_mining\"\nsettings = { chance = 0.5 }",
        );
        let pick = entry("pick", "key = \"pick\"\nbase = \"tool\"\ndisabled_effects = [\"vein\"]");
        let catalog = load_entries(&[tool, pick], &AttributeSchema::default()).unwrap();

        let pick = catalog.get("pick").unwrap();
        assert_eq!(pick.effects.len(), 1);
        assert_eq!(pick.effects[0].kind, "MELT_MINING");
        assert_eq!(pick.effects[0].settings.get("chance"), Some(&AttributeValue::Float(0.5)));
        assert!(!pick.allow_additional_effects);
        assert!(pick.disabled_effects.contains("vein"));
        assert!(catalog.get("tool").unwrap().disabled_effects.is_empty());
    }

    #[test]
    fn broken_effects_are_reported() {
        let broken = entry(
            "broken",
            "key = \"broken\"\nmaterial = \"STONE\"\ndisabled_effects = [\"Bad Id\"]\n\
             [[effects]]\ntype = \"HAMMER\"\n\
             [[effects]]\nid = \"boom\"\ntype = \"LIGHTNING\"\n\
             [[effects]]\nid = \"hammer\"\ntype = \"HAMMER\"\n\
             [[effects]]\nid = \"hammer\"\ntype = \"HAMMER\"",
        );
        let issues = issues_of(&[broken], &AttributeSchema::default());
        let kinds: Vec<IssueKind> = issues.iter().map(|issue| issue.kind).collect();
        assert_eq!(
            kinds,
            [IssueKind::MissingField, IssueKind::UnknownReference, IssueKind::InvalidField, IssueKind::InvalidField]
        );
        assert!(issues[1].message.contains("LIGHTNING"));

        let schema = AttributeSchema::default().declare_effect_type("lightning");
        let fixed = entry("fixed", "key = \"fixed\"\nmaterial = \"STONE\"\n[[effects]]\nid = \"boom\"\ntype = \"LIGHTNING\"");
        assert_eq!(load_entries(&[fixed], &schema).unwrap().get("fixed").unwrap().effects[0].kind, "LIGHTNING");
    }

    #[test]
    fn namespaced_keys_bases_and_ingredients_are_accepted() {
        let entries = [
            entry("tool", "key = \"zitems:tool\"\nmaterial = \"IRON_PICKAXE\""),
            entry("ruby", "key = \"ruby\"\nmaterial = \"REDSTONE\""),
            entry(
                "pick",
                "key = \"ruby_pick\"\nbase = \"zitems:tool\"\n[recipe]\ntype = \"shapeless\"\ningredients = [\"item:zitems:ruby\", \"stick\"]",
            ),
        ];
        let catalog = load_entries(&entries, &AttributeSchema::default()).unwrap();
        assert!(catalog.contains("tool"));

        let pick = catalog.get("ruby_pick").unwrap();
        assert_eq!(pick.display.material, "IRON_PICKAXE");
        assert_eq!(pick.base.as_ref().map(TemplateKey::as_str), Some("tool"));
        let recipe = pick.recipe.as_ref().unwrap();
        assert!(recipe.ingredients.contains(&Ingredient::Item(TemplateKey::parse("ruby").unwrap())));
    }

    #[test]
    fn namespaced_duplicate_is_still_a_duplicate() {
        let entries = [
            entry("a", "key = \"ruby\"\nmaterial = \"REDSTONE\""),
            entry("b", "key = \"zitems:ruby\"\nmaterial = \"REDSTONE\""),
        ];
        let issues = issues_of(&entries, &AttributeSchema::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DuplicateKey);
    }

    #[test]
    fn shaped_recipe_is_validated_and_references_checked() {
        let good = entry(
            "sword",
            "key = \"ruby_sword\"\nmaterial = \"DIAMOND_SWORD\"\n[recipe]\ntype = \"shaped\"\npattern = [\"R\", \"R\", \"S\"]\ningredients = { R = \"item:ruby\", S = \"stick\" }",
        );
        let ruby = entry("ruby", "key = \"ruby\"\nmaterial = \"REDSTONE\"");

        let catalog = load_entries(&[good.clone(), ruby], &AttributeSchema::default()).unwrap();
        let recipe = catalog.get("ruby_sword").unwrap().recipe.clone().unwrap();
        assert_eq!(recipe.kind, RecipeKind::Shaped);
        assert_eq!(recipe.legend.get(&'S'), Some(&Ingredient::Material("stick".into())));
        assert_eq!(recipe.amount, 1);

        let issues = issues_of(&[good], &AttributeSchema::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnknownReference);
    }

    #[test]
    fn malformed_recipes_are_reported() {
        let entries = [
            entry("a", "key = \"a\"\nmaterial = \"STONE\"\n[recipe]\ntype = \"shaped\"\npattern = [\"XY\"]\ningredients = { X = \"stone\" }"),
            entry("b", "key = \"b\"\nmaterial = \"STONE\"\n[recipe]\ntype = \"furnace\"\ningredients = [\"iron_ore\", \"gold_ore\"]"),
            entry("c", "key = \"c\"\nmaterial = \"STONE\"\n[recipe]\ntype = \"weaving\"\ningredients = [\"string\"]"),
            entry("d", "key = \"d\"\nmaterial = \"STONE\"\n[recipe]\ntype = \"shapeless\"\ningredients = [\"stone\"]\ncooking_time = 20"),
        ];
        let issues = issues_of(&entries, &AttributeSchema::default());
        let origins: Vec<_> = issues.iter().map(|i| i.origin.as_str()).collect();
        assert_eq!(origins, ["a", "b", "c", "d"]);
        assert!(issues.iter().all(|i| i.kind == IssueKind::Recipe));
    }

    #[test]
    fn cooking_recipes_get_default_time() {
        let catalog = load_entries(
            &[entry("a", "key = \"a\"\nmaterial = \"STONE\"\n[recipe]\ntype = \"blasting\"\ningredients = [\"tag:ores\"]\nexperience = 0.7")],
            &AttributeSchema::default(),
        )
        .unwrap();
        let recipe = catalog.get("a").unwrap().recipe.clone().unwrap();
        assert_eq!(recipe.cooking_time, Some(100));
        assert_eq!(recipe.ingredients, [Ingredient::Tag("ores".into())]);
    }

    #[test]
    fn constraints_and_restrictions_are_parsed() {
        let catalog = load_entries(
            &[entry(
                "a",
                "key = \"a\"\nmaterial = \"BEACON\"\nrestrictions = [\"anvil\", \"Grindstone\"]\n[constraints]\nplacement = [\"outside_claims\"]\nworlds = [\"world\"]\njob = { name = \"Miner\", level = 10 }",
            )],
            &AttributeSchema::default(),
        )
        .unwrap();
        let a = catalog.get("a").unwrap();
        assert!(a.constraints.contains(PlacementFlags::OUTSIDE_CLAIMS));
        assert_eq!(a.constraints.required_job, Some(JobRequirement { job: "miner".into(), min_level: 10 }));
        assert!(a.restrictions.contains(ItemRestrictions::NO_ANVIL | ItemRestrictions::NO_GRINDSTONE));
        assert!(!a.constraints.allows_world("world_nether"));
    }
}
