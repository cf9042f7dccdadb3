use crate::shape::RecipeShape;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use zitems_domain::item::ItemTemplate;
use zitems_domain::key::TemplateKey;
use zitems_domain::recipe::RecipeKind;

/// One recipe derived from a template, ready to install in the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeBinding {
    /// `<namespace>:<template-key>`.
    pub key: String,
    pub template: TemplateKey,
    pub kind: RecipeKind,
    pub shape: RecipeShape,
    pub amount: u16,
    pub group: Option<String>,
    pub category: Option<String>,
    pub cooking_time: Option<u32>,
    pub experience: Option<f32>,
    pub priority: i32,
}

impl RecipeBinding {
    /// Derives the binding of `template`, if it declares a usable recipe.
    #[must_use]
    pub fn derive(namespace: &str, template: &ItemTemplate) -> Option<Self> {
        let recipe = template.recipe.as_ref()?;
        let Some(shape) = RecipeShape::normalize(recipe) else {
            warn!(item = %template.key, "Recipe has no usable input, skipping");
            return None;
        };
        Some(Self {
            key: recipe_key(namespace, &template.key),
            template: template.key.clone(),
            kind: recipe.kind,
            shape,
            amount: recipe.amount,
            group: recipe.group.clone(),
            category: recipe.category.clone(),
            cooking_time: recipe.cooking_time,
            experience: recipe.experience,
            priority: recipe.priority,
        })
    }

    fn output(&self) -> (&TemplateKey, u16) {
        (&self.template, self.amount)
    }
}

impl fmt::Display for RecipeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {} -> {} x{}", self.key, self.kind, self.shape, self.template, self.amount)
    }
}

/// `<namespace>:<template-key>`.
#[must_use]
pub fn recipe_key(namespace: &str, template: &TemplateKey) -> String {
    format!("{namespace}:{template}")
}

/// Templates whose recipes share one kind and shape but differ in output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kind: RecipeKind,
    pub shape: RecipeShape,
    pub templates: Vec<TemplateKey>,
}

/// Bindings split into installable ones and collisions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingPlan {
    /// Non-colliding bindings, ordered by key.
    pub bindings: Vec<RecipeBinding>,
    pub collisions: Vec<Collision>,
}

impl BindingPlan {
    /// Derives every binding and groups colliding ones.
    pub fn derive<'a>(namespace: &str, templates: impl IntoIterator<Item = &'a ItemTemplate>) -> Self {
        let mut by_shape: BTreeMap<(RecipeKind, RecipeShape), Vec<RecipeBinding>> = BTreeMap::new();
        for binding in templates.into_iter().filter_map(|t| RecipeBinding::derive(namespace, t)) {
            by_shape.entry((binding.kind, binding.shape.clone())).or_default().push(binding);
        }

        let mut plan = Self::default();
        for ((kind, shape), group) in by_shape {
            let first = group[0].output();
            if group.iter().all(|binding| binding.output() == first) {
                plan.bindings.extend(group);
                continue;
            }
            let mut templates: Vec<TemplateKey> = group.into_iter().map(|binding| binding.template).collect();
            templates.sort();
            plan.collisions.push(Collision { kind, shape, templates });
        }
        plan.bindings.sort_by(|a, b| a.key.cmp(&b.key));
        plan
    }

    /// Every colliding template key, sorted.
    #[must_use]
    pub fn colliding_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> =
            self.collisions.iter().flat_map(|c| c.templates.iter().map(ToString::to_string)).collect();
        keys.sort();
        keys
    }
}
