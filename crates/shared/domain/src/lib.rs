//! # Domain Models
//!
//! Pure zItems types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O and no policy, just data and small helpers.

pub mod config;
pub mod constants;
pub mod constraints;
pub mod context;
pub mod effect;
pub mod instance;
pub mod item;
pub mod key;
pub mod recipe;
pub mod verdict;

pub mod prelude {
    pub use crate::config::{AttributeSchema, ZItemsConfig};
    pub use crate::constraints::{JobRequirement, PlacementConstraints, PlacementFlags};
    pub use crate::context::{Actor, Location};
    pub use crate::effect::{Effect, EffectRefusal};
    pub use crate::instance::{ItemInstance, Overrides};
    pub use crate::item::{
        AttributeKind, AttributeMap, AttributeValue, DisplayMeta, Enchantments, ItemRestrictions,
        ItemTemplate,
    };
    pub use crate::key::TemplateKey;
    pub use crate::recipe::{Ingredient, RecipeDefinition, RecipeKind};
    pub use crate::verdict::{Decision, Verdict, VerdictKind};
}
