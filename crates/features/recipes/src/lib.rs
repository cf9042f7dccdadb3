//! # Recipe Binder
//!
//! Turns the recipes declared by templates into [`RecipeBinding`]s and installs them into the
//! host through a [`RecipeSink`].
//!
//! Inputs are normalized into a [`RecipeShape`] first: shaped grids are trimmed to their
//! content and shapeless inputs are sorted. Two templates whose recipes have the same kind and
//! shape but different outputs collide; neither is installed and the binder reports a
//! [`RecipeError::Conflict`] naming both.

mod binder;
mod binding;
mod error;
mod shape;

pub use binder::{BindingSet, RecipeBinder, RecipeSink};
pub use binding::{BindingPlan, Collision, RecipeBinding, recipe_key};
pub use error::{RecipeError, RecipeErrorExt};
pub use shape::RecipeShape;
