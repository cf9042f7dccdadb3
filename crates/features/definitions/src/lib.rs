//! # Definition Store
//!
//! Loads declarative item definitions and turns them into immutable [`ItemTemplate`]s.
//!
//! ## Pipeline
//!
//! 1.  **Source ([`source`]):** a [`DefinitionSource`] yields raw entries, either one file per
//!     item from a folder tree ([`DirectorySource`]) or programmatic entries ([`InMemorySource`]).
//! 2.  **Validation ([`loader`]):** every entry is parsed (TOML, YAML or JSON), `base`
//!     inheritance is resolved, fields are checked against the [`AttributeSchema`], and recipe
//!     references are verified. All issues are collected before failing.
//! 3.  **Swap ([`DefinitionStore`]):** a fully valid [`Catalog`] replaces the active one in
//!     a single pointer swap.
//!
//! [`ItemTemplate`]: zitems_domain::item::ItemTemplate
//! [`AttributeSchema`]: zitems_domain::config::AttributeSchema

mod catalog;
mod error;
pub mod loader;
mod raw;
pub mod source;
mod store;

pub use crate::catalog::{Catalog, CatalogDiff};
pub use crate::error::{DefinitionError, DefinitionErrorExt, Issue, IssueKind};
pub use crate::loader::{load, load_entries};
pub use crate::source::{DefinitionSource, DirectorySource, Format, InMemorySource, RawEntry};
pub use crate::store::{DefinitionStore, ReloadReport};
