#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every zItems crate.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! zitems-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! Examples below are `ignore`d because a proc-macro crate cannot use its own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for domain error enums.
///
/// Turns a plain enum into a `thiserror` error with optional context notes.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant that wraps a source.
/// * `From<SourceError>` for variants with a `source` field (or `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * An inherent `context_note()` accessor returning the attached note, if any.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** whose variants all use named fields.
/// 2. Every variant carries `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[zitems_derive::zitems_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading definition file")
/// }
/// ```
#[proc_macro_attribute]
pub fn zitems_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
