//! Kernel utilities shared across the feature crates.
//! Keep this crate lightweight; it re-exports the domain and adds config loading and key checks.
//!
//! ## Config loading
//! ```rust,no_run
//! use zitems_kernel::config::load_config;
//! use zitems_kernel::domain::config::ZItemsConfig;
//!
//! let cfg: ZItemsConfig = load_config(Some("plugins/zItems/config.toml")).unwrap_or_default();
//! ```
//!
//! ## Namespaced keys
//! ```rust
//! use zitems_kernel::keys::KeyGuard;
//!
//! let key = KeyGuard::verify("zitems:ruby_sword", "zitems").unwrap();
//! assert_eq!(key.as_str(), "ruby_sword");
//! ```

pub mod config;
pub mod keys;

pub use zitems_domain as domain;

pub mod prelude {
    pub use crate::config::{ConfigError, load_config};
    pub use crate::keys::{KeyError, KeyGuard};
    pub use zitems_domain::prelude::*;
}
