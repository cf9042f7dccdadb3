use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `ZITEMS__RESOLUTION__HOOK_TIMEOUT_MS=50`.
pub const ENV_PREFIX: &str = "ZITEMS";
/// File loaded when no path is given (any extension the `config` crate understands).
pub const DEFAULT_CONFIG_FILE: &str = "config";

#[zitems_derive::zitems_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from a file and overlays `ZITEMS__`-prefixed environment variables.
///
/// 1. **Base file**: `path`, or `config` (`config.toml`, `config.yml`, ...) in the working
///    directory when `None`. A missing default file is tolerated; a missing explicit file is an error.
/// 2. **Environment overrides**: nested keys are separated by double underscores
///    (`ZITEMS__RECIPES__NAMESPACE=gems` maps to `recipes.namespace`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is malformed, or
/// the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use zitems_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct HostConfig {
///     debug: bool,
/// }
///
/// let cfg: HostConfig = load_config(Some("plugins/zItems/config")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let explicit = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(explicit))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
