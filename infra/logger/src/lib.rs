//! # Logger
//!
//! Installs the global `tracing` subscriber for zItems hosts and tools.
//! Console output goes to stdout or stderr (the CLI keeps stdout for its own reports),
//! file output uses a non-blocking rolling appender, and filtering honours `RUST_LOG`.
//!
//! * [`LoggerBuilder::debug`] mirrors the `debug` switch of the plugin settings and lowers
//!   the default level to `DEBUG` without touching explicit filters.
//! * [`LoggerBuilder::env_filter`] sets module-directed filters
//!   (e.g. `"zitems_resolution=trace,zitems_definitions=debug"`).
//!
//! ## Example
//!
//! ```rust
//! # use zitems_logger::{ConsoleTarget, LevelFilter, Logger};
//! let _logger = Logger::builder()
//!     .name("zitems")
//!     .console_target(ConsoleTarget::Stderr)
//!     .level(LevelFilter::INFO)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Where console output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

#[derive(Debug)]
pub struct LoggerConfig {
    console: bool,
    console_target: ConsoleTarget,
    ansi: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    debug: bool,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            console_target: ConsoleTarget::Stdout,
            ansi: true,
            path: None,
            level: LevelFilter::INFO,
            debug: false,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

impl LoggerConfig {
    /// The default level after applying the debug switch.
    fn effective_level(&self) -> LevelFilter {
        if self.debug { self.level.max(LevelFilter::DEBUG) } else { self.level }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: std::marker::PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the name of the logger, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder {
            name: WithName(name.into()),
            config: self.config,
            file_state: std::marker::PhantomData,
        }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Maximum number of rotated log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the file output as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Lowers the default level to at least `DEBUG` when enabled.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Adds an explicit env filter (e.g., `zitems_definitions=debug`).
    ///
    /// Invalid filters make [`LoggerBuilder::init`] return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console_target(mut self, target: ConsoleTarget) -> Self {
        self.config.console_target = target;
        self
    }

    /// Toggles ANSI colors on the console layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = enabled;
        self
    }

    /// Sets the directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: std::marker::PhantomData }
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// The returned [`Logger`] holds the [`WorkerGuard`] of the file writer; keep it alive
    /// until shutdown so buffered lines are flushed.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set and
    /// [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        validate_config(&self.config, &self.name.0)?;

        let env_filter = build_env_filter(&self.config)?;
        let mut layers = Vec::new();

        if self.config.console {
            let console = layer().compact().with_ansi(self.config.ansi);
            layers.push(match self.config.console_target {
                ConsoleTarget::Stdout => console.boxed(),
                ConsoleTarget::Stderr => console.with_writer(std::io::stderr).boxed(),
            });
        }

        let guard = if let Some(path) = self.config.path {
            fs::create_dir_all(&path)
                .context(format!("Failed to create log directory {}", path.display()))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.config.rotation)
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.config.max_files)
                .build(path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            layers.push(if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background writer guard. Drop it only when the host shuts down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// ```rust
    /// use zitems_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("zitems")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig::default(),
            name: NoName,
            file_state: std::marker::PhantomData,
        }
    }

    /// Best-effort synchronization point before shutdown.
    pub fn flush(&self) {
        tracing::debug!("Logger flushed");
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.effective_level().into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn builder_defaults() {
        let builder = Logger::builder().name("zitems-test").env_filter("zitems=debug");
        assert!(builder.config.console);
        assert_eq!(builder.config.console_target, ConsoleTarget::Stdout);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("zitems=debug"));
        assert!(builder.config.path.is_none());
    }

    #[test]
    #[serial]
    fn debug_switch_raises_default_level() {
        let builder = Logger::builder().name("zitems-test").level(LevelFilter::WARN).debug(true);
        assert_eq!(builder.config.effective_level(), LevelFilter::DEBUG);

        let builder = Logger::builder().name("zitems-test").level(LevelFilter::TRACE).debug(true);
        assert_eq!(builder.config.effective_level(), LevelFilter::TRACE);

        let builder = Logger::builder().name("zitems-test").level(LevelFilter::WARN);
        assert_eq!(builder.config.effective_level(), LevelFilter::WARN);
    }

    #[test]
    #[serial]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn invalid_filter_is_rejected() {
        let err = Logger::builder().name("zitems-test").env_filter("zitems=notalevel").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn no_layers_is_rejected() {
        let err = Logger::builder().name("zitems-test").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn file_logging_setup() -> Result<(), LoggerError> {
        let tmp_dir = tempdir().context("Failed to create temp dir")?;
        let log_dir = tmp_dir.path().join("logs");

        let logger = Logger::builder()
            .name("zitems-test")
            .console(false)
            .path(&log_dir)
            .max_files(3)
            .init()?;

        tracing::info!("hello from zitems");
        std::thread::sleep(Duration::from_millis(20));
        logger.flush();

        let has_log = fs::read_dir(&log_dir)
            .context("Failed to read log directory")?
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));

        assert!(has_log, "at least one log file should be created");
        Ok(())
    }
}
