//! # Runtime
//!
//! Thread pool profiles for off-thread hook evaluation.
//!
//! Hook evaluations normally run inline on the calling thread. When a per-hook timeout is
//! configured, the resolution engine hands each evaluation to a [`HookPool`] so a stuck
//! integration can be abandoned once its deadline passes.
//!
//! ## Profiles
//! * **Dedicated**: one worker per available core, for hosts that resolve on many threads.
//! * **Shared**: half the cores, for hosts where the pool competes with the game loop.
//!
//! ## Example
//!
//! ```rust
//! use zitems_runtime::{HookPool, PoolConfig};
//!
//! let pool = HookPool::build(&PoolConfig::shared().with_thread_name("zitems-hooks")).unwrap();
//! let (tx, rx) = std::sync::mpsc::channel();
//! pool.spawn(move || tx.send(21 * 2).unwrap());
//! assert_eq!(rx.recv().unwrap(), 42);
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};
use std::thread::available_parallelism;
use tracing::debug;

/// The number of workers if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// Upper bound on workers; hooks are short-lived lookups.
const MAX_WORKER_THREADS: usize = 256;
/// The default stack size for workers (2 `MiB`).
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
/// Minimum allowed stack size (512 `KiB`).
const MIN_STACK_SIZE: usize = 512 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_THREAD_NAME: &str = "zitems-hook";

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

#[zitems_derive::zitems_error]
pub enum RuntimeError {
    #[error("Thread pool error{}: {source}", format_context(.context))]
    Build { source: rayon::ThreadPoolBuildError, context: Option<Cow<'static, str>> },
}

/// Detects the worker count from `ZITEMS_HOOK_WORKERS` or the hardware.
fn detect_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("ZITEMS_HOOK_WORKERS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

/// Configuration for a [`HookPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::dedicated()
    }
}

impl PoolConfig {
    /// One worker per detected core.
    #[must_use]
    pub fn dedicated() -> Self {
        Self {
            worker_threads: detect_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Half the detected cores, never fewer than one.
    #[must_use]
    pub fn shared() -> Self {
        Self { worker_threads: (detect_worker_threads() / 2).max(1), ..Self::dedicated() }
    }

    #[must_use = "Customize the number of worker threads for the pool"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name prefix"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name };
        self
    }

    fn normalized(&self) -> Self {
        Self {
            worker_threads: self.worker_threads.clamp(1, MAX_WORKER_THREADS),
            stack_size: self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE),
            thread_name: if self.thread_name.trim().is_empty() {
                DEFAULT_THREAD_NAME.to_owned()
            } else {
                self.thread_name.clone()
            },
        }
    }
}

/// A cheaply clonable handle to a rayon thread pool.
#[derive(Debug, Clone)]
pub struct HookPool {
    pool: Arc<rayon::ThreadPool>,
    config: PoolConfig,
}

impl HookPool {
    /// Builds a pool from a (normalized) configuration.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Build`] if the OS refuses to spawn the worker threads.
    pub fn build(config: &PoolConfig) -> Result<Self, RuntimeError> {
        let config = config.normalized();
        debug!(config = ?config, "Building hook evaluation pool");

        let prefix = config.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .stack_size(config.stack_size)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()
            .context("Failed to initialize hook pool")?;

        Ok(Self { pool: Arc::new(pool), config })
    }

    /// Runs `job` on a worker without waiting for it.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.spawn(job);
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }
}

/// Extracts the message of a caught panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> Cow<'static, str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("non-string panic payload")
    }
}
