use crate::error::ResolutionError;
use crate::policy::{HookVerdict, Resolution};
use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use zitems_domain::config::ResolutionConfig;
use zitems_domain::context::{Actor, Location};
use zitems_domain::item::ItemTemplate;
use zitems_domain::verdict::{Decision, Verdict};
use zitems_hooks::{DecisionProvider, HookDescriptor, HookRegistry};
use zitems_runtime::{HookPool, PoolConfig, panic_message};

#[derive(Debug, Clone)]
struct Deadline {
    timeout: Duration,
    pool: HookPool,
    stalls: Stalls,
}

/// Progress of one evaluation dispatched to the pool.
#[derive(Debug, Default)]
struct Run {
    started: AtomicBool,
    finished: AtomicBool,
    abandoned: AtomicBool,
}

/// Hooks whose last evaluation missed its deadline while running and still holds a worker.
///
/// A stalled hook is not dispatched again until that evaluation returns, so it occupies at
/// most one worker however many resolutions ask for it.
#[derive(Debug, Clone, Default)]
struct Stalls {
    runs: Arc<Mutex<FxHashMap<String, Arc<Run>>>>,
}

impl Stalls {
    /// Whether `hook` still has an overdue evaluation running; forgets it once it returned.
    fn is_stalled(&self, hook: &str) -> bool {
        let mut runs = self.runs.lock();
        match runs.get(hook) {
            Some(run) if !run.finished.load(Ordering::SeqCst) => true,
            Some(_) => {
                runs.remove(hook);
                debug!(hook, "Stalled hook recovered");
                false
            },
            None => false,
        }
    }

    /// Workers currently held by overdue evaluations.
    fn occupied(&self) -> usize {
        self.runs.lock().values().filter(|run| !run.finished.load(Ordering::SeqCst)).count()
    }

    fn record(&self, hook: &str, run: Arc<Run>) {
        self.runs.lock().insert(hook.to_owned(), run);
    }
}

#[derive(Debug)]
struct Request {
    template: Arc<ItemTemplate>,
    location: Location,
    actor: Actor,
}

type Outcome = Result<Verdict, ResolutionError>;

#[derive(Debug)]
enum Pending {
    Settled(Outcome),
    Dispatched(Receiver<Outcome>, Arc<Run>),
}

/// Consults the active hooks and combines their verdicts with deny-overrides.
///
/// Cheap to clone; clones share the registry and the evaluation pool.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    registry: HookRegistry,
    default_decision: Decision,
    deadline: Option<Deadline>,
}

impl ResolutionEngine {
    /// Inline engine with an `Allow` default.
    #[must_use]
    pub fn new(registry: HookRegistry) -> Self {
        Self { registry, default_decision: Decision::Allow, deadline: None }
    }

    /// Builds an engine from configuration, spawning the evaluation pool when a hook timeout
    /// is set.
    ///
    /// # Errors
    /// Returns [`ResolutionError::Runtime`] when the pool cannot be built.
    pub fn from_config(registry: HookRegistry, config: &ResolutionConfig) -> Result<Self, ResolutionError> {
        let engine = Self::new(registry).with_default_decision(config.default_decision);
        let Some(timeout_ms) = config.hook_timeout_ms else {
            return Ok(engine);
        };

        let mut pool_config = PoolConfig::shared();
        if let Some(workers) = config.workers {
            pool_config = pool_config.with_worker_threads(workers);
        }
        let pool = HookPool::build(&pool_config)?;
        Ok(engine.with_deadline(Duration::from_millis(timeout_ms), pool))
    }

    #[must_use]
    pub const fn with_default_decision(mut self, decision: Decision) -> Self {
        self.default_decision = decision;
        self
    }

    /// Evaluates hooks on `pool` and abandons those that miss `timeout`.
    ///
    /// A hook that is still running past its deadline is skipped (counted as abstaining) until
    /// it returns. Once stalled hooks hold every worker, the remaining hooks run inline.
    #[must_use]
    pub fn with_deadline(mut self, timeout: Duration, pool: HookPool) -> Self {
        self.deadline = Some(Deadline { timeout, pool, stalls: Stalls::default() });
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn default_decision(&self) -> Decision {
        self.default_decision
    }

    /// Resolves whether `actor` may use `template` at `location`.
    ///
    /// Never fails: hooks that panic or time out are logged and counted as abstaining.
    /// In deadline mode the template is cloned once per call; prefer
    /// [`resolve_shared`](Self::resolve_shared) when it already lives in an `Arc`.
    #[must_use]
    pub fn resolve(&self, template: &ItemTemplate, location: &Location, actor: &Actor) -> Resolution {
        self.resolve_with(template, || Arc::new(template.clone()), location, actor)
    }

    /// Same as [`resolve`](Self::resolve) for a template shared with the catalog.
    #[must_use]
    pub fn resolve_shared(&self, template: &Arc<ItemTemplate>, location: &Location, actor: &Actor) -> Resolution {
        self.resolve_with(template, || Arc::clone(template), location, actor)
    }

    fn resolve_with(
        &self,
        template: &ItemTemplate,
        share: impl FnOnce() -> Arc<ItemTemplate>,
        location: &Location,
        actor: &Actor,
    ) -> Resolution {
        let hooks = self.registry.active_hooks();
        let outcomes: Vec<Outcome> = match &self.deadline {
            None => hooks.iter().map(|hook| evaluate_inline(hook, template, location, actor)).collect(),
            Some(deadline) => {
                let request = Arc::new(Request { template: share(), location: location.clone(), actor: actor.clone() });
                evaluate_with_deadline(deadline, &hooks, &request)
            },
        };

        let verdicts = hooks
            .iter()
            .zip(outcomes)
            .map(|(hook, outcome)| HookVerdict { hook: hook.name().to_owned(), verdict: settle(outcome) })
            .collect();

        let default = template.default_decision.unwrap_or(self.default_decision);
        let resolution = Resolution::from_verdicts(verdicts, default);
        debug!(
            item = %template.key,
            location = %location,
            actor = %actor.name,
            hooks = hooks.len(),
            "Resolved {resolution}"
        );
        resolution
    }
}

/// Turns an evaluation failure into an abstention, logging it.
fn settle(outcome: Outcome) -> Verdict {
    match outcome {
        Ok(verdict) => verdict,
        Err(err @ (ResolutionError::HookTimeout { .. } | ResolutionError::HookStalled { .. })) => {
            warn!("{err}, treating it as abstaining");
            Verdict::abstain().with_reason(err.to_string())
        },
        Err(err) => {
            error!("{err}, treating it as abstaining");
            Verdict::abstain().with_reason(err.to_string())
        },
    }
}

fn guarded(
    hook: &str,
    provider: &dyn DecisionProvider,
    template: &ItemTemplate,
    location: &Location,
    actor: &Actor,
) -> Outcome {
    catch_unwind(AssertUnwindSafe(|| provider.evaluate(template, location, actor))).map_err(|payload| {
        ResolutionError::HookPanicked {
            hook: hook.to_owned(),
            message: panic_message(payload.as_ref()).into_owned(),
            context: None,
        }
    })
}

fn evaluate_inline(
    hook: &HookDescriptor,
    template: &ItemTemplate,
    location: &Location,
    actor: &Actor,
) -> Outcome {
    guarded(hook.name(), hook.provider().as_ref(), template, location, actor)
}

/// Dispatches every hook to the pool, then collects results against one shared deadline.
fn evaluate_with_deadline(deadline: &Deadline, hooks: &[HookDescriptor], request: &Arc<Request>) -> Vec<Outcome> {
    let timeout_ms = u64::try_from(deadline.timeout.as_millis()).unwrap_or(u64::MAX);

    let pending: Vec<Pending> = hooks
        .iter()
        .map(|hook| {
            if deadline.stalls.is_stalled(hook.name()) {
                return Pending::Settled(Err(ResolutionError::HookStalled {
                    hook: hook.name().to_owned(),
                    timeout_ms,
                    context: None,
                }));
            }
            if deadline.stalls.occupied() >= deadline.pool.workers() {
                debug!(hook = hook.name(), "Every worker is held by a stalled hook, evaluating inline");
                let Request { template, location, actor } = &**request;
                return Pending::Settled(evaluate_inline(hook, template, location, actor));
            }
            dispatch(&deadline.pool, hook, request)
        })
        .collect();

    let expires = Instant::now() + deadline.timeout;

    hooks
        .iter()
        .zip(pending)
        .map(|(hook, pending)| {
            let (rx, run) = match pending {
                Pending::Settled(outcome) => return outcome,
                Pending::Dispatched(rx, run) => (rx, run),
            };
            let remaining = expires.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    run.abandoned.store(true, Ordering::SeqCst);
                    if run.started.load(Ordering::SeqCst) {
                        deadline.stalls.record(hook.name(), run);
                    }
                    Err(ResolutionError::HookTimeout { hook: hook.name().to_owned(), timeout_ms, context: None })
                },
                Err(RecvTimeoutError::Disconnected) => Err(ResolutionError::HookPanicked {
                    hook: hook.name().to_owned(),
                    message: "worker dropped the evaluation".to_owned(),
                    context: None,
                }),
            }
        })
        .collect()
}

fn dispatch(pool: &HookPool, hook: &HookDescriptor, request: &Arc<Request>) -> Pending {
    let (tx, rx) = bounded(1);
    let run = Arc::new(Run::default());
    let name = hook.name().to_owned();
    let provider = Arc::clone(hook.provider());
    let request = Arc::clone(request);
    let progress = Arc::clone(&run);

    pool.spawn(move || {
        progress.started.store(true, Ordering::SeqCst);
        // Abandoned while still queued; nobody is waiting for the verdict.
        if !progress.abandoned.load(Ordering::SeqCst) {
            let Request { template, location, actor } = &*request;
            let outcome = guarded(&name, provider.as_ref(), template, location, actor);
            // The receiver is gone once the deadline passed; the late verdict is dropped.
            let _ = tx.send(outcome);
        }
        progress.finished.store(true, Ordering::SeqCst);
    });
    Pending::Dispatched(rx, run)
}
