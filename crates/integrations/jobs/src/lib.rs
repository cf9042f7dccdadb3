//! Jobs integration: templates with a job requirement need a minimum level in that job.

use std::fmt;
use std::sync::Arc;
use zitems_domain::constants::{JOBS_HOOK, JOBS_PLUGIN};
use zitems_domain::context::{Actor, Location};
use zitems_domain::item::ItemTemplate;
use zitems_domain::verdict::Verdict;
use zitems_hooks::{DecisionProvider, HookDescriptor, PluginDirectory, PluginPresent};

/// Level lookups answered by the host's Jobs bridge.
pub trait JobsQuery: Send + Sync + 'static {
    /// The actor's level in `job`; `None` when the actor has not joined it.
    fn level(&self, actor: &Actor, job: &str) -> Option<u32>;
}

pub struct JobsHook {
    jobs: Arc<dyn JobsQuery>,
}

impl fmt::Debug for JobsHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobsHook").finish_non_exhaustive()
    }
}

impl JobsHook {
    pub fn new(jobs: Arc<dyn JobsQuery>) -> Self {
        Self { jobs }
    }
}

impl DecisionProvider for JobsHook {
    fn evaluate(&self, template: &ItemTemplate, _location: &Location, actor: &Actor) -> Verdict {
        let Some(requirement) = &template.constraints.required_job else {
            return Verdict::abstain();
        };
        let level = self.jobs.level(actor, &requirement.job).unwrap_or(0);
        if level >= requirement.min_level {
            Verdict::allow()
        } else {
            Verdict::deny(format!(
                "{} needs {} level {} (has {level})",
                template.key, requirement.job, requirement.min_level
            ))
        }
    }
}

/// Descriptor active while the Jobs plugin is enabled.
pub fn descriptor(jobs: Arc<dyn JobsQuery>, plugins: Arc<dyn PluginDirectory>) -> HookDescriptor {
    HookDescriptor::new(JOBS_HOOK, JobsHook::new(jobs)).with_activation(PluginPresent::new(JOBS_PLUGIN, plugins))
}
