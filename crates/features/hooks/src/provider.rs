use zitems_domain::context::{Actor, Location};
use zitems_domain::item::ItemTemplate;
use zitems_domain::verdict::Verdict;

/// Contributes one opinion to a resolution.
///
/// Implementations must be cheap and side-effect free; they may be called concurrently from
/// many threads and, when a timeout is configured, from pool workers.
pub trait DecisionProvider: Send + Sync + 'static {
    fn evaluate(&self, template: &ItemTemplate, location: &Location, actor: &Actor) -> Verdict;
}

impl<F> DecisionProvider for F
where
    F: Fn(&ItemTemplate, &Location, &Actor) -> Verdict + Send + Sync + 'static,
{
    fn evaluate(&self, template: &ItemTemplate, location: &Location, actor: &Actor) -> Verdict {
        self(template, location, actor)
    }
}
