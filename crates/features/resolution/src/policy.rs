use std::fmt;
use zitems_domain::verdict::{Decision, Verdict, VerdictKind};

/// Deny-overrides: any deny wins, then any allow, otherwise `default`.
///
/// Order-independent by construction.
#[must_use]
pub fn combine<'a>(verdicts: impl IntoIterator<Item = &'a Verdict>, default: Decision) -> Decision {
    let mut allowed = false;
    for verdict in verdicts {
        match verdict.kind {
            VerdictKind::Deny => return Decision::Deny,
            VerdictKind::Allow => allowed = true,
            VerdictKind::Abstain => {},
        }
    }
    if allowed { Decision::Allow } else { default }
}

/// One consulted hook and what it said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookVerdict {
    pub hook: String,
    pub verdict: Verdict,
}

/// The outcome of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    decision: Decision,
    verdicts: Vec<HookVerdict>,
    /// Set when no hook decided and the default applied.
    defaulted: bool,
    /// Reason for a deny that did not come from a hook.
    rejection: Option<String>,
}

impl Resolution {
    pub(crate) fn from_verdicts(verdicts: Vec<HookVerdict>, default: Decision) -> Self {
        let decision = combine(verdicts.iter().map(|v| &v.verdict), default);
        let defaulted = verdicts.iter().all(|v| v.verdict.kind == VerdictKind::Abstain);
        Self { decision, verdicts, defaulted, rejection: None }
    }

    /// A deny produced without consulting hooks, for requests that cannot be resolved.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self { decision: Decision::Deny, verdicts: Vec::new(), defaulted: false, rejection: Some(reason.into()) }
    }

    #[must_use]
    pub const fn decision(&self) -> Decision {
        self.decision
    }

    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }

    /// Every consulted hook in registration order.
    #[must_use]
    pub fn verdicts(&self) -> &[HookVerdict] {
        &self.verdicts
    }

    /// Whether every hook abstained and the default decided.
    #[must_use]
    pub const fn is_defaulted(&self) -> bool {
        self.defaulted
    }

    /// `hook: reason` for every denying hook, in registration order.
    pub fn deny_reasons(&self) -> impl Iterator<Item = String> + '_ {
        let hooks = self.verdicts.iter().filter(|v| v.verdict.is_deny()).map(|v| match &v.verdict.reason {
            Some(reason) => format!("{}: {reason}", v.hook),
            None => v.hook.clone(),
        });
        self.rejection.iter().cloned().chain(hooks)
    }

    /// All deny reasons joined with `"; "`, or `None` when nothing denied.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        let reasons: Vec<String> = self.deny_reasons().collect();
        (!reasons.is_empty()).then(|| reasons.join("; "))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} ({reason})", self.decision),
            None => write!(f, "{}", self.decision),
        }
    }
}
