use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// One hook's opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictKind {
    Allow,
    Deny,
    Abstain,
}

/// The result of one hook evaluation, produced per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub reason: Option<Cow<'static, str>>,
}

impl Verdict {
    #[must_use]
    pub const fn allow() -> Self {
        Self { kind: VerdictKind::Allow, reason: None }
    }

    #[must_use]
    pub fn deny(reason: impl Into<Cow<'static, str>>) -> Self {
        Self { kind: VerdictKind::Deny, reason: Some(reason.into()) }
    }

    #[must_use]
    pub const fn abstain() -> Self {
        Self { kind: VerdictKind::Abstain, reason: None }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<Cow<'static, str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.kind == VerdictKind::Deny
    }

    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.kind == VerdictKind::Allow
    }
}

/// Final outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    #[default]
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
        })
    }
}
