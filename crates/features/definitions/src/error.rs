use std::borrow::Cow;
use std::fmt;
use strum_macros::{AsRefStr, Display};

/// Error types of the definition store.
#[zitems_derive::zitems_error]
pub enum DefinitionError {
    /// One or more definitions are malformed; nothing was loaded.
    #[error("Definition validation failed{}: {}", format_context(.context), render_issues(.issues))]
    Validation { issues: Vec<Issue>, context: Option<Cow<'static, str>> },

    /// The definition source itself could not be read.
    #[error("Definition source error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Directory walk error{}: {source}", format_context(.context))]
    Walk { source: walkdir::Error, context: Option<Cow<'static, str>> },
}

impl DefinitionError {
    /// The validation issues carried by this error; empty for source failures.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Validation { issues, .. } => issues,
            _ => &[],
        }
    }
}

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    /// The file could not be read or parsed.
    Syntax,
    MissingField,
    InvalidField,
    DuplicateKey,
    AttributeType,
    UnknownReference,
    InheritanceCycle,
    Recipe,
}

/// One problem found in one definition entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Where the entry came from (file path or in-memory name).
    pub origin: String,
    /// The entry's key, when it could be read.
    pub key: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub(crate) fn new(
        origin: impl Into<String>,
        key: Option<&str>,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self { origin: origin.into(), key: key.map(str::to_owned), kind, message: message.into() }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} [{key}]: {}", self.origin, self.message),
            None => write!(f, "{}: {}", self.origin, self.message),
        }
    }
}

fn render_issues(issues: &[Issue]) -> String {
    let lines: Vec<String> = issues.iter().map(ToString::to_string).collect();
    format!("{} issue(s): {}", issues.len(), lines.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_issue() {
        let err = DefinitionError::Validation {
            issues: vec![
                Issue::new("a.toml", Some("a"), IssueKind::MissingField, "missing required field 'material'"),
                Issue::new("b.toml", None, IssueKind::Syntax, "expected `=`"),
            ],
            context: None,
        };
        assert_eq!(
            err.to_string(),
            "Definition validation failed: 2 issue(s): a.toml [a]: missing required field 'material'; b.toml: expected `=`"
        );
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn issue_kinds_render_in_kebab_case() {
        assert_eq!(IssueKind::InheritanceCycle.to_string(), "inheritance-cycle");
        assert_eq!(IssueKind::Syntax.as_ref(), "syntax");
    }
}
