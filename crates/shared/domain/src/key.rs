use crate::constants::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Longest accepted template key.
pub const MAX_KEY_LEN: usize = 64;

/// Unique identifier of an item template, e.g. `ruby_sword` or `tools/ruby_pickaxe`.
///
/// Keys are lower-case ASCII letters, digits, `_`, `-`, `.` and `/`, between 1 and
/// [`MAX_KEY_LEN`] characters long. A leading `zitems:` is stripped on parse, so
/// `zitems:ruby` and `ruby` name the same template. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateKey(Arc<str>);

impl TemplateKey {
    /// Builds a key if `raw` is well-formed.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let local = raw.strip_prefix(DEFAULT_NAMESPACE).and_then(|rest| rest.strip_prefix(':')).unwrap_or(raw);
        Self::is_valid(local).then(|| Self(Arc::from(local)))
    }

    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        !raw.is_empty()
            && raw.len() <= MAX_KEY_LEN
            && raw.bytes().all(|b| {
                b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'-' | b'.' | b'/')
            })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TemplateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TemplateKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid template key '{value}'"))
    }
}

impl TryFrom<&str> for TemplateKey {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or_else(|| format!("invalid template key '{value}'"))
    }
}

impl From<TemplateKey> for String {
    fn from(key: TemplateKey) -> Self {
        key.0.as_ref().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_folder_style_keys() {
        assert!(TemplateKey::parse("tools/ruby_pickaxe").is_some());
        assert!(TemplateKey::parse("gem-1.5").is_some());
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(TemplateKey::parse("").is_none());
        assert!(TemplateKey::parse("Ruby").is_none());
        assert!(TemplateKey::parse("zitems:").is_none());
        assert!(TemplateKey::parse("zitems:zitems:ruby").is_none());
        assert!(TemplateKey::parse("minecraft:ruby").is_none());
        assert!(TemplateKey::parse("with space").is_none());
        assert!(TemplateKey::parse(&"a".repeat(MAX_KEY_LEN + 1)).is_none());
    }

    #[test]
    fn default_namespace_is_stripped() {
        assert_eq!(TemplateKey::parse("zitems:ruby"), TemplateKey::parse("ruby"));
        assert_eq!(TemplateKey::parse("zitems:tools/ruby_pickaxe").unwrap().as_str(), "tools/ruby_pickaxe");
        assert!(TemplateKey::parse("zitemsruby").is_none());
    }

    #[test]
    fn deserialization_validates() {
        let ok: TemplateKey = serde_json::from_str("\"ruby\"").unwrap();
        assert_eq!(ok.as_str(), "ruby");
        let prefixed: TemplateKey = serde_json::from_str("\"zitems:ruby\"").unwrap();
        assert_eq!(prefixed, ok);
        assert!(serde_json::from_str::<TemplateKey>("\"NOPE\"").is_err());
    }
}
