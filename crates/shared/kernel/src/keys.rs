use std::borrow::Cow;
use zitems_domain::key::TemplateKey;

#[zitems_derive::zitems_error]
pub enum KeyError {
    #[error("Key validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Validation of user-supplied item keys.
#[derive(Debug)]
pub struct KeyGuard;

impl KeyGuard {
    /// Validates a possibly namespaced key against the expected namespace.
    ///
    /// Commands and recipes refer to items as `zitems:ruby_sword` or just `ruby_sword`.
    /// A key from another namespace (e.g. `minecraft:diamond`) is rejected so vanilla ids
    /// cannot be mistaken for templates.
    ///
    /// # Errors
    /// Returns [`KeyError::Validation`] on a namespace mismatch or a malformed key.
    pub fn verify<K, N>(raw: K, namespace: N) -> Result<TemplateKey, KeyError>
    where
        K: AsRef<str>,
        N: AsRef<str>,
    {
        let raw = raw.as_ref().trim();
        let namespace = namespace.as_ref();

        let local = match raw.split_once(':') {
            Some((ns, _)) if ns != namespace => {
                return Err(KeyError::Validation {
                    message: format!("Expected namespace '{namespace}', got '{ns}'").into(),
                    context: Some("Namespace mismatch".into()),
                });
            },
            Some((_, local)) => local,
            None => raw,
        };

        TemplateKey::parse(local).ok_or_else(|| KeyError::Validation {
            message: format!("'{local}' is not a valid item key").into(),
            context: None,
        })
    }

    /// Renders the namespaced form used for recipe keys and command output.
    #[must_use]
    pub fn namespaced(key: &TemplateKey, namespace: &str) -> String {
        format!("{namespace}:{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_stripped_or_implied() {
        assert_eq!(KeyGuard::verify("zitems:ruby", "zitems").unwrap().as_str(), "ruby");
        assert_eq!(KeyGuard::verify(" ruby ", "zitems").unwrap().as_str(), "ruby");
    }

    #[test]
    fn foreign_namespace_is_rejected() {
        let err = KeyGuard::verify("minecraft:diamond", "zitems").unwrap_err();
        assert_eq!(err.context_note(), Some("Namespace mismatch"));
    }

    #[test]
    fn malformed_local_part_is_rejected() {
        assert!(KeyGuard::verify("zitems:Ruby Sword", "zitems").is_err());
        assert!(KeyGuard::verify("zitems:", "zitems").is_err());
    }

    #[test]
    fn namespaced_rendering() {
        let key = TemplateKey::parse("ruby").unwrap();
        assert_eq!(KeyGuard::namespaced(&key, "zitems"), "zitems:ruby");
    }
}
