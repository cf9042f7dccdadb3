use std::borrow::Cow;
use zitems_derive::zitems_error;

#[zitems_error]
pub enum StoreError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Unknown item{}: {key}", format_context(.context))]
    Unknown { key: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn unknown(key: &str) -> Result<(), StoreError> {
    Err(StoreError::Unknown { key: key.to_owned(), context: None })
}

#[test]
fn context_is_rendered_in_display() {
    let err = unknown("ruby_sword").context("giving item").unwrap_err();
    assert_eq!(err.to_string(), "Unknown item (giving item): ruby_sword");
    assert_eq!(err.context_note(), Some("giving item"));
}

#[test]
fn display_without_context_has_no_parentheses() {
    let err = unknown("ruby_sword").unwrap_err();
    assert_eq!(err.to_string(), "Unknown item: ruby_sword");
    assert!(err.context_note().is_none());
}

#[test]
fn source_errors_convert_with_question_mark() {
    fn open() -> Result<(), StoreError> {
        std::fs::read_to_string("/definitely/missing/zitems/items.toml")?;
        Ok(())
    }

    let err = open().unwrap_err();
    assert!(matches!(err, StoreError::Io { context: None, .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn source_results_accept_context_directly() {
    let res: Result<(), std::io::Error> = Err(std::io::Error::other("denied"));
    let err = res.context("reading items folder").unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading items folder): denied");
}

#[test]
fn strings_fall_back_to_internal() {
    let from_str: StoreError = "static failure".into();
    let from_string: StoreError = format!("dynamic {}", 42).into();
    assert!(matches!(from_str, StoreError::Internal { .. }));
    assert_eq!(from_string.to_string(), "Internal error: dynamic 42");
}

#[test]
fn later_context_replaces_earlier_one() {
    let err = unknown("a").context("first").context("second").unwrap_err();
    assert_eq!(err.context_note(), Some("second"));
}
