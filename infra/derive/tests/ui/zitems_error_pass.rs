use std::borrow::Cow;
use zitems_derive::zitems_error;

#[zitems_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing template{}: {key}", format_context(.context))]
    Missing { key: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("boom")).context("reading")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.context_note(), Some("reading"));
    let internal: DemoError = "oops".into();
    assert!(internal.context_note().is_none());
}
