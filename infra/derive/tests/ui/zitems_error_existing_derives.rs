use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
#[zitems_derive::zitems_error]
pub enum DemoError {
    #[error("Conflict{}: {keys:?}", format_context(.context))]
    Conflict { keys: Vec<String>, context: Option<Cow<'static, str>> },
}

fn main() {}
