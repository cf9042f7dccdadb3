use std::borrow::Cow;

#[zitems_derive::zitems_error]
pub enum RecipeError {
    /// Templates whose recipes share a shape but produce different outputs. None of them
    /// were installed; every other binding was.
    #[error("Recipe conflict{}: {}", format_context(.context), keys.join(", "))]
    Conflict { keys: Vec<String>, context: Option<Cow<'static, str>> },

    /// The host refused to install one or more bindings.
    #[error("Recipe install rejected{}: {message}", format_context(.context))]
    Sink { keys: Vec<String>, message: String, context: Option<Cow<'static, str>> },
}

impl RecipeError {
    /// Template (conflict) or recipe (sink) keys named by the error.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        match self {
            Self::Conflict { keys, .. } | Self::Sink { keys, .. } => keys,
        }
    }
}
