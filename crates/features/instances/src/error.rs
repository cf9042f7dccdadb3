use std::borrow::Cow;

#[zitems_derive::zitems_error]
pub enum InstanceError {
    #[error("Unknown item template{}: {key}", format_context(.context))]
    UnknownTemplate { key: String, context: Option<Cow<'static, str>> },

    /// An override does not fit the attribute schema or the template's attribute type.
    #[error("Invalid override '{name}'{}: {message}", format_context(.context))]
    InvalidOverride { name: String, message: String, context: Option<Cow<'static, str>> },

    #[error("Effect '{effect}' refused by {item}{}: {reason}", format_context(.context))]
    EffectRefused { effect: String, item: String, reason: String, context: Option<Cow<'static, str>> },

    #[error("Invalid stack amount{}: {amount} is outside 1..={max}", format_context(.context))]
    InvalidAmount { amount: u16, max: u16, context: Option<Cow<'static, str>> },

    /// Encoded instance bytes are corrupted or of an unknown version.
    #[error("Instance codec error{}: {source}", format_context(.context))]
    Codec { source: postcard::Error, context: Option<Cow<'static, str>> },
}
