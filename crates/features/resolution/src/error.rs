use std::borrow::Cow;

/// Internal failures of a single hook evaluation.
///
/// These never reach the caller of `resolve`; the engine logs them and counts the hook as
/// abstaining.
#[zitems_derive::zitems_error]
pub enum ResolutionError {
    #[error("Hook '{hook}' missed its {timeout_ms}ms deadline{}", format_context(.context))]
    HookTimeout { hook: String, timeout_ms: u64, context: Option<Cow<'static, str>> },

    #[error("Hook '{hook}' is still running past its {timeout_ms}ms deadline{}", format_context(.context))]
    HookStalled { hook: String, timeout_ms: u64, context: Option<Cow<'static, str>> },

    #[error("Hook '{hook}' panicked{}: {message}", format_context(.context))]
    HookPanicked { hook: String, message: String, context: Option<Cow<'static, str>> },

    #[error("Evaluation pool error{}: {source}", format_context(.context))]
    Runtime { source: zitems_runtime::RuntimeError, context: Option<Cow<'static, str>> },
}
