use std::borrow::Cow;
use zitems_definitions::DefinitionError;
use zitems_instances::InstanceError;
use zitems_kernel::config::ConfigError;
use zitems_kernel::keys::KeyError;
use zitems_resolution::ResolutionError;

#[zitems_derive::zitems_error]
pub enum ZItemsError {
    #[error("Definitions error{}: {source}", format_context(.context))]
    Definitions { source: DefinitionError, context: Option<Cow<'static, str>> },

    #[error("Resolution error{}: {source}", format_context(.context))]
    Resolution { source: ResolutionError, context: Option<Cow<'static, str>> },

    #[error("Instance error{}: {source}", format_context(.context))]
    Instance { source: InstanceError, context: Option<Cow<'static, str>> },

    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Key error{}: {source}", format_context(.context))]
    Key { source: KeyError, context: Option<Cow<'static, str>> },
}
