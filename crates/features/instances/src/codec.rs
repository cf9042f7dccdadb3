//! Versioned binary form of an [`ItemInstance`]: one version byte, then the postcard body.

use crate::error::{InstanceError, InstanceErrorExt};
use postcard::Error as PostcardError;
use serde::Deserialize;
use zitems_domain::instance::{ItemInstance, Overrides};
use zitems_domain::item::{AttributeMap, Enchantments};
use zitems_domain::key::TemplateKey;

/// Current encoding version.
pub const CODEC_VERSION: u8 = 2;
/// Instances written before effects existed.
const LEGACY_VERSION: u8 = 1;

#[derive(Deserialize)]
struct LegacyInstance {
    template: TemplateKey,
    amount: u16,
    attributes: AttributeMap,
    enchantments: Enchantments,
}

impl From<LegacyInstance> for ItemInstance {
    fn from(legacy: LegacyInstance) -> Self {
        Self {
            template: legacy.template,
            amount: legacy.amount,
            overrides: Overrides { attributes: legacy.attributes, enchantments: legacy.enchantments, effects: Vec::new() },
        }
    }
}

/// Encodes an instance for the host to persist.
///
/// # Errors
/// Returns [`InstanceError::Codec`] if postcard cannot encode the instance.
pub fn serialize(instance: &ItemInstance) -> Result<Vec<u8>, InstanceError> {
    let mut bytes = vec![CODEC_VERSION];
    let body = postcard::to_stdvec(instance).context("Failed to encode instance")?;
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decodes bytes produced by [`serialize`], including the pre-effects version 1 layout.
///
/// # Errors
/// Returns [`InstanceError::Codec`] for empty input, an unknown version, a corrupted body,
/// trailing bytes, or a zero amount.
pub fn deserialize(bytes: &[u8]) -> Result<ItemInstance, InstanceError> {
    let Some((&version, body)) = bytes.split_first() else {
        return Err(codec_error(PostcardError::DeserializeUnexpectedEnd, "empty instance bytes"));
    };
    let (instance, rest): (ItemInstance, _) = match version {
        CODEC_VERSION => postcard::take_from_bytes(body).context("Failed to decode instance")?,
        LEGACY_VERSION => {
            let (legacy, rest): (LegacyInstance, _) =
                postcard::take_from_bytes(body).context("Failed to decode version 1 instance")?;
            (legacy.into(), rest)
        },
        _ => {
            return Err(codec_error(
                PostcardError::DeserializeBadEncoding,
                format!("unsupported instance format version {version}"),
            ));
        },
    };
    if !rest.is_empty() {
        return Err(codec_error(PostcardError::DeserializeBadEncoding, format!("{} trailing bytes", rest.len())));
    }
    if instance.amount == 0 {
        return Err(codec_error(PostcardError::DeserializeBadEncoding, "instance amount is zero"));
    }
    Ok(instance)
}

fn codec_error(source: PostcardError, context: impl Into<std::borrow::Cow<'static, str>>) -> InstanceError {
    InstanceError::Codec { source, context: Some(context.into()) }
}
