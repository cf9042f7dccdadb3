use std::path::Path;
use tracing::debug;
use zitems::domain::config::ZItemsConfig;
use zitems::domain::instance::Overrides;

/// Creates `amount` items of `key` and prints the serialized instance as hex.
///
/// # Errors
/// Fails when the definitions are invalid or the factory refuses the request.
pub fn give_item(
    config: &ZItemsConfig,
    dir: &Path,
    key: &str,
    amount: u16,
    overrides: Overrides,
) -> anyhow::Result<()> {
    let items = super::open(config, dir)?;

    let instance = items.give(key, amount, overrides)?;
    let bytes = items.factory.serialize(&instance)?;
    debug!(item = %instance.template, bytes = bytes.len(), "Item serialized");
    println!("{}", hex::encode(bytes));
    Ok(())
}
