use anyhow::Context;
use std::path::Path;
use zitems::domain::config::ZItemsConfig;

/// Decodes a hex-encoded instance, materializes it against `dir` and prints it as JSON.
///
/// # Errors
/// Fails on malformed hex, undecodable bytes or a template missing from `dir`.
pub fn inspect_item(config: &ZItemsConfig, dir: &Path, encoded: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(encoded.trim()).context("Item is not valid hex")?;
    let items = super::open(config, dir)?;

    let instance = items.factory.deserialize(&bytes)?;
    let view = items.factory.materialize(&instance)?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
