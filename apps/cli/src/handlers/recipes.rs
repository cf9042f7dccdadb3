use anyhow::bail;
use std::path::Path;
use zitems::definitions::{DirectorySource, load};
use zitems::domain::config::ZItemsConfig;
use zitems::recipes::BindingPlan;

/// Prints the bindings derived from `dir`, then every collision.
///
/// # Errors
/// Fails when the definitions are invalid or any recipes collide.
pub fn list_recipes(config: &ZItemsConfig, dir: &Path) -> anyhow::Result<()> {
    let catalog = load(&DirectorySource::new(dir), &config.schema)?;
    let plan = BindingPlan::derive(&config.recipes.namespace, catalog.iter().map(|template| &**template));

    for binding in &plan.bindings {
        println!("{binding}");
    }
    for collision in &plan.collisions {
        let keys: Vec<&str> = collision.templates.iter().map(|key| key.as_str()).collect();
        println!("conflict ({}): {} <- {}", collision.kind, collision.shape, keys.join(", "));
    }

    if !plan.collisions.is_empty() {
        bail!("{} recipe conflict(s)", plan.collisions.len());
    }
    Ok(())
}
