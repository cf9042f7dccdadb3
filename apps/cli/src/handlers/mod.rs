pub mod check;
pub mod give;
pub mod inspect;
pub mod recipes;

use std::path::Path;
use zitems::ZItems;
use zitems::definitions::DirectorySource;
use zitems::domain::config::ZItemsConfig;

/// Assembles a registry over `dir` without a recipe sink.
fn open(config: &ZItemsConfig, dir: &Path) -> anyhow::Result<ZItems> {
    Ok(ZItems::builder().config(config.clone()).source(DirectorySource::new(dir)).build()?)
}
