use anyhow::bail;
use std::path::Path;
use zitems::definitions::{DefinitionError, DirectorySource, load};
use zitems::domain::config::ZItemsConfig;

/// Validates every definition under `dir` and prints one line per issue.
///
/// # Errors
/// Fails when the folder cannot be read or any definition is invalid.
pub fn check_definitions(config: &ZItemsConfig, dir: &Path) -> anyhow::Result<()> {
    match load(&DirectorySource::new(dir), &config.schema) {
        Ok(catalog) => {
            println!("{} template(s) OK", catalog.len());
            Ok(())
        },
        Err(DefinitionError::Validation { issues, .. }) => {
            for issue in &issues {
                println!("{issue}");
            }
            bail!("{} issue(s) in {}", issues.len(), dir.display())
        },
        Err(err) => Err(err.into()),
    }
}
