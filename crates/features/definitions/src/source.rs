//! Where raw definitions come from.

use crate::error::{DefinitionError, DefinitionErrorExt};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Serialization format of one definition entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    /// Maps a file extension to a format.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Unparsed content of one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub origin: String,
    /// Directory relative to the source root; `None` for top-level entries.
    pub folder: Option<PathBuf>,
    pub format: Format,
    /// File content, or the read error that prevented getting it.
    pub content: Result<String, String>,
}

impl RawEntry {
    pub fn new(origin: impl Into<String>, format: Format, content: impl Into<String>) -> Self {
        Self { origin: origin.into(), folder: None, format, content: Ok(content.into()) }
    }

    #[must_use]
    pub fn in_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

/// A provider of raw definition entries.
///
/// `read` is the only place the store touches disk; it runs at startup and on reload.
pub trait DefinitionSource: Debug + Send + Sync {
    /// A short description for logs, such as the root directory.
    fn describe(&self) -> Cow<'_, str>;

    /// Reads every entry.
    ///
    /// # Errors
    /// Fails only when the source as a whole is unusable. Individual unreadable entries are
    /// returned with an `Err` content so they are reported with the other issues.
    fn read(&self) -> Result<Vec<RawEntry>, DefinitionError>;
}

impl<S: DefinitionSource + ?Sized> DefinitionSource for Box<S> {
    fn describe(&self) -> Cow<'_, str> {
        (**self).describe()
    }

    fn read(&self) -> Result<Vec<RawEntry>, DefinitionError> {
        (**self).read()
    }
}

/// Reads one definition per file from a directory tree.
///
/// Files with `.toml`, `.yml`, `.yaml` and `.json` extensions are picked up in file-name
/// order; hidden files and directories are skipped.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

impl DefinitionSource for DirectorySource {
    fn describe(&self) -> Cow<'_, str> {
        self.root.to_string_lossy()
    }

    fn read(&self) -> Result<Vec<RawEntry>, DefinitionError> {
        let meta = fs::metadata(&self.root)
            .context(format!("Failed to open definitions folder {}", self.root.display()))?;
        if !meta.is_dir() {
            return Err(DefinitionError::Io {
                source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
                context: Some(format!("{}", self.root.display()).into()),
            });
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for dir_entry in walker {
            let dir_entry = dir_entry.context("Failed to walk definitions folder")?;
            if !dir_entry.file_type().is_file() {
                continue;
            }
            let path = dir_entry.path();
            let Some(format) =
                path.extension().and_then(|ext| ext.to_str()).and_then(Format::from_extension)
            else {
                trace!(path = %path.display(), "Skipping non-definition file");
                continue;
            };

            let folder = path
                .parent()
                .and_then(|parent| parent.strip_prefix(&self.root).ok())
                .filter(|rel| !rel.as_os_str().is_empty())
                .map(Path::to_path_buf);

            entries.push(RawEntry {
                origin: path.display().to_string(),
                folder,
                format,
                content: fs::read_to_string(path).map_err(|e| e.to_string()),
            });
        }

        debug!(root = %self.root.display(), files = entries.len(), "Read definition files");
        Ok(entries)
    }
}

/// Programmatic definitions, shared between clones so hosts and tests can edit them
/// before calling reload.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    entries: Arc<RwLock<Vec<RawEntry>>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any entry with the same origin.
    #[must_use]
    pub fn with(self, entry: RawEntry) -> Self {
        self.upsert(entry);
        self
    }

    /// Shorthand for a TOML entry named `origin`.
    #[must_use]
    pub fn with_toml(self, origin: &str, content: &str) -> Self {
        self.with(RawEntry::new(origin, Format::Toml, content))
    }

    pub fn upsert(&self, entry: RawEntry) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.origin == entry.origin) {
            Some(slot) => *slot = entry,
            None => entries.push(entry),
        }
    }

    /// Removes the entry named `origin`; returns whether it existed.
    pub fn remove(&self, origin: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.origin != origin);
        entries.len() != before
    }
}

impl DefinitionSource for InMemorySource {
    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("memory")
    }

    fn read(&self) -> Result<Vec<RawEntry>, DefinitionError> {
        Ok(self.entries.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn directory_source_walks_sorted_and_records_folders() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("gems")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("b.toml"), "key = \"b\"").unwrap();
        fs::write(dir.path().join("a.yml"), "key: a").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("gems/ruby.json"), "{}").unwrap();
        fs::write(dir.path().join(".git/config.toml"), "ignored").unwrap();

        let entries = DirectorySource::new(dir.path()).read().unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|e| Path::new(&e.origin).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.yml", "b.toml", "ruby.json"]);
        assert_eq!(entries[2].folder.as_deref(), Some(Path::new("gems")));
        assert_eq!(entries[2].format, Format::Json);
        assert!(entries[0].folder.is_none());
    }

    #[test]
    fn missing_directory_is_a_source_error() {
        let dir = tempdir().unwrap();
        let err = DirectorySource::new(dir.path().join("absent")).read().unwrap_err();
        assert!(matches!(err, DefinitionError::Io { .. }));
    }

    #[test]
    fn in_memory_upsert_and_remove() {
        let source = InMemorySource::new().with_toml("a", "key = \"a\"");
        let shared = source.clone();
        shared.upsert(RawEntry::new("a", Format::Toml, "key = \"a2\""));
        shared.upsert(RawEntry::new("b", Format::Yaml, "key: b"));

        let entries = source.read().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content.as_deref(), Ok("key = \"a2\""));
        assert!(source.remove("b"));
        assert!(!source.remove("b"));
    }
}
