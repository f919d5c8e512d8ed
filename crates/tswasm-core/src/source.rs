//! Source files and the loaders that read them

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Whether a source file is the entry point or was pulled in by an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOrigin {
    /// The file named on the command line
    Entry,
    /// A file requested by the engine while resolving imports
    Import,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Entry => write!(f, "File"),
            SourceOrigin::Import => write!(f, "Imported file"),
        }
    }
}

/// A resolved source file
///
/// `path` is the canonical logical path: `/` separators and no extension.
/// It ends in `/index` when the file was found as a directory index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: String,
    text: String,
    origin: SourceOrigin,
}

impl SourceFile {
    /// Create a resolved source file
    pub fn new(path: impl Into<String>, text: impl Into<String>, origin: SourceOrigin) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            origin,
        }
    }

    /// Canonical logical path (no extension)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Entry or import
    pub fn origin(&self) -> SourceOrigin {
        self.origin
    }

    /// Whether this is the entry file
    pub fn is_entry(&self) -> bool {
        self.origin == SourceOrigin::Entry
    }
}

/// Reads source text for a concrete file name
///
/// Any failure is reported as `None`; the resolver turns a miss on every
/// candidate into `FileNotFound`.
pub trait SourceLoader {
    /// Read the file at `path` (extension included)
    fn load(&self, path: &str) -> Option<String>;
}

/// Loads sources from the filesystem
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    base_dir: Option<PathBuf>,
}

impl FsLoader {
    /// Resolve relative paths against `base_dir` instead of the working directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, path: &str) -> Option<String> {
        let full = match &self.base_dir {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        };
        match std::fs::read_to_string(&full) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::trace!("Cannot read {}: {}", full.display(), e);
                None
            }
        }
    }
}

impl SourceLoader for HashMap<String, String> {
    fn load(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

impl<L: SourceLoader + ?Sized> SourceLoader for &L {
    fn load(&self, path: &str) -> Option<String> {
        (**self).load(path)
    }
}
