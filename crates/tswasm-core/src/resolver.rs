//! Logical path → source file resolution

use crate::error::{Error, Result};
use crate::source::{SourceFile, SourceLoader, SourceOrigin};

/// Default extension appended to logical paths
pub const DEFAULT_SOURCE_EXTENSION: &str = ".ts";

/// Maps logical module paths to source text
///
/// A logical path `foo` resolves to `foo.ts`, or to `foo/index.ts` in which
/// case the canonical path becomes `foo/index`.
pub struct FileResolver<L> {
    loader: L,
    extension: String,
}

impl<L: SourceLoader> FileResolver<L> {
    /// Create a resolver for `.ts` sources
    pub fn new(loader: L) -> Self {
        Self::with_extension(loader, DEFAULT_SOURCE_EXTENSION)
    }

    /// Create a resolver for a custom source extension (leading dot included)
    pub fn with_extension(loader: L, extension: impl Into<String>) -> Self {
        Self {
            loader,
            extension: extension.into(),
        }
    }

    /// Resolve `logical_path` to a source file
    pub fn resolve(&self, logical_path: &str, origin: SourceOrigin) -> Result<SourceFile> {
        let path = normalize_path(logical_path, &self.extension);

        let direct = format!("{}{}", path, self.extension);
        tracing::trace!("Trying {}", direct);
        if let Some(text) = self.loader.load(&direct) {
            tracing::debug!("Resolved {} -> {}", logical_path, direct);
            return Ok(SourceFile::new(path, text, origin));
        }

        let index = format!("{}/index", path);
        let index_file = format!("{}{}", index, self.extension);
        tracing::trace!("Trying {}", index_file);
        if let Some(text) = self.loader.load(&index_file) {
            tracing::debug!("Resolved {} -> {}", logical_path, index_file);
            return Ok(SourceFile::new(index, text, origin));
        }

        Err(Error::FileNotFound { path: direct, origin })
    }
}

/// Canonicalize separators and strip one trailing `/` or source extension
pub fn normalize_path(path: &str, extension: &str) -> String {
    let path = path.replace('\\', "/");
    if let Some(stripped) = path.strip_suffix(extension) {
        return stripped.to_string();
    }
    if let Some(stripped) = path.strip_suffix('/') {
        return stripped.to_string();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn files(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(path, text)| (path.to_string(), text.to_string()))
            .collect()
    }

    #[rstest]
    #[case("src/main", "src/main")]
    #[case("src/main.ts", "src/main")]
    #[case("src/lib/", "src/lib")]
    #[case("src\\lib\\util.ts", "src/lib/util")]
    #[case("main.tsx", "main.tsx")]
    fn test_normalize_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_path(input, ".ts"), expected);
    }

    #[test]
    fn test_resolve_direct_file() {
        let resolver = FileResolver::new(files(&[("src/main.ts", "// main")]));

        let file = resolver.resolve("src/main.ts", SourceOrigin::Entry).unwrap();
        assert_eq!(file.path(), "src/main");
        assert_eq!(file.text(), "// main");
        assert!(file.is_entry());
    }

    #[test]
    fn test_resolve_directory_index() {
        let resolver = FileResolver::new(files(&[("src/lib/index.ts", "// lib")]));

        let file = resolver.resolve("src/lib/", SourceOrigin::Import).unwrap();
        assert_eq!(file.path(), "src/lib/index");
        assert_eq!(file.origin(), SourceOrigin::Import);
    }

    #[test]
    fn test_direct_file_wins_over_index() {
        let resolver = FileResolver::new(files(&[
            ("util.ts", "// direct"),
            ("util/index.ts", "// index"),
        ]));

        let file = resolver.resolve("util", SourceOrigin::Import).unwrap();
        assert_eq!(file.path(), "util");
        assert_eq!(file.text(), "// direct");
    }

    #[rstest]
    #[case(SourceOrigin::Entry, "File 'missing.ts' not found.")]
    #[case(SourceOrigin::Import, "Imported file 'missing.ts' not found.")]
    fn test_missing_file(#[case] origin: SourceOrigin, #[case] message: &str) {
        let resolver = FileResolver::new(files(&[]));

        let err = resolver.resolve("missing", origin).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_custom_extension() {
        let resolver = FileResolver::with_extension(files(&[("main.as", "// as")]), ".as");

        let file = resolver.resolve("main.as", SourceOrigin::Entry).unwrap();
        assert_eq!(file.path(), "main");
    }
}
