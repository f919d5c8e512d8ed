//! Module graph session
//!
//! The session parses each supplied file, queues the imports it has not
//! seen yet and keeps the diagnostics for the driver to drain.

use std::collections::{HashSet, VecDeque};

use tswasm_core::{Diagnostic, Session, SourceFile};

use crate::parser::{self, ParsedFile};

/// Parse state for one compilation
#[derive(Debug, Default)]
pub struct SourceSession {
    files: Vec<ParsedFile>,
    parsed: HashSet<String>,
    requested: HashSet<String>,
    pending: VecDeque<String>,
    diagnostics: VecDeque<Diagnostic>,
}

impl SourceSession {
    /// Start a session from the entry file
    pub fn new(entry: SourceFile) -> Self {
        let mut session = Self::default();
        session.add_file(entry);
        session
    }

    /// Parsed files, entry first, in the order they were supplied
    pub fn files(&self) -> &[ParsedFile] {
        &self.files
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push_back(diagnostic);
    }

    fn add_file(&mut self, file: SourceFile) {
        let path = file.path().to_string();
        if !self.parsed.insert(path.clone()) {
            tracing::debug!("Ignoring {}: already parsed", path);
            return;
        }
        self.requested.insert(path.clone());

        let parsed = parser::parse(&path, file.text());
        self.diagnostics.extend(parsed.diagnostics.iter().cloned());
        for import in &parsed.imports {
            if self.requested.insert(import.path.clone()) {
                tracing::trace!("{} requests {}", path, import.path);
                self.pending.push_back(import.path.clone());
            }
        }
        self.files.push(parsed);
    }
}

impl Session for SourceSession {
    fn next_pending_import(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    fn supply(&mut self, file: SourceFile) {
        self.add_file(file);
    }

    fn next_diagnostic(&mut self) -> Option<Diagnostic> {
        self.diagnostics.pop_front()
    }
}
