//! In-memory engine, loader and sink used by the driver tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tswasm_core::{
    Artifact, CompileOptions, Diagnostic, Engine, Error, OutputSink, Result, Session, SourceFile,
};

pub const BINARY: &[u8] = b"\0asm\x01\0\0\0";
pub const TEXT: &str = "(module)\n";
pub const ASMJS: &str = "function asmModule() { \"use asm\"; return {}; }\n";

/// Everything the fake engine was asked to do
#[derive(Debug, Default)]
pub struct EngineLog {
    pub supplied: Vec<String>,
    pub compile_calls: usize,
    pub options: Option<CompileOptions>,
    pub passes: Vec<String>,
    pub optimized: usize,
    pub disposed: usize,
}

/// Engine whose import graph and diagnostics are scripted up front
#[derive(Default)]
pub struct FakeEngine {
    /// Canonical path → import paths it requests
    pub imports: HashMap<String, Vec<String>>,
    pub parse_diagnostics: Vec<Diagnostic>,
    pub compile_diagnostics: Vec<Diagnostic>,
    pub invalid: bool,
    pub broken_text: bool,
    pub log: Rc<RefCell<EngineLog>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_imports(mut self, path: &str, imports: &[&str]) -> Self {
        self.imports.insert(
            path.to_string(),
            imports.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_parse_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.parse_diagnostics.push(diagnostic);
        self
    }

    pub fn with_compile_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.compile_diagnostics.push(diagnostic);
        self
    }

    pub fn invalid(mut self) -> Self {
        self.invalid = true;
        self
    }

    pub fn with_broken_text(mut self) -> Self {
        self.broken_text = true;
        self
    }
}

pub struct FakeSession {
    imports: HashMap<String, Vec<String>>,
    requested: HashSet<String>,
    pending: VecDeque<String>,
    diagnostics: VecDeque<Diagnostic>,
    log: Rc<RefCell<EngineLog>>,
}

impl FakeSession {
    fn discover(&mut self, path: &str) {
        let imports = self.imports.get(path).cloned().unwrap_or_default();
        for import in imports {
            if self.requested.insert(import.clone()) {
                self.pending.push_back(import);
            }
        }
    }
}

impl Session for FakeSession {
    fn next_pending_import(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    fn supply(&mut self, file: SourceFile) {
        self.log.borrow_mut().supplied.push(file.path().to_string());
        self.discover(file.path());
    }

    fn next_diagnostic(&mut self) -> Option<Diagnostic> {
        self.diagnostics.pop_front()
    }
}

pub struct FakeArtifact {
    valid: bool,
    broken_text: bool,
    log: Rc<RefCell<EngineLog>>,
}

impl Artifact for FakeArtifact {
    fn validate(&self) -> bool {
        self.valid
    }

    fn run_passes(&mut self, names: &[&str]) {
        let mut log = self.log.borrow_mut();
        log.passes.extend(names.iter().map(|n| n.to_string()));
    }

    fn optimize(&mut self) {
        self.log.borrow_mut().optimized += 1;
    }

    fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(BINARY.to_vec())
    }

    fn to_text(&self) -> Result<String> {
        if self.broken_text {
            return Err(Error::Emit {
                format: "text".to_string(),
                message: "printer failed".to_string(),
            });
        }
        Ok(TEXT.to_string())
    }

    fn to_asmjs(&self) -> Result<String> {
        Ok(ASMJS.to_string())
    }

    fn dispose(self) {
        self.log.borrow_mut().disposed += 1;
    }
}

impl Engine for FakeEngine {
    type Session = FakeSession;
    type Artifact = FakeArtifact;

    fn new_session(&self, entry: SourceFile) -> FakeSession {
        let mut requested = HashSet::new();
        requested.insert(entry.path().to_string());
        let mut session = FakeSession {
            imports: self.imports.clone(),
            requested,
            pending: VecDeque::new(),
            diagnostics: self.parse_diagnostics.iter().cloned().collect(),
            log: self.log.clone(),
        };
        session.discover(entry.path());
        session
    }

    fn compile(&self, session: &mut FakeSession, options: &CompileOptions) -> FakeArtifact {
        {
            let mut log = self.log.borrow_mut();
            log.compile_calls += 1;
            log.options = Some(options.clone());
        }
        session
            .diagnostics
            .extend(self.compile_diagnostics.iter().cloned());
        FakeArtifact {
            valid: !self.invalid,
            broken_text: self.broken_text,
            log: self.log.clone(),
        }
    }
}

/// Sink that records writes instead of touching the filesystem
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub files: Vec<(PathBuf, Vec<u8>)>,
    pub stdout: Vec<u8>,
}

impl OutputSink for RecordingSink {
    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        self.files.push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }

    fn write_stdout(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stdout.extend_from_slice(bytes);
        Ok(())
    }
}

/// In-memory source tree
pub fn sources(entries: &[&str]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|path| (path.to_string(), format!("// {}", path)))
        .collect()
}
