//! Compilation engine collaborator interface
//!
//! The driver never parses, type-checks or generates code itself. It talks
//! to an engine through these traits:
//!
//! - [`Engine`] seeds sessions, compiles them and formats diagnostics
//! - [`Session`] exposes two lazy, finite pull sequences: pending import
//!   paths and diagnostics
//! - [`Artifact`] is the compiled module, owned by the driver until disposed
//!
//! Engines decide which imports are pending, including deduplication and
//! cycle handling. The driver only turns paths into text.

use std::ops::{Deref, DerefMut};

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::pipeline::CompileOptions;
use crate::source::SourceFile;

/// A compilation engine
pub trait Engine {
    /// Module graph state for one compilation
    type Session: Session;
    /// Compiled module handle
    type Artifact: Artifact;

    /// Start a session from the entry file
    fn new_session(&self, entry: SourceFile) -> Self::Session;

    /// Compile every file supplied to `session`
    ///
    /// Semantic diagnostics are queued on the session.
    fn compile(&self, session: &mut Self::Session, options: &CompileOptions) -> Self::Artifact;

    /// Format a diagnostic for the error stream
    fn format_diagnostic(&self, diagnostic: &Diagnostic, colorize: bool) -> String {
        diagnostic.render(colorize)
    }
}

/// Engine-owned module graph state
pub trait Session {
    /// Next import path the engine wants resolved, or `None` once the graph is complete
    fn next_pending_import(&mut self) -> Option<String>;

    /// Feed a resolved import back into the session
    fn supply(&mut self, file: SourceFile);

    /// Next queued diagnostic, or `None` when the queue is drained
    fn next_diagnostic(&mut self) -> Option<Diagnostic>;
}

/// A compiled module
pub trait Artifact {
    /// Check the module for structural validity
    fn validate(&self) -> bool;

    /// Run the named transform passes in order
    fn run_passes(&mut self, names: &[&str]);

    /// Run the full optimization pipeline
    fn optimize(&mut self);

    /// Binary module bytes
    fn to_binary(&self) -> Result<Vec<u8>>;

    /// Human-readable text form
    fn to_text(&self) -> Result<String>;

    /// asm.js-style JavaScript source
    fn to_asmjs(&self) -> Result<String>;

    /// Release the module
    fn dispose(self);
}

/// Exclusive owner of an artifact that disposes it exactly once
///
/// Dropping the guard disposes the artifact, so every exit path of the
/// driver (including `?` returns) releases it.
pub struct OwnedArtifact<A: Artifact> {
    inner: Option<A>,
}

impl<A: Artifact> OwnedArtifact<A> {
    /// Take ownership of a freshly compiled artifact
    pub fn new(artifact: A) -> Self {
        Self {
            inner: Some(artifact),
        }
    }

    /// Dispose now instead of at end of scope
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(artifact) = self.inner.take() {
            tracing::trace!("Disposing compiled artifact");
            artifact.dispose();
        }
    }
}

impl<A: Artifact> Deref for OwnedArtifact<A> {
    type Target = A;

    fn deref(&self) -> &A {
        // `inner` is only emptied by `release`, which consumes or drops the guard.
        match &self.inner {
            Some(artifact) => artifact,
            None => unreachable!("artifact accessed after disposal"),
        }
    }
}

impl<A: Artifact> DerefMut for OwnedArtifact<A> {
    fn deref_mut(&mut self) -> &mut A {
        match &mut self.inner {
            Some(artifact) => artifact,
            None => unreachable!("artifact accessed after disposal"),
        }
    }
}

impl<A: Artifact> Drop for OwnedArtifact<A> {
    fn drop(&mut self) {
        self.release();
    }
}
