//! Pull-based module graph discovery
//!
//! The engine owns the worklist. The builder seeds a session with the entry
//! file, then keeps asking for the next pending import and answers each
//! request with resolved source text until the engine says the graph is
//! complete. A missing file aborts the loop immediately.

use crate::engine::{Engine, Session};
use crate::error::Result;
use crate::resolver::FileResolver;
use crate::source::{SourceLoader, SourceOrigin};

/// A fully resolved module graph
pub struct ModuleGraph<S> {
    /// Session holding every supplied file
    pub session: S,
    /// Canonical paths in the order they were supplied, entry first
    pub files: Vec<String>,
}

/// Drives import discovery for one session
pub struct ModuleGraphBuilder<'a, E, L> {
    engine: &'a E,
    resolver: &'a FileResolver<L>,
}

impl<'a, E: Engine, L: SourceLoader> ModuleGraphBuilder<'a, E, L> {
    /// Create a builder over `engine` and `resolver`
    pub fn new(engine: &'a E, resolver: &'a FileResolver<L>) -> Self {
        Self { engine, resolver }
    }

    /// Resolve `entry` and every file it transitively imports
    pub fn build(&self, entry: &str) -> Result<ModuleGraph<E::Session>> {
        let entry_file = self.resolver.resolve(entry, SourceOrigin::Entry)?;
        tracing::debug!("Entry file: {}", entry_file.path());

        let mut files = vec![entry_file.path().to_string()];
        let mut session = self.engine.new_session(entry_file);

        while let Some(pending) = session.next_pending_import() {
            let file = self.resolver.resolve(&pending, SourceOrigin::Import)?;
            tracing::debug!("Supplying import {} as {}", pending, file.path());
            files.push(file.path().to_string());
            session.supply(file);
        }

        tracing::debug!("Module graph complete: {} file(s)", files.len());
        Ok(ModuleGraph { session, files })
    }
}
