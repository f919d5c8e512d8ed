//! End-to-end compilation driver
//!
//! Sequences the components for one run:
//!
//! 1. resolve the module graph (fatal on a missing file)
//! 2. drain parse diagnostics (errors skip compilation)
//! 3. compile
//! 4. drain compile diagnostics (errors dispose the module and abort)
//! 5. validate / trap-mode / optimize as configured
//! 6. write the requested outputs
//!
//! Output is only written after every gate has passed, so a failed run
//! never leaves partial files behind.

use std::io::Write;

use crate::config::DriverConfig;
use crate::diagnostics::DiagnosticCollector;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graph::{ModuleGraph, ModuleGraphBuilder};
use crate::output::{Emission, OutputPlan, OutputSink};
use crate::pipeline::CompilationPipeline;
use crate::resolver::FileResolver;
use crate::source::SourceLoader;

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// Canonical paths of every compiled file, entry first
    pub files: Vec<String>,
    /// Outputs that were written
    pub emissions: Vec<Emission>,
    /// Warnings reported across both phases
    pub warnings: usize,
}

/// Runs compilations against an engine
pub struct Driver<'e, E, L, S> {
    engine: &'e E,
    loader: L,
    sink: S,
}

impl<'e, E: Engine, L: SourceLoader, S: OutputSink> Driver<'e, E, L, S> {
    /// Create a driver reading sources through `loader` and writing through `sink`
    pub fn new(engine: &'e E, loader: L, sink: S) -> Self {
        Self {
            engine,
            loader,
            sink,
        }
    }

    /// Consume the driver and return its output sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Compile according to `config`
    ///
    /// Diagnostics are written to `diagnostics`, styled when `colorize` is set.
    pub fn run(
        &mut self,
        config: &DriverConfig,
        diagnostics: &mut dyn Write,
        colorize: bool,
    ) -> Result<CompileOutcome> {
        let resolver = FileResolver::with_extension(&self.loader, config.source_extension.as_str());
        let ModuleGraph { mut session, files } =
            ModuleGraphBuilder::new(self.engine, &resolver).build(&config.entry)?;

        let mut collector = DiagnosticCollector::new(diagnostics, colorize);
        let parsed = collector.drain(self.engine, &mut session)?;
        if parsed.has_errors() {
            return Err(Error::ParsePhaseDiagnostics {
                errors: parsed.errors,
            });
        }

        let pipeline = CompilationPipeline::from_config(config);
        let mut artifact = pipeline.compile(self.engine, &mut session);

        let compiled = collector.drain(self.engine, &mut session)?;
        if compiled.has_errors() {
            return Err(Error::CompilePhaseDiagnostics {
                errors: compiled.errors,
            });
        }

        pipeline.run_stages(&mut *artifact)?;

        let plan = OutputPlan::from_config(&config.output);
        plan.execute(&*artifact, &mut self.sink)?;
        artifact.dispose();

        tracing::info!(
            "Compiled {} file(s) from {}",
            files.len(),
            config.entry
        );

        Ok(CompileOutcome {
            files,
            emissions: plan.emissions().to_vec(),
            warnings: parsed.warnings + compiled.warnings,
        })
    }
}
