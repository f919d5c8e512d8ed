//! tswasm Driver Core
//!
//! This crate provides the orchestration logic of the tswasm compiler
//! front-end:
//! - Source file resolution (`foo` → `foo.ts` or `foo/index.ts`)
//! - Pull-based module graph discovery against a compilation engine
//! - Severity-gated diagnostic collection between phases
//! - The fixed compile → validate → trap-mode → optimize pipeline
//! - Output routing to binary, text and asm.js destinations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Module    │────▶│ Diagnostic  │────▶│  Pipeline   │────▶│   Output    │
//! │   Graph     │     │    Gate     │     │  (stages)   │     │   Router    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The compilation engine itself is an external collaborator described by
//! the traits in [`engine`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tswasm_core::{Driver, DriverConfig, FsLoader, FsSink};
//!
//! let config = DriverConfig::new("src/main").with_validate(true);
//! let mut stderr = std::io::stderr();
//! Driver::new(&engine, FsLoader::default(), FsSink::stdout())
//!     .run(&config, &mut stderr, false)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod engine;
pub mod error;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod source;

pub use config::{DriverConfig, OutputConfig};
pub use diagnostics::{Diagnostic, DiagnosticCollector, DrainReport, Location, Severity};
pub use driver::{CompileOutcome, Driver};
pub use engine::{Artifact, Engine, OwnedArtifact, Session};
pub use error::{Error, Result};
pub use graph::{ModuleGraph, ModuleGraphBuilder};
pub use output::{Destination, Emission, FsSink, OutputFormat, OutputPlan, OutputSink};
pub use pipeline::{CompilationPipeline, CompileOptions, Target, TrapMode};
pub use resolver::FileResolver;
pub use source::{FsLoader, SourceFile, SourceLoader, SourceOrigin};
