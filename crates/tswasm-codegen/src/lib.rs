//! tswasm Reference Engine
//!
//! This crate implements the `tswasm_core` engine traits for a deliberately
//! small TypeScript subset, so the driver can be run end to end.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌─────────┐     ┌─────────┐
//! │ Source  │────▶│ Session │────▶│   IR    │────▶│  WASM   │
//! │ (.ts)   │     │ (Parse) │     │ (Check) │     │ (Encode)│
//! └─────────┘     └─────────┘     └─────────┘     └─────────┘
//! ```
//!
//! # Supported Source
//!
//! ```ts
//! import { helper } from "./lib/helpers";
//! export function answer(): i32 { return helper(); }
//! function local(): i32 { return -1; }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tswasm_codegen::ReferenceEngine;
//! use tswasm_core::{Driver, DriverConfig, FsLoader, FsSink};
//!
//! let engine = ReferenceEngine::new();
//! let mut driver = Driver::new(&engine, FsLoader::default(), FsSink::stdout());
//! driver.run(&DriverConfig::new("main"), &mut std::io::stderr(), false)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod ir;
pub mod module;
pub mod parser;
pub mod session;

pub use compiler::ReferenceEngine;
pub use error::{Error, Result};
pub use ir::ModuleIR;
pub use module::CompiledModule;
pub use session::SourceSession;
