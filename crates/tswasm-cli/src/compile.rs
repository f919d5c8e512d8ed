//! Compile an entry file with the reference engine

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tswasm_codegen::ReferenceEngine;
use tswasm_core::{Destination, Driver, DriverConfig, FsLoader, FsSink};

/// Run the compile command
pub fn run(config: &DriverConfig) -> Result<()> {
    tracing::debug!("Compiling {}", config.entry);

    let engine = ReferenceEngine::new();
    let mut driver = Driver::new(&engine, FsLoader::default(), FsSink::stdout());

    let mut stderr = std::io::stderr();
    let colorize = stderr.is_terminal();

    let outcome = driver
        .run(config, &mut stderr, colorize)
        .with_context(|| format!("Failed to compile {}", config.entry))?;

    for emission in &outcome.emissions {
        match &emission.destination {
            Destination::File(path) => {
                tracing::info!("Wrote {} output to {}", emission.format, path.display())
            }
            Destination::Stdout => tracing::info!("Wrote {} output to stdout", emission.format),
        }
    }

    Ok(())
}

/// Process exit status for a failed run
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<tswasm_core::Error>()
        .map_or(1, tswasm_core::Error::exit_code)
}
