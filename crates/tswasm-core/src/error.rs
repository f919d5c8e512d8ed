//! Error types for tswasm-core

use thiserror::Error;

use crate::source::SourceOrigin;

/// Result type alias for tswasm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a compilation run
///
/// Every variant is fatal: the driver never retries, and all of them map to
/// exit code `1`.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither `<path>.ts` nor `<path>/index.ts` could be read
    #[error("{origin} '{path}' not found.")]
    FileNotFound {
        /// Path that was tried first (`<path>` plus the source extension)
        path: String,
        /// Whether the missing file was the entry or an import
        origin: SourceOrigin,
    },

    /// Error diagnostics were reported while resolving the module graph
    #[error("parsing failed with {errors} error(s)")]
    ParsePhaseDiagnostics {
        /// Number of error-severity diagnostics
        errors: usize,
    },

    /// Error diagnostics were reported by the compile stage
    #[error("compilation failed with {errors} error(s)")]
    CompilePhaseDiagnostics {
        /// Number of error-severity diagnostics
        errors: usize,
    },

    /// The compiled module did not pass validation
    #[error("validation failed")]
    ValidationFailed,

    /// The engine could not produce an output representation
    #[error("failed to emit {format} output: {message}")]
    Emit {
        /// Name of the requested format
        format: String,
        /// Description of the failure
        message: String,
    },

    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }
}
