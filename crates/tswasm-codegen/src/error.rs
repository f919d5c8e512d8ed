//! Error types for the reference engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing module output
#[derive(Error, Debug)]
pub enum Error {
    /// Encoded module failed validation
    #[error("invalid module: {0}")]
    InvalidModule(#[from] wasmparser::BinaryReaderError),

    /// Failed to print the text format
    #[error("failed to print module: {message}")]
    PrintError {
        /// Printer error message
        message: String,
    },
}

impl Error {
    /// Convert into the driver's emit error for `format`
    pub fn into_emit(self, format: &str) -> tswasm_core::Error {
        tswasm_core::Error::Emit {
            format: format.to_string(),
            message: self.to_string(),
        }
    }
}
