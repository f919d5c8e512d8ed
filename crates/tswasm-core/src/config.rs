//! Driver configuration
//!
//! A [`DriverConfig`] is built once from the command line and then passed
//! by reference to every component. Nothing in this crate reads process
//! arguments or environment state on its own.

use crate::pipeline::TrapMode;
use crate::resolver::DEFAULT_SOURCE_EXTENSION;

/// Requested output destinations
///
/// Each field is `None` when the format was not requested and
/// `Some("")` when it should be printed to stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Unified output path; its extension picks the format
    pub out_file: Option<String>,

    /// Binary module path
    pub binary_file: Option<String>,

    /// Text format path
    pub text_file: Option<String>,

    /// asm.js source path
    pub asmjs_file: Option<String>,
}

impl OutputConfig {
    /// Whether any output flag was given
    pub fn is_empty(&self) -> bool {
        self.out_file.is_none()
            && self.binary_file.is_none()
            && self.text_file.is_none()
            && self.asmjs_file.is_none()
    }
}

/// Immutable configuration for one compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Logical path of the entry file
    pub entry: String,

    /// Source file extension, leading dot included
    pub source_extension: String,

    /// Validate the compiled module
    pub validate: bool,

    /// Run the optimization pipeline
    pub optimize: bool,

    /// Remove unreachable code
    pub tree_shaking: bool,

    /// Emit debug information
    pub debug_info: bool,

    /// Trap-handling transform to apply
    pub trap_mode: TrapMode,

    /// Output destinations
    pub output: OutputConfig,
}

impl DriverConfig {
    /// Default configuration for `entry`
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            validate: false,
            optimize: false,
            tree_shaking: true,
            debug_info: true,
            trap_mode: TrapMode::None,
            output: OutputConfig::default(),
        }
    }

    /// Set validation
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Set optimization
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Set tree-shaking
    pub fn with_tree_shaking(mut self, tree_shaking: bool) -> Self {
        self.tree_shaking = tree_shaking;
        self
    }

    /// Set debug info
    pub fn with_debug_info(mut self, debug_info: bool) -> Self {
        self.debug_info = debug_info;
        self
    }

    /// Set the trap mode
    pub fn with_trap_mode(mut self, trap_mode: TrapMode) -> Self {
        self.trap_mode = trap_mode;
        self
    }

    /// Set the source extension
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Set the output destinations
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}
