//! tswasm CLI
//!
//! Compiles a TypeScript entry file, and everything it imports, to
//! WebAssembly.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tswasm_core::{DriverConfig, OutputConfig, TrapMode};

mod compile;

/// tswasm - TypeScript to WebAssembly compiler
#[derive(Parser, Debug)]
#[command(name = "tswasm")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "A bare output flag prints to stdout. Place it after the entry, \
or write it as --binaryFile=, or it takes the entry as its path.")]
struct Cli {
    /// Entry file (the .ts extension is optional)
    entry: String,

    /// Output file, format inferred from the extension (.wast/.wat, .js, otherwise binary)
    #[arg(short = 'o', long = "outFile", value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    out_file: Option<String>,

    /// Binary output file (stdout if empty; use `=` before the entry)
    #[arg(short = 'b', long = "binaryFile", value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    binary_file: Option<String>,

    /// Text format output file (stdout if empty; use `=` before the entry)
    #[arg(short = 't', long = "textFile", value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    text_file: Option<String>,

    /// asm.js output file (stdout if empty; use `=` before the entry)
    #[arg(short = 'a', long = "asmjsFile", value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    asmjs_file: Option<String>,

    /// Validate the module
    #[arg(short = 'c', long)]
    validate: bool,

    /// Optimize the module
    #[arg(short = 'O', long)]
    optimize: bool,

    /// Keep functions that are not reachable from the entry's exports
    #[arg(long = "noTreeShaking")]
    no_tree_shaking: bool,

    /// Omit debug information (function names)
    #[arg(long = "noDebug")]
    no_debug: bool,

    /// Trap mode to apply (clamp, js)
    #[arg(long = "trapMode", value_name = "MODE")]
    trap_mode: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> DriverConfig {
        DriverConfig::new(self.entry)
            .with_validate(self.validate)
            .with_optimize(self.optimize)
            .with_tree_shaking(!self.no_tree_shaking)
            .with_debug_info(!self.no_debug)
            .with_trap_mode(TrapMode::from_flag(self.trap_mode.as_deref()))
            .with_output(OutputConfig {
                out_file: self.out_file,
                binary_file: self.binary_file,
                text_file: self.text_file,
                asmjs_file: self.asmjs_file,
            })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for module output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.into_config();
    match compile::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(compile::exit_code(&e))
        }
    }
}
