//! Output routing
//!
//! Deciding where output goes is a pure function of the configuration
//! ([`OutputPlan::from_config`]); performing the writes goes through an
//! [`OutputSink`] so the decision logic can be tested without touching the
//! filesystem.
//!
//! Rules:
//! - `--outFile` picks a format from its extension (`.wast`/`.wat` → text,
//!   `.js` → asm.js, anything else → binary) unless that format already has
//!   an explicit path
//! - explicit per-format paths are honored independently
//! - an empty path prints that format to stdout
//! - with no output flags at all, the text form is printed to stdout

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::engine::Artifact;
use crate::error::Result;

/// Output representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Binary module bytes
    Binary,
    /// Text format
    Text,
    /// asm.js-style JavaScript
    Asmjs,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Binary => write!(f, "binary"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Asmjs => write!(f, "asm.js"),
        }
    }
}

/// Where one representation is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A file on disk
    File(PathBuf),
    /// Standard output
    Stdout,
}

/// One format written to one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    /// Representation to produce
    pub format: OutputFormat,
    /// Where to write it
    pub destination: Destination,
}

impl Emission {
    fn new(format: OutputFormat, path: &str) -> Self {
        let destination = if path.is_empty() {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(path))
        };
        Self {
            format,
            destination,
        }
    }
}

/// Every emission a run will perform, in binary, text, asm.js order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    emissions: Vec<Emission>,
}

impl OutputPlan {
    /// Decide destinations from the output flags
    pub fn from_config(config: &OutputConfig) -> Self {
        let mut binary = config.binary_file.clone();
        let mut text = config.text_file.clone();
        let mut asmjs = config.asmjs_file.clone();

        if let Some(out_file) = &config.out_file {
            if (out_file.ends_with(".wast") || out_file.ends_with(".wat")) && text.is_none() {
                text = Some(out_file.clone());
            } else if out_file.ends_with(".js") && asmjs.is_none() {
                asmjs = Some(out_file.clone());
            } else if binary.is_none() {
                binary = Some(out_file.clone());
            } else {
                tracing::warn!(
                    "Ignoring --outFile '{}': every matching format already has a destination",
                    out_file
                );
            }
        }

        let emissions: Vec<Emission> = [
            (OutputFormat::Binary, binary),
            (OutputFormat::Text, text),
            (OutputFormat::Asmjs, asmjs),
        ]
        .into_iter()
        .filter_map(|(format, path)| path.map(|p| Emission::new(format, &p)))
        .collect();

        if emissions.is_empty() {
            return Self {
                emissions: vec![Emission {
                    format: OutputFormat::Text,
                    destination: Destination::Stdout,
                }],
            };
        }

        Self { emissions }
    }

    /// Planned emissions
    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    /// Write every planned emission
    ///
    /// Every view is produced before the first write, so a failing view
    /// leaves no output behind.
    pub fn execute<A: Artifact, S: OutputSink>(&self, artifact: &A, sink: &mut S) -> Result<()> {
        let rendered = self
            .emissions
            .iter()
            .map(|emission| render(artifact, emission.format).map(|bytes| (emission, bytes)))
            .collect::<Result<Vec<_>>>()?;

        for (emission, bytes) in rendered {
            match &emission.destination {
                Destination::File(path) => {
                    tracing::debug!("Writing {} output to {}", emission.format, path.display());
                    sink.write_file(path, &bytes)?;
                }
                Destination::Stdout => {
                    tracing::debug!("Printing {} output to stdout", emission.format);
                    sink.write_stdout(&bytes)?;
                }
            }
        }
        Ok(())
    }
}

fn render<A: Artifact>(artifact: &A, format: OutputFormat) -> Result<Vec<u8>> {
    Ok(match format {
        OutputFormat::Binary => artifact.to_binary()?,
        OutputFormat::Text => artifact.to_text()?.into_bytes(),
        OutputFormat::Asmjs => artifact.to_asmjs()?.into_bytes(),
    })
}

/// Receives the final output bytes
pub trait OutputSink {
    /// Write `bytes` to the file at `path`
    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> std::io::Result<()>;

    /// Write `bytes` to standard output
    fn write_stdout(&mut self, bytes: &[u8]) -> std::io::Result<()>;
}

/// Writes files to disk and stdout output to a writer
pub struct FsSink<W> {
    stdout: W,
}

impl FsSink<std::io::Stdout> {
    /// Sink printing to the process stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> FsSink<W> {
    /// Sink printing to `stdout`
    pub fn new(stdout: W) -> Self {
        Self { stdout }
    }

    /// Recover the stdout writer
    pub fn into_inner(self) -> W {
        self.stdout
    }
}

impl<W: Write> OutputSink for FsSink<W> {
    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::write(path, bytes)
    }

    fn write_stdout(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stdout.write_all(bytes)?;
        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(format: OutputFormat, path: &str) -> Emission {
        Emission {
            format,
            destination: Destination::File(PathBuf::from(path)),
        }
    }

    fn stdout(format: OutputFormat) -> Emission {
        Emission {
            format,
            destination: Destination::Stdout,
        }
    }

    fn out_file(path: &str) -> OutputConfig {
        OutputConfig {
            out_file: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_flags_prints_text() {
        let plan = OutputPlan::from_config(&OutputConfig::default());
        assert_eq!(plan.emissions(), &[stdout(OutputFormat::Text)]);
    }

    #[rstest]
    #[case("module.wast", OutputFormat::Text)]
    #[case("module.wat", OutputFormat::Text)]
    #[case("module.js", OutputFormat::Asmjs)]
    #[case("module.wasm", OutputFormat::Binary)]
    #[case("module", OutputFormat::Binary)]
    #[case(".wast", OutputFormat::Text)]
    #[case("out/.wat", OutputFormat::Text)]
    #[case(".js", OutputFormat::Asmjs)]
    fn test_out_file_extension_inference(#[case] path: &str, #[case] format: OutputFormat) {
        let plan = OutputPlan::from_config(&out_file(path));
        assert_eq!(plan.emissions(), &[file(format, path)]);
    }

    #[test]
    fn test_out_file_falls_through_to_binary_when_text_is_taken() {
        let config = OutputConfig {
            out_file: Some("module.wast".to_string()),
            text_file: Some("other.wast".to_string()),
            ..Default::default()
        };
        let plan = OutputPlan::from_config(&config);
        assert_eq!(
            plan.emissions(),
            &[
                file(OutputFormat::Binary, "module.wast"),
                file(OutputFormat::Text, "other.wast"),
            ]
        );
    }

    #[test]
    fn test_out_file_ignored_when_binary_is_taken() {
        let config = OutputConfig {
            out_file: Some("module.wasm".to_string()),
            binary_file: Some("explicit.wasm".to_string()),
            ..Default::default()
        };
        let plan = OutputPlan::from_config(&config);
        assert_eq!(
            plan.emissions(),
            &[file(OutputFormat::Binary, "explicit.wasm")]
        );
    }

    #[test]
    fn test_multiple_formats() {
        let config = OutputConfig {
            binary_file: Some("m.wasm".to_string()),
            text_file: Some("m.wast".to_string()),
            asmjs_file: Some("m.js".to_string()),
            ..Default::default()
        };
        let plan = OutputPlan::from_config(&config);
        assert_eq!(
            plan.emissions(),
            &[
                file(OutputFormat::Binary, "m.wasm"),
                file(OutputFormat::Text, "m.wast"),
                file(OutputFormat::Asmjs, "m.js"),
            ]
        );
    }

    #[rstest]
    #[case(OutputConfig { binary_file: Some(String::new()), ..Default::default() }, OutputFormat::Binary)]
    #[case(OutputConfig { text_file: Some(String::new()), ..Default::default() }, OutputFormat::Text)]
    #[case(OutputConfig { asmjs_file: Some(String::new()), ..Default::default() }, OutputFormat::Asmjs)]
    #[case(OutputConfig { out_file: Some(String::new()), ..Default::default() }, OutputFormat::Binary)]
    fn test_empty_path_prints_to_stdout(#[case] config: OutputConfig, #[case] format: OutputFormat) {
        let plan = OutputPlan::from_config(&config);
        assert_eq!(plan.emissions(), &[stdout(format)]);
    }

    #[test]
    fn test_stdout_and_file_mixed() {
        let config = OutputConfig {
            binary_file: Some("m.wasm".to_string()),
            asmjs_file: Some(String::new()),
            ..Default::default()
        };
        let plan = OutputPlan::from_config(&config);
        assert_eq!(
            plan.emissions(),
            &[file(OutputFormat::Binary, "m.wasm"), stdout(OutputFormat::Asmjs)]
        );
    }

    #[test]
    fn test_fs_sink_writes_files_and_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(Vec::new());

        let path = dir.path().join("out.wasm");
        sink.write_file(&path, b"\0asm").unwrap();
        sink.write_stdout(b"(module)").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\0asm");
        assert_eq!(sink.into_inner(), b"(module)");
    }
}
