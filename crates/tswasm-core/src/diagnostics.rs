//! Diagnostics and the severity gate between pipeline phases
//!
//! The engine queues diagnostics on its session while parsing and compiling.
//! [`DiagnosticCollector::drain`] empties that queue after each phase,
//! prints every entry to the error stream in the order it was produced and
//! reports whether any of them was an error.

use colored::Colorize;
use std::fmt;
use std::io::Write;

use crate::engine::{Engine, Session};
use crate::error::Result;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note
    Info,
    /// Suspicious but compilable code
    Warning,
    /// The program cannot be compiled
    Error,
}

impl Severity {
    /// Lowercase label used in rendered output
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    fn painted(&self) -> String {
        match self {
            Severity::Info => self.label().blue().bold().to_string(),
            Severity::Warning => self.label().yellow().bold().to_string(),
            Severity::Error => self.label().red().bold().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source location of a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File name as shown to the user
    pub path: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Text of the offending line, used for the caret snippet
    pub line_text: Option<String>,
}

impl Location {
    /// Create a location without a snippet
    pub fn new(path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            line_text: None,
        }
    }

    /// Attach the source line for snippet rendering
    pub fn with_line_text(mut self, text: impl Into<String>) -> Self {
        self.line_text = Some(text.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// An engine-produced message about the source being compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Short code, e.g. `TS1005`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Where the problem was found, if known
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a diagnostic without a location
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Error-severity diagnostic
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Warning-severity diagnostic
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Info-severity diagnostic
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Attach a source location
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Severity of this diagnostic
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Whether this diagnostic blocks compilation
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render for a human reader, with ANSI styling when `colorize` is set
    ///
    /// ```text
    /// error[TS1005]: ';' expected
    ///  --> main.ts:3:12
    ///   |
    /// 3 | return 42
    ///   |          ^
    /// ```
    pub fn render(&self, colorize: bool) -> String {
        let mut out = if colorize {
            format!(
                "{}[{}]: {}",
                self.severity.painted(),
                self.code,
                self.message.as_str().bold()
            )
        } else {
            format!("{}[{}]: {}", self.severity.label(), self.code, self.message)
        };

        let Some(location) = &self.location else {
            return out;
        };

        let line_no = location.line.to_string();
        let pad = " ".repeat(line_no.len());
        let arrow = if colorize {
            "-->".cyan().bold().to_string()
        } else {
            "-->".to_string()
        };
        out.push_str(&format!("\n{} {} {}", pad, arrow, location));

        if let Some(text) = &location.line_text {
            let bar = if colorize {
                "|".cyan().bold().to_string()
            } else {
                "|".to_string()
            };
            let caret_offset = " ".repeat(location.column.saturating_sub(1));
            let caret = if colorize {
                self.severity_colored("^")
            } else {
                "^".to_string()
            };
            out.push_str(&format!("\n{} {}", pad, bar));
            out.push_str(&format!("\n{} {} {}", line_no, bar, text));
            out.push_str(&format!("\n{} {} {}{}", pad, bar, caret_offset, caret));
        }

        out
    }

    fn severity_colored(&self, text: &str) -> String {
        match self.severity {
            Severity::Info => text.blue().bold().to_string(),
            Severity::Warning => text.yellow().bold().to_string(),
            Severity::Error => text.red().bold().to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Counts of drained diagnostics by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Error-severity count
    pub errors: usize,
    /// Warning-severity count
    pub warnings: usize,
    /// Info-severity count
    pub infos: usize,
}

impl DrainReport {
    /// Whether at least one error was seen
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Total number of drained diagnostics
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }

    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.infos += 1,
        }
    }
}

/// Drains a session's diagnostics into an error stream
pub struct DiagnosticCollector<'w> {
    out: &'w mut dyn Write,
    colorize: bool,
}

impl<'w> DiagnosticCollector<'w> {
    /// Write to `out`, styling output when `colorize` is set
    pub fn new(out: &'w mut dyn Write, colorize: bool) -> Self {
        Self { out, colorize }
    }

    /// Print every pending diagnostic in discovery order and count them
    pub fn drain<E: Engine>(&mut self, engine: &E, session: &mut E::Session) -> Result<DrainReport> {
        let mut report = DrainReport::default();
        while let Some(diagnostic) = session.next_diagnostic() {
            report.record(diagnostic.severity());
            writeln!(
                self.out,
                "{}",
                engine.format_diagnostic(&diagnostic, self.colorize)
            )?;
        }
        self.out.flush()?;

        if report.total() > 0 {
            tracing::debug!(
                "Drained {} diagnostic(s): {} error(s), {} warning(s), {} info",
                report.total(),
                report.errors,
                report.warnings,
                report.infos
            );
        }
        Ok(report)
    }
}
