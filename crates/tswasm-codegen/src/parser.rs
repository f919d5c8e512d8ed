//! Line-oriented source parser
//!
//! Each non-blank, non-comment line must be one of:
//!
//! ```ts
//! import { a, b } from "./path";
//! import "./path";
//! export { a } from "./path";
//! export * from "./path";
//! export function name(): i32 { return 42; }
//! function name(): i32 { return other(); }
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tswasm_core::{Diagnostic, Location};

/// File extension shown in diagnostics
pub const SOURCE_EXTENSION: &str = ".ts";

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:import|export)\s+(?:[\w$*{}\s,]+?\s+from\s+)?["']([^"']+)["']\s*;?$"#)
        .expect("import pattern is valid")
});

static FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(export\s+)?function\s+([A-Za-z_$][\w$]*)\s*\(\s*\)\s*:\s*i32\s*\{\s*return\s+(.*?)\s*;?\s*\}$",
    )
    .expect("function pattern is valid")
});

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

static CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_$][\w$]*)\s*\(\s*\)$").expect("call pattern is valid")
});

/// Function body expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// 32-bit integer literal
    Int(i32),
    /// Call of a zero-argument function
    Call(String),
}

/// An import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Specifier as written
    pub specifier: String,
    /// Logical path relative to the project root
    pub path: String,
}

/// A function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Function name
    pub name: String,
    /// Declared with `export`
    pub exported: bool,
    /// Returned expression
    pub body: Expr,
    /// Location of the declaration
    pub location: Location,
    /// Location of the returned expression
    pub body_location: Location,
}

/// Result of parsing one file
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Canonical logical path
    pub path: String,
    /// Imports in source order
    pub imports: Vec<ImportDecl>,
    /// Functions in source order
    pub functions: Vec<FunctionDecl>,
    /// Parse diagnostics in source order
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse the source text of the file at `path`
pub fn parse(path: &str, text: &str) -> ParsedFile {
    let file_name = format!("{}{}", path, SOURCE_EXTENSION);
    let mut parsed = ParsedFile {
        path: path.to_string(),
        ..Default::default()
    };

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let indent = raw.len() - raw.trim_start().len();
        let location = |offset: usize| {
            Location::new(&file_name, line_no, indent + offset + 1).with_line_text(raw)
        };

        if let Some(caps) = IMPORT.captures(line) {
            let specifier = caps[1].to_string();
            parsed.imports.push(ImportDecl {
                path: resolve_import(path, &specifier),
                specifier,
            });
            continue;
        }

        if let Some(caps) = FUNCTION.captures(line) {
            let name = caps[2].to_string();
            let Some(body_match) = caps.get(3) else {
                continue;
            };
            let body_location = location(body_match.start());
            match parse_expr(body_match.as_str()) {
                Ok(body) => parsed.functions.push(FunctionDecl {
                    name,
                    exported: caps.get(1).is_some(),
                    body,
                    location: location(0),
                    body_location,
                }),
                Err(diagnostic) => parsed.diagnostics.push(diagnostic.at(body_location)),
            }
            continue;
        }

        parsed.diagnostics.push(
            Diagnostic::error("TS1128", "Declaration or statement expected.").at(location(0)),
        );
    }

    if parsed.imports.is_empty() && parsed.functions.is_empty() && parsed.diagnostics.is_empty() {
        parsed.diagnostics.push(
            Diagnostic::info("TS1010", format!("'{}' contains no declarations.", file_name))
                .at(Location::new(&file_name, 1, 1)),
        );
    }

    tracing::trace!(
        "Parsed {}: {} import(s), {} function(s)",
        file_name,
        parsed.imports.len(),
        parsed.functions.len()
    );
    parsed
}

fn parse_expr(text: &str) -> Result<Expr, Diagnostic> {
    if INTEGER.is_match(text) {
        return match text.parse::<i32>() {
            Ok(value) => Ok(Expr::Int(value)),
            Err(_) => Err(Diagnostic::error(
                "TS1006",
                format!("Literal '{}' does not fit in an i32.", text),
            )),
        };
    }
    if let Some(caps) = CALL.captures(text) {
        return Ok(Expr::Call(caps[1].to_string()));
    }
    Err(Diagnostic::error("TS1109", "Expression expected."))
}

/// Resolve an import specifier against the importing file's directory
///
/// `.` and `..` segments are folded and a trailing `.ts` or `/` is dropped.
pub fn resolve_import(importer: &str, specifier: &str) -> String {
    let specifier = specifier.replace('\\', "/");
    let absolute = specifier.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    if !absolute {
        if let Some((dir, _)) = importer.rsplit_once('/') {
            segments.extend(dir.split('/').filter(|s| !s.is_empty() && *s != "."));
        }
    }

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    let joined = joined
        .strip_suffix(SOURCE_EXTENSION)
        .map(str::to_string)
        .unwrap_or(joined);
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
