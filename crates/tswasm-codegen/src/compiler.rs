//! Reference compilation engine
//!
//! Lowers the parsed files of a session into a [`ModuleIR`]: names are
//! resolved across files, the entry file's exports become module exports,
//! and unreachable functions are dropped when tree shaking is on.

use std::collections::{HashMap, HashSet};

use tswasm_core::{CompileOptions, Diagnostic, Engine, SourceFile};

use crate::ir::{BodyIR, FunctionIR, ModuleIR};
use crate::module::CompiledModule;
use crate::parser::{Expr, FunctionDecl, ParsedFile};
use crate::session::SourceSession;

/// Engine for the supported TypeScript subset
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEngine;

impl ReferenceEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }
}

impl Engine for ReferenceEngine {
    type Session = SourceSession;
    type Artifact = CompiledModule;

    fn new_session(&self, entry: SourceFile) -> SourceSession {
        tracing::debug!("Starting session at {}", entry.path());
        SourceSession::new(entry)
    }

    fn compile(&self, session: &mut SourceSession, options: &CompileOptions) -> CompiledModule {
        let (ir, diagnostics) = lower(session.files(), options);
        for diagnostic in diagnostics {
            session.push_diagnostic(diagnostic);
        }

        let hash = ir.content_hash();
        tracing::info!(
            "Lowered {} file(s) to {} function(s), {} export(s) [{}]",
            session.files().len(),
            ir.functions.len(),
            ir.export_count(),
            &hash[..8]
        );

        CompiledModule::new(ir)
    }
}

/// Lower parsed files into a module
///
/// The first file is the entry. Semantic diagnostics are returned alongside
/// the module; the module is only meaningful when none of them are errors.
pub fn lower(files: &[ParsedFile], options: &CompileOptions) -> (ModuleIR, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    let mut declared: Vec<(&FunctionDecl, bool)> = Vec::new();
    let mut indices: HashMap<&str, u32> = HashMap::new();
    for (file_index, file) in files.iter().enumerate() {
        for decl in &file.functions {
            if indices.contains_key(decl.name.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "TS2300",
                        format!("Duplicate function implementation '{}'.", decl.name),
                    )
                    .at(decl.location.clone()),
                );
                continue;
            }
            let index = u32::try_from(declared.len()).unwrap_or(u32::MAX);
            indices.insert(decl.name.as_str(), index);
            declared.push((decl, file_index == 0 && decl.exported));
        }
    }

    let mut called: HashSet<u32> = HashSet::new();
    let mut functions = Vec::with_capacity(declared.len());
    for (decl, export) in &declared {
        let body = match &decl.body {
            Expr::Int(value) => BodyIR::Const(*value),
            Expr::Call(callee) => match indices.get(callee.as_str()) {
                Some(&target) => {
                    called.insert(target);
                    BodyIR::Call(target)
                }
                None => {
                    diagnostics.push(
                        Diagnostic::error("TS2304", format!("Cannot find name '{}'.", callee))
                            .at(decl.body_location.clone()),
                    );
                    BodyIR::Const(0)
                }
            },
        };
        functions.push(FunctionIR {
            name: decl.name.clone(),
            export: *export,
            body,
        });
    }

    for (index, (decl, _)) in declared.iter().enumerate() {
        let used = u32::try_from(index).is_ok_and(|i| called.contains(&i));
        if !decl.exported && !used {
            diagnostics.push(
                Diagnostic::warning(
                    "TS6133",
                    format!("'{}' is declared but its value is never read.", decl.name),
                )
                .at(decl.location.clone()),
            );
        }
    }

    let mut ir = ModuleIR {
        functions,
        debug_names: options.debug_info,
        applied_passes: Vec::new(),
    };
    if options.tree_shaking {
        ir.retain_reachable();
    }

    (ir, diagnostics)
}
