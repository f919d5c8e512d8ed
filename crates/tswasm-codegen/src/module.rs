//! Compiled module artifact
//!
//! Wraps a [`ModuleIR`] and produces the three output views on demand:
//! a WebAssembly binary (via `wasm-encoder`), its text form (via
//! `wasmprinter`) and an asm.js rendition.

use std::fmt::Write as _;

use tswasm_core::Artifact;
use wasm_encoder::{
    CodeSection, ExportKind, ExportSection, Function, FunctionSection, Instruction, Module,
    NameMap, NameSection, TypeSection, ValType,
};

use crate::error::{Error, Result};
use crate::ir::{BodyIR, ModuleIR};

/// Transform passes the module understands
pub const KNOWN_PASSES: &[&str] = &["trap-mode-clamp", "trap-mode-js"];

/// A compiled module owned by the driver
#[derive(Debug, Clone)]
pub struct CompiledModule {
    ir: ModuleIR,
}

impl CompiledModule {
    /// Wrap lowered IR
    pub fn new(ir: ModuleIR) -> Self {
        Self { ir }
    }

    /// The module's IR
    pub fn ir(&self) -> &ModuleIR {
        &self.ir
    }

    /// Encode the module as a WebAssembly binary
    pub fn encode(&self) -> Vec<u8> {
        let mut types = TypeSection::new();
        types.ty().function([], [ValType::I32]);

        let mut functions = FunctionSection::new();
        let mut exports = ExportSection::new();
        let mut code = CodeSection::new();
        let mut names = NameMap::new();

        for (index, function) in (0u32..).zip(&self.ir.functions) {
            functions.function(0);
            if function.export {
                exports.export(&function.name, ExportKind::Func, index);
            }

            let mut body = Function::new([]);
            match function.body {
                BodyIR::Const(value) => body.instruction(&Instruction::I32Const(value)),
                BodyIR::Call(target) => body.instruction(&Instruction::Call(target)),
            };
            body.instruction(&Instruction::End);
            code.function(&body);

            names.append(index, &function.name);
        }

        let mut module = Module::new();
        module.section(&types);
        module.section(&functions);
        module.section(&exports);
        module.section(&code);

        if self.ir.debug_names {
            let mut name_section = NameSection::new();
            name_section.functions(&names);
            module.section(&name_section);
        }

        module.finish()
    }

    /// Validate the encoded binary, reporting why it is invalid
    pub fn check(&self) -> Result<()> {
        wasmparser::Validator::new().validate_all(&self.encode())?;
        Ok(())
    }

    fn print_text(&self) -> Result<String> {
        wasmprinter::print_bytes(self.encode()).map_err(|e| Error::PrintError {
            message: e.to_string(),
        })
    }

    fn render_asmjs(&self) -> String {
        let mut out = String::new();
        out.push_str("function asmModule(stdlib, foreign, buffer) {\n");
        out.push_str("  \"use asm\";\n");

        for function in &self.ir.functions {
            let expr = match function.body {
                BodyIR::Const(value) => value.to_string(),
                BodyIR::Call(target) => {
                    let callee = usize::try_from(target)
                        .ok()
                        .and_then(|t| self.ir.functions.get(t))
                        .map_or("undefined", |f| f.name.as_str());
                    format!("{}() | 0", callee)
                }
            };
            let _ = write!(
                out,
                "\n  function {}() {{\n    return {};\n  }}\n",
                function.name, expr
            );
        }

        let exports: Vec<String> = self
            .ir
            .functions
            .iter()
            .filter(|f| f.export)
            .map(|f| format!("{0}: {0}", f.name))
            .collect();
        if exports.is_empty() {
            out.push_str("\n  return {};\n");
        } else {
            let _ = writeln!(out, "\n  return {{ {} }};", exports.join(", "));
        }
        out.push_str("}\n");
        out
    }
}

impl Artifact for CompiledModule {
    fn validate(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Module validation failed: {}", e);
                false
            }
        }
    }

    fn run_passes(&mut self, names: &[&str]) {
        for name in names {
            if KNOWN_PASSES.contains(name) {
                tracing::debug!("Running pass {}", name);
                self.ir.applied_passes.push((*name).to_string());
            } else {
                tracing::warn!("Unknown pass '{}' skipped", name);
            }
        }
    }

    fn optimize(&mut self) {
        let before = self.ir.functions.len();
        self.ir.fold_constants();
        tracing::debug!(
            "Optimized module: {} -> {} function(s)",
            before,
            self.ir.functions.len()
        );
    }

    fn to_binary(&self) -> tswasm_core::Result<Vec<u8>> {
        Ok(self.encode())
    }

    fn to_text(&self) -> tswasm_core::Result<String> {
        self.print_text().map_err(|e| e.into_emit("text"))
    }

    fn to_asmjs(&self) -> tswasm_core::Result<String> {
        Ok(self.render_asmjs())
    }

    fn dispose(self) {
        tracing::trace!("Released module with {} function(s)", self.ir.functions.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FunctionIR;

    fn module(functions: Vec<(&str, bool, BodyIR)>, debug_names: bool) -> CompiledModule {
        CompiledModule::new(ModuleIR {
            functions: functions
                .into_iter()
                .map(|(name, export, body)| FunctionIR {
                    name: name.to_string(),
                    export,
                    body,
                })
                .collect(),
            debug_names,
            applied_passes: Vec::new(),
        })
    }

    fn sample() -> CompiledModule {
        module(
            vec![
                ("main", true, BodyIR::Call(1)),
                ("helper", false, BodyIR::Const(-7)),
            ],
            true,
        )
    }

    #[test]
    fn test_binary_is_valid_wasm() {
        let bytes = sample().to_binary().unwrap();
        assert_eq!(&bytes[..4], b"\0asm");
        assert!(sample().validate());
    }

    #[test]
    fn test_out_of_range_call_is_invalid() {
        let broken = module(vec![("main", true, BodyIR::Call(9))], false);
        assert!(!broken.validate());
        assert!(matches!(broken.check(), Err(Error::InvalidModule(_))));
    }

    #[test]
    fn test_text_form() {
        let text = sample().to_text().unwrap();
        assert!(text.starts_with("(module"));
        assert!(text.contains("(export \"main\""));
        assert!(text.contains("i32.const -7"));
        assert!(text.contains("$helper"));
    }

    #[test]
    fn test_debug_names_are_optional() {
        let with_names = sample().encode();
        let without = module(
            vec![
                ("main", true, BodyIR::Call(1)),
                ("helper", false, BodyIR::Const(-7)),
            ],
            false,
        )
        .encode();
        assert!(with_names.len() > without.len());
    }

    #[test]
    fn test_asmjs_form() {
        let js = sample().to_asmjs().unwrap();
        assert!(js.starts_with("function asmModule(stdlib, foreign, buffer) {"));
        assert!(js.contains("\"use asm\";"));
        assert!(js.contains("return helper() | 0;"));
        assert!(js.contains("return -7;"));
        assert!(js.contains("return { main: main };"));
    }

    #[test]
    fn test_run_passes_records_known_passes() {
        let mut compiled = sample();
        compiled.run_passes(&["trap-mode-clamp", "not-a-pass"]);
        assert_eq!(compiled.ir().applied_passes, vec!["trap-mode-clamp"]);
    }

    #[test]
    fn test_optimize_folds_calls() {
        let mut compiled = sample();
        compiled.optimize();
        assert_eq!(compiled.ir().functions.len(), 1);
        assert_eq!(compiled.ir().functions[0].body, BodyIR::Const(-7));
        assert!(compiled.validate());
    }
}
