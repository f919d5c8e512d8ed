//! Fixed-order compilation pipeline
//!
//! ```text
//! compile (mandatory) → validate → trap-mode transform → optimize
//! ```
//!
//! Compilation always runs and is followed by the compile-phase diagnostic
//! gate in the driver. The remaining stages are described by a short list of
//! [`StageDescriptor`]s; configuration can switch each of them on or off but
//! never reorder them.

use std::fmt;

use crate::config::DriverConfig;
use crate::engine::{Artifact, Engine, OwnedArtifact};
use crate::error::{Error, Result};

/// Compilation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// 32-bit WebAssembly
    #[default]
    Wasm32,
}

/// Options handed to the engine's compile operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Output target (only one is supported)
    pub target: Target,

    /// Remove code unreachable from the entry file's exports
    pub tree_shaking: bool,

    /// Emit debug information (function names)
    pub debug_info: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            target: Target::Wasm32,
            tree_shaking: true,
            debug_info: true,
        }
    }
}

/// How out-of-range numeric operations behave in the compiled module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapMode {
    /// Keep the default trapping behavior (no pass)
    #[default]
    None,
    /// Clamp results instead of trapping
    Clamp,
    /// Emulate JavaScript semantics
    Js,
}

impl TrapMode {
    /// Interpret the `--trapMode` flag
    ///
    /// Values other than `clamp` and `js` select no pass.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            None => TrapMode::None,
            Some("clamp") => TrapMode::Clamp,
            Some("js") => TrapMode::Js,
            Some(other) => {
                tracing::warn!("Unrecognized trap mode '{}', no trap-mode pass will run", other);
                TrapMode::None
            }
        }
    }

    /// Name of the transform pass implementing this mode
    pub fn pass_name(&self) -> Option<&'static str> {
        match self {
            TrapMode::None => None,
            TrapMode::Clamp => Some("trap-mode-clamp"),
            TrapMode::Js => Some("trap-mode-js"),
        }
    }
}

/// An optional stage after compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Structural validation of the module
    Validate,
    /// Trap-handling transform
    TrapMode(TrapMode),
    /// Full optimization pipeline
    Optimize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validate => write!(f, "validate"),
            Stage::TrapMode(mode) => write!(f, "trap-mode ({:?})", mode),
            Stage::Optimize => write!(f, "optimize"),
        }
    }
}

/// What a stage failure means for the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// A failed stage aborts compilation
    Fatal,
    /// The stage has no failure signal
    Infallible,
}

/// A stage together with its enablement and failure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// The stage to run
    pub stage: Stage,
    /// Whether configuration enabled it
    pub enabled: bool,
    /// Failure handling
    pub policy: FailurePolicy,
}

/// The configured pipeline
#[derive(Debug, Clone)]
pub struct CompilationPipeline {
    options: CompileOptions,
    stages: Vec<StageDescriptor>,
}

impl CompilationPipeline {
    /// Build the pipeline from driver configuration
    pub fn from_config(config: &DriverConfig) -> Self {
        let options = CompileOptions {
            target: Target::Wasm32,
            tree_shaking: config.tree_shaking,
            debug_info: config.debug_info,
        };

        let stages = vec![
            StageDescriptor {
                stage: Stage::Validate,
                enabled: config.validate,
                policy: FailurePolicy::Fatal,
            },
            StageDescriptor {
                stage: Stage::TrapMode(config.trap_mode),
                enabled: config.trap_mode != TrapMode::None,
                policy: FailurePolicy::Infallible,
            },
            StageDescriptor {
                stage: Stage::Optimize,
                enabled: config.optimize,
                policy: FailurePolicy::Infallible,
            },
        ];

        Self { options, stages }
    }

    /// Options passed to the compile stage
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Post-compile stages in execution order
    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Run the mandatory compile stage
    pub fn compile<E: Engine>(
        &self,
        engine: &E,
        session: &mut E::Session,
    ) -> OwnedArtifact<E::Artifact> {
        tracing::debug!("Compiling with {:?}", self.options);
        OwnedArtifact::new(engine.compile(session, &self.options))
    }

    /// Run every enabled post-compile stage in order
    pub fn run_stages<A: Artifact>(&self, artifact: &mut A) -> Result<()> {
        for descriptor in self.stages.iter().filter(|d| d.enabled) {
            tracing::debug!("Running stage: {}", descriptor.stage);
            if let Err(e) = apply(descriptor.stage, artifact) {
                if descriptor.policy == FailurePolicy::Fatal {
                    return Err(e);
                }
                tracing::warn!("Stage {} failed: {}", descriptor.stage, e);
            }
        }
        Ok(())
    }
}

fn apply<A: Artifact>(stage: Stage, artifact: &mut A) -> Result<()> {
    match stage {
        Stage::Validate => {
            if !artifact.validate() {
                return Err(Error::ValidationFailed);
            }
        }
        Stage::TrapMode(mode) => {
            if let Some(pass) = mode.pass_name() {
                artifact.run_passes(&[pass]);
            }
        }
        Stage::Optimize => artifact.optimize(),
    }
    Ok(())
}
