//! Intermediate representation of a compiled module
//!
//! The IR is what the artifact operates on: passes and optimization rewrite
//! it, and every output view is produced from it.

/// Function body after name resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyIR {
    /// Return a constant
    Const(i32),
    /// Return the result of calling the function at this index
    Call(u32),
}

/// A function in the module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionIR {
    /// Source name
    pub name: String,
    /// Exported from the module under its name
    pub export: bool,
    /// Body
    pub body: BodyIR,
}

/// Intermediate representation of a complete module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleIR {
    /// Functions in index order
    pub functions: Vec<FunctionIR>,

    /// Emit a `name` section
    pub debug_names: bool,

    /// Transform passes applied so far, in order
    pub applied_passes: Vec<String>,
}

impl ModuleIR {
    /// Number of exported functions
    pub fn export_count(&self) -> usize {
        self.functions.iter().filter(|f| f.export).count()
    }

    /// Compute a content hash for logging and change detection
    pub fn content_hash(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        for function in &self.functions {
            hasher.update(function.name.as_bytes());
            hasher.update([u8::from(function.export)]);
            hasher.update(format!("{:?}", function.body).as_bytes());
        }
        hasher.update([u8::from(self.debug_names)]);

        hex::encode(hasher.finalize())
    }

    /// Fold call chains into constants and drop functions nothing uses
    ///
    /// Calls that end in a cycle are left alone. Exported functions are
    /// always kept.
    pub fn fold_constants(&mut self) {
        let resolved: Vec<Option<i32>> = (0..self.functions.len())
            .map(|start| self.resolve_constant(start))
            .collect();

        for (function, value) in self.functions.iter_mut().zip(resolved) {
            if let Some(value) = value {
                function.body = BodyIR::Const(value);
            }
        }

        self.retain_reachable();
    }

    fn resolve_constant(&self, start: usize) -> Option<i32> {
        let mut visited = vec![false; self.functions.len()];
        let mut current = start;
        loop {
            if std::mem::replace(visited.get_mut(current)?, true) {
                return None;
            }
            match self.functions.get(current)?.body {
                BodyIR::Const(value) => return Some(value),
                BodyIR::Call(target) => current = usize::try_from(target).ok()?,
            }
        }
    }

    /// Drop functions not reachable from an export, remapping call indices
    pub fn retain_reachable(&mut self) {
        let mut used = vec![false; self.functions.len()];
        for (index, function) in self.functions.iter().enumerate() {
            if function.export {
                mark_reachable(&self.functions, index, &mut used);
            }
        }

        let mut remap = Vec::with_capacity(self.functions.len());
        let mut next = 0u32;
        for keep in &used {
            remap.push(next);
            if *keep {
                next += 1;
            }
        }

        let removed = used.iter().filter(|u| !**u).count();
        if removed > 0 {
            tracing::debug!("Removing {} unused function(s)", removed);
        }

        let functions = std::mem::take(&mut self.functions);
        self.functions = functions
            .into_iter()
            .zip(used)
            .filter_map(|(mut function, keep)| {
                if !keep {
                    return None;
                }
                if let BodyIR::Call(target) = function.body {
                    let mapped = usize::try_from(target)
                        .ok()
                        .and_then(|t| remap.get(t).copied())
                        .unwrap_or(target);
                    function.body = BodyIR::Call(mapped);
                }
                Some(function)
            })
            .collect();
    }
}

/// Mark `start` and every function it transitively calls
pub fn mark_reachable(functions: &[FunctionIR], start: usize, marks: &mut [bool]) {
    let mut current = Some(start);
    while let Some(index) = current {
        match marks.get_mut(index) {
            Some(mark) if !*mark => *mark = true,
            _ => return,
        }
        current = match functions.get(index).map(|f| f.body) {
            Some(BodyIR::Call(target)) => usize::try_from(target).ok(),
            _ => None,
        };
    }
}
