//! Module dependency graph recorded during bundling.
//!
//! The graph is the side artifact consumed by the packaging/sandboxing
//! analysis step: a JSON table of every module the bundle pulled in and the
//! modules it requires. Written by [`crate::units::DepsDump`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Facts recorded about one module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Modules this one requires, as graph keys.
    pub deps: Vec<String>,
    /// Source size in bytes.
    pub size: u64,
}

/// Dependency graph across all modules of a build.
///
/// Keys are module paths relative to the source root, so the JSON output is
/// stable across machines. `BTreeMap` keeps the serialization deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleGraph {
    /// Module path -> recorded info.
    pub modules: BTreeMap<String, ModuleInfo>,
}

impl ModuleGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one module and its dependencies.
    pub fn insert(&mut self, module: impl Into<String>, info: ModuleInfo) {
        self.modules.insert(module.into(), info);
    }

    /// Number of recorded modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
