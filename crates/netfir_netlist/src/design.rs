//! Top-level design container.
//!
//! A [`Design`] holds all modules in the order they were elaborated. It is
//! the input to the FIRRTL backend.

use crate::arena::Arena;
use crate::error::NetlistError;
use crate::ids::ModuleId;
use crate::module::Module;
use serde::{Deserialize, Serialize};

/// Which modules a pass is asked to operate on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Every module, completely.
    #[default]
    Full,
    /// Only the named modules (or parts of them).
    Partial(Vec<String>),
}

/// A complete, elaborated gate-level design.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Design {
    /// All modules, keyed by [`ModuleId`], in elaboration order.
    pub modules: Arena<ModuleId, Module>,
    /// The designated top-level module, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<ModuleId>,
    /// The active selection.
    #[serde(default)]
    pub selection: Selection,
}

impl Design {
    /// Creates an empty, fully selected design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module and returns its ID.
    pub fn add_module(&mut self, module: Module) -> ModuleId {
        self.modules.alloc(module)
    }

    /// Returns the number of modules in the design.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Finds a module by name, accepting the name with or without a leading `\`.
    pub fn module_by_name(&self, name: &str) -> Option<(ModuleId, &Module)> {
        let bare = name.strip_prefix('\\').unwrap_or(name);
        self.modules
            .iter()
            .find(|(_, m)| m.name.strip_prefix('\\').unwrap_or(&m.name) == bare)
    }

    /// Returns `true` when nothing is deselected.
    pub fn is_fully_selected(&self) -> bool {
        self.selection == Selection::Full
    }

    /// Validates every module and the top reference.
    pub fn validate(&self) -> Result<(), NetlistError> {
        if let Some(top) = self.top {
            if !self.modules.contains(top) {
                return Err(NetlistError::DanglingTop(top.as_raw()));
            }
        }
        self.modules.values().try_for_each(Module::validate)
    }
}
