//! FIRRTL backend for gate-level netlists.
//!
//! Lowers a [`Design`] of primitive cells, memories, flip-flops and module
//! instances into FIRRTL text, one `module` per netlist module under a single
//! `circuit` named after the top module.
//!
//! Lowering works per module in design order:
//! 1. **Declarations**: ports and wires, with names from a design-wide [`NameTable`]
//! 2. **Cells**: one statement group per cell; output bits are recorded in a
//!    per-bit driver map
//! 3. **Resolution**: every non-input wire is connected to the expression its
//!    drivers reconstruct, or marked invalid where undriven
//!
//! Recoverable problems (unsupported cells, missing instance targets) are
//! reported to the [`DiagnosticSink`] and skipped. Anything that cannot be
//! expressed aborts with a [`FirrtlError`] before output is written.
//!
//! # Usage
//!
//! ```ignore
//! use netfir_firrtl::lower_design;
//! let text = lower_design(&design, &sink)?;
//! ```

#![warn(missing_docs)]

pub mod driver;
pub mod emit;
pub mod error;
pub mod expr;
mod instance;
mod lower;
mod memory;
pub mod names;
pub mod paramod;
pub mod resolve;

pub use error::FirrtlError;
pub use expr::Expr;
pub use names::NameTable;

use crate::emit::circuit_header;
use crate::error::display_name;
use crate::lower::ModuleLowerer;
use netfir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use netfir_netlist::{ConstValue, Design, ModuleId};
use std::io::Write;

/// State shared by every module of one run.
///
/// Holds the name table so external names stay unique across the whole
/// circuit. Create one per design.
#[derive(Default)]
pub struct FirrtlContext {
    names: NameTable,
}

impl FirrtlContext {
    /// Creates a context with an empty name table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The names issued so far.
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Canonicalizes every module name and every port name, in design order,
    /// so they take precedence over internal names.
    fn reserve_interface_names(&mut self, design: &Design) {
        for module in design.modules.values() {
            self.names.canonicalize(&module.name);
            for (_, port) in module.ports() {
                self.names.canonicalize(&port.name);
            }
        }
    }
}

/// Options that change what [`lower_design_with`] produces.
#[derive(Clone, Debug, Default)]
pub struct LowerOptions {
    /// Names the circuit's top module, overriding [`select_top`].
    pub top: Option<String>,
}

/// Picks the circuit's top module.
///
/// The design's designated top wins, then the first module with a truthy
/// `top` attribute, then the last module. Returns `None` for an empty design.
pub fn select_top(design: &Design) -> Option<ModuleId> {
    design
        .top
        .filter(|&id| design.modules.contains(id))
        .or_else(|| {
            design
                .modules
                .iter()
                .find(|(_, m)| m.attribute("top").is_some_and(ConstValue::as_bool))
                .map(|(id, _)| id)
        })
        .or_else(|| design.modules.iter().next_back().map(|(id, _)| id))
}

/// Lowers a design to FIRRTL text with default options.
pub fn lower_design(design: &Design, sink: &DiagnosticSink) -> Result<String, FirrtlError> {
    lower_design_with(design, &LowerOptions::default(), sink)
}

/// Lowers a design to FIRRTL text.
///
/// Emits a per-module summary note and any recoverable warnings into `sink`.
pub fn lower_design_with(
    design: &Design,
    options: &LowerOptions,
    sink: &DiagnosticSink,
) -> Result<String, FirrtlError> {
    let top = match &options.top {
        Some(name) => design
            .module_by_name(name)
            .map(|(id, _)| id)
            .ok_or_else(|| FirrtlError::UnknownTop(name.clone()))?,
        None => select_top(design).ok_or(FirrtlError::EmptyDesign)?,
    };

    let mut ctx = FirrtlContext::new();
    ctx.reserve_interface_names(design);
    let mut out = circuit_header(&ctx.names.canonicalize(&design.modules[top].name));

    for module in design.modules.values() {
        let name = ctx.names.canonicalize(&module.name);
        let lowered = ModuleLowerer::new(design, module, &mut ctx.names, sink).lower()?;
        sink.emit(Diagnostic::note(
            DiagnosticCode::info(301),
            format!(
                "lowered module `{}`: {} cells, {} skipped, {} driven bits",
                display_name(&module.name),
                lowered.lowered_cells,
                lowered.skipped_cells,
                lowered.driven_bits
            ),
            Location::module(display_name(&module.name)),
        ));
        out.push_str(&lowered.body.render(&name));
    }
    Ok(out)
}

/// Lowers a design and writes the FIRRTL text to `out`.
///
/// Nothing is written if lowering fails.
pub fn write_design(
    design: &Design,
    out: &mut impl Write,
    sink: &DiagnosticSink,
) -> Result<(), FirrtlError> {
    let text = lower_design(design, sink)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netfir_netlist::Module;

    #[test]
    fn top_selection_order() {
        let mut design = Design::new();
        let a = design.add_module(Module::new("\\a"));
        let mut marked = Module::new("\\b");
        marked.attributes.insert("top".into(), ConstValue::Int(1));
        let b = design.add_module(marked);
        let c = design.add_module(Module::new("\\c"));

        assert_eq!(select_top(&design), Some(b));
        design.top = Some(a);
        assert_eq!(select_top(&design), Some(a));

        design.top = None;
        design.modules[b].attributes.clear();
        assert_eq!(select_top(&design), Some(c));
        assert_eq!(select_top(&Design::new()), None);
    }

    #[test]
    fn empty_design_is_fatal() {
        let sink = DiagnosticSink::new();
        assert!(matches!(
            lower_design(&Design::new(), &sink),
            Err(FirrtlError::EmptyDesign)
        ));
    }

    #[test]
    fn explicit_top_must_exist() {
        let mut design = Design::new();
        design.add_module(Module::new("\\a"));
        let options = LowerOptions {
            top: Some("missing".into()),
        };
        let err = lower_design_with(&design, &options, &DiagnosticSink::new()).unwrap_err();
        assert!(matches!(err, FirrtlError::UnknownTop(ref name) if name == "missing"));
    }

    #[test]
    fn ports_win_name_collisions() {
        let mut design = Design::new();
        let mut m = Module::new("\\top");
        m.add_wire(netfir_netlist::Wire::new("$x", 1));
        m.add_wire(netfir_netlist::Wire::port(
            "\\_x",
            1,
            netfir_netlist::PortDirection::Input,
        ));
        design.add_module(m);
        let text = lower_design(&design, &DiagnosticSink::new()).unwrap();
        assert!(text.contains("    input _x: UInt<1>\n"));
        assert!(text.contains("    wire _x_: UInt<1>\n"));
    }

    #[test]
    fn write_design_emits_header_and_summary() {
        let mut design = Design::new();
        design.add_module(Module::new("\\top"));
        let sink = DiagnosticSink::new();
        let mut buf = Vec::new();
        write_design(&design, &mut buf, &sink).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "circuit top:\n  module top:\n\n\n\n");
        let notes = sink.take_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code, DiagnosticCode::info(301));
    }
}
