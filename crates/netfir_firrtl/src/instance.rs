//! Sub-module instance lowering.
//!
//! An instance becomes `inst <cell> of <module>` followed by one connect per
//! input port. Output ports are not connected directly: their actual bits
//! are recorded as driven by `<cell>.<port>`, so the resolver reconstructs
//! them with everything else.

use crate::emit::Stmt;
use crate::error::display_name;
use crate::lower::ModuleLowerer;
use crate::paramod::paramod_module_name;
use netfir_diagnostics::{Diagnostic, DiagnosticCode};
use netfir_netlist::{Cell, CellKind, Module, PortDirection};

impl<'a> ModuleLowerer<'a> {
    /// Lowers an instance cell. Returns `false` when the instantiated module
    /// is not part of the design and the cell was skipped.
    pub(crate) fn lower_instance(&mut self, cell: &Cell) -> bool {
        let Some(target) = self.instance_target(&cell.kind) else {
            self.sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::warning(301),
                    format!(
                        "no module `{}` for instance `{}`; instance skipped",
                        display_name(cell.kind.tag()),
                        display_name(&cell.name)
                    ),
                    self.location(&cell.name),
                )
                .with_help("add the module to the design or blackbox it"),
            );
            return false;
        };

        let inst = self.names.canonicalize(&cell.name);
        let module = self.names.canonicalize(&target.name);
        self.body.tail.push(Stmt::Inst {
            name: inst.clone(),
            module,
        });

        for conn in &cell.connections {
            if conn.signal.is_empty() {
                continue;
            }
            let formal = target.wire_by_name(&conn.port).map(|(_, w)| w);
            let port = self
                .names
                .canonicalize(formal.map_or(conn.port.as_str(), |w| w.name.as_str()));
            let path = format!("{inst}.{port}");
            let dir = formal.and_then(|w| w.port);
            match dir {
                Some(PortDirection::Output) => {
                    self.drivers.register(path, &conn.signal);
                }
                Some(PortDirection::InOut) => {
                    self.warn_port(
                        cell,
                        303,
                        format!("instance port `{path}` is inout; treating it as an output"),
                    );
                    self.drivers.register(path, &conn.signal);
                }
                Some(PortDirection::Input) => {
                    let actual = self.sig(&conn.signal);
                    self.body.tail.push(Stmt::connect(path, actual));
                }
                None => {
                    self.warn_port(
                        cell,
                        304,
                        format!("instance port `{path}` has no direction; treating it as an input"),
                    );
                    let actual = self.sig(&conn.signal);
                    self.body.tail.push(Stmt::connect(path, actual));
                }
            }
        }
        true
    }

    /// Finds the module an instance refers to.
    ///
    /// A `$paramod` tag also matches a module whose name has already been
    /// through the separator table, e.g. `_paramod_sub_W_8`.
    fn instance_target(&self, kind: &CellKind) -> Option<&'a Module> {
        let design = self.design;
        let tag = kind.tag();
        let exact = design.module_by_name(tag).map(|(_, m)| m);
        match kind {
            CellKind::Paramod(_) => exact.or_else(|| {
                let mangled = paramod_module_name(tag);
                design
                    .modules
                    .values()
                    .find(|m| paramod_module_name(display_name(&m.name)) == mangled)
            }),
            _ => exact,
        }
    }

    fn warn_port(&self, cell: &Cell, number: u16, message: String) {
        self.sink.emit(Diagnostic::warning(
            DiagnosticCode::warning(number),
            message,
            self.location(&cell.name),
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::emit::ModuleBody;
    use crate::lower::ModuleLowerer;
    use crate::names::NameTable;
    use netfir_diagnostics::{DiagnosticCode, DiagnosticSink};
    use netfir_netlist::{Cell, Design, Module, ModuleId, PortDirection, SigSpec, Wire};

    fn sub(name: &str) -> Module {
        let mut m = Module::new(name);
        m.add_wire(Wire::port("\\d", 4, PortDirection::Input));
        m.add_wire(Wire::port("\\q", 4, PortDirection::Output));
        m
    }

    fn parent(kind: &str) -> Module {
        let mut m = Module::new("\\top");
        let a = m.add_wire(Wire::port("\\a", 4, PortDirection::Input));
        let y = m.add_wire(Wire::port("\\y", 4, PortDirection::Output));
        m.add_cell(
            Cell::new("\\u0", kind)
                .with_port("\\d", SigSpec::wire(a, 4))
                .with_port("\\q", SigSpec::wire(y, 4))
                .with_port("\\unused", SigSpec::new()),
        );
        m
    }

    fn lower(design: &Design, top: ModuleId) -> (ModuleBody, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let mut names = NameTable::new();
        let module = &design.modules[top];
        let lowered = ModuleLowerer::new(design, module, &mut names, &sink)
            .lower()
            .unwrap();
        (lowered.body, sink)
    }

    #[test]
    fn outputs_resolve_through_instance_port() {
        let mut design = Design::new();
        design.add_module(sub("\\sub"));
        let top = design.add_module(parent("\\sub"));
        let (body, sink) = lower(&design, top);
        let out = body.render("top");
        assert!(out.contains("    inst u0 of sub\n    u0.d <= a\n"));
        assert!(out.contains("    y <= u0.q\n"));
        assert!(!out.contains("unused"));
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn paramod_names_use_separator_table() {
        let mut design = Design::new();
        design.add_module(sub("$paramod\\sub\\W=4"));
        let top = design.add_module(parent("$paramod\\sub\\W=4"));
        let (body, _) = lower(&design, top);
        assert!(body.render("top").contains("    inst u0 of _paramod_sub_W_4\n"));
    }

    #[test]
    fn paramod_tag_finds_renamed_variant() {
        let mut design = Design::new();
        design.add_module(sub("\\_paramod_sub_W_4"));
        let top = design.add_module(parent("$paramod\\sub\\W=4"));
        let (body, sink) = lower(&design, top);
        let out = body.render("top");
        assert!(out.contains("    inst u0 of _paramod_sub_W_4\n"), "{out}");
        assert!(out.contains("    y <= u0.q\n"));
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn plain_instances_do_not_use_separator_table() {
        let mut design = Design::new();
        design.add_module(sub("\\_sub"));
        let top = design.add_module(parent("\\$sub"));
        let (body, sink) = lower(&design, top);
        assert!(!body.render("top").contains("inst "));
        assert_eq!(sink.take_all()[0].code, DiagnosticCode::warning(301));
    }

    #[test]
    fn missing_module_skips_instance() {
        let mut design = Design::new();
        let top = design.add_module(parent("\\absent"));
        let (body, sink) = lower(&design, top);
        let out = body.render("top");
        assert!(!out.contains("inst "));
        assert!(out.contains("    y is invalid\n"));
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::warning(301));
    }

    #[test]
    fn port_direction_fallbacks() {
        let mut child = Module::new("\\sub");
        child.add_wire(Wire::port("\\d", 4, PortDirection::InOut));
        child.add_wire(Wire::new("\\q", 4));
        let mut design = Design::new();
        design.add_module(child);
        let top = design.add_module(parent("\\sub"));
        let (body, sink) = lower(&design, top);
        let out = body.render("top");
        // `d` is inout: treated as an output, so `a` (an input) is not driven.
        assert!(!out.contains("u0.d <="));
        // `q` has no direction: treated as an input.
        assert!(out.contains("    u0.q <= y\n"));
        let codes: Vec<_> = sink.take_all().into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagnosticCode::warning(303), DiagnosticCode::warning(304)]);
    }
}
