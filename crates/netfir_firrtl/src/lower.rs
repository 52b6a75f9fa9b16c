//! Cell lowering.
//!
//! A [`ModuleLowerer`] walks one module in four passes:
//! 1. wires: port and wire declarations;
//! 2. cells: one statement group per cell, with every output bit recorded in
//!    the [`DriverMap`];
//! 3. direct connections: each gets a fresh wire and is recorded the same way;
//! 4. resolution: every non-input wire is connected to the expression its
//!    recorded drivers reconstruct.
//!
//! Memories and sub-module instances live in [`crate::memory`] and
//! [`crate::instance`].

use crate::driver::DriverMap;
use crate::emit::{Direction, ModuleBody, Stmt};
use crate::error::{display_name, FirrtlError};
use crate::expr::{clamp_shift_amount, sig_expr, Expr, PrimOp};
use crate::names::NameTable;
use crate::resolve::{is_undriven, segments, segments_expr};
use netfir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use netfir_netlist::{Cell, CellKind, ConstValue, Design, Module, PortDirection, SigSpec};

/// Single-operand cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum UnaryOp {
    Not,
    Neg,
    LogicNot,
    Reduce(PrimOp),
    ReduceXnor,
    ReduceBool,
}

fn unary_op(kind: &CellKind) -> Option<UnaryOp> {
    Some(match kind {
        CellKind::Not => UnaryOp::Not,
        CellKind::Neg => UnaryOp::Neg,
        CellKind::LogicNot => UnaryOp::LogicNot,
        CellKind::ReduceAnd => UnaryOp::Reduce(PrimOp::Andr),
        CellKind::ReduceOr => UnaryOp::Reduce(PrimOp::Orr),
        CellKind::ReduceXor => UnaryOp::Reduce(PrimOp::Xorr),
        CellKind::ReduceXnor => UnaryOp::ReduceXnor,
        CellKind::ReduceBool => UnaryOp::ReduceBool,
        _ => return None,
    })
}

/// How a two-operand cell treats its operands and result.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum BinaryClass {
    /// Result is re-cast to unsigned when A is signed.
    Arith,
    /// Bitwise and compare operators; the result is already unsigned.
    Bitwise,
    /// Both operands are reduced to a truth value first.
    Logical,
    /// The result widens by the shift amount and is truncated back.
    ShiftLeft,
    ShiftRight,
}

fn binary_op(kind: &CellKind) -> Option<(PrimOp, BinaryClass)> {
    use BinaryClass::*;
    Some(match kind {
        CellKind::Add => (PrimOp::Add, Arith),
        CellKind::Sub => (PrimOp::Sub, Arith),
        CellKind::Mul => (PrimOp::Mul, Arith),
        CellKind::Div => (PrimOp::Div, Arith),
        CellKind::Mod => (PrimOp::Rem, Arith),
        CellKind::And => (PrimOp::And, Bitwise),
        CellKind::Or => (PrimOp::Or, Bitwise),
        CellKind::Xor => (PrimOp::Xor, Bitwise),
        CellKind::Eq | CellKind::Eqx => (PrimOp::Eq, Bitwise),
        CellKind::Ne | CellKind::Nex => (PrimOp::Neq, Bitwise),
        CellKind::Lt => (PrimOp::Lt, Bitwise),
        CellKind::Le => (PrimOp::Leq, Bitwise),
        CellKind::Gt => (PrimOp::Gt, Bitwise),
        CellKind::Ge => (PrimOp::Geq, Bitwise),
        CellKind::LogicAnd => (PrimOp::And, Logical),
        CellKind::LogicOr => (PrimOp::Or, Logical),
        CellKind::Shl | CellKind::Sshl => (PrimOp::Dshl, ShiftLeft),
        CellKind::Shr | CellKind::Sshr => (PrimOp::Dshr, ShiftRight),
        _ => return None,
    })
}

/// The result of lowering one module.
pub(crate) struct LoweredModule {
    pub(crate) body: ModuleBody,
    pub(crate) lowered_cells: usize,
    pub(crate) skipped_cells: usize,
    pub(crate) driven_bits: usize,
}

/// Per-module lowering state. The name table outlives it.
pub(crate) struct ModuleLowerer<'a> {
    pub(crate) design: &'a Design,
    pub(crate) module: &'a Module,
    pub(crate) names: &'a mut NameTable,
    pub(crate) sink: &'a DiagnosticSink,
    pub(crate) drivers: DriverMap,
    pub(crate) body: ModuleBody,
    marker: Option<String>,
    skipped: usize,
}

impl<'a> ModuleLowerer<'a> {
    pub(crate) fn new(
        design: &'a Design,
        module: &'a Module,
        names: &'a mut NameTable,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            design,
            module,
            names,
            sink,
            drivers: DriverMap::new(),
            body: ModuleBody::default(),
            marker: None,
            skipped: 0,
        }
    }

    pub(crate) fn lower(mut self) -> Result<LoweredModule, FirrtlError> {
        let module = self.module;
        self.declare_wires()?;
        for cell in module.cells.values() {
            self.lower_cell(cell)?;
        }
        for conn in &module.connections {
            let name = self.names.fresh();
            let source = self.sig(&conn.src);
            self.body.decls.push(Stmt::Wire {
                name: name.clone(),
                width: conn.dst.len() as u32,
            });
            self.body.cells.push(Stmt::connect(name.clone(), source));
            self.drivers.register(name, &conn.dst);
        }
        self.resolve_wires();
        Ok(LoweredModule {
            lowered_cells: module.cells.len() - self.skipped,
            skipped_cells: self.skipped,
            driven_bits: self.drivers.driven_bits(),
            body: self.body,
        })
    }

    fn declare_wires(&mut self) -> Result<(), FirrtlError> {
        for wire in self.module.wires.values() {
            let name = self.names.canonicalize(&wire.name);
            if let Some(init) = wire.attribute("init") {
                self.sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::warning(305),
                        format!(
                            "initial value {init} of wire `{}` is not supported",
                            display_name(&wire.name)
                        ),
                        self.location(&wire.name),
                    )
                    .with_note("the wire is declared without an initial value"),
                );
            }
            let dir = match wire.port {
                None => {
                    self.body.decls.push(Stmt::Wire {
                        name,
                        width: wire.width,
                    });
                    continue;
                }
                Some(PortDirection::Input) => Direction::Input,
                Some(PortDirection::Output) => Direction::Output,
                Some(PortDirection::InOut) => {
                    return Err(FirrtlError::InoutPort {
                        module: self.module_name(),
                        port: display_name(&wire.name).to_string(),
                    })
                }
            };
            self.body.ports.push(Stmt::Port {
                dir,
                name,
                width: wire.width,
            });
        }
        Ok(())
    }

    fn lower_cell(&mut self, cell: &Cell) -> Result<(), FirrtlError> {
        if let Some(op) = unary_op(&cell.kind) {
            return self.lower_unary(cell, op);
        }
        if let Some((op, class)) = binary_op(&cell.kind) {
            return self.lower_binary(cell, op, class);
        }
        match &cell.kind {
            CellKind::Mux => self.lower_mux(cell),
            CellKind::Dff => self.lower_dff(cell),
            CellKind::Shiftx => self.lower_shiftx(cell),
            CellKind::Shift => self.lower_shift(cell),
            CellKind::Mem => self.lower_memory(cell),
            CellKind::Instance(_) | CellKind::Paramod(_) => {
                if !self.lower_instance(cell) {
                    self.skipped += 1;
                }
                Ok(())
            }
            CellKind::MemRd | CellKind::MemWr => {
                self.skip(
                    Diagnostic::warning(
                        DiagnosticCode::warning(306),
                        format!(
                            "standalone memory port `{}` ({}) is not supported",
                            display_name(&cell.name),
                            cell.kind
                        ),
                        self.location(&cell.name),
                    )
                    .with_help("merge memory ports into `$mem` cells before lowering"),
                );
                Ok(())
            }
            _ => {
                self.skip(
                    Diagnostic::warning(
                        DiagnosticCode::warning(302),
                        format!(
                            "cell type `{}` is not supported; cell `{}` skipped",
                            cell.kind,
                            display_name(&cell.name)
                        ),
                        self.location(&cell.name),
                    ),
                );
                Ok(())
            }
        }
    }

    fn lower_unary(&mut self, cell: &Cell, op: UnaryOp) -> Result<(), FirrtlError> {
        let signed = self.param_bool(cell, "A_SIGNED")?;
        let y_width = self.param_u32(cell, "Y_WIDTH")?;
        let a_sig = self.port(cell, "A")?;
        let y = self.port(cell, "Y")?;

        let mut a = self.sig(a_sig);
        if signed {
            a = a.as_sint();
        }
        let expr = match op {
            UnaryOp::Not => a.pad(y_width).unary(PrimOp::Not),
            UnaryOp::Neg => a.pad(y_width).unary(PrimOp::Neg),
            UnaryOp::LogicNot => a.binary(PrimOp::Eq, Expr::zero(signed, None)),
            UnaryOp::Reduce(prim) => a.unary(prim),
            UnaryOp::ReduceXnor => a.unary(PrimOp::Xorr).unary(PrimOp::Not),
            UnaryOp::ReduceBool => {
                a.binary(PrimOp::Neq, Expr::zero(signed, Some(a_sig.len() as u32)))
            }
        };
        // `neg` always yields a signed value; `not` only keeps a signed operand's type.
        let expr = match op {
            UnaryOp::Neg => expr.as_uint(),
            UnaryOp::Not if signed => expr.as_uint(),
            _ => expr,
        };
        self.emit_cell_wire(cell, y_width, expr, y);
        Ok(())
    }

    fn lower_binary(
        &mut self,
        cell: &Cell,
        op: PrimOp,
        class: BinaryClass,
    ) -> Result<(), FirrtlError> {
        // A logical right shift ignores the operand's signedness.
        let a_signed = self.param_bool(cell, "A_SIGNED")? && cell.kind != CellKind::Shr;
        let b_signed = self.param_bool(cell, "B_SIGNED")?;
        let y_width = self.param_u32(cell, "Y_WIDTH")?;
        let a_sig = self.port(cell, "A")?;
        let b_sig = self.port(cell, "B")?;
        let y = self.port(cell, "Y")?;
        let shift = matches!(class, BinaryClass::ShiftLeft | BinaryClass::ShiftRight);

        let mut a = self.sig(a_sig);
        if a_signed {
            a = a.as_sint();
        }
        // Shifted data is widened to the output so no result bits are lost.
        if (a_signed || shift) && (a_sig.len() as u32) < y_width {
            a = a.pad(y_width);
        }
        let mut b = self.sig(b_sig);
        if b_signed && !shift {
            b = b.as_sint();
            if (b_sig.len() as u32) < y_width {
                b = b.pad(y_width);
            }
        }

        let expr = match class {
            BinaryClass::Arith | BinaryClass::Bitwise => a.binary(op, b),
            BinaryClass::Logical => {
                let a = a.binary(PrimOp::Neq, Expr::zero(a_signed, None));
                let b = b.binary(PrimOp::Neq, Expr::zero(b_signed, None));
                a.binary(op, b)
            }
            BinaryClass::ShiftLeft => {
                let shifted = match b_sig.as_const() {
                    Some(amount) => a.shl(amount.to_u64_lossy()),
                    None => a.binary(PrimOp::Dshl, clamp_shift_amount(b, b_sig.len() as u32)),
                };
                shifted.bits(y_width.saturating_sub(1), 0)
            }
            BinaryClass::ShiftRight => match b_sig.as_const() {
                Some(amount) => a.shr(amount.to_u64_lossy()),
                None => a.binary(PrimOp::Dshr, b),
            },
        };
        let recast = (a_signed && !matches!(class, BinaryClass::Bitwise | BinaryClass::Logical))
            || cell.kind == CellKind::Sub;
        let expr = if recast { expr.as_uint() } else { expr };
        self.emit_cell_wire(cell, y_width, expr, y);
        Ok(())
    }

    fn lower_mux(&mut self, cell: &Cell) -> Result<(), FirrtlError> {
        let width = self.param_u32(cell, "WIDTH")?;
        let a = self.port(cell, "A")?;
        let b = self.port(cell, "B")?;
        let s = self.port(cell, "S")?;
        let y = self.port(cell, "Y")?;
        let expr = Expr::mux(self.sig(s), self.sig(b), self.sig(a));
        self.emit_cell_wire(cell, width, expr, y);
        Ok(())
    }

    fn lower_dff(&mut self, cell: &Cell) -> Result<(), FirrtlError> {
        if !self.param_bool(cell, "CLK_POLARITY")? {
            return Err(FirrtlError::NegedgeFlipFlop {
                module: self.module_name(),
                cell: display_name(&cell.name).to_string(),
            });
        }
        let width = self.param_u32(cell, "WIDTH")?;
        let d = self.port(cell, "D")?;
        let clk = self.port(cell, "CLK")?;
        let q = self.port(cell, "Q")?;

        let name = self.names.canonicalize(&cell.name);
        let clock = self.sig(clk).as_clock();
        let data = self.sig(d);
        self.body.decls.push(Stmt::Reg {
            name: name.clone(),
            width,
            clock,
        });
        self.body.cells.push(Stmt::connect(name.clone(), data));
        self.drivers.register(name, q);
        Ok(())
    }

    fn lower_shiftx(&mut self, cell: &Cell) -> Result<(), FirrtlError> {
        let b_signed = self.param_bool(cell, "B_SIGNED")?;
        let y_width = self.param_u32(cell, "Y_WIDTH")?;
        let a_sig = self.port(cell, "A")?;
        let b_sig = self.port(cell, "B")?;
        let y = self.port(cell, "Y")?;

        let a = self.sig(a_sig);
        let mut b = self.sig(b_sig);
        if b_signed {
            // A negative offset selects nothing.
            let msb = (b_sig.len() as u32).saturating_sub(1);
            b = Expr::valid_if(b.clone().bits(msb, msb).unary(PrimOp::Not), b);
        }
        self.emit_cell_wire(cell, y_width, a.binary(PrimOp::Dshr, b), y);
        Ok(())
    }

    fn lower_shift(&mut self, cell: &Cell) -> Result<(), FirrtlError> {
        let b_signed = self.param_bool(cell, "B_SIGNED")?;
        let y_width = self.param_u32(cell, "Y_WIDTH")?;
        let a_sig = self.port(cell, "A")?;
        let b_sig = self.port(cell, "B")?;
        let y = self.port(cell, "Y")?;

        let a = self.sig(a_sig);
        let b = self.sig(b_sig);
        let expr = if b_signed {
            // Negating a B-bit signed value needs B+1 bits.
            let amount = b.clone().as_sint().unary(PrimOp::Neg).as_uint();
            let amount = clamp_shift_amount(amount, b_sig.len() as u32 + 1);
            let left = a
                .clone()
                .binary(PrimOp::Dshl, amount)
                .bits(y_width.saturating_sub(1), 0);
            let right = a.binary(PrimOp::Dshr, b.clone());
            let negative = b.as_sint().binary(PrimOp::Lt, Expr::zero(true, None));
            Expr::mux(negative, left, right)
        } else {
            a.binary(PrimOp::Dshr, b)
        };
        self.emit_cell_wire(cell, y_width, expr, y);
        Ok(())
    }

    fn resolve_wires(&mut self) {
        let module = self.module;
        for (id, wire) in module.wires.iter() {
            if wire.is_input() {
                continue;
            }
            let name = self.names.canonicalize(&wire.name);
            let segs = segments(id, wire.width, &self.drivers);
            if is_undriven(&segs) {
                self.body.decls.push(Stmt::Invalid(name));
                continue;
            }
            let names = &mut *self.names;
            let decls = &mut self.body.decls;
            let marker = &mut self.marker;
            let expr = segments_expr(&segs, &self.drivers, || {
                marker
                    .get_or_insert_with(|| {
                        let m = names.fresh();
                        decls.push(Stmt::Wire {
                            name: m.clone(),
                            width: 1,
                        });
                        decls.push(Stmt::Invalid(m.clone()));
                        m
                    })
                    .clone()
            });
            if let Some(expr) = expr {
                self.body.tail.push(Stmt::connect(name, expr));
            }
        }
    }

    /// Declares `wire <cell>: UInt<width>`, connects it to `expr` and records
    /// it as the driver of `output`.
    fn emit_cell_wire(&mut self, cell: &Cell, width: u32, expr: Expr, output: &SigSpec) {
        let name = self.names.canonicalize(&cell.name);
        self.body.decls.push(Stmt::Wire {
            name: name.clone(),
            width,
        });
        self.body.cells.push(Stmt::connect(name.clone(), expr));
        self.drivers.register(name, output);
    }

    fn skip(&mut self, diag: Diagnostic) {
        self.skipped += 1;
        self.sink.emit(diag);
    }

    pub(crate) fn sig(&mut self, sig: &SigSpec) -> Expr {
        sig_expr(sig, self.module, self.names)
    }

    pub(crate) fn module_name(&self) -> String {
        display_name(&self.module.name).to_string()
    }

    pub(crate) fn location(&self, item: &str) -> Location {
        Location::item(display_name(&self.module.name), display_name(item))
    }

    pub(crate) fn port<'c>(
        &self,
        cell: &'c Cell,
        port: &'static str,
    ) -> Result<&'c SigSpec, FirrtlError> {
        cell.port(port).ok_or_else(|| FirrtlError::MissingPort {
            module: self.module_name(),
            cell: display_name(&cell.name).to_string(),
            port,
        })
    }

    pub(crate) fn param<'c>(
        &self,
        cell: &'c Cell,
        param: &'static str,
    ) -> Result<&'c ConstValue, FirrtlError> {
        cell.param(param).ok_or_else(|| FirrtlError::MissingParameter {
            module: self.module_name(),
            cell: display_name(&cell.name).to_string(),
            param,
        })
    }

    pub(crate) fn param_bool(&self, cell: &Cell, param: &'static str) -> Result<bool, FirrtlError> {
        self.param(cell, param).map(ConstValue::as_bool)
    }

    pub(crate) fn param_u32(&self, cell: &Cell, param: &'static str) -> Result<u32, FirrtlError> {
        self.param(cell, param)?
            .as_int()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| FirrtlError::InvalidParameter {
                module: self.module_name(),
                cell: display_name(&cell.name).to_string(),
                param,
            })
    }
}
