//! `$mem` lowering.
//!
//! A multi-port memory becomes one `mem` block with combinational read
//! ports `r<i>` and clocked write ports `w<i>`. Only configurations FIRRTL's
//! `mem` can express are accepted; anything else is fatal.

use crate::emit::{MemDecl, Stmt};
use crate::error::{display_name, FirrtlError};
use crate::expr::Expr;
use crate::lower::ModuleLowerer;
use netfir_common::Logic;
use netfir_netlist::{Cell, ConstValue, SigSpec};

/// Returns `true` when every bit of the init parameter is `x`.
fn init_is_undefined(init: &ConstValue) -> bool {
    matches!(init, ConstValue::Bits(bits) if bits.iter().all(|b| b == Logic::X))
}

impl ModuleLowerer<'_> {
    pub(crate) fn lower_memory(&mut self, cell: &Cell) -> Result<(), FirrtlError> {
        let module = self.module_name();
        let cell_name = display_name(&cell.name).to_string();

        let abits = self.param_u32(cell, "ABITS")?;
        let width = self.param_u32(cell, "WIDTH")?;
        let size = self.param_u32(cell, "SIZE")?;
        let rd_ports = self.param_u32(cell, "RD_PORTS")?;
        let wr_ports = self.param_u32(cell, "WR_PORTS")?;

        if !init_is_undefined(self.param(cell, "INIT")?) {
            return Err(FirrtlError::MemoryInit {
                module,
                cell: cell_name,
            });
        }
        let rd_clk_enable = self.param(cell, "RD_CLK_ENABLE")?;
        let wr_clk_enable = self.param(cell, "WR_CLK_ENABLE")?;
        let wr_clk_polarity = self.param(cell, "WR_CLK_POLARITY")?;
        let offset = self
            .param(cell, "OFFSET")?
            .as_int()
            .ok_or_else(|| FirrtlError::InvalidParameter {
                module: module.clone(),
                cell: cell_name.clone(),
                param: "OFFSET",
            })?;
        if offset != 0 {
            return Err(FirrtlError::MemoryOffset {
                module,
                cell: cell_name,
                offset,
            });
        }

        let mem = self.names.canonicalize(&cell.name);
        self.body.cells.push(Stmt::Mem(MemDecl {
            name: mem.clone(),
            width,
            depth: u64::from(size),
            readers: rd_ports,
            writers: wr_ports,
        }));

        let (abits, width) = (abits as usize, width as usize);
        if rd_ports > 0 {
            let rd_addr = self.port(cell, "RD_ADDR")?;
            let rd_data = self.port(cell, "RD_DATA")?;
            for i in 0..rd_ports {
                if rd_clk_enable.bit(i) != Logic::Zero {
                    return Err(FirrtlError::ClockedReadPort {
                        module,
                        cell: cell_name,
                        port: i,
                    });
                }
                let port = format!("{mem}.r{i}");
                let n = i as usize;
                let addr = self.sig(&rd_addr.extract(n * abits, abits));
                self.body.cells.extend([
                    Stmt::connect(format!("{port}.addr"), addr),
                    Stmt::connect(format!("{port}.en"), Expr::uint(Some(1), 1)),
                    Stmt::connect(format!("{port}.clk"), Expr::uint(Some(1), 0).as_clock()),
                ]);
                self.drivers
                    .register(format!("{port}.data"), &rd_data.extract(n * width, width));
            }
        }

        if wr_ports > 0 {
            let wr_addr = self.port(cell, "WR_ADDR")?;
            let wr_data = self.port(cell, "WR_DATA")?;
            let wr_en = self.port(cell, "WR_EN")?;
            let wr_clk = self.port(cell, "WR_CLK")?;
            for i in 0..wr_ports {
                if wr_clk_enable.bit(i) != Logic::One {
                    return Err(FirrtlError::UnclockedWritePort {
                        module,
                        cell: cell_name,
                        port: i,
                    });
                }
                if wr_clk_polarity.bit(i) != Logic::One {
                    return Err(FirrtlError::NegedgeWritePort {
                        module,
                        cell: cell_name,
                        port: i,
                    });
                }
                let n = i as usize;
                let enable = wr_en.extract(n * width, width);
                let first = enable.bit(0);
                if enable.iter().any(|bit| Some(bit) != first) {
                    return Err(FirrtlError::ComplexWriteEnable {
                        module,
                        cell: cell_name,
                        port: i,
                    });
                }

                let port = format!("{mem}.w{i}");
                let addr = self.sig(&wr_addr.extract(n * abits, abits));
                let data = self.sig(&wr_data.extract(n * width, width));
                let en = self.sig(&SigSpec::from_bits(first));
                let clk = self.sig(&wr_clk.extract(n, 1)).as_clock();
                self.body.cells.extend([
                    Stmt::connect(format!("{port}.addr"), addr),
                    Stmt::connect(format!("{port}.data"), data),
                    Stmt::connect(format!("{port}.en"), en),
                    Stmt::connect(format!("{port}.mask"), Expr::uint(Some(1), 1)),
                    Stmt::connect(format!("{port}.clk"), clk),
                ]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameTable;
    use netfir_common::LogicVec;
    use netfir_diagnostics::DiagnosticSink;
    use netfir_netlist::{Design, Module, PortDirection, Wire, WireId};

    struct Ram {
        module: Module,
        clk: WireId,
        addr: WireId,
        din: WireId,
        we: WireId,
        dout: WireId,
    }

    fn ram() -> Ram {
        let mut module = Module::new("\\top");
        let clk = module.add_wire(Wire::port("\\clk", 1, PortDirection::Input));
        let addr = module.add_wire(Wire::port("\\addr", 4, PortDirection::Input));
        let din = module.add_wire(Wire::port("\\din", 8, PortDirection::Input));
        let we = module.add_wire(Wire::port("\\we", 1, PortDirection::Input));
        let dout = module.add_wire(Wire::port("\\dout", 8, PortDirection::Output));
        Ram {
            module,
            clk,
            addr,
            din,
            we,
            dout,
        }
    }

    fn bits(s: &str) -> ConstValue {
        ConstValue::Bits(LogicVec::from_binary_str(s).unwrap())
    }

    fn mem_cell(r: &Ram) -> Cell {
        let mut enable = SigSpec::new();
        for _ in 0..8 {
            enable.append(&SigSpec::wire(r.we, 1));
        }
        Cell::new("\\ram", "$mem")
            .with_param("ABITS", ConstValue::Int(4))
            .with_param("WIDTH", ConstValue::Int(8))
            .with_param("SIZE", ConstValue::Int(16))
            .with_param("OFFSET", ConstValue::Int(0))
            .with_param("RD_PORTS", ConstValue::Int(1))
            .with_param("WR_PORTS", ConstValue::Int(1))
            .with_param("INIT", bits(&"x".repeat(128)))
            .with_param("RD_CLK_ENABLE", bits("0"))
            .with_param("WR_CLK_ENABLE", bits("1"))
            .with_param("WR_CLK_POLARITY", bits("1"))
            .with_port("RD_ADDR", SigSpec::wire(r.addr, 4))
            .with_port("RD_DATA", SigSpec::wire(r.dout, 8))
            .with_port("WR_ADDR", SigSpec::wire(r.addr, 4))
            .with_port("WR_DATA", SigSpec::wire(r.din, 8))
            .with_port("WR_EN", enable)
            .with_port("WR_CLK", SigSpec::wire(r.clk, 1))
    }

    fn lower(module: &Module) -> Result<String, FirrtlError> {
        let design = Design::new();
        let sink = DiagnosticSink::new();
        let mut names = NameTable::new();
        let lowered = ModuleLowerer::new(&design, module, &mut names, &sink).lower()?;
        Ok(lowered.body.render("top"))
    }

    #[test]
    fn single_port_ram() {
        let mut r = ram();
        let cell = mem_cell(&r);
        r.module.add_cell(cell);
        let out = lower(&r.module).unwrap();
        let expected = "    mem ram:\n\
                        \x20     data-type => UInt<8>\n\
                        \x20     depth => 16\n\
                        \x20     reader => r0\n\
                        \x20     writer => w0\n\
                        \x20     read-latency => 0\n\
                        \x20     write-latency => 1\n\
                        \x20     read-under-write => undefined\n\
                        \x20   ram.r0.addr <= addr\n\
                        \x20   ram.r0.en <= UInt<1>(1)\n\
                        \x20   ram.r0.clk <= asClock(UInt<1>(0))\n\
                        \x20   ram.w0.addr <= addr\n\
                        \x20   ram.w0.data <= din\n\
                        \x20   ram.w0.en <= we\n\
                        \x20   ram.w0.mask <= UInt<1>(1)\n\
                        \x20   ram.w0.clk <= asClock(clk)\n";
        assert!(out.contains(expected), "{out}");
        assert!(out.contains("    dout <= ram.r0.data\n"));
    }

    #[test]
    fn init_data_is_fatal() {
        let mut r = ram();
        let mut init = "x".repeat(127);
        init.push('1');
        let cell = mem_cell(&r).with_param("INIT", bits(&init));
        r.module.add_cell(cell);
        assert!(matches!(
            lower(&r.module),
            Err(FirrtlError::MemoryInit { ref cell, .. }) if cell == "ram"
        ));
    }

    #[test]
    fn nonzero_offset_is_fatal() {
        let mut r = ram();
        let cell = mem_cell(&r).with_param("OFFSET", ConstValue::Int(4));
        r.module.add_cell(cell);
        assert!(matches!(
            lower(&r.module),
            Err(FirrtlError::MemoryOffset { offset: 4, .. })
        ));
    }

    #[test]
    fn non_integer_offset_is_rejected() {
        let mut r = ram();
        let cell = mem_cell(&r).with_param("OFFSET", ConstValue::String("base".into()));
        r.module.add_cell(cell);
        let err = lower(&r.module).unwrap_err();
        assert!(matches!(
            err,
            FirrtlError::InvalidParameter { param: "OFFSET", ref cell, .. } if cell == "ram"
        ));
        assert_eq!(err.code().to_string(), "E310");
    }

    #[test]
    fn port_clocking_checks() {
        let mut r = ram();
        let cell = mem_cell(&r).with_param("RD_CLK_ENABLE", bits("1"));
        r.module.add_cell(cell);
        assert!(matches!(
            lower(&r.module),
            Err(FirrtlError::ClockedReadPort { port: 0, .. })
        ));

        let mut r = ram();
        let cell = mem_cell(&r).with_param("WR_CLK_ENABLE", bits("0"));
        r.module.add_cell(cell);
        assert!(matches!(
            lower(&r.module),
            Err(FirrtlError::UnclockedWritePort { port: 0, .. })
        ));

        let mut r = ram();
        let cell = mem_cell(&r).with_param("WR_CLK_POLARITY", bits("0"));
        r.module.add_cell(cell);
        assert!(matches!(
            lower(&r.module),
            Err(FirrtlError::NegedgeWritePort { port: 0, .. })
        ));
    }

    #[test]
    fn per_bit_write_enable_is_fatal() {
        let mut r = ram();
        let mut enable = SigSpec::wire(r.we, 1);
        enable.append(&SigSpec::wire(r.din, 7));
        let mut cell = mem_cell(&r);
        if let Some(conn) = cell.connections.iter_mut().find(|c| c.port == "WR_EN") {
            conn.signal = enable;
        }
        r.module.add_cell(cell);
        assert!(matches!(
            lower(&r.module),
            Err(FirrtlError::ComplexWriteEnable { port: 0, .. })
        ));
    }

    #[test]
    fn undefined_init_forms() {
        assert!(init_is_undefined(&bits("xxxx")));
        assert!(!init_is_undefined(&bits("xx0x")));
        assert!(!init_is_undefined(&ConstValue::Int(0)));
    }
}
