//! FIRRTL text emission.
//!
//! A module is collected as four statement lists and rendered in a fixed
//! layout: ports, declarations, cell statements, then instance and
//! output-resolution statements, separated by blank lines.

use crate::expr::Expr;
use std::fmt;

const INDENT: &str = "    ";
const FIELD_INDENT: &str = "      ";

/// Port direction as written in a module header.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    /// `input`.
    Input,
    /// `output`.
    Output,
}

/// A `mem` declaration with combinational reads and one-cycle writes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MemDecl {
    /// Memory name.
    pub name: String,
    /// Word width.
    pub width: u32,
    /// Number of words.
    pub depth: u64,
    /// Read port count, named `r0`, `r1`, ...
    pub readers: u32,
    /// Write port count, named `w0`, `w1`, ...
    pub writers: u32,
}

/// One FIRRTL statement.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Stmt {
    /// `input|output name: UInt<w>`.
    Port {
        /// Direction.
        dir: Direction,
        /// Port name.
        name: String,
        /// Width.
        width: u32,
    },
    /// `wire name: UInt<w>`.
    Wire {
        /// Wire name.
        name: String,
        /// Width.
        width: u32,
    },
    /// `reg name: UInt<w>, clock`.
    Reg {
        /// Register name.
        name: String,
        /// Width.
        width: u32,
        /// Clock expression.
        clock: Expr,
    },
    /// `name is invalid`.
    Invalid(String),
    /// `sink <= source`.
    Connect {
        /// Left-hand side, a name or subfield path.
        sink: String,
        /// Right-hand side.
        source: Expr,
    },
    /// A `mem` block.
    Mem(MemDecl),
    /// `inst name of module`.
    Inst {
        /// Instance name.
        name: String,
        /// Instantiated module.
        module: String,
    },
}

impl Stmt {
    /// Shorthand for a connect statement.
    pub fn connect(sink: impl Into<String>, source: Expr) -> Self {
        Stmt::Connect {
            sink: sink.into(),
            source,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Port { dir, name, width } => {
                let dir = match dir {
                    Direction::Input => "input",
                    Direction::Output => "output",
                };
                writeln!(f, "{INDENT}{dir} {name}: UInt<{width}>")
            }
            Stmt::Wire { name, width } => writeln!(f, "{INDENT}wire {name}: UInt<{width}>"),
            Stmt::Reg { name, width, clock } => {
                writeln!(f, "{INDENT}reg {name}: UInt<{width}>, {clock}")
            }
            Stmt::Invalid(name) => writeln!(f, "{INDENT}{name} is invalid"),
            Stmt::Connect { sink, source } => writeln!(f, "{INDENT}{sink} <= {source}"),
            Stmt::Mem(mem) => {
                writeln!(f, "{INDENT}mem {}:", mem.name)?;
                writeln!(f, "{FIELD_INDENT}data-type => UInt<{}>", mem.width)?;
                writeln!(f, "{FIELD_INDENT}depth => {}", mem.depth)?;
                for i in 0..mem.readers {
                    writeln!(f, "{FIELD_INDENT}reader => r{i}")?;
                }
                for i in 0..mem.writers {
                    writeln!(f, "{FIELD_INDENT}writer => w{i}")?;
                }
                writeln!(f, "{FIELD_INDENT}read-latency => 0")?;
                writeln!(f, "{FIELD_INDENT}write-latency => 1")?;
                writeln!(f, "{FIELD_INDENT}read-under-write => undefined")
            }
            Stmt::Inst { name, module } => writeln!(f, "{INDENT}inst {name} of {module}"),
        }
    }
}

/// The statements of one lowered module, by output section.
#[derive(Default, Debug)]
pub struct ModuleBody {
    /// Port declarations in wire order.
    pub ports: Vec<Stmt>,
    /// Wire, register and marker declarations plus `is invalid` lines.
    pub decls: Vec<Stmt>,
    /// Cell statements in cell order.
    pub cells: Vec<Stmt>,
    /// Instances and output-resolution connects.
    pub tail: Vec<Stmt>,
}

impl ModuleBody {
    /// Renders `  module <name>:` followed by the four sections.
    pub fn render(&self, name: &str) -> String {
        let mut out = format!("  module {name}:\n");
        let sections = [&self.ports, &self.decls, &self.cells, &self.tail];
        for (i, section) in sections.into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for stmt in section {
                out.push_str(&stmt.to_string());
            }
        }
        out
    }
}

/// The `circuit <top>:` header line.
pub fn circuit_header(top: &str) -> String {
    format!("circuit {top}:\n")
}
