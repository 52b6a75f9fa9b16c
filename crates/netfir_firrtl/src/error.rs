//! Fatal lowering errors.

use netfir_diagnostics::{Diagnostic, DiagnosticCode, Location};
use thiserror::Error;

/// A condition that aborts the whole run. No output is written.
///
/// Module and cell names are the netlist names with any leading `\` removed.
#[derive(Debug, Error)]
pub enum FirrtlError {
    /// A module port is both input and output.
    #[error("module port `{module}.{port}` is inout")]
    InoutPort {
        /// Owning module.
        module: String,
        /// Port wire.
        port: String,
    },
    /// A memory's address space does not start at zero.
    #[error("memory `{module}.{cell}` has nonzero offset {offset}")]
    MemoryOffset {
        /// Owning module.
        module: String,
        /// Memory cell.
        cell: String,
        /// The `OFFSET` parameter.
        offset: i64,
    },
    /// A memory carries initialization data.
    #[error("memory `{module}.{cell}` has initialization data")]
    MemoryInit {
        /// Owning module.
        module: String,
        /// Memory cell.
        cell: String,
    },
    /// A memory read port is clocked.
    #[error("clocked read port {port} on memory `{module}.{cell}`")]
    ClockedReadPort {
        /// Owning module.
        module: String,
        /// Memory cell.
        cell: String,
        /// Read port index.
        port: u32,
    },
    /// A memory write port is not clocked.
    #[error("unclocked write port {port} on memory `{module}.{cell}`")]
    UnclockedWritePort {
        /// Owning module.
        module: String,
        /// Memory cell.
        cell: String,
        /// Write port index.
        port: u32,
    },
    /// A memory write port triggers on the falling edge.
    #[error("negative-edge write port {port} on memory `{module}.{cell}`")]
    NegedgeWritePort {
        /// Owning module.
        module: String,
        /// Memory cell.
        cell: String,
        /// Write port index.
        port: u32,
    },
    /// A memory write port enables individual bits of a word differently.
    #[error("complex write enable on port {port} of memory `{module}.{cell}`")]
    ComplexWriteEnable {
        /// Owning module.
        module: String,
        /// Memory cell.
        cell: String,
        /// Write port index.
        port: u32,
    },
    /// A flip-flop triggers on the falling edge.
    #[error("negative-edge clock on flip-flop `{module}.{cell}`")]
    NegedgeFlipFlop {
        /// Owning module.
        module: String,
        /// Flip-flop cell.
        cell: String,
    },
    /// A cell lacks a parameter its type requires.
    #[error("cell `{module}.{cell}` is missing parameter `{param}`")]
    MissingParameter {
        /// Owning module.
        module: String,
        /// Offending cell.
        cell: String,
        /// Parameter name.
        param: &'static str,
    },
    /// A cell parameter has a value of the wrong kind.
    #[error("parameter `{param}` of cell `{module}.{cell}` is not a non-negative integer")]
    InvalidParameter {
        /// Owning module.
        module: String,
        /// Offending cell.
        cell: String,
        /// Parameter name.
        param: &'static str,
    },
    /// A cell lacks a port connection its type requires.
    #[error("cell `{module}.{cell}` has no connection for port `{port}`")]
    MissingPort {
        /// Owning module.
        module: String,
        /// Offending cell.
        cell: String,
        /// Port name.
        port: &'static str,
    },
    /// The design has no modules, so there is no circuit to name.
    #[error("design contains no modules")]
    EmptyDesign,
    /// The requested top module does not exist.
    #[error("top module `{0}` not found in design")]
    UnknownTop(String),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl FirrtlError {
    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            FirrtlError::InoutPort { .. } => 301,
            FirrtlError::MemoryOffset { .. } => 302,
            FirrtlError::MemoryInit { .. } => 303,
            FirrtlError::ClockedReadPort { .. } => 304,
            FirrtlError::UnclockedWritePort { .. } => 305,
            FirrtlError::NegedgeWritePort { .. } => 306,
            FirrtlError::ComplexWriteEnable { .. } => 307,
            FirrtlError::NegedgeFlipFlop { .. } => 308,
            FirrtlError::MissingParameter { .. } => 309,
            FirrtlError::InvalidParameter { .. } => 310,
            FirrtlError::MissingPort { .. } => 311,
            FirrtlError::EmptyDesign => 312,
            FirrtlError::UnknownTop(_) => 313,
            FirrtlError::Io(_) => 314,
        };
        DiagnosticCode::error(number)
    }

    /// The netlist location the error refers to.
    pub fn location(&self) -> Location {
        match self {
            FirrtlError::InoutPort { module, port } => Location::item(module, port),
            FirrtlError::MemoryOffset { module, cell, .. }
            | FirrtlError::MemoryInit { module, cell }
            | FirrtlError::ClockedReadPort { module, cell, .. }
            | FirrtlError::UnclockedWritePort { module, cell, .. }
            | FirrtlError::NegedgeWritePort { module, cell, .. }
            | FirrtlError::ComplexWriteEnable { module, cell, .. }
            | FirrtlError::NegedgeFlipFlop { module, cell }
            | FirrtlError::MissingParameter { module, cell, .. }
            | FirrtlError::InvalidParameter { module, cell, .. }
            | FirrtlError::MissingPort { module, cell, .. } => Location::item(module, cell),
            FirrtlError::EmptyDesign | FirrtlError::UnknownTop(_) | FirrtlError::Io(_) => {
                Location::UNKNOWN
            }
        }
    }

    /// Converts the error into an error-severity diagnostic for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), self.location());
        match self {
            FirrtlError::MemoryInit { .. } => {
                diag.with_help("remove the initializer or map the memory to registers first")
            }
            FirrtlError::ClockedReadPort { .. } => {
                diag.with_help("move the read-port register out of the memory first")
            }
            FirrtlError::NegedgeFlipFlop { .. } | FirrtlError::NegedgeWritePort { .. } => {
                diag.with_note("only rising-edge clocks can be expressed")
            }
            _ => diag,
        }
    }
}

/// Returns a netlist name without its leading `\`.
pub(crate) fn display_name(name: &str) -> &str {
    name.strip_prefix('\\').unwrap_or(name)
}
