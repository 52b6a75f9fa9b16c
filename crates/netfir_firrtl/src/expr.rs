//! FIRRTL value expressions and the signal expression builder.

use crate::names::NameTable;
use netfir_common::Logic;
use netfir_netlist::{Module, SigChunk, SigSpec};
use std::fmt;

/// Width at which a dynamic left-shift amount must be clamped.
pub const MAX_DSHL_WIDTH: u32 = 20;

/// A FIRRTL primitive operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrimOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Remainder.
    Rem,
    /// Less than.
    Lt,
    /// Less than or equal.
    Leq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Geq,
    /// Equality.
    Eq,
    /// Inequality.
    Neq,
    /// Extend to a minimum width.
    Pad,
    /// Reinterpret as unsigned.
    AsUInt,
    /// Reinterpret as signed.
    AsSInt,
    /// Reinterpret as a clock.
    AsClock,
    /// Static left shift.
    Shl,
    /// Static right shift.
    Shr,
    /// Dynamic left shift.
    Dshl,
    /// Dynamic right shift.
    Dshr,
    /// Arithmetic negation.
    Neg,
    /// Bitwise complement.
    Not,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// AND reduction.
    Andr,
    /// OR reduction.
    Orr,
    /// XOR reduction.
    Xorr,
    /// Concatenation.
    Cat,
    /// Bit extraction.
    Bits,
}

impl PrimOp {
    /// The operator's FIRRTL spelling.
    pub fn name(self) -> &'static str {
        match self {
            PrimOp::Add => "add",
            PrimOp::Sub => "sub",
            PrimOp::Mul => "mul",
            PrimOp::Div => "div",
            PrimOp::Rem => "rem",
            PrimOp::Lt => "lt",
            PrimOp::Leq => "leq",
            PrimOp::Gt => "gt",
            PrimOp::Geq => "geq",
            PrimOp::Eq => "eq",
            PrimOp::Neq => "neq",
            PrimOp::Pad => "pad",
            PrimOp::AsUInt => "asUInt",
            PrimOp::AsSInt => "asSInt",
            PrimOp::AsClock => "asClock",
            PrimOp::Shl => "shl",
            PrimOp::Shr => "shr",
            PrimOp::Dshl => "dshl",
            PrimOp::Dshr => "dshr",
            PrimOp::Neg => "neg",
            PrimOp::Not => "not",
            PrimOp::And => "and",
            PrimOp::Or => "or",
            PrimOp::Xor => "xor",
            PrimOp::Andr => "andr",
            PrimOp::Orr => "orr",
            PrimOp::Xorr => "xorr",
            PrimOp::Cat => "cat",
            PrimOp::Bits => "bits",
        }
    }
}

/// The payload of a literal.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LitValue {
    /// Hex digits, most significant first, printed as `"h…"`.
    Hex(String),
    /// A decimal integer.
    Dec(u64),
}

/// A FIRRTL value expression.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    /// A named component, possibly a subfield path such as `m.r0.data`.
    Ref(String),
    /// `UInt<w>(v)` / `SInt<w>(v)`; the width is optional.
    Lit {
        /// `SInt` rather than `UInt`.
        signed: bool,
        /// Declared width.
        width: Option<u32>,
        /// The value.
        value: LitValue,
    },
    /// `op(args…, consts…)`.
    Prim {
        /// The operation.
        op: PrimOp,
        /// Expression operands.
        args: Vec<Expr>,
        /// Integer parameters.
        consts: Vec<u64>,
    },
    /// `mux(sel, tval, fval)`.
    Mux {
        /// One-bit select.
        sel: Box<Expr>,
        /// Value when `sel` is 1.
        tval: Box<Expr>,
        /// Value when `sel` is 0.
        fval: Box<Expr>,
    },
    /// `validif(cond, value)`.
    ValidIf {
        /// Validity condition.
        cond: Box<Expr>,
        /// Value when valid.
        value: Box<Expr>,
    },
}

impl Expr {
    /// A reference to a named component.
    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    /// An unsigned decimal literal.
    pub fn uint(width: Option<u32>, value: u64) -> Self {
        Expr::Lit {
            signed: false,
            width,
            value: LitValue::Dec(value),
        }
    }

    /// A zero literal of the given signedness and optional width.
    pub fn zero(signed: bool, width: Option<u32>) -> Self {
        Expr::Lit {
            signed,
            width,
            value: LitValue::Dec(0),
        }
    }

    /// An unsigned literal of `bits.len()` bits. `x` and `z` encode as 0.
    pub fn const_bits(bits: &[Logic]) -> Self {
        Expr::Lit {
            signed: false,
            width: Some(bits.len() as u32),
            value: LitValue::Hex(hex_digits(bits)),
        }
    }

    /// `op(args…)`.
    pub fn prim(op: PrimOp, args: Vec<Expr>) -> Self {
        Expr::Prim {
            op,
            args,
            consts: Vec::new(),
        }
    }

    /// `op(self)`.
    pub fn unary(self, op: PrimOp) -> Self {
        Expr::prim(op, vec![self])
    }

    /// `op(self, rhs)`.
    pub fn binary(self, op: PrimOp, rhs: Expr) -> Self {
        Expr::prim(op, vec![self, rhs])
    }

    fn with_consts(self, op: PrimOp, consts: Vec<u64>) -> Self {
        Expr::Prim {
            op,
            args: vec![self],
            consts,
        }
    }

    /// `asSInt(self)`.
    pub fn as_sint(self) -> Self {
        self.unary(PrimOp::AsSInt)
    }

    /// `asUInt(self)`.
    pub fn as_uint(self) -> Self {
        self.unary(PrimOp::AsUInt)
    }

    /// `asClock(self)`.
    pub fn as_clock(self) -> Self {
        self.unary(PrimOp::AsClock)
    }

    /// `pad(self, width)`.
    pub fn pad(self, width: u32) -> Self {
        self.with_consts(PrimOp::Pad, vec![u64::from(width)])
    }

    /// `bits(self, hi, lo)`.
    pub fn bits(self, hi: u32, lo: u32) -> Self {
        self.with_consts(PrimOp::Bits, vec![u64::from(hi), u64::from(lo)])
    }

    /// `shl(self, amount)`.
    pub fn shl(self, amount: u64) -> Self {
        self.with_consts(PrimOp::Shl, vec![amount])
    }

    /// `shr(self, amount)`.
    pub fn shr(self, amount: u64) -> Self {
        self.with_consts(PrimOp::Shr, vec![amount])
    }

    /// `cat(high, low)`.
    pub fn cat(high: Expr, low: Expr) -> Self {
        Expr::prim(PrimOp::Cat, vec![high, low])
    }

    /// `mux(sel, tval, fval)`.
    pub fn mux(sel: Expr, tval: Expr, fval: Expr) -> Self {
        Expr::Mux {
            sel: Box::new(sel),
            tval: Box::new(tval),
            fval: Box::new(fval),
        }
    }

    /// `validif(cond, value)`.
    pub fn valid_if(cond: Expr, value: Expr) -> Self {
        Expr::ValidIf {
            cond: Box::new(cond),
            value: Box::new(value),
        }
    }

    /// Folds terms given least significant first into nested `cat`s, each
    /// higher term wrapping everything below it.
    ///
    /// Returns `None` for an empty sequence.
    pub fn concat(terms: impl IntoIterator<Item = Expr>) -> Option<Self> {
        terms
            .into_iter()
            .fold(None, |acc, term| match acc {
                None => Some(term),
                Some(low) => Some(Expr::cat(term, low)),
            })
    }
}

/// Limits a dynamic shift amount of `width` bits to what `dshl` accepts.
///
/// Amounts narrower than [`MAX_DSHL_WIDTH`] pass through. Wider amounts
/// saturate at the largest 19-bit value.
pub fn clamp_shift_amount(amount: Expr, width: u32) -> Expr {
    if width < MAX_DSHL_WIDTH {
        return amount;
    }
    let bits = MAX_DSHL_WIDTH - 1;
    let max = Expr::uint(Some(bits), (1u64 << bits) - 1);
    Expr::mux(
        amount.clone().binary(PrimOp::Gt, max.clone()),
        max,
        amount.bits(bits - 1, 0),
    )
}

/// Encodes bits (LSB first) as hex digits, MSB first, zero-padding to a
/// multiple of four bits.
fn hex_digits(bits: &[Logic]) -> String {
    let digits = bits.len().div_ceil(4);
    (0..digits)
        .rev()
        .map(|d| {
            let nibble = (0..4)
                .filter(|&i| bits.get(d * 4 + i) == Some(&Logic::One))
                .fold(0u32, |acc, i| acc | (1 << i));
            char::from_digit(nibble, 16).unwrap_or('0')
        })
        .collect()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ref(name) => f.write_str(name),
            Expr::Lit {
                signed,
                width,
                value,
            } => {
                f.write_str(if *signed { "SInt" } else { "UInt" })?;
                if let Some(w) = width {
                    write!(f, "<{w}>")?;
                }
                match value {
                    LitValue::Hex(digits) => write!(f, "(\"h{digits}\")"),
                    LitValue::Dec(v) => write!(f, "({v})"),
                }
            }
            Expr::Prim { op, args, consts } => {
                write!(f, "{}(", op.name())?;
                let mut first = true;
                for arg in args {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{arg}")?;
                }
                for c in consts {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{c}")?;
                }
                f.write_str(")")
            }
            Expr::Mux { sel, tval, fval } => write!(f, "mux({sel}, {tval}, {fval})"),
            Expr::ValidIf { cond, value } => write!(f, "validif({cond}, {value})"),
        }
    }
}

/// Builds the expression for a signal vector.
///
/// Each chunk becomes the wire's own name when it spans the whole wire,
/// `bits(wire, hi, lo)` for a sub-range, or a hex literal for constants.
/// Higher chunks wrap lower ones: `cat(high, low)`.
pub fn sig_expr(sig: &SigSpec, module: &Module, names: &mut NameTable) -> Expr {
    let terms = sig.chunks().into_iter().map(|chunk| match chunk {
        SigChunk::Const(bits) => Expr::const_bits(&bits),
        SigChunk::Wire {
            wire,
            offset,
            width,
        } => {
            let w = &module.wires[wire];
            let name = Expr::Ref(names.canonicalize(&w.name));
            if offset == 0 && width == w.width {
                name
            } else {
                name.bits(offset + width - 1, offset)
            }
        }
    });
    // Zero-width signals only occur on unconnected ports; they read as no bits.
    Expr::concat(terms).unwrap_or_else(|| Expr::uint(Some(0), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use netfir_common::LogicVec;
    use netfir_netlist::{PortDirection, Wire, WireId};

    fn module() -> (Module, WireId, WireId) {
        let mut m = Module::new("\\top");
        let a = m.add_wire(Wire::port("\\a", 8, PortDirection::Input));
        let b = m.add_wire(Wire::new("$b", 4));
        (m, a, b)
    }

    fn konst(s: &str) -> SigSpec {
        SigSpec::constant(&LogicVec::from_binary_str(s).unwrap())
    }

    #[test]
    fn literal_display() {
        assert_eq!(Expr::uint(Some(19), 524287).to_string(), "UInt<19>(524287)");
        assert_eq!(Expr::zero(true, None).to_string(), "SInt(0)");
        assert_eq!(Expr::zero(false, Some(4)).to_string(), "UInt<4>(0)");
    }

    #[test]
    fn hex_encoding_pads_to_nibbles() {
        let bits: Vec<Logic> = LogicVec::from_binary_str("101").unwrap().iter().collect();
        assert_eq!(Expr::const_bits(&bits).to_string(), "UInt<3>(\"h5\")");
        let bits: Vec<Logic> = LogicVec::from_binary_str("1x0z11111").unwrap().iter().collect();
        assert_eq!(Expr::const_bits(&bits).to_string(), "UInt<9>(\"h11f\")");
    }

    #[test]
    fn prim_display_with_consts() {
        let e = Expr::reference("a").pad(8).as_sint().bits(3, 0);
        assert_eq!(e.to_string(), "bits(asSInt(pad(a, 8)), 3, 0)");
        let e = Expr::reference("a").binary(PrimOp::Add, Expr::reference("b"));
        assert_eq!(e.to_string(), "add(a, b)");
    }

    #[test]
    fn mux_and_validif_display() {
        let e = Expr::mux(Expr::reference("s"), Expr::reference("b"), Expr::reference("a"));
        assert_eq!(e.to_string(), "mux(s, b, a)");
        let e = Expr::valid_if(Expr::reference("c"), Expr::reference("v"));
        assert_eq!(e.to_string(), "validif(c, v)");
    }

    #[test]
    fn clamp_threshold() {
        assert_eq!(clamp_shift_amount(Expr::reference("b"), 19).to_string(), "b");
        assert_eq!(
            clamp_shift_amount(Expr::reference("b"), 20).to_string(),
            "mux(gt(b, UInt<19>(524287)), UInt<19>(524287), bits(b, 18, 0))"
        );
    }

    #[test]
    fn whole_wire_uses_name() {
        let (m, a, _) = module();
        let mut names = NameTable::new();
        let e = sig_expr(&SigSpec::wire(a, 8), &m, &mut names);
        assert_eq!(e.to_string(), "a");
    }

    #[test]
    fn partial_wire_uses_bits() {
        let (m, a, _) = module();
        let mut names = NameTable::new();
        let e = sig_expr(&SigSpec::wire_range(a, 2, 3), &m, &mut names);
        assert_eq!(e.to_string(), "bits(a, 4, 2)");
    }

    #[test]
    fn chunks_fold_high_over_low() {
        let (m, a, b) = module();
        let mut sig = SigSpec::wire_range(a, 0, 2);
        sig.append(&konst("01"));
        sig.append(&SigSpec::wire(b, 4));
        let mut names = NameTable::new();
        let e = sig_expr(&sig, &m, &mut names);
        assert_eq!(e.to_string(), "cat(_b, cat(UInt<2>(\"h1\"), bits(a, 1, 0)))");
    }

    #[test]
    fn builder_is_deterministic() {
        let (m, a, b) = module();
        let mut sig = SigSpec::wire(b, 4);
        sig.append(&SigSpec::wire_range(a, 5, 3));
        let mut names = NameTable::new();
        let first = sig_expr(&sig, &m, &mut names).to_string();
        let second = sig_expr(&sig, &m, &mut names).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn concat_of_nothing() {
        assert_eq!(Expr::concat(Vec::new()), None);
    }
}
