//! Operator definitions.
//!
//! Provides enums for binary and unary operators along with the precedence
//! levels of the target language, and the method-name suffixes used when an
//! operator is lowered to a method call on a named type.

use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,

    // Comparison
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    // Additive
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `|`
    BitOr,
    /// `^`
    BitXor,

    // Multiplicative
    /// `*`
    Mul,
    /// `/`
    Quo,
    /// `%`
    Rem,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&`
    BitAnd,
    /// `&^`
    AndNot,
}

impl BinaryOp {
    /// Binding power, higher binds tighter.
    pub const fn precedence(self) -> u8 {
        use BinaryOp::*;
        match self {
            LogicalOr => 1,
            LogicalAnd => 2,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => 3,
            Add | Sub | BitOr | BitXor => 4,
            Mul | Quo | Rem | Shl | Shr | BitAnd | AndNot => 5,
        }
    }

    pub const fn is_comparison(self) -> bool {
        use BinaryOp::*;
        matches!(self, Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual)
    }

    pub const fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogicalOr | BinaryOp::LogicalAnd)
    }

    /// Operators only defined on integers.
    pub const fn is_integer_only(self) -> bool {
        use BinaryOp::*;
        matches!(self, Rem | BitOr | BitXor | BitAnd | AndNot | Shl | Shr)
    }

    /// Method name suffix when the operator is lowered to a method of a named
    /// type, e.g. `Add` for `Gop_Add`.
    pub const fn method_suffix(self) -> &'static str {
        use BinaryOp::*;
        match self {
            LogicalOr => "LOr",
            LogicalAnd => "LAnd",
            Equal => "EQ",
            NotEqual => "NE",
            Less => "LT",
            LessEqual => "LE",
            Greater => "GT",
            GreaterEqual => "GE",
            Add => "Add",
            Sub => "Sub",
            BitOr => "Or",
            BitXor => "Xor",
            Mul => "Mul",
            Quo => "Quo",
            Rem => "Rem",
            Shl => "Lsh",
            Shr => "Rsh",
            BitAnd => "And",
            AndNot => "AndNot",
        }
    }

    pub const fn as_str(self) -> &'static str {
        use BinaryOp::*;
        match self {
            LogicalOr => "||",
            LogicalAnd => "&&",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Add => "+",
            Sub => "-",
            BitOr => "|",
            BitXor => "^",
            Mul => "*",
            Quo => "/",
            Rem => "%",
            Shl => "<<",
            Shr => ">>",
            BitAnd => "&",
            AndNot => "&^",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators.
///
/// Address-of and dereference are separate builder calls, so they are not
/// listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `!x`
    Not,
    /// `^x`
    BitNot,
}

impl UnaryOp {
    pub const fn method_suffix(self) -> &'static str {
        match self {
            UnaryOp::Neg => "Neg",
            UnaryOp::Plus => "Dup",
            UnaryOp::Not => "Not",
            UnaryOp::BitNot => "Not",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "^",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation submitted to the type oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Unary(op) => op.fmt(f),
            Op::Binary(op) => op.fmt(f),
        }
    }
}
