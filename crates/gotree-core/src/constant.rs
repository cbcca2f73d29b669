//! Compile-time constant values carried by constant operands.
//!
//! The builder folds operators applied to constant operands so that later
//! checks (division by zero, shift counts, representability of untyped
//! values) can look at the value while the emitted expression tree is kept
//! intact.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::ops::{BinaryOp, UnaryOp};
use crate::types::BasicKind;

/// A constant value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Bool(bool),
    Int(i128),
    Float(OrderedFloat<f64>),
    String(String),
}

impl ConstValue {
    /// The untyped kind a literal of this value has.
    pub fn untyped_kind(&self) -> BasicKind {
        match self {
            ConstValue::Bool(_) => BasicKind::UntypedBool,
            ConstValue::Int(_) => BasicKind::UntypedInt,
            ConstValue::Float(_) => BasicKind::UntypedFloat,
            ConstValue::String(_) => BasicKind::UntypedString,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            ConstValue::Int(v) => Some(*v),
            ConstValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e30 => Some(f.0 as i128),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConstValue::Int(v) => Some(*v as f64),
            ConstValue::Float(f) => Some(f.0),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            ConstValue::Int(v) => *v == 0,
            ConstValue::Float(f) => f.0 == 0.0,
            _ => false,
        }
    }

    /// Whether the value fits the given typed kind without loss.
    pub fn representable_as(&self, kind: BasicKind, word_size: u32) -> bool {
        match self {
            ConstValue::Bool(_) => kind.is_boolean(),
            ConstValue::String(_) => kind.is_string(),
            ConstValue::Float(_) if kind.is_float() => true,
            ConstValue::Int(_) if kind.is_float() => true,
            value if kind.is_integer() => match (value.as_int(), kind.bit_width(word_size)) {
                (Some(v), Some(bits)) => int_fits(v, bits, kind.is_unsigned()),
                (Some(_), None) => kind.is_untyped(),
                (None, _) => false,
            },
            _ => false,
        }
    }

    /// Fold a unary operator. `unsigned_bits` is the width of the operand when
    /// it has an unsigned integer type, which `^x` needs.
    pub fn unary_op(op: UnaryOp, x: &ConstValue, unsigned_bits: Option<u32>) -> Option<ConstValue> {
        match (op, x) {
            (UnaryOp::Plus, v @ (ConstValue::Int(_) | ConstValue::Float(_))) => Some(v.clone()),
            (UnaryOp::Neg, ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int),
            (UnaryOp::Neg, ConstValue::Float(f)) => Some(ConstValue::Float(-*f)),
            (UnaryOp::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
            (UnaryOp::BitNot, ConstValue::Int(v)) => Some(ConstValue::Int(match unsigned_bits {
                Some(bits) => !v & low_mask(bits),
                None => !v,
            })),
            _ => None,
        }
    }

    /// Fold a binary operator. Returns `None` when the operator does not apply
    /// to the operands or the result is undefined (division by zero, shift
    /// count out of range).
    pub fn binary_op(op: BinaryOp, x: &ConstValue, y: &ConstValue) -> Option<ConstValue> {
        use BinaryOp::*;
        use ConstValue::*;

        if op.is_shift() {
            let (v, count) = (x.as_int()?, y.as_int()?);
            let count = u32::try_from(count).ok().filter(|c| *c < 127)?;
            return match op {
                Shl => v.checked_shl(count).map(Int),
                _ => Some(Int(v >> count)),
            };
        }

        match (x, y) {
            (Bool(a), Bool(b)) => match op {
                LogicalAnd => Some(Bool(*a && *b)),
                LogicalOr => Some(Bool(*a || *b)),
                Equal => Some(Bool(a == b)),
                NotEqual => Some(Bool(a != b)),
                _ => None,
            },
            (String(a), String(b)) => match op {
                Add => Some(String(format!("{a}{b}"))),
                Equal => Some(Bool(a == b)),
                NotEqual => Some(Bool(a != b)),
                Less => Some(Bool(a < b)),
                LessEqual => Some(Bool(a <= b)),
                Greater => Some(Bool(a > b)),
                GreaterEqual => Some(Bool(a >= b)),
                _ => None,
            },
            (Int(a), Int(b)) => fold_int(op, *a, *b),
            (Int(_) | Float(_), Int(_) | Float(_)) => fold_float(op, x.as_float()?, y.as_float()?),
            _ => None,
        }
    }
}

fn fold_int(op: BinaryOp, a: i128, b: i128) -> Option<ConstValue> {
    use BinaryOp::*;
    use ConstValue::*;
    let value = match op {
        Add => Int(a.checked_add(b)?),
        Sub => Int(a.checked_sub(b)?),
        Mul => Int(a.checked_mul(b)?),
        Quo => Int(a.checked_div(b)?),
        Rem => Int(a.checked_rem(b)?),
        BitAnd => Int(a & b),
        BitOr => Int(a | b),
        BitXor => Int(a ^ b),
        AndNot => Int(a & !b),
        Equal => Bool(a == b),
        NotEqual => Bool(a != b),
        Less => Bool(a < b),
        LessEqual => Bool(a <= b),
        Greater => Bool(a > b),
        GreaterEqual => Bool(a >= b),
        LogicalAnd | LogicalOr | Shl | Shr => return None,
    };
    Some(value)
}

fn fold_float(op: BinaryOp, a: f64, b: f64) -> Option<ConstValue> {
    use BinaryOp::*;
    use ConstValue::*;
    let value = match op {
        Add => Float(OrderedFloat(a + b)),
        Sub => Float(OrderedFloat(a - b)),
        Mul => Float(OrderedFloat(a * b)),
        Quo if b != 0.0 => Float(OrderedFloat(a / b)),
        Equal => Bool(a == b),
        NotEqual => Bool(a != b),
        Less => Bool(a < b),
        LessEqual => Bool(a <= b),
        Greater => Bool(a > b),
        GreaterEqual => Bool(a >= b),
        _ => return None,
    };
    Some(value)
}

fn low_mask(bits: u32) -> i128 {
    if bits >= 127 { i128::MAX } else { (1i128 << bits) - 1 }
}

fn int_fits(v: i128, bits: u32, unsigned: bool) -> bool {
    if unsigned {
        v >= 0 && (bits >= 127 || v <= low_mask(bits))
    } else {
        let max = low_mask(bits - 1);
        v >= -max - 1 && v <= max
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Float(v) => write!(f, "{}", v.0),
            ConstValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for ConstValue {
    fn from(v: bool) -> Self {
        ConstValue::Bool(v)
    }
}

impl From<i64> for ConstValue {
    fn from(v: i64) -> Self {
        ConstValue::Int(v as i128)
    }
}

impl From<i32> for ConstValue {
    fn from(v: i32) -> Self {
        ConstValue::Int(v as i128)
    }
}

impl From<u64> for ConstValue {
    fn from(v: u64) -> Self {
        ConstValue::Int(v as i128)
    }
}

impl From<f64> for ConstValue {
    fn from(v: f64) -> Self {
        ConstValue::Float(OrderedFloat(v))
    }
}

impl From<&str> for ConstValue {
    fn from(v: &str) -> Self {
        ConstValue::String(v.to_string())
    }
}

impl From<String> for ConstValue {
    fn from(v: String) -> Self {
        ConstValue::String(v)
    }
}
