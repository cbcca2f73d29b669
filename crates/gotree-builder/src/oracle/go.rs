//! Typing rules for Go basic types and named types over them.
//!
//! ## Operators
//!
//! | operator | operands |
//! |---|---|
//! | `+` | numeric, string |
//! | `- * /` | numeric |
//! | `% & \| ^ &^` | integer |
//! | `<< >>` | integer, integer count |
//! | `&& \|\|` | boolean |
//! | `== !=` | comparable |
//! | `< <= > >=` | ordered |
//!
//! Operands of a binary operator must have identical types, except that an
//! untyped constant takes the type of the other operand. Comparisons yield an
//! untyped boolean.

use gotree_core::{BasicKind, BinaryOp, Op, Type, UnaryOp};
use gotree_registry::SymbolRegistry;

use super::TypeOracle;

/// The stock oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoOracle;

impl GoOracle {
    pub fn new() -> Self {
        Self
    }
}

impl TypeOracle for GoOracle {
    fn result_type(&self, types: &SymbolRegistry, op: Op, operands: &[Type]) -> Option<Type> {
        match (op, operands) {
            (Op::Unary(op), [x]) => unary_result(types, op, x),
            (Op::Binary(op), [x, y]) => binary_result(types, op, x, y),
            _ => None,
        }
    }

    fn convertible(&self, types: &SymbolRegistry, from: &Type, to: &Type) -> bool {
        assignable(types, from, to)
    }

    fn explicit_convertible(&self, types: &SymbolRegistry, from: &Type, to: &Type) -> bool {
        if assignable(types, from, to) {
            return true;
        }

        let (uf, ut) = (types.underlying(from), types.underlying(to));
        if uf == ut {
            return true;
        }

        match (uf, ut) {
            (Type::Basic(f), Type::Basic(t)) => basic_convertible(*f, *t),
            (Type::Pointer(_), Type::Basic(BasicKind::UnsafePointer))
            | (Type::Basic(BasicKind::UnsafePointer), Type::Pointer(_)) => true,
            (Type::Pointer(f), Type::Pointer(t)) => types.underlying(f) == types.underlying(t),
            (Type::Slice(elem), Type::Basic(t)) | (Type::Basic(t), Type::Slice(elem)) => {
                t.is_string()
                    && matches!(
                        types.underlying(elem),
                        Type::Basic(BasicKind::Uint8 | BasicKind::Int32)
                    )
            }
            _ => false,
        }
    }
}

fn basic_convertible(from: BasicKind, to: BasicKind) -> bool {
    use BasicKind::*;
    match (from, to) {
        (f, t) if f.is_numeric() && t.is_numeric() => true,
        (f, t) if f.is_integer() && t.is_string() => true,
        (f, t) if f.is_string() && t.is_string() => true,
        (Uintptr, UnsafePointer) | (UnsafePointer, Uintptr) => true,
        (UntypedNil, UnsafePointer) => true,
        _ => false,
    }
}

fn basic_of(types: &SymbolRegistry, ty: &Type) -> Option<BasicKind> {
    types.underlying(ty).as_basic()
}

// ============================================================================
// Operators
// ============================================================================

fn unary_result(types: &SymbolRegistry, op: UnaryOp, x: &Type) -> Option<Type> {
    let kind = basic_of(types, x)?;
    let legal = match op {
        UnaryOp::Neg | UnaryOp::Plus => kind.is_numeric(),
        UnaryOp::Not => kind.is_boolean(),
        UnaryOp::BitNot => kind.is_integer(),
    };
    legal.then(|| x.clone())
}

fn binary_result(types: &SymbolRegistry, op: BinaryOp, x: &Type, y: &Type) -> Option<Type> {
    if op.is_shift() {
        let (xk, yk) = (basic_of(types, x)?, basic_of(types, y)?);
        return (xk.is_integer() && yk.is_integer()).then(|| x.clone());
    }

    let unified = unify(types, x, y)?;
    if op.is_comparison() {
        let legal = match op {
            BinaryOp::Equal | BinaryOp::NotEqual => comparable(types, &unified),
            _ => basic_of(types, &unified).is_some_and(BasicKind::is_ordered),
        };
        return legal.then_some(Type::Basic(BasicKind::UntypedBool));
    }

    let kind = basic_of(types, &unified)?;
    let legal = if op.is_logical() {
        kind.is_boolean()
    } else if op.is_integer_only() {
        kind.is_integer()
    } else if op == BinaryOp::Add {
        kind.is_numeric() || kind.is_string()
    } else {
        kind.is_numeric()
    };
    legal.then_some(unified)
}

/// The common type of two binary operands.
fn unify(types: &SymbolRegistry, x: &Type, y: &Type) -> Option<Type> {
    if x == y {
        return Some(x.clone());
    }
    match (x.is_untyped(), y.is_untyped()) {
        (true, false) => assignable(types, x, y).then(|| y.clone()),
        (false, true) => assignable(types, y, x).then(|| x.clone()),
        (true, true) => {
            let (xk, yk) = (x.as_basic()?, y.as_basic()?);
            let rank = untyped_rank(xk).zip(untyped_rank(yk))?;
            Some(Type::Basic(if rank.0 >= rank.1 { xk } else { yk }))
        }
        (false, false) => None,
    }
}

/// Ordering of untyped numeric kinds; the larger kind wins when mixed.
fn untyped_rank(kind: BasicKind) -> Option<u8> {
    match kind {
        BasicKind::UntypedInt => Some(0),
        BasicKind::UntypedRune => Some(1),
        BasicKind::UntypedFloat => Some(2),
        _ => None,
    }
}

fn comparable(types: &SymbolRegistry, ty: &Type) -> bool {
    match types.underlying(ty) {
        Type::Basic(_) | Type::Pointer(_) => true,
        Type::Struct(st) => st.fields.iter().all(|f| comparable(types, &f.ty)),
        Type::Named(_) | Type::Slice(_) | Type::Signature(_) | Type::Tuple(_) => false,
    }
}

// ============================================================================
// Assignability
// ============================================================================

fn assignable(types: &SymbolRegistry, from: &Type, to: &Type) -> bool {
    if from == to {
        return true;
    }
    if let Some(kind) = from.as_basic().filter(|k| k.is_untyped()) {
        return untyped_assignable(types, kind, to);
    }
    if matches!(from, Type::Tuple(_)) || matches!(to, Type::Tuple(_)) {
        return false;
    }

    // Identical underlying types, at least one side unnamed.
    let one_unnamed = !is_named(from) || !is_named(to);
    one_unnamed && types.underlying(from) == types.underlying(to)
}

/// Declared and predeclared types are named; type literals are not.
fn is_named(ty: &Type) -> bool {
    match ty {
        Type::Named(_) => true,
        Type::Basic(kind) => !kind.is_untyped(),
        _ => false,
    }
}

fn untyped_assignable(types: &SymbolRegistry, from: BasicKind, to: &Type) -> bool {
    let target = types.underlying(to);
    if from == BasicKind::UntypedNil {
        return matches!(
            target,
            Type::Pointer(_)
                | Type::Slice(_)
                | Type::Signature(_)
                | Type::Basic(BasicKind::UnsafePointer)
        );
    }
    let Some(kind) = target.as_basic() else {
        return false;
    };
    if kind.is_untyped() {
        return match (untyped_rank(from), untyped_rank(kind)) {
            (Some(f), Some(t)) => f <= t,
            _ => from == kind,
        };
    }
    match from {
        BasicKind::UntypedBool => kind.is_boolean(),
        BasicKind::UntypedInt | BasicKind::UntypedRune | BasicKind::UntypedFloat => {
            kind.is_numeric()
        }
        BasicKind::UntypedString => kind.is_string(),
        _ => false,
    }
}
