//! Expression nodes.
//!
//! Type expressions share the `Expr` enum, the way the target language's own
//! syntax tree does: a conversion `(*float32)(p)` is a call whose callee is a
//! parenthesized pointer type.

use crate::constant::ConstValue;
use crate::ops::{BinaryOp, UnaryOp};

use super::stmt::BlockStmt;

/// An identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The blank identifier `_`.
    pub fn blank() -> Self {
        Self::new("_")
    }
}

/// Kind of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    String,
}

/// A literal of basic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Literal text as it appears in source.
    pub value: String,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    /// `x.sel`
    Selector(Box<SelectorExpr>),
    /// `op x`
    Unary(Box<UnaryExpr>),
    /// `&x`
    AddrOf(Box<Expr>),
    /// `*x`, both dereference and pointer type.
    Star(Box<Expr>),
    /// `x op y`
    Binary(Box<BinaryExpr>),
    /// `(x)`
    Paren(Box<Expr>),
    /// `fun(args)`, also conversions.
    Call(Box<CallExpr>),
    /// `func(...) ... { ... }`
    FuncLit(Box<FuncLit>),

    /// `[]elt`
    ArrayType(Box<Expr>),
    /// `...elt` in a variadic parameter list.
    Ellipsis(Box<Expr>),
    /// `struct { ... }`
    StructType(StructTypeExpr),
    /// `func(...) ...`
    FuncType(FuncTypeExpr),
}

/// `x.sel`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorExpr {
    pub x: Expr,
    pub sel: Ident,
}

/// `op x`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub x: Expr,
}

/// `x op y`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryExpr {
    pub x: Expr,
    pub op: BinaryOp,
    pub y: Expr,
}

/// `fun(args)` or `fun(args...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallExpr {
    pub fun: Expr,
    pub args: Vec<Expr>,
    pub ellipsis: bool,
}

/// A function literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncLit {
    pub ty: FuncTypeExpr,
    pub body: BlockStmt,
}

/// A field or parameter group: `a, b T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldNode {
    /// Empty for unnamed parameters and embedded fields.
    pub names: Vec<Ident>,
    pub ty: Expr,
}

/// `struct { fields }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructTypeExpr {
    pub fields: Vec<FieldNode>,
}

/// `func(params) results`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FuncTypeExpr {
    pub params: Vec<FieldNode>,
    pub results: Vec<FieldNode>,
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(Ident::new(name))
    }

    pub fn int_lit(value: i128) -> Expr {
        Expr::BasicLit(BasicLit {
            kind: LitKind::Int,
            value: value.to_string(),
        })
    }

    /// The literal spelling of a constant value.
    pub fn from_const(value: &ConstValue) -> Expr {
        match value {
            ConstValue::Bool(b) => Expr::ident(if *b { "true" } else { "false" }),
            ConstValue::Int(v) => Expr::int_lit(*v),
            ConstValue::Float(f) => Expr::BasicLit(BasicLit {
                kind: LitKind::Float,
                value: format!("{:?}", f.0),
            }),
            ConstValue::String(s) => Expr::BasicLit(BasicLit {
                kind: LitKind::String,
                value: format!("{s:?}"),
            }),
        }
    }

    pub fn selector(x: Expr, sel: impl Into<String>) -> Expr {
        Expr::Selector(Box::new(SelectorExpr {
            x,
            sel: Ident::new(sel),
        }))
    }

    pub fn unary(op: UnaryOp, x: Expr) -> Expr {
        Expr::Unary(Box::new(UnaryExpr { op, x }))
    }

    pub fn binary(x: Expr, op: BinaryOp, y: Expr) -> Expr {
        Expr::Binary(Box::new(BinaryExpr { x, op, y }))
    }

    pub fn addr_of(x: Expr) -> Expr {
        Expr::AddrOf(Box::new(x))
    }

    pub fn star(x: Expr) -> Expr {
        Expr::Star(Box::new(x))
    }

    pub fn paren(x: Expr) -> Expr {
        Expr::Paren(Box::new(x))
    }

    pub fn call(fun: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call(Box::new(CallExpr {
            fun,
            args,
            ellipsis: false,
        }))
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_spelling() {
        assert_eq!(
            Expr::from_const(&ConstValue::from(1.2)),
            Expr::BasicLit(BasicLit {
                kind: LitKind::Float,
                value: "1.2".into()
            })
        );
        assert_eq!(
            Expr::from_const(&ConstValue::from(1.0)),
            Expr::BasicLit(BasicLit {
                kind: LitKind::Float,
                value: "1.0".into()
            })
        );
        assert_eq!(Expr::from_const(&ConstValue::Int(-3)), Expr::int_lit(-3));
        assert_eq!(Expr::from_const(&ConstValue::Bool(true)), Expr::ident("true"));
    }

    #[test]
    fn string_literal_is_quoted() {
        match Expr::from_const(&ConstValue::from("hi")) {
            Expr::BasicLit(lit) => assert_eq!(lit.value, "\"hi\""),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn selector_builds_nested_nodes() {
        let e = Expr::selector(Expr::ident("a"), "x");
        match e {
            Expr::Selector(sel) => {
                assert_eq!(sel.x.as_ident(), Some("a"));
                assert_eq!(sel.sel.name, "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
