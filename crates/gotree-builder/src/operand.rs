//! Operand - a partially built expression on the builder's stack.
//!
//! Besides the syntax node, an operand carries what later builder calls need
//! to check it: its static type, its constant value when it has one, and how
//! it may be used (as a value, as an address, as a write target).

use std::sync::Arc;

use gotree_core::ast::Expr;
use gotree_core::{ConstValue, Type};
use gotree_registry::OverloadGroup;

use crate::vfields::BitLayout;

/// How an operand may be used.
#[derive(Debug, Clone, PartialEq)]
pub enum OperandKind {
    /// A readable value.
    Value,
    /// A readable value whose address may be taken: variables, fields of
    /// addressable aggregates, pointer indirections and overlap views.
    Addressable,
    /// Result of a call without results. Only valid as an expression
    /// statement.
    Void,
    /// A type, usable as a conversion callee.
    TypeName,
    /// An overload group awaiting resolution by `call`.
    Overload(Arc<OverloadGroup>),
    /// A write target pushed by `var_ref` or `member_ref`.
    Target(Target),
}

/// Recipe for storing into a write target.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// `expr = v`
    Plain,
    /// `_ = v`
    Blank,
    /// `expr = v`, where `expr` is the dereferenced overlap view.
    Overlap,
    /// Masked store into part of an integer storage field.
    Bitfield(BitTarget),
}

/// A bitfield write target.
#[derive(Debug, Clone, PartialEq)]
pub struct BitTarget {
    /// The storage field, `a.x`.
    pub storage: Expr,
    pub layout: BitLayout,
}

/// A value on the operand stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub expr: Expr,
    pub ty: Type,
    /// Set for constant expressions; folded through operators.
    pub cval: Option<ConstValue>,
    pub kind: OperandKind,
}

impl Operand {
    pub fn value(expr: Expr, ty: Type) -> Self {
        Self {
            expr,
            ty,
            cval: None,
            kind: OperandKind::Value,
        }
    }

    pub fn addressable(expr: Expr, ty: Type) -> Self {
        Self {
            expr,
            ty,
            cval: None,
            kind: OperandKind::Addressable,
        }
    }

    pub fn constant(expr: Expr, ty: Type, value: ConstValue) -> Self {
        Self {
            expr,
            ty,
            cval: Some(value),
            kind: OperandKind::Value,
        }
    }

    pub fn void(expr: Expr) -> Self {
        Self {
            expr,
            ty: Type::void(),
            cval: None,
            kind: OperandKind::Void,
        }
    }

    pub fn type_name(expr: Expr, ty: Type) -> Self {
        Self {
            expr,
            ty,
            cval: None,
            kind: OperandKind::TypeName,
        }
    }

    pub fn overload(expr: Expr, group: Arc<OverloadGroup>) -> Self {
        Self {
            expr,
            ty: Type::void(),
            cval: None,
            kind: OperandKind::Overload(group),
        }
    }

    pub fn target(expr: Expr, ty: Type, target: Target) -> Self {
        Self {
            expr,
            ty,
            cval: None,
            kind: OperandKind::Target(target),
        }
    }

    /// Whether the operand can be read as a value.
    pub fn is_value(&self) -> bool {
        matches!(self.kind, OperandKind::Value | OperandKind::Addressable)
    }

    pub fn is_addressable(&self) -> bool {
        matches!(
            self.kind,
            OperandKind::Addressable | OperandKind::Target(Target::Plain | Target::Overlap)
        )
    }

    pub fn is_constant(&self) -> bool {
        self.cval.is_some()
    }

    /// Whether the operand can be the left side of an assignment.
    pub fn as_target(&self) -> Option<Target> {
        match &self.kind {
            OperandKind::Target(target) => Some(target.clone()),
            OperandKind::Addressable => Some(Target::Plain),
            _ => None,
        }
    }

    /// Whether member access may select through this operand.
    pub fn can_select(&self) -> bool {
        self.is_value() || matches!(self.kind, OperandKind::Target(Target::Plain | Target::Overlap))
    }
}
