//! Block contexts.
//!
//! A context is pushed for every function body, closure body and nested
//! block, and records what `end()` does with the finished statement list.
//! The bottom context stands for package level and is never popped.

use gotree_core::ast::{FuncDecl, FuncTypeExpr, Stmt};
use gotree_core::{Signature, Type};

/// What a block turns into when it ends.
#[derive(Debug, Clone)]
pub enum BlockKind {
    /// Package level. Holds no statements.
    Package,
    /// A function body; the header is completed with the body and emitted.
    Func { decl: FuncDecl, sig: Signature },
    /// A closure body; becomes a function literal operand.
    Closure { ty: FuncTypeExpr, sig: Signature },
    /// `{ ... }` nested in a body.
    Plain,
}

/// Whether `end_init` emits `var names T = values` or `names := values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitForm {
    Var,
    Define,
}

/// A variable declaration waiting for its initial values.
#[derive(Debug, Clone)]
pub struct PendingInit {
    pub form: InitForm,
    pub names: Vec<String>,
    pub ty: Option<Type>,
}

/// One open block.
#[derive(Debug)]
pub struct BlockContext {
    pub kind: BlockKind,
    pub stmts: Vec<Stmt>,
    /// Operand stack depth when the block was entered.
    pub stack_base: usize,
    pub pending: Option<PendingInit>,
}

impl BlockContext {
    pub fn new(kind: BlockKind, stack_base: usize) -> Self {
        Self {
            kind,
            stmts: Vec::new(),
            stack_base,
            pending: None,
        }
    }

    pub fn package() -> Self {
        Self::new(BlockKind::Package, 0)
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, BlockKind::Package)
    }

    /// Signature of the function or closure this block is the body of.
    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            BlockKind::Func { sig, .. } | BlockKind::Closure { sig, .. } => Some(sig),
            _ => None,
        }
    }
}
