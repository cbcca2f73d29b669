//! Syntax tree produced by the builder.
//!
//! Nodes are owned trees (`Box`ed children) rather than arena references: the
//! builder assembles them piecewise on its operand stack and hands finished
//! declarations to the emitter, which keeps them beyond the builder's life.

mod decl;
mod expr;
mod stmt;

pub use decl::{Decl, DeclTok, File, FuncDecl, GenDecl, Spec, TypeSpec, ValueSpec};
pub use expr::{
    BasicLit, BinaryExpr, CallExpr, Expr, FieldNode, FuncLit, FuncTypeExpr, Ident, LitKind,
    SelectorExpr, StructTypeExpr, UnaryExpr,
};
pub use stmt::{AssignStmt, AssignTok, BlockStmt, ReturnStmt, Stmt};
