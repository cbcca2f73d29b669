//! Statement nodes.

use super::decl::GenDecl;
use super::expr::Expr;

/// `=` or `:=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignTok {
    Assign,
    Define,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// An expression evaluated for its side effects, usually a call.
    Expr(Expr),
    /// `lhs = rhs` or `lhs := rhs`
    Assign(AssignStmt),
    /// `{ ... }`
    Block(BlockStmt),
    /// `var ...` inside a function body.
    Decl(GenDecl),
    /// `return results`
    Return(ReturnStmt),
}

/// `lhs tok rhs`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok: AssignTok,
    pub rhs: Vec<Expr>,
}

/// `{ list }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockStmt {
    pub list: Vec<Stmt>,
}

/// `return results`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
}

impl Stmt {
    /// `lhs = rhs` with a single target.
    pub fn assign(lhs: Expr, rhs: Expr) -> Stmt {
        Stmt::Assign(AssignStmt {
            lhs: vec![lhs],
            tok: AssignTok::Assign,
            rhs: vec![rhs],
        })
    }

    /// `name := rhs`
    pub fn define(name: impl Into<String>, rhs: Expr) -> Stmt {
        Stmt::Assign(AssignStmt {
            lhs: vec![Expr::ident(name)],
            tok: AssignTok::Define,
            rhs: vec![rhs],
        })
    }

    pub fn block(list: Vec<Stmt>) -> Stmt {
        Stmt::Block(BlockStmt { list })
    }
}
