//! Declaration nodes and the file root.

use super::expr::{Expr, FieldNode, FuncTypeExpr, Ident};
use super::stmt::BlockStmt;

/// Keyword of a general declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclTok {
    Var,
    Const,
    Type,
}

/// `var`, `const` or `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenDecl {
    pub tok: DeclTok,
    pub specs: Vec<Spec>,
}

/// One spec of a general declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `names ty = values`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

/// `type name ty`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    pub name: Ident,
    pub ty: Expr,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncDecl {
    pub recv: Option<FieldNode>,
    pub name: Ident,
    pub ty: FuncTypeExpr,
    pub body: Option<BlockStmt>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// A complete source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File {
    pub package: Ident,
    /// Import paths in first-use order.
    pub imports: Vec<String>,
    pub decls: Vec<Decl>,
}

impl GenDecl {
    /// `var names ty = values`
    pub fn var(names: Vec<Ident>, ty: Option<Expr>, values: Vec<Expr>) -> GenDecl {
        GenDecl {
            tok: DeclTok::Var,
            specs: vec![Spec::Value(ValueSpec { names, ty, values })],
        }
    }
}

impl File {
    /// Find a function declaration by name.
    pub fn func(&self, name: &str) -> Option<&FuncDecl> {
        self.decls.iter().find_map(|d| match d {
            Decl::Func(f) if f.name.name == name => Some(f),
            _ => None,
        })
    }
}
