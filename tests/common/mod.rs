//! A tiny interpreter for the integer code the builder synthesizes.
//!
//! Storage locations are named by their selector path (`a.x`); pointers
//! bound with `tmp := &a.x` remember the path they point at. Arithmetic
//! follows Go: every value is wrapped to the width of the location it comes
//! from, shifts on signed values are arithmetic.

#![allow(dead_code)]

use std::collections::HashMap;

use gotree::ast::{AssignTok, Expr, Stmt};
use gotree::BinaryOp;

/// Width and signedness of an integer location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntKind {
    pub bits: u32,
    pub unsigned: bool,
}

impl IntKind {
    pub const INT: IntKind = IntKind { bits: 64, unsigned: false };
    pub const UINT: IntKind = IntKind { bits: 64, unsigned: true };

    fn wrap(self, v: i128) -> i128 {
        let modulus = 1i128 << self.bits;
        let low = v.rem_euclid(modulus);
        if !self.unsigned && low >= modulus >> 1 {
            low - modulus
        } else {
            low
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Val {
    v: i128,
    kind: Option<IntKind>,
}

#[derive(Debug, Default)]
pub struct Memory {
    cells: HashMap<String, (i128, IntKind)>,
    pointers: HashMap<String, String>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `path` with an initial value.
    pub fn set(&mut self, path: &str, value: i128, kind: IntKind) {
        self.cells.insert(path.to_string(), (kind.wrap(value), kind));
    }

    pub fn get(&self, path: &str) -> i128 {
        match self.cells.get(path) {
            Some((v, _)) => *v,
            None => panic!("no location {path}"),
        }
    }

    /// Evaluate an integer expression.
    pub fn eval(&self, expr: &Expr) -> i128 {
        self.value(expr).v
    }

    pub fn exec(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                for stmt in &block.list {
                    self.exec(stmt);
                }
            }
            Stmt::Assign(assign) => {
                assert_eq!(assign.lhs.len(), assign.rhs.len(), "parallel assignment");
                match assign.tok {
                    AssignTok::Define => {
                        for (lhs, rhs) in assign.lhs.iter().zip(&assign.rhs) {
                            let Some(name) = lhs.as_ident() else {
                                panic!("define of non-identifier {lhs:?}");
                            };
                            match rhs {
                                Expr::AddrOf(target) => {
                                    let path = self.location(target);
                                    self.pointers.insert(name.to_string(), path);
                                }
                                value => {
                                    let v = self.value(value);
                                    let kind = v.kind.unwrap_or(IntKind::INT);
                                    self.set(name, v.v, kind);
                                }
                            }
                        }
                    }
                    AssignTok::Assign => {
                        let values: Vec<i128> = assign.rhs.iter().map(|e| self.eval(e)).collect();
                        for (lhs, v) in assign.lhs.iter().zip(values) {
                            if lhs.as_ident() == Some("_") {
                                continue;
                            }
                            let path = self.location(lhs);
                            let kind = self.cells.get(&path).map(|(_, k)| *k).unwrap_or(IntKind::INT);
                            self.set(&path, v, kind);
                        }
                    }
                }
            }
            Stmt::Expr(_) | Stmt::Decl(_) | Stmt::Return(_) => {
                panic!("unsupported statement {stmt:?}")
            }
        }
    }

    fn location(&self, expr: &Expr) -> String {
        match expr {
            Expr::Ident(ident) => ident.name.clone(),
            Expr::Selector(sel) => format!("{}.{}", self.location(&sel.x), sel.sel.name),
            Expr::Paren(inner) => self.location(inner),
            Expr::Star(inner) => match inner.as_ident().and_then(|p| self.pointers.get(p)) {
                Some(path) => path.clone(),
                None => panic!("dereference of unknown pointer {inner:?}"),
            },
            other => panic!("not a location: {other:?}"),
        }
    }

    fn value(&self, expr: &Expr) -> Val {
        match expr {
            Expr::BasicLit(lit) => Val {
                v: lit.value.parse().unwrap_or_else(|_| panic!("bad literal {}", lit.value)),
                kind: None,
            },
            Expr::Paren(inner) => self.value(inner),
            Expr::Binary(bin) => {
                let x = self.value(&bin.x);
                let y = self.value(&bin.y);
                let kind = if bin.op == BinaryOp::Shl || bin.op == BinaryOp::Shr {
                    x.kind
                } else {
                    x.kind.or(y.kind)
                };
                let v = match bin.op {
                    BinaryOp::Shl => x.v << y.v,
                    BinaryOp::Shr => x.v >> y.v,
                    BinaryOp::BitAnd => x.v & y.v,
                    BinaryOp::BitOr => x.v | y.v,
                    BinaryOp::AndNot => x.v & !y.v,
                    BinaryOp::Add => x.v + y.v,
                    BinaryOp::Sub => x.v - y.v,
                    op => panic!("unsupported operator {op}"),
                };
                Val {
                    v: kind.map_or(v, |k| k.wrap(v)),
                    kind,
                }
            }
            location => {
                let path = self.location(location);
                match self.cells.get(&path) {
                    Some((v, kind)) => Val { v: *v, kind: Some(*kind) },
                    None => panic!("no location {path}"),
                }
            }
        }
    }
}
