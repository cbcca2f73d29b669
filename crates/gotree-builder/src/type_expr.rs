//! Spelling types as syntax.

use gotree_core::ast::{Expr, FieldNode, FuncTypeExpr, Ident, StructTypeExpr};
use gotree_core::{BasicKind, Param, Signature, Type};
use gotree_registry::SymbolRegistry;

/// The type expression denoting `ty`.
///
/// # Panics
///
/// For tuple types, which have no syntax of their own.
pub fn type_expr(types: &SymbolRegistry, ty: &Type) -> Expr {
    match ty {
        Type::Basic(BasicKind::UnsafePointer) => Expr::selector(Expr::ident("unsafe"), "Pointer"),
        Type::Basic(kind) => Expr::ident(kind.default_type().name()),
        Type::Named(hash) => match types.named(*hash) {
            Some(named) => Expr::ident(named.name.clone()),
            None => Expr::ident(hash.to_string()),
        },
        Type::Pointer(elem) => Expr::star(type_expr(types, elem)),
        Type::Slice(elem) => Expr::ArrayType(Box::new(type_expr(types, elem))),
        Type::Struct(st) => Expr::StructType(StructTypeExpr {
            fields: st
                .fields
                .iter()
                .map(|f| FieldNode {
                    names: if f.embedded {
                        Vec::new()
                    } else {
                        vec![Ident::new(f.name.clone())]
                    },
                    ty: type_expr(types, &f.ty),
                })
                .collect(),
        }),
        Type::Signature(sig) => Expr::FuncType(func_type_expr(types, sig)),
        Type::Tuple(_) => panic!("tuple types have no syntax"),
    }
}

/// Callee of a conversion to `ty`; pointer and function types need parens.
pub fn conversion_callee(types: &SymbolRegistry, ty: &Type) -> Expr {
    let expr = type_expr(types, ty);
    match ty {
        Type::Pointer(_) | Type::Signature(_) => Expr::paren(expr),
        _ => expr,
    }
}

/// `func(params) results` for a signature; the receiver is not included.
pub fn func_type_expr(types: &SymbolRegistry, sig: &Signature) -> FuncTypeExpr {
    let last = sig.params.len().checked_sub(1);
    let params = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let ty = match &p.ty {
                Type::Slice(elem) if sig.variadic && Some(i) == last => {
                    Expr::Ellipsis(Box::new(type_expr(types, elem)))
                }
                other => type_expr(types, other),
            };
            field_node(p, ty)
        })
        .collect();
    let results = sig
        .results
        .iter()
        .map(|p| field_node(p, type_expr(types, &p.ty)))
        .collect();
    FuncTypeExpr { params, results }
}

/// Receiver field of a method declaration.
pub fn param_field(types: &SymbolRegistry, param: &Param) -> FieldNode {
    field_node(param, type_expr(types, &param.ty))
}

fn field_node(param: &Param, ty: Expr) -> FieldNode {
    FieldNode {
        names: if param.name.is_empty() {
            Vec::new()
        } else {
            vec![Ident::new(param.name.clone())]
        },
        ty,
    }
}
