//! Overlap field views.
//!
//! An overlap field of type `T` at byte offset `k` is read and written as
//!
//! ```text
//! k == 0:  *(*T)(unsafe.Pointer(addr))
//! k != 0:  *(*T)(unsafe.Pointer(uintptr(unsafe.Pointer(addr)) + k))
//! ```
//!
//! where `addr` is `&agg`, or the pointer itself when the aggregate is
//! reached through one.

use gotree_core::ast::Expr;
use gotree_core::{BinaryOp, BuildError, Type};
use gotree_registry::{OverlapField, SymbolRegistry};

use super::VirtualSite;
use crate::type_expr::conversion_callee;

/// Package synthesized views depend on.
pub const UNSAFE_PACKAGE: &str = "unsafe";

/// Address of the aggregate a site refers to.
pub fn address_of(types: &SymbolRegistry, site: &VirtualSite) -> Result<Expr, BuildError> {
    if matches!(types.underlying(&site.base_ty), Type::Pointer(_)) {
        return Ok(site.base.clone());
    }
    if !site.addressable {
        return Err(BuildError::invalid_operation(format!(
            "cannot take address of {} value",
            types.type_name(&site.base_ty)
        )));
    }
    Ok(Expr::addr_of(site.base.clone()))
}

fn unsafe_pointer(x: Expr) -> Expr {
    Expr::call(Expr::selector(Expr::ident(UNSAFE_PACKAGE), "Pointer"), vec![x])
}

/// The dereferenced view of `field` at `addr`.
pub fn view_expr(types: &SymbolRegistry, addr: Expr, field: &OverlapField) -> Expr {
    let mut ptr = unsafe_pointer(addr);
    if field.offset != 0 {
        let moved = Expr::binary(
            Expr::call(Expr::ident("uintptr"), vec![ptr]),
            BinaryOp::Add,
            Expr::int_lit(i128::from(field.offset)),
        );
        ptr = unsafe_pointer(moved);
    }
    let typed = Expr::call(
        conversion_callee(types, &Type::pointer_to(field.ty.clone())),
        vec![ptr],
    );
    Expr::star(typed)
}
