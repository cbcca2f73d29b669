//! Bitfield reads and writes.
//!
//! A field of width `w` at bit offset `o` inside a `B`-bit storage integer:
//!
//! ```text
//! read, signed storage:    x << (B-o-w) >> (B-w)
//! read, unsigned storage:  x >> o & (1<<w - 1)
//! write:                   tmp := &x
//!                          *tmp = *tmp &^ ((1<<w - 1) << o) | v & (1<<w - 1) << o
//! ```
//!
//! Zero shifts are left out. A constant `v` is folded into the single
//! literal `(v & (1<<w - 1)) << o` of the storage type.

use gotree_core::ast::{Expr, Stmt};
use gotree_core::BinaryOp;

/// Bit position of a field within its storage integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    pub offset: u32,
    pub width: u32,
    pub storage_bits: u32,
    pub unsigned: bool,
}

impl BitLayout {
    /// `(1 << width) - 1`
    pub fn value_mask(&self) -> u128 {
        (1u128 << self.width) - 1
    }

    /// The field's bits in place within the storage word.
    pub fn storage_mask(&self) -> u128 {
        self.value_mask() << self.offset
    }

    /// A mask spelled as a constant of the storage type. Masks covering the
    /// sign bit of signed storage are written as negative values.
    fn mask_literal(&self, mask: u128) -> Expr {
        let bits = self.storage_bits;
        let sign_bit = 1u128 << (bits - 1);
        if !self.unsigned && mask & sign_bit != 0 {
            Expr::int_lit(mask as i128 - (1i128 << bits))
        } else {
            Expr::int_lit(mask as i128)
        }
    }
}

fn shift(x: Expr, op: BinaryOp, count: u32) -> Expr {
    if count == 0 {
        x
    } else {
        Expr::binary(x, op, Expr::int_lit(i128::from(count)))
    }
}

/// Extract the field's value from `storage`.
pub fn read_expr(storage: Expr, layout: &BitLayout) -> Expr {
    let BitLayout {
        offset,
        width,
        storage_bits,
        unsigned,
    } = *layout;

    if unsigned {
        let shifted = shift(storage, BinaryOp::Shr, offset);
        Expr::binary(shifted, BinaryOp::BitAnd, layout.mask_literal(layout.value_mask()))
    } else {
        let up = shift(storage, BinaryOp::Shl, storage_bits - offset - width);
        shift(up, BinaryOp::Shr, storage_bits - width)
    }
}

/// `tmp := &storage` followed by the masked store of `value` through `tmp`.
///
/// `constant` is the value of `value` when it is a constant.
pub fn write_stmts(
    tmp: &str,
    storage: Expr,
    value: Expr,
    constant: Option<i128>,
    layout: &BitLayout,
) -> [Stmt; 2] {
    let bind = Stmt::define(tmp, Expr::addr_of(storage));

    let cleared = Expr::binary(
        Expr::star(Expr::ident(tmp)),
        BinaryOp::AndNot,
        layout.mask_literal(layout.storage_mask()),
    );
    let placed = match constant {
        Some(v) => layout.mask_literal((v as u128 & layout.value_mask()) << layout.offset),
        None => {
            let masked = Expr::binary(
                value,
                BinaryOp::BitAnd,
                layout.mask_literal(layout.value_mask()),
            );
            shift(masked, BinaryOp::Shl, layout.offset)
        }
    };
    let store = Stmt::assign(
        Expr::star(Expr::ident(tmp)),
        Expr::binary(cleared, BinaryOp::BitOr, placed),
    );

    [bind, store]
}
