//! Constant and type operands.

use gotree_core::ast::Expr;
use gotree_core::{BasicKind, ConstValue, Type};

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::Operand;
use crate::type_expr::type_expr;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Push an untyped constant.
    pub fn val(&mut self, value: impl Into<ConstValue>) -> Result<&mut Self> {
        let value = value.into();
        let ty = Type::Basic(value.untyped_kind());
        self.stack
            .push(Operand::constant(Expr::from_const(&value), ty, value));
        Ok(self)
    }

    /// Push `nil`.
    pub fn nil(&mut self) -> Result<&mut Self> {
        self.stack.push(Operand::value(
            Expr::ident("nil"),
            Type::Basic(BasicKind::UntypedNil),
        ));
        Ok(self)
    }

    /// Push a type, to be called as a conversion.
    pub fn type_val(&mut self, ty: Type) -> Result<&mut Self> {
        let expr = type_expr(&self.registry, &ty);
        self.stack.push(Operand::type_name(expr, ty));
        Ok(self)
    }
}
