//! Unary operators, address-of and indirection.

use gotree_core::ast::Expr;
use gotree_core::{BuildError, ConstValue, Op, Type, UnaryOp};

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::Operand;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Apply `op` to the operand on top.
    ///
    /// On a named type declaring the operator's method (`Gop_Neg`, `Gop_Not`,
    /// ...) the operator is lowered to a method call.
    pub fn unary_op(&mut self, op: UnaryOp) -> Result<&mut Self> {
        self.assert_operands(1, "unary_op");
        let x = &self.stack.top(1)[0];
        self.require_value(x)?;

        let result = match self.lower_operator(x, op.method_suffix(), &[])? {
            Some(lowered) => lowered,
            None => {
                let Some(ty) = self.oracle.result_type(
                    &self.registry,
                    Op::Unary(op),
                    std::slice::from_ref(&x.ty),
                ) else {
                    return Err(BuildError::invalid_operation(format!(
                        "operator {} not defined on {}",
                        op.as_str(),
                        self.type_name(&x.ty)
                    )));
                };
                let expr = Expr::unary(op, x.expr.clone());
                match &x.cval {
                    Some(value) => {
                        let bits = if self.registry.is_unsigned(&ty) {
                            self.registry.integer_bits(&ty)
                        } else {
                            None
                        };
                        let Some(folded) = ConstValue::unary_op(op, value, bits) else {
                            return Err(BuildError::invalid_operation(format!(
                                "operator {} not defined on constant {value}",
                                op.as_str()
                            )));
                        };
                        self.check_representable(&folded, &ty)?;
                        Operand::constant(expr, ty, folded)
                    }
                    None => Operand::value(expr, ty),
                }
            }
        };

        self.stack.replace(1, result);
        Ok(self)
    }

    /// `&x` of the addressable operand on top.
    pub fn addr_of(&mut self) -> Result<&mut Self> {
        self.assert_operands(1, "addr_of");
        let x = &self.stack.top(1)[0];
        if !x.is_addressable() {
            self.require_value(x)?;
            return Err(BuildError::invalid_operation(format!(
                "cannot take address of {} value",
                self.type_name(&x.ty)
            )));
        }
        let result = Operand::value(Expr::addr_of(x.expr.clone()), Type::pointer_to(x.ty.clone()));
        self.stack.replace(1, result);
        Ok(self)
    }

    /// `*p` of the pointer on top.
    pub fn deref(&mut self) -> Result<&mut Self> {
        self.assert_operands(1, "deref");
        let p = &self.stack.top(1)[0];
        self.require_value(p)?;
        let Type::Pointer(elem) = self.registry.underlying(&p.ty) else {
            return Err(BuildError::invalid_operation(format!(
                "invalid indirect of {}",
                self.type_name(&p.ty)
            )));
        };
        let result = Operand::addressable(Expr::star(p.expr.clone()), (**elem).clone());
        self.stack.replace(1, result);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Package;
    use gotree_core::ast::Expr;
    use gotree_core::{BasicKind, BuildError, ConstValue, Param, Signature, Type, UnaryOp};

    #[test]
    fn constants_fold() {
        let mut pkg = Package::new("main");
        let cb = pkg.cb();
        cb.val(5).unwrap().unary_op(UnaryOp::Neg).unwrap();
        assert_eq!(cb.top().unwrap().cval, Some(ConstValue::Int(-5)));
        assert_eq!(
            cb.top().unwrap().expr,
            Expr::unary(UnaryOp::Neg, Expr::int_lit(5))
        );
    }

    #[test]
    fn not_requires_boolean() {
        let mut pkg = Package::new("main");
        let cb = pkg.cb();
        cb.val(1).unwrap();
        assert!(matches!(
            cb.unary_op(UnaryOp::Not),
            Err(BuildError::InvalidOperation { .. })
        ));
        assert_eq!(cb.top().unwrap().cval, Some(ConstValue::Int(1)));
    }

    #[test]
    fn address_and_indirection() {
        let mut pkg = Package::new("main");
        pkg.new_var(Type::INT, &["a"]).unwrap();
        let cb = pkg.cb();
        cb.var_val("a").unwrap().addr_of().unwrap();
        assert_eq!(cb.top().unwrap().ty, Type::pointer_to(Type::INT));
        cb.deref().unwrap();
        assert!(cb.top().unwrap().is_addressable());
        assert_eq!(
            cb.top().unwrap().expr,
            Expr::star(Expr::addr_of(Expr::ident("a")))
        );

        cb.val(1).unwrap();
        assert!(cb.addr_of().is_err());
        assert!(cb.deref().is_err());
    }

    #[test]
    fn operator_method_lowering() {
        let mut pkg = Package::new("main");
        let v = pkg.new_type("Vec").unwrap();
        pkg.init_type(v, Type::Basic(BasicKind::Int)).unwrap();
        let vt = Type::Named(v);
        pkg.add_method(
            v,
            "Gop_Neg",
            Signature::new(vec![], vec![Param::unnamed(vt.clone())], false)
                .with_recv(Param::new("a", vt.clone())),
        )
        .unwrap();
        pkg.new_var(vt.clone(), &["x"]).unwrap();

        let cb = pkg.cb();
        cb.var_val("x").unwrap().unary_op(UnaryOp::Neg).unwrap();
        let top = cb.top().unwrap();
        assert_eq!(top.ty, vt);
        assert_eq!(
            top.expr,
            Expr::call(Expr::selector(Expr::ident("x"), "Gop_Neg"), vec![])
        );
    }
}
