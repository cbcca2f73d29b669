//! Binary operators.
//!
//! When the left operand is a named type (or a pointer to one) declaring the
//! operator method, `x op y` becomes `x.Gop_Suffix(y)`. Otherwise the oracle
//! types the expression and constant operands are folded.

use gotree_core::ast::Expr;
use gotree_core::{BinaryOp, BuildError, ConstValue, Op, TypeHash};

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::Operand;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Pop `x` and `y` and push `x op y`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn binary_op(&mut self, op: BinaryOp) -> Result<&mut Self> {
        self.assert_operands(2, "binary_op");
        let operands = self.stack.top(2);
        let (x, y) = (&operands[0], &operands[1]);
        self.require_value(x)?;
        self.require_value(y)?;

        let result = match self.lower_operator(x, op.method_suffix(), &[y])? {
            Some(lowered) => lowered,
            None => self.typed_binary(op, x, y)?,
        };

        self.stack.replace(2, result);
        Ok(self)
    }

    fn typed_binary(&self, op: BinaryOp, x: &Operand, y: &Operand) -> Result<Operand> {
        let types = [x.ty.clone(), y.ty.clone()];
        let Some(ty) = self
            .oracle
            .result_type(&self.registry, Op::Binary(op), &types)
        else {
            let message = if op.is_shift() || x.ty == y.ty {
                format!(
                    "operator {op} not defined on {}",
                    self.type_name(&x.ty)
                )
            } else {
                format!(
                    "mismatched types {} and {}",
                    self.type_name(&x.ty),
                    self.type_name(&y.ty)
                )
            };
            return Err(BuildError::invalid_operation(message));
        };

        let zero_divisor = y.cval.as_ref().is_some_and(ConstValue::is_zero);
        let integer_result = self.registry.integer_bits(&ty).is_some() || ty.is_untyped();
        if matches!(op, BinaryOp::Quo | BinaryOp::Rem)
            && zero_divisor
            && (x.cval.is_some() || integer_result)
        {
            return Err(BuildError::invalid_operation("division by zero"));
        }
        if op.is_shift() && y.cval.as_ref().and_then(ConstValue::as_int).is_some_and(|c| c < 0) {
            return Err(BuildError::invalid_operation(format!(
                "invalid shift count {}",
                y.cval.as_ref().map(ToString::to_string).unwrap_or_default()
            )));
        }

        let expr = Expr::binary(x.expr.clone(), op, y.expr.clone());
        match (&x.cval, &y.cval) {
            (Some(cx), Some(cy)) => {
                let Some(folded) = ConstValue::binary_op(op, cx, cy) else {
                    return Err(BuildError::invalid_operation(format!(
                        "constant {cx} {op} {cy} overflows"
                    )));
                };
                self.check_representable(&folded, &ty)?;
                Ok(Operand::constant(expr, ty, folded))
            }
            // An untyped constant takes the type of the other operand.
            (Some(c), None) if !op.is_shift() => {
                self.check_representable(c, &y.ty)?;
                Ok(Operand::value(expr, ty))
            }
            (None, Some(c)) if !op.is_shift() => {
                self.check_representable(c, &x.ty)?;
                Ok(Operand::value(expr, ty))
            }
            _ => Ok(Operand::value(expr, ty)),
        }
    }

    /// Named type whose methods an operator on `ty` may lower to.
    fn operator_owner(&self, ty: &gotree_core::Type) -> Option<TypeHash> {
        ty.named_hash()
            .or_else(|| ty.pointer_elem().and_then(|elem| elem.named_hash()))
    }

    /// `x.Gop_<suffix>(args...)` when the type of `x` declares that method.
    pub(super) fn lower_operator(
        &self,
        x: &Operand,
        suffix: &str,
        args: &[&Operand],
    ) -> Result<Option<Operand>> {
        let Some(owner) = self.operator_owner(&x.ty) else {
            return Ok(None);
        };
        let method_name = self.config.operator_method(suffix);
        let Some(method) = self.registry.method(owner, &method_name) else {
            return Ok(None);
        };

        if !method.sig.accepts_arg_count(args.len()) {
            return Err(BuildError::invalid_operation(format!(
                "{method_name} of {} does not take {} operand(s)",
                self.type_name(&x.ty),
                args.len()
            )));
        }
        for (i, arg) in args.iter().enumerate() {
            if let Some(param) = method.sig.param_type_at(i) {
                self.check_assignable(arg, param, "argument")?;
            }
        }

        let expr = Expr::call(
            Expr::selector(x.expr.clone(), method_name.clone()),
            args.iter().map(|a| a.expr.clone()).collect(),
        );
        let result = method.sig.result_type();
        Ok(Some(if result.is_void() {
            Operand::void(expr)
        } else {
            Operand::value(expr, result)
        }))
    }
}
