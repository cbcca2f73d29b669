//! Calls: functions, method values, overload groups and conversions.

use gotree_core::ast::Expr;
use gotree_core::{BuildError, ConstValue, Signature, Type};
use tracing::trace;

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::{Operand, OperandKind};
use crate::overload::resolve_overload;
use crate::type_expr::conversion_callee;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Pop a callee and `n` arguments pushed after it, push the call.
    ///
    /// An overload group callee is resolved by `n`. A type callee is a
    /// conversion and takes exactly one argument.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn call(&mut self, n: usize) -> Result<&mut Self> {
        self.assert_operands(n + 1, "call");
        let operands = self.stack.top(n + 1);
        let (callee, args) = (&operands[0], &operands[1..]);

        let result = match &callee.kind {
            OperandKind::TypeName => self.conversion(&callee.ty, args)?,
            OperandKind::Overload(group) => {
                let selected = resolve_overload(group, n)?;
                let fun = Expr::ident(selected.func.name.clone());
                self.call_signature(fun, &selected.func.sig, args)?
            }
            _ => {
                self.require_value(callee)?;
                let Type::Signature(sig) = self.registry.underlying(&callee.ty) else {
                    return Err(BuildError::invalid_operation(format!(
                        "cannot call non-function of type {}",
                        self.type_name(&callee.ty)
                    )));
                };
                self.call_signature(callee.expr.clone(), sig, args)?
            }
        };

        self.stack.replace(n + 1, result);
        Ok(self)
    }

    fn call_signature(&self, fun: Expr, sig: &Signature, args: &[Operand]) -> Result<Operand> {
        if !sig.accepts_arg_count(args.len()) {
            let message = if args.len() < sig.params.len() {
                "not enough arguments in call"
            } else {
                "too many arguments in call"
            };
            return Err(BuildError::invalid_operation(message));
        }
        for (i, arg) in args.iter().enumerate() {
            if let Some(param) = sig.param_type_at(i) {
                self.check_assignable(arg, param, "argument")?;
            }
        }

        let expr = Expr::call(fun, args.iter().map(|a| a.expr.clone()).collect());
        let result = sig.result_type();
        Ok(if result.is_void() {
            Operand::void(expr)
        } else {
            Operand::value(expr, result)
        })
    }

    /// `T(x)`. Constant arguments converted to a basic type stay constant.
    fn conversion(&self, to: &Type, args: &[Operand]) -> Result<Operand> {
        let [arg] = args else {
            return Err(BuildError::invalid_operation(format!(
                "conversion to {} takes exactly one argument, got {}",
                self.type_name(to),
                args.len()
            )));
        };
        self.require_value(arg)?;
        if !self.oracle.explicit_convertible(&self.registry, &arg.ty, to) {
            return Err(BuildError::invalid_operation(format!(
                "cannot convert {} to type {}",
                self.type_name(&arg.ty),
                self.type_name(to)
            )));
        }

        let expr = Expr::call(conversion_callee(&self.registry, to), vec![arg.expr.clone()]);
        if let (Some(value), Some(kind)) = (&arg.cval, self.registry.underlying(to).as_basic()) {
            let converted = if kind.is_float() {
                value.as_float().map(ConstValue::from)
            } else if kind.is_integer() {
                value.as_int().map(ConstValue::Int)
            } else if kind.is_string() {
                match value {
                    ConstValue::Int(v) => {
                        let ch = u32::try_from(*v)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or(char::REPLACEMENT_CHARACTER);
                        Some(ConstValue::String(ch.to_string()))
                    }
                    other => Some(other.clone()),
                }
            } else if kind.is_boolean() {
                Some(value.clone())
            } else {
                None
            };
            if let Some(converted) = converted {
                if !converted.representable_as(kind, self.config.word_size()) {
                    return Err(BuildError::invalid_operation(format!(
                        "cannot convert {value} to type {}",
                        self.type_name(to)
                    )));
                }
                trace!(to = %self.type_name(to), value = %converted, "constant conversion");
                return Ok(Operand::constant(expr, to.clone(), converted));
            }
            if kind.is_integer() {
                return Err(BuildError::invalid_operation(format!(
                    "constant {value} truncated to {}",
                    self.type_name(to)
                )));
            }
        }
        Ok(Operand::value(expr, to.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::Package;
    use gotree_core::ast::Expr;
    use gotree_core::{BasicKind, BuildError, ConstValue, Param, Type};

    #[test]
    fn function_call() {
        let mut pkg = Package::new("main");
        pkg.new_func(
            None,
            "add",
            vec![Param::new("a", Type::INT), Param::new("b", Type::INT)],
            vec![Param::unnamed(Type::INT)],
            false,
        )
        .unwrap();
        let cb = pkg.cb();
        cb.var_val("add").unwrap().val(1).unwrap().val(2).unwrap().call(2).unwrap();
        let top = cb.top().unwrap();
        assert_eq!(top.ty, Type::INT);
        assert_eq!(
            top.expr,
            Expr::call(Expr::ident("add"), vec![Expr::int_lit(1), Expr::int_lit(2)])
        );
        assert_eq!(cb.depth(), 1);
    }

    #[test]
    fn argument_count_and_type() {
        let mut pkg = Package::new("main");
        pkg.new_func(None, "f", vec![Param::new("s", Type::STRING)], vec![], false)
            .unwrap();
        let cb = pkg.cb();
        cb.var_val("f").unwrap();
        assert!(cb.call(0).is_err());
        cb.val(1).unwrap();
        assert_eq!(
            cb.call(1).unwrap_err(),
            BuildError::TypeMismatch {
                expected: "string".to_string(),
                got: "untyped int".to_string(),
                context: "argument".to_string(),
            }
        );
        assert_eq!(cb.depth(), 2);
    }

    #[test]
    fn variadic_tail() {
        let mut pkg = Package::new("main");
        pkg.new_func(
            None,
            "sum",
            vec![Param::new("xs", Type::slice_of(Type::INT))],
            vec![],
            true,
        )
        .unwrap();
        let cb = pkg.cb();
        cb.var_val("sum").unwrap().call(0).unwrap();
        assert!(!cb.top().unwrap().is_value());
        cb.var_val("sum").unwrap().val(1).unwrap().val(2).unwrap().val(3).unwrap();
        cb.call(3).unwrap();
        assert_eq!(cb.depth(), 2);
    }

    #[test]
    fn constant_conversion() {
        let mut pkg = Package::new("main");
        let cb = pkg.cb();
        cb.type_val(Type::FLOAT32).unwrap().val(1).unwrap().call(1).unwrap();
        let top = cb.top().unwrap();
        assert_eq!(top.ty, Type::FLOAT32);
        assert_eq!(top.cval, Some(ConstValue::from(1.0)));
        assert_eq!(
            top.expr,
            Expr::call(Expr::ident("float32"), vec![Expr::int_lit(1)])
        );

        cb.type_val(Type::Basic(BasicKind::Uint8)).unwrap().val(256).unwrap();
        assert!(cb.call(1).is_err());
        cb.val(1).unwrap();
        assert!(cb.call(2).is_err());
    }

    #[test]
    fn pointer_conversion_is_parenthesized() {
        let mut pkg = Package::new("main");
        pkg.new_var(Type::UNSAFE_POINTER, &["p"]).unwrap();
        let cb = pkg.cb();
        cb.type_val(Type::pointer_to(Type::INT)).unwrap().var_val("p").unwrap().call(1).unwrap();
        assert_eq!(
            cb.top().unwrap().expr,
            Expr::call(
                Expr::paren(Expr::star(Expr::ident("int"))),
                vec![Expr::ident("p")]
            )
        );
    }
}
