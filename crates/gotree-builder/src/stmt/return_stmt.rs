//! `return` statements.

use gotree_core::ast::{ReturnStmt, Stmt};
use gotree_core::{BuildError, Type};

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Return the `n` operands of the statement from the enclosing function
    /// or closure.
    ///
    /// `return_(0)` is a naked return and needs every result to be named. A
    /// single call returning all results may stand for them.
    ///
    /// # Panics
    ///
    /// Outside of a function body, or if the statement holds other than `n`
    /// operands.
    pub fn return_(&mut self, n: usize) -> Result<&mut Self> {
        let Some(sig) = self.enclosing_signature().cloned() else {
            panic!("return outside of a function body");
        };
        let base = self.current_block().stack_base;
        assert_eq!(
            self.depth(),
            base + n,
            "return_({n}) with {} operand(s) pushed",
            self.depth() - base.min(self.depth())
        );

        let values = self.stack.top(n);
        let results = &sig.results;
        if n == 0 {
            if results.iter().any(|r| r.name.is_empty()) {
                return Err(BuildError::invalid_operation("not enough return values"));
            }
        } else if n == results.len() {
            for (value, result) in values.iter().zip(results) {
                self.check_assignable(value, &result.ty, "return statement")?;
            }
        } else if let [value] = values
            && let Type::Tuple(items) = &value.ty
            && items.len() == results.len()
        {
            self.require_value(value)?;
            for (item, result) in items.iter().zip(results) {
                if !self.oracle.convertible(&self.registry, item, &result.ty) {
                    return Err(BuildError::TypeMismatch {
                        expected: self.type_name(&result.ty),
                        got: self.type_name(item),
                        context: "return statement".to_string(),
                    });
                }
            }
        } else {
            let message = if n < results.len() {
                "not enough return values"
            } else {
                "too many return values"
            };
            return Err(BuildError::invalid_operation(message));
        }

        let values = self.stack.pop_n(n);
        self.finish_stmt(Stmt::Return(ReturnStmt {
            results: values.into_iter().map(|v| v.expr).collect(),
        }));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Package;
    use gotree_core::ast::{Expr, ReturnStmt, Stmt};
    use gotree_core::{BuildError, Param, Type};

    #[test]
    fn return_value() {
        let mut pkg = Package::new("main");
        let f = pkg
            .new_func(None, "one", vec![], vec![Param::unnamed(Type::INT)], false)
            .unwrap();
        pkg.body_start(&f).val(1).unwrap().return_(1).unwrap().end();

        let file = pkg.finish();
        let body = file.func("one").and_then(|f| f.body.clone()).unwrap();
        assert_eq!(
            body.list,
            [Stmt::Return(ReturnStmt {
                results: vec![Expr::int_lit(1)]
            })]
        );
    }

    #[test]
    fn naked_return_needs_named_results() {
        let mut pkg = Package::new("main");
        let named = pkg
            .new_func(None, "named", vec![], vec![Param::new("err", Type::INT)], false)
            .unwrap();
        pkg.body_start(&named).return_(0).unwrap().end();

        let unnamed = pkg
            .new_func(None, "unnamed", vec![], vec![Param::unnamed(Type::INT)], false)
            .unwrap();
        let cb = pkg.body_start(&unnamed);
        assert_eq!(
            cb.return_(0).unwrap_err(),
            BuildError::invalid_operation("not enough return values")
        );
    }

    #[test]
    fn result_types_are_checked() {
        let mut pkg = Package::new("main");
        let f = pkg
            .new_func(None, "f", vec![], vec![Param::unnamed(Type::STRING)], false)
            .unwrap();
        let cb = pkg.body_start(&f);
        cb.val(1).unwrap();
        assert!(matches!(
            cb.return_(1),
            Err(BuildError::TypeMismatch { context, .. }) if context == "return statement"
        ));
        assert_eq!(cb.depth(), 1);
    }

    #[test]
    fn forwarding_multiple_results() {
        let mut pkg = Package::new("main");
        let results = vec![Param::unnamed(Type::INT), Param::unnamed(Type::BOOL)];
        pkg.new_func(None, "pair", vec![], results.clone(), false).unwrap();
        let f = pkg.new_func(None, "f", vec![], results, false).unwrap();
        pkg.body_start(&f)
            .var_val("pair").unwrap()
            .call(0).unwrap()
            .return_(1).unwrap()
            .end();
    }

    #[test]
    #[should_panic(expected = "return outside of a function body")]
    fn return_at_package_level_panics() {
        let mut pkg = Package::new("main");
        let _ = pkg.cb().return_(0);
    }
}
