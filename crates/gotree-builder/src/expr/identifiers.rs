//! Named references.

use gotree_core::ast::Expr;
use gotree_core::{BuildError, Type};
use gotree_registry::Object;

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::{Operand, Target};

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Push the value of `name`, looked up innermost scope first.
    ///
    /// Variables, constants, functions, types and overload groups may all be
    /// pushed.
    pub fn var_val(&mut self, name: &str) -> Result<&mut Self> {
        let expr = Expr::ident(name);
        let operand = match self.registry.lookup(name) {
            Some(Object::Var { ty }) => Operand::addressable(expr, ty.clone()),
            Some(Object::Const { ty, value }) => Operand::constant(expr, ty.clone(), value.clone()),
            Some(Object::Func(func)) => Operand::value(expr, Type::Signature(func.sig.clone())),
            Some(Object::TypeName(ty)) => Operand::type_name(expr, ty.clone()),
            Some(Object::Overload(group)) => Operand::overload(expr, group.clone()),
            None => {
                return Err(BuildError::UndefinedReference {
                    name: name.to_string(),
                });
            }
        };
        self.stack.push(operand);
        Ok(self)
    }

    /// Push `name` as an assignment target. `_` discards the assigned value.
    pub fn var_ref(&mut self, name: &str) -> Result<&mut Self> {
        let expr = Expr::ident(name);
        let operand = if name == "_" {
            Operand::target(expr, Type::void(), Target::Blank)
        } else {
            match self.registry.lookup(name) {
                Some(Object::Var { ty }) => Operand::target(expr, ty.clone(), Target::Plain),
                Some(_) => {
                    return Err(BuildError::invalid_operation(format!(
                        "cannot assign to {name}"
                    )));
                }
                None => {
                    return Err(BuildError::UndefinedReference {
                        name: name.to_string(),
                    });
                }
            }
        };
        self.stack.push(operand);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Package;
    use crate::operand::{OperandKind, Target};
    use gotree_core::{BuildError, Type};

    #[test]
    fn variables_are_addressable() {
        let mut pkg = Package::new("main");
        pkg.new_var(Type::INT, &["a"]).unwrap();
        let cb = pkg.cb();
        cb.var_val("a").unwrap();
        assert!(cb.top().unwrap().is_addressable());
        assert_eq!(cb.top().unwrap().ty, Type::INT);
    }

    #[test]
    fn undefined_name_leaves_stack_unchanged() {
        let mut pkg = Package::new("main");
        let cb = pkg.cb();
        cb.val(1).unwrap();
        let err = cb.var_val("missing").unwrap_err();
        assert_eq!(
            err,
            BuildError::UndefinedReference {
                name: "missing".to_string()
            }
        );
        assert_eq!(cb.depth(), 1);
    }

    #[test]
    fn predeclared_names() {
        let mut pkg = Package::new("main");
        let cb = pkg.cb();
        cb.var_val("true").unwrap();
        assert!(cb.top().unwrap().is_constant());
        cb.var_val("int").unwrap();
        assert_eq!(cb.top().unwrap().kind, OperandKind::TypeName);
    }

    #[test]
    fn references_require_variables() {
        let mut pkg = Package::new("main");
        pkg.new_var(Type::INT, &["a"]).unwrap();
        let cb = pkg.cb();
        cb.var_ref("a").unwrap();
        assert_eq!(cb.top().unwrap().kind, OperandKind::Target(Target::Plain));
        cb.var_ref("_").unwrap();
        assert_eq!(cb.top().unwrap().kind, OperandKind::Target(Target::Blank));

        assert!(matches!(
            cb.var_ref("int"),
            Err(BuildError::InvalidOperation { .. })
        ));
        assert_eq!(cb.depth(), 2);
    }
}
