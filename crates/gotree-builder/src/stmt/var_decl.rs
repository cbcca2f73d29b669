//! Variable declarations.
//!
//! `var names T` is emitted immediately. Declarations with initial values are
//! split in two calls around the value expressions:
//!
//! ```text
//! new_var_start(T, names) <values...> end_init(n)   =>  var names T = values
//! define_var_start(names) <values...> end_init(n)   =>  names := values
//! ```
//!
//! At package level the `var` forms become top-level declarations.

use gotree_core::ast::{AssignStmt, AssignTok, Decl, Expr, GenDecl, Ident, Stmt};
use gotree_core::{BasicKind, BuildError, Type};
use gotree_registry::Object;

use crate::block::{InitForm, PendingInit};
use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::Operand;
use crate::type_expr::type_expr;

fn idents(names: &[String]) -> Vec<Ident> {
    names.iter().map(Ident::new).collect()
}

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// `var names T`, zero-valued.
    pub fn new_var(&mut self, ty: Type, names: &[&str]) -> Result<&mut Self> {
        self.assert_stmt_start("new_var");
        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        self.check_new_names(&names)?;

        let decl = GenDecl::var(idents(&names), Some(type_expr(&self.registry, &ty)), vec![]);
        for name in &names {
            self.registry.declare(name, Object::var(ty.clone()))?;
        }
        self.emit_var_decl(decl);
        Ok(self)
    }

    /// Start `var names [T] = ...`. The values follow, then `end_init`.
    pub fn new_var_start(&mut self, ty: Option<Type>, names: &[&str]) -> Result<&mut Self> {
        self.assert_init_start("new_var_start");
        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        self.check_new_names(&names)?;
        self.current_block_mut().pending = Some(PendingInit {
            form: InitForm::Var,
            names,
            ty,
        });
        Ok(self)
    }

    /// Start `names := ...`. The values follow, then `end_init`.
    ///
    /// # Panics
    ///
    /// At package level.
    pub fn define_var_start(&mut self, names: &[&str]) -> &mut Self {
        assert!(
            !self.at_package_level(),
            ":= outside of a function body"
        );
        self.assert_init_start("define_var_start");
        self.current_block_mut().pending = Some(PendingInit {
            form: InitForm::Define,
            names: names.iter().map(ToString::to_string).collect(),
            ty: None,
        });
        self
    }

    /// Finish the pending declaration with the `n` values pushed since its
    /// start. A single call returning one result per name also fills the
    /// declaration.
    ///
    /// # Panics
    ///
    /// Without a pending declaration, or with a different operand count.
    pub fn end_init(&mut self, n: usize) -> Result<&mut Self> {
        let Some(pending) = self.current_block().pending.clone() else {
            panic!("end_init without new_var_start or define_var_start");
        };
        let base = self.current_block().stack_base;
        assert_eq!(
            self.depth(),
            base + n,
            "end_init({n}) with {} operand(s) pushed",
            self.depth() - base.min(self.depth())
        );

        let values = self.stack.top(n);
        let types = self.init_types(&pending, values)?;

        let values = self.stack.pop_n(n);
        self.current_block_mut().pending = None;
        let rhs: Vec<Expr> = values.into_iter().map(|v| v.expr).collect();

        match pending.form {
            InitForm::Var => {
                let ty = pending.ty.as_ref().map(|ty| type_expr(&self.registry, ty));
                let decl = GenDecl::var(idents(&pending.names), ty, rhs);
                for (name, ty) in pending.names.iter().zip(types) {
                    self.registry.declare(name, Object::var(ty))?;
                }
                self.emit_var_decl(decl);
            }
            InitForm::Define => {
                for (name, ty) in pending.names.iter().zip(types) {
                    if !self.registry.declared_here(name) {
                        self.registry.declare(name, Object::var(ty))?;
                    }
                }
                self.finish_stmt(Stmt::Assign(AssignStmt {
                    lhs: pending.names.iter().map(Expr::ident).collect(),
                    tok: AssignTok::Define,
                    rhs,
                }));
            }
        }
        Ok(self)
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn assert_init_start(&self, what: &str) {
        self.assert_stmt_start(what);
        assert!(
            self.current_block().pending.is_none(),
            "{what} while another declaration is pending"
        );
    }

    fn emit_var_decl(&mut self, decl: GenDecl) {
        if self.at_package_level() {
            self.emitter.emit_decl(Decl::Gen(decl));
        } else {
            self.finish_stmt(Stmt::Decl(decl));
        }
    }

    fn check_new_names(&self, names: &[String]) -> Result<()> {
        for (i, name) in names.iter().enumerate() {
            if name == "_" {
                continue;
            }
            if names[..i].contains(name) || self.registry.declared_here(name) {
                return Err(BuildError::Redeclared { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Type each declared name receives, after checking the values.
    fn init_types(&self, pending: &PendingInit, values: &[Operand]) -> Result<Vec<Type>> {
        let expected = self.expected_types(pending)?;
        let m = pending.names.len();

        if values.len() == m {
            return values
                .iter()
                .zip(&expected)
                .map(|(value, expected)| match expected {
                    Some(ty) => {
                        self.check_assignable(value, ty, "variable declaration")?;
                        Ok(ty.clone())
                    }
                    None => self.inferred_type(value),
                })
                .collect();
        }

        if let [value] = values
            && let Type::Tuple(items) = &value.ty
            && items.len() == m
        {
            self.require_value(value)?;
            return items
                .iter()
                .zip(&expected)
                .map(|(item, expected)| match expected {
                    Some(ty) if !self.oracle.convertible(&self.registry, item, ty) => {
                        Err(BuildError::TypeMismatch {
                            expected: self.type_name(ty),
                            got: self.type_name(item),
                            context: "variable declaration".to_string(),
                        })
                    }
                    Some(ty) => Ok(ty.clone()),
                    None => Ok(item.clone()),
                })
                .collect();
        }

        Err(BuildError::invalid_operation(format!(
            "assignment mismatch: {m} variable(s) but {} value(s)",
            values.len()
        )))
    }

    /// Declared type per name, `None` where it is inferred from the value.
    fn expected_types(&self, pending: &PendingInit) -> Result<Vec<Option<Type>>> {
        if pending.form == InitForm::Var {
            return Ok(vec![pending.ty.clone(); pending.names.len()]);
        }

        let mut fresh = false;
        let mut expected = Vec::with_capacity(pending.names.len());
        for name in &pending.names {
            if name == "_" || !self.registry.declared_here(name) {
                fresh |= name != "_";
                expected.push(None);
                continue;
            }
            match self.registry.lookup(name) {
                Some(Object::Var { ty }) => expected.push(Some(ty.clone())),
                _ => {
                    return Err(BuildError::invalid_operation(format!(
                        "cannot assign to {name}"
                    )));
                }
            }
        }
        if !fresh {
            return Err(BuildError::invalid_operation(
                "no new variables on left side of :=",
            ));
        }
        Ok(expected)
    }

    fn inferred_type(&self, value: &Operand) -> Result<Type> {
        self.require_value(value)?;
        match &value.ty {
            Type::Basic(BasicKind::UntypedNil) => Err(BuildError::invalid_operation(
                "use of untyped nil in variable declaration",
            )),
            Type::Tuple(_) => Err(BuildError::invalid_operation(
                "multiple-value in single-value context",
            )),
            ty => {
                let ty = ty.defaulted();
                if let Some(c) = &value.cval {
                    self.check_representable(c, &ty)?;
                }
                Ok(ty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Package;
    use gotree_core::ast::{AssignTok, Decl, Expr, Stmt};
    use gotree_core::{BuildError, Param, Type};

    #[test]
    fn package_level_var_is_a_declaration() {
        let mut pkg = Package::new("main");
        pkg.cb()
            .new_var_start(Some(Type::INT), &["n"]).unwrap()
            .val(3).unwrap()
            .end_init(1).unwrap();
        assert_eq!(pkg.registry().lookup("n").cloned(), Some(gotree_registry::Object::var(Type::INT)));

        let file = pkg.finish();
        assert!(matches!(file.decls.as_slice(), [Decl::Gen(_)]));
    }

    #[test]
    fn redeclaration_in_same_scope() {
        let mut pkg = Package::new("main");
        pkg.new_var(Type::INT, &["a"]).unwrap();
        assert_eq!(
            pkg.new_var(Type::INT, &["a"]).unwrap_err(),
            BuildError::Redeclared {
                name: "a".to_string()
            }
        );
        assert!(pkg.cb().new_var_start(None, &["b", "b"]).is_err());
    }

    #[test]
    fn define_infers_default_types() {
        let mut pkg = Package::new("main");
        let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
        let cb = pkg.body_start(&f);
        cb.define_var_start(&["i", "x"])
            .val(1).unwrap()
            .val(2.5).unwrap()
            .end_init(2).unwrap();
        cb.var_val("i").unwrap();
        assert_eq!(cb.top().unwrap().ty, Type::INT);
        cb.var_val("x").unwrap();
        assert_eq!(cb.top().unwrap().ty, Type::FLOAT64);
    }

    #[test]
    fn define_reuses_names_of_the_same_block() {
        let mut pkg = Package::new("main");
        let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
        let cb = pkg.body_start(&f);
        cb.define_var_start(&["a"]).val(1).unwrap().end_init(1).unwrap();

        cb.define_var_start(&["a"]).val(2).unwrap();
        assert_eq!(
            cb.end_init(1).unwrap_err(),
            BuildError::invalid_operation("no new variables on left side of :=")
        );
        assert_eq!(cb.depth(), 1);
    }

    #[test]
    fn define_from_multiple_results() {
        let mut pkg = Package::new("main");
        pkg.new_func(
            None,
            "pair",
            vec![],
            vec![Param::unnamed(Type::INT), Param::unnamed(Type::STRING)],
            false,
        )
        .unwrap();
        let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
        pkg.body_start(&f)
            .define_var_start(&["n", "s"])
            .var_val("pair").unwrap()
            .call(0).unwrap()
            .end_init(1).unwrap()
            .end();

        let file = pkg.finish();
        let body = file.func("f").and_then(|f| f.body.clone()).unwrap();
        let [Stmt::Assign(stmt)] = body.list.as_slice() else {
            panic!("expected one assignment");
        };
        assert_eq!(stmt.tok, AssignTok::Define);
        assert_eq!(stmt.lhs, [Expr::ident("n"), Expr::ident("s")]);
    }

    #[test]
    fn typed_value_must_fit() {
        let mut pkg = Package::new("main");
        let cb = pkg.cb();
        cb.new_var_start(Some(Type::Basic(gotree_core::BasicKind::Int8)), &["b"])
            .unwrap()
            .val(300)
            .unwrap();
        assert_eq!(
            cb.end_init(1).unwrap_err(),
            BuildError::invalid_operation("constant 300 overflows int8")
        );
    }

    #[test]
    #[should_panic(expected = ":= outside of a function body")]
    fn define_at_package_level_panics() {
        let mut pkg = Package::new("main");
        pkg.cb().define_var_start(&["a"]);
    }
}
