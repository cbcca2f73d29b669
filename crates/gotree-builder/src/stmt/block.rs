//! Blocks, function bodies and closures.

use gotree_core::ast::{Expr, FuncDecl, FuncLit, Stmt};
use gotree_core::{BuildError, Param, Signature, Type};
use gotree_registry::Object;
use tracing::debug;

use crate::block::{BlockContext, BlockKind};
use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::Operand;
use crate::type_expr::func_type_expr;

/// Reject a signature declaring the same name twice.
pub(crate) fn check_param_names(sig: &Signature) -> Result<()> {
    let names = sig
        .recv
        .iter()
        .map(|r| r.name.as_str())
        .chain(sig.params.iter().map(|p| p.name.as_str()))
        .chain(sig.results.iter().map(|p| p.name.as_str()))
        .filter(|name| !name.is_empty() && *name != "_");
    let mut seen = Vec::new();
    for name in names {
        if seen.contains(&name) {
            return Err(BuildError::Redeclared {
                name: name.to_string(),
            });
        }
        seen.push(name);
    }
    Ok(())
}

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Open a nested `{ ... }` block.
    pub fn block(&mut self) -> &mut Self {
        assert!(
            !self.at_package_level(),
            "block() outside of a function body"
        );
        self.assert_stmt_start("block");
        let base = self.depth();
        self.push_block(BlockContext::new(BlockKind::Plain, base));
        self
    }

    /// End the innermost block, body or closure.
    ///
    /// A block becomes a statement of its parent, a function body completes
    /// and emits its declaration, a closure body pushes the function literal.
    pub fn end(&mut self) -> &mut Self {
        let block = self.pop_block();
        let count = block.stmts.len();
        match block.kind {
            BlockKind::Plain => {
                let body = self.emitter.finish_block(block.stmts);
                self.finish_stmt(Stmt::Block(body));
            }
            BlockKind::Func { mut decl, .. } => {
                decl.body = Some(self.emitter.finish_block(block.stmts));
                debug!(function = %decl.name.name, stmts = count, "function body finished");
                self.emitter.finish_function(decl);
            }
            BlockKind::Closure { ty, sig } => {
                let body = self.emitter.finish_block(block.stmts);
                debug!(stmts = count, "closure body finished");
                let lit = Expr::FuncLit(Box::new(FuncLit { ty, body }));
                self.stack.push(Operand::value(lit, Type::Signature(sig)));
            }
            BlockKind::Package => unreachable!("package context is never popped"),
        }
        self
    }

    /// Open the body of a closure. `end()` pushes the function literal.
    pub fn new_closure(
        &mut self,
        params: Vec<Param>,
        results: Vec<Param>,
        variadic: bool,
    ) -> Result<&mut Self> {
        if variadic && !matches!(params.last().map(|p| &p.ty), Some(Type::Slice(_))) {
            return Err(BuildError::invalid_operation(
                "variadic parameter must have a slice type",
            ));
        }
        let sig = Signature::new(params, results, variadic);
        let ty = func_type_expr(&self.registry, &sig);
        let base = self.depth();
        self.push_block(BlockContext::new(
            BlockKind::Closure {
                ty,
                sig: sig.clone(),
            },
            base,
        ));
        if let Err(err) = self.declare_params(&sig) {
            self.pop_block();
            return Err(err);
        }
        debug!(params = sig.params.len(), results = sig.results.len(), "closure body started");
        Ok(self)
    }

    /// Open the body of a declared function.
    ///
    /// # Panics
    ///
    /// Inside another body, or if `sig` declares a name twice. Signatures
    /// of declared functions are checked by `check_param_names`.
    pub(crate) fn start_function_body(&mut self, decl: FuncDecl, sig: Signature) -> &mut Self {
        assert!(
            self.at_package_level(),
            "function body started inside another body"
        );
        self.assert_stmt_start("function body");
        debug!(function = %decl.name.name, "function body started");
        self.push_block(BlockContext::new(
            BlockKind::Func {
                decl,
                sig: sig.clone(),
            },
            0,
        ));
        if let Err(err) = self.declare_params(&sig) {
            panic!("function body with unchecked signature: {err}");
        }
        self
    }

    /// Declare the receiver, parameters and named results in the new scope.
    fn declare_params(&mut self, sig: &Signature) -> Result<()> {
        let params = sig
            .recv
            .iter()
            .map(|r| &**r)
            .chain(&sig.params)
            .chain(&sig.results);
        for param in params.filter(|p| !p.name.is_empty()) {
            self.registry
                .declare(&param.name, Object::var(param.ty.clone()))?;
        }
        Ok(())
    }
}
