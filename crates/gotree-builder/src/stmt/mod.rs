//! Statement operations of the [`CodeBuilder`](crate::CodeBuilder).
//!
//! - `end_stmt`: expression statements
//! - block: `block`, `end`, closures and function bodies
//! - var_decl: `var` and `:=` declarations
//! - return_stmt: `return_`

mod block;
mod return_stmt;
mod var_decl;

pub(crate) use block::check_param_names;

use gotree_core::ast::Stmt;

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::OperandKind;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Pop the operand on top as an expression statement.
    pub fn end_stmt(&mut self) -> Result<&mut Self> {
        self.assert_operands(1, "end_stmt");
        let x = &self.stack.top(1)[0];
        if x.kind != OperandKind::Void {
            self.require_value(x)?;
        }
        let mut popped = self.stack.pop_n(1);
        let expr = popped.remove(0).expr;
        self.finish_stmt(Stmt::Expr(expr));
        Ok(self)
    }
}
