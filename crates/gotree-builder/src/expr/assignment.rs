//! Assignment statements.
//!
//! Plain targets produce one `lhs... = rhs...` statement. As soon as one
//! target is a bitfield the statement becomes a block: values are first
//! bound to temporaries when there is more than one, then each target is
//! stored in order, bitfields through a masked read-modify-write.

use gotree_core::ast::{AssignStmt, AssignTok, Expr, Ident, Stmt};
use gotree_core::{BasicKind, BuildError, ConstValue, Type};
use tracing::trace;

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::{Operand, Target};
use crate::vfields::bitfield;

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Assign to `n` targets.
    ///
    /// The statement's operands are the `n` targets followed by either `n`
    /// values or, for `n > 1`, a single call returning `n` results.
    ///
    /// # Panics
    ///
    /// If the statement holds any other number of operands.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn assign(&mut self, n: usize) -> Result<&mut Self> {
        assert!(n > 0, "assign(0)");
        let available = self.depth() - self.current_block().stack_base;
        let tuple_form = n > 1
            && available == n + 1
            && matches!(self.stack.last().map(|o| &o.ty), Some(Type::Tuple(items)) if items.len() == n);
        let count = if tuple_form { n + 1 } else { 2 * n };
        assert_eq!(
            available, count,
            "assign({n}) with {available} operand(s) in the statement"
        );

        let operands = self.stack.top(count);
        let (targets, values) = operands.split_at(n);
        let plans = self.check_assignment(targets, values, tuple_form)?;

        let mut operands = self.stack.pop_n(count);
        let values = operands.split_off(n);
        let targets = operands;

        if !plans.iter().any(|p| matches!(p, Target::Bitfield(_))) {
            let stmt = Stmt::Assign(AssignStmt {
                lhs: targets.into_iter().map(|t| t.expr).collect(),
                tok: AssignTok::Assign,
                rhs: values.into_iter().map(|v| v.expr).collect(),
            });
            self.finish_stmt(stmt);
            return Ok(self);
        }

        let constants: Vec<Option<i128>> = if tuple_form {
            vec![None; n]
        } else {
            values
                .iter()
                .map(|v| v.cval.as_ref().and_then(ConstValue::as_int))
                .collect()
        };
        let mut stmts = Vec::new();
        let rhs = self.bind_values(&plans, values, tuple_form, &mut stmts);
        for (((target, plan), value), constant) in
            targets.into_iter().zip(plans).zip(rhs).zip(constants)
        {
            let Some(value) = value else { continue };
            match plan {
                Target::Bitfield(bits) => {
                    let tmp = self.new_temp();
                    trace!(tmp = %tmp, offset = bits.layout.offset, width = bits.layout.width, "bitfield write synthesized");
                    stmts.extend(bitfield::write_stmts(
                        &tmp,
                        bits.storage,
                        value,
                        constant,
                        &bits.layout,
                    ));
                }
                Target::Plain | Target::Overlap | Target::Blank => {
                    stmts.push(Stmt::assign(target.expr, value));
                }
            }
        }
        let body = self.emitter.finish_block(stmts);
        self.finish_stmt(Stmt::Block(body));
        Ok(self)
    }

    /// Check every target against its value before anything is popped.
    fn check_assignment(
        &self,
        targets: &[Operand],
        values: &[Operand],
        tuple_form: bool,
    ) -> Result<Vec<Target>> {
        let mut plans = Vec::with_capacity(targets.len());
        for target in targets {
            let Some(plan) = target.as_target() else {
                return Err(BuildError::invalid_operation(format!(
                    "cannot assign to value of type {}",
                    self.type_name(&target.ty)
                )));
            };
            plans.push(plan);
        }

        if tuple_form {
            let call = &values[0];
            self.require_value(call)?;
            if let Type::Tuple(items) = &call.ty {
                for ((target, plan), item) in targets.iter().zip(&plans).zip(items) {
                    if *plan != Target::Blank
                        && !self.oracle.convertible(&self.registry, item, &target.ty)
                    {
                        return Err(BuildError::TypeMismatch {
                            expected: self.type_name(&target.ty),
                            got: self.type_name(item),
                            context: "assignment".to_string(),
                        });
                    }
                }
            }
            return Ok(plans);
        }

        for ((target, plan), value) in targets.iter().zip(&plans).zip(values) {
            if *plan == Target::Blank {
                self.require_value(value)?;
                if value.ty == Type::Basic(BasicKind::UntypedNil) {
                    return Err(BuildError::invalid_operation(
                        "use of untyped nil in assignment",
                    ));
                }
            } else {
                self.check_assignable(value, &target.ty, "assignment")?;
            }
        }
        Ok(plans)
    }

    /// Evaluate the right-hand sides of a block assignment once, in order.
    ///
    /// Returns the expression to store per target; `None` when the value was
    /// already discarded into `_`.
    fn bind_values(
        &mut self,
        plans: &[Target],
        values: Vec<Operand>,
        tuple_form: bool,
        stmts: &mut Vec<Stmt>,
    ) -> Vec<Option<Expr>> {
        if tuple_form {
            let mut lhs = Vec::with_capacity(plans.len());
            let mut rhs = Vec::with_capacity(plans.len());
            for plan in plans {
                if *plan == Target::Blank {
                    lhs.push(Ident::blank());
                    rhs.push(None);
                } else {
                    let tmp = self.new_temp();
                    rhs.push(Some(Expr::ident(tmp.clone())));
                    lhs.push(Ident::new(tmp));
                }
            }
            stmts.push(Stmt::Assign(AssignStmt {
                lhs: lhs.into_iter().map(Expr::Ident).collect(),
                tok: AssignTok::Define,
                rhs: values.into_iter().map(|v| v.expr).collect(),
            }));
            return rhs;
        }

        if plans.len() == 1 {
            return values.into_iter().map(|v| Some(v.expr)).collect();
        }

        plans
            .iter()
            .zip(values)
            .map(|(plan, value)| {
                if *plan == Target::Blank {
                    stmts.push(Stmt::assign(Expr::Ident(Ident::blank()), value.expr));
                    None
                } else if value.is_constant() {
                    Some(value.expr)
                } else {
                    let tmp = self.new_temp();
                    stmts.push(Stmt::define(tmp.clone(), value.expr));
                    Some(Expr::ident(tmp))
                }
            })
            .collect()
    }
}
