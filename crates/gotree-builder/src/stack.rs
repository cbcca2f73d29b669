//! The operand stack.

use crate::operand::Operand;

/// Operands of the expression being built, innermost last.
#[derive(Debug, Default)]
pub struct OperandStack {
    items: Vec<Operand>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, operand: Operand) {
        self.items.push(operand);
    }

    /// The top `n` operands, bottom first.
    ///
    /// # Panics
    ///
    /// If fewer than `n` operands are on the stack.
    pub fn top(&self, n: usize) -> &[Operand] {
        assert!(
            n <= self.items.len(),
            "operand stack underflow: need {n}, have {}",
            self.items.len()
        );
        &self.items[self.items.len() - n..]
    }

    /// Pop the top `n` operands, bottom first.
    ///
    /// # Panics
    ///
    /// If fewer than `n` operands are on the stack.
    pub fn pop_n(&mut self, n: usize) -> Vec<Operand> {
        assert!(
            n <= self.items.len(),
            "operand stack underflow: need {n}, have {}",
            self.items.len()
        );
        self.items.split_off(self.items.len() - n)
    }

    /// Replace the top `n` operands with `operand`.
    pub fn replace(&mut self, n: usize, operand: Operand) {
        self.pop_n(n);
        self.items.push(operand);
    }

    pub fn last(&self) -> Option<&Operand> {
        self.items.last()
    }
}
