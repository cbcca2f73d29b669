//! CodeBuilder - the expression stack machine.
//!
//! Callers build code by issuing calls in evaluation order: push operands,
//! apply operators, then close a statement. Each statement leaves the operand
//! stack exactly as deep as it was when the statement started.
//!
//! # Example
//!
//! ```
//! use gotree_builder::Package;
//! use gotree_core::{BinaryOp, Type};
//!
//! let mut pkg = Package::new("main");
//! pkg.new_var(Type::INT, &["a"]).unwrap();
//! let main = pkg.new_func(None, "main", vec![], vec![], false).unwrap();
//!
//! pkg.body_start(&main)
//!     .var_ref("a").unwrap()
//!     .val(1).unwrap()
//!     .val(2).unwrap()
//!     .binary_op(BinaryOp::Add).unwrap()
//!     .assign(1).unwrap()
//!     .end();
//!
//! let file = pkg.finish();
//! assert!(file.func("main").is_some());
//! ```
//!
//! # Errors and panics
//!
//! A call rejected because of its input returns a [`BuildError`] and leaves
//! the stack untouched, so the caller may recover and continue. Calls that
//! break the protocol itself, such as popping more operands than a statement
//! pushed or ending a statement with operands left over, panic.

use gotree_core::ast::Stmt;
use gotree_core::{BuildError, ConstValue, Type};
use gotree_registry::SymbolRegistry;

use crate::block::BlockContext;
use crate::config::BuilderConfig;
use crate::emit::{DeclarationEmitter, FileEmitter};
use crate::operand::{Operand, OperandKind};
use crate::oracle::TypeOracle;
use crate::stack::OperandStack;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Builds the declarations of one package.
pub struct CodeBuilder<E: DeclarationEmitter = FileEmitter> {
    pub(crate) registry: SymbolRegistry,
    pub(crate) oracle: Box<dyn TypeOracle>,
    pub(crate) emitter: E,
    pub(crate) config: BuilderConfig,
    pub(crate) stack: OperandStack,

    /// Package-level context; at the bottom of every block chain.
    root: BlockContext,
    /// Open function bodies, closure bodies and blocks, innermost last.
    blocks: Vec<BlockContext>,

    /// Last temporary number handed out; per package.
    temp_counter: u32,
}

impl<E: DeclarationEmitter> std::fmt::Debug for CodeBuilder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeBuilder")
            .field("package", &self.registry.package())
            .field("depth", &self.stack.len())
            .field("open_blocks", &self.blocks.len())
            .field("temp_counter", &self.temp_counter)
            .finish_non_exhaustive()
    }
}

impl<E: DeclarationEmitter> CodeBuilder<E> {
    pub fn new(
        package: impl Into<String>,
        config: BuilderConfig,
        oracle: Box<dyn TypeOracle>,
        emitter: E,
    ) -> Self {
        let registry = SymbolRegistry::new(package, config.word_size());
        Self {
            registry,
            oracle,
            emitter,
            config,
            stack: OperandStack::new(),
            root: BlockContext::package(),
            blocks: Vec::new(),
            temp_counter: 0,
        }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SymbolRegistry {
        &mut self.registry
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Current operand stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The operand on top of the stack.
    pub fn top(&self) -> Option<&Operand> {
        self.stack.last()
    }

    /// Number of open bodies and blocks.
    pub fn open_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Give up the emitter once every block has ended.
    ///
    /// # Panics
    ///
    /// If a block is still open or operands are left on the stack.
    pub fn into_emitter(self) -> E {
        assert!(
            self.blocks.is_empty(),
            "{} block(s) still open at end of package",
            self.blocks.len()
        );
        assert!(
            self.stack.is_empty() && self.root.pending.is_none(),
            "unfinished package-level declaration"
        );
        self.emitter
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    pub(crate) fn current_block(&self) -> &BlockContext {
        self.blocks.last().unwrap_or(&self.root)
    }

    pub(crate) fn current_block_mut(&mut self) -> &mut BlockContext {
        match self.blocks.last_mut() {
            Some(block) => block,
            None => &mut self.root,
        }
    }

    pub(crate) fn push_block(&mut self, block: BlockContext) {
        self.registry.push_scope();
        self.blocks.push(block);
    }

    /// Pop the innermost block.
    ///
    /// # Panics
    ///
    /// At package level, or when the block ends with operands or an
    /// initializer still pending.
    pub(crate) fn pop_block(&mut self) -> BlockContext {
        let Some(block) = self.blocks.pop() else {
            panic!("end() without an open block");
        };
        assert!(
            block.pending.is_none(),
            "block ended while a variable initializer is pending"
        );
        assert_eq!(
            self.stack.len(),
            block.stack_base,
            "block ended with unbalanced operand stack"
        );
        self.registry.pop_scope();
        block
    }

    /// Whether the innermost block is package level.
    pub(crate) fn at_package_level(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The signature of the innermost enclosing function or closure.
    pub(crate) fn enclosing_signature(&self) -> Option<&gotree_core::Signature> {
        self.blocks.iter().rev().find_map(BlockContext::signature)
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// Assert that a new statement may start here.
    pub(crate) fn assert_stmt_start(&self, what: &str) {
        let base = self.current_block().stack_base;
        assert_eq!(
            self.stack.len(),
            base,
            "{what} started with {} operand(s) outstanding",
            self.stack.len() - base.min(self.stack.len())
        );
    }

    /// Append a completed statement to the innermost block.
    ///
    /// # Panics
    ///
    /// At package level, or if the statement left operands behind.
    pub(crate) fn finish_stmt(&mut self, stmt: Stmt) {
        assert!(
            !self.at_package_level(),
            "statement outside of a function body"
        );
        let block = self.current_block();
        assert_eq!(
            self.stack.len(),
            block.stack_base,
            "operand stack unbalanced at end of statement"
        );
        self.current_block_mut().stmts.push(stmt);
    }

    /// A fresh temporary name, `_autoGo_1`, `_autoGo_2`, ...
    pub(crate) fn new_temp(&mut self) -> String {
        self.temp_counter += 1;
        format!("{}{}", self.config.temp_prefix(), self.temp_counter)
    }

    /// Require `n` operands above the innermost block's base.
    pub(crate) fn assert_operands(&self, n: usize, what: &str) {
        let available = self.stack.len() - self.current_block().stack_base.min(self.stack.len());
        assert!(
            available >= n,
            "{what} needs {n} operand(s), {available} available"
        );
    }

    // ==========================================================================
    // Checks
    // ==========================================================================

    pub(crate) fn type_name(&self, ty: &Type) -> String {
        self.registry.type_name(ty)
    }

    /// Reject operands that cannot be read as values.
    pub(crate) fn require_value(&self, operand: &Operand) -> Result<()> {
        let message = match &operand.kind {
            OperandKind::Value | OperandKind::Addressable => return Ok(()),
            OperandKind::Void => "function call (no value) used as value".to_string(),
            OperandKind::TypeName => {
                format!("type {} is not an expression", self.type_name(&operand.ty))
            }
            OperandKind::Overload(group) => {
                format!("overloaded function {} must be called", group.name())
            }
            OperandKind::Target(_) => "write target used as value".to_string(),
        };
        Err(BuildError::invalid_operation(message))
    }

    /// Check that `operand` may be stored where a `to` is expected.
    pub(crate) fn check_assignable(
        &self,
        operand: &Operand,
        to: &Type,
        context: &str,
    ) -> Result<()> {
        self.require_value(operand)?;
        if !self.oracle.convertible(&self.registry, &operand.ty, to) {
            return Err(BuildError::TypeMismatch {
                expected: self.type_name(to),
                got: self.type_name(&operand.ty),
                context: context.to_string(),
            });
        }
        if let Some(value) = &operand.cval {
            self.check_representable(value, to)?;
        }
        Ok(())
    }

    /// Check that a constant fits a typed basic type.
    pub(crate) fn check_representable(&self, value: &ConstValue, to: &Type) -> Result<()> {
        let Some(kind) = self.registry.underlying(to).as_basic() else {
            return Ok(());
        };
        if kind.is_untyped() || value.representable_as(kind, self.config.word_size()) {
            return Ok(());
        }
        let message = match value {
            ConstValue::Float(_) if kind.is_integer() => {
                format!("constant {value} truncated to {}", self.type_name(to))
            }
            _ => format!("constant {value} overflows {}", self.type_name(to)),
        };
        Err(BuildError::invalid_operation(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::GoOracle;
    use gotree_core::BasicKind;

    fn create_test_builder() -> CodeBuilder {
        CodeBuilder::new(
            "main",
            BuilderConfig::default(),
            Box::new(GoOracle),
            FileEmitter::new("main"),
        )
    }

    #[test]
    fn temporaries_are_numbered_per_package() {
        let mut cb = create_test_builder();
        assert_eq!(cb.new_temp(), "_autoGo_1");
        assert_eq!(cb.new_temp(), "_autoGo_2");
    }

    #[test]
    fn custom_temp_prefix() {
        let mut cb = CodeBuilder::new(
            "main",
            BuilderConfig::new().with_temp_prefix("tmp"),
            Box::new(GoOracle),
            FileEmitter::new("main"),
        );
        assert_eq!(cb.new_temp(), "tmp1");
    }

    #[test]
    fn representability() {
        let cb = create_test_builder();
        let int8 = Type::Basic(BasicKind::Int8);
        assert!(cb.check_representable(&ConstValue::Int(127), &int8).is_ok());
        assert_eq!(
            cb.check_representable(&ConstValue::Int(300), &int8),
            Err(BuildError::invalid_operation("constant 300 overflows int8"))
        );
        assert!(matches!(
            cb.check_representable(&ConstValue::from(1.5), &Type::INT),
            Err(BuildError::InvalidOperation { message }) if message.contains("truncated")
        ));
    }

    #[test]
    fn package_level_has_no_blocks() {
        let cb = create_test_builder();
        assert!(cb.at_package_level());
        assert_eq!(cb.open_blocks(), 0);
        assert!(cb.enclosing_signature().is_none());
    }

    #[test]
    fn debug_output_summarizes_state() {
        let mut cb = create_test_builder();
        let err = cb.var_val("missing").unwrap_err();
        assert_eq!(err, BuildError::UndefinedReference { name: "missing".to_string() });

        cb.val(1).unwrap();
        let debug = format!("{cb:?}");
        assert!(debug.starts_with("CodeBuilder {"));
        assert!(debug.contains("package: \"main\""));
        assert!(debug.contains("depth: 1"));
    }

    #[test]
    #[should_panic(expected = "end() without an open block")]
    fn pop_at_package_level_panics() {
        let mut cb = create_test_builder();
        cb.pop_block();
    }
}
