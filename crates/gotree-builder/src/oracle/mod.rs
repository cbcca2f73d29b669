//! Type Oracle - the typing rules the builder checks operations against.
//!
//! The builder never decides on its own whether an operator applies to a
//! pair of types or whether a value may be used where another type is
//! expected. It asks a [`TypeOracle`], which keeps the stack machine
//! independent of the target language's exact conversion rules.
//!
//! ## Modules
//!
//! - [`go`]: [`GoOracle`], the rules for Go basic and named types

pub mod go;

pub use go::GoOracle;

use gotree_core::{Op, Type};
use gotree_registry::SymbolRegistry;

/// Answers typing questions for the builder.
pub trait TypeOracle {
    /// Static result type of `op` applied to `operands`, or `None` if the
    /// operation is illegal for them.
    fn result_type(&self, types: &SymbolRegistry, op: Op, operands: &[Type]) -> Option<Type>;

    /// Whether a value of type `from` may be used where `to` is expected
    /// (assignment, argument passing, return).
    fn convertible(&self, types: &SymbolRegistry, from: &Type, to: &Type) -> bool;

    /// Whether `to(x)` is a legal explicit conversion for `x` of type `from`.
    fn explicit_convertible(&self, types: &SymbolRegistry, from: &Type, to: &Type) -> bool {
        self.convertible(types, from, to)
    }
}
