//! gotree - a typed builder for Go syntax trees.
//!
//! Code is built by issuing calls in evaluation order on a [`Package`]: the
//! builder type checks each step, rewrites access to virtual fields
//! (bitfields and overlapping views) into ordinary Go expressions, and
//! collects the finished declarations into an [`ast::File`].
//!
//! ```
//! use gotree::{BinaryOp, Package, Param, Type};
//!
//! let mut pkg = Package::new("main");
//! let add = pkg
//!     .new_func(
//!         None,
//!         "add",
//!         vec![Param::new("a", Type::INT), Param::new("b", Type::INT)],
//!         vec![Param::unnamed(Type::INT)],
//!         false,
//!     )
//!     .unwrap();
//!
//! pkg.body_start(&add)
//!     .var_val("a").unwrap()
//!     .var_val("b").unwrap()
//!     .binary_op(BinaryOp::Add).unwrap()
//!     .return_(1).unwrap()
//!     .end();
//!
//! let file = pkg.finish();
//! assert!(file.func("add").is_some());
//! ```
//!
//! ## Crates
//!
//! - [`gotree_core`]: Type model, constants, syntax tree and errors
//! - [`gotree_registry`]: Named types, scopes, virtual field table, overloads
//! - [`gotree_builder`]: The code builder

pub use gotree_core::{
    BasicKind, BinaryOp, BuildError, ConstValue, Field, GotreeError, Op, Param,
    RegistrationError, Signature, StructType, Type, TypeHash, UnaryOp, ast,
};
pub use gotree_registry::{
    BitField, FuncEntry, Object, OverlapField, OverloadGroup, SymbolRegistry,
    parse_overload_name,
};
pub use gotree_builder::{
    BuilderConfig, CodeBuilder, DeclarationEmitter, FileEmitter, Func, GoOracle, Operand,
    OperandKind, OverloadMatch, Package, Target, TypeOracle, resolve_overload,
};
