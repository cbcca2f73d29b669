//! Gotree Builder
//!
//! A stack-machine code builder producing Go syntax trees. Callers push
//! operands and apply operators in evaluation order; the builder checks
//! every step against a type oracle and emits finished declarations.
//!
//! ## Architecture
//!
//! - **Registration**: types, methods, virtual fields and overload groups are
//!   declared on the [`Package`] before they are used
//! - **Building**: function bodies are built through the [`CodeBuilder`]'s
//!   expression and statement operations
//!
//! ## Modules
//!
//! - [`block`]: Block contexts for bodies, closures and nested blocks
//! - [`builder`]: [`CodeBuilder`], the operand stack machine
//! - [`config`]: Builder configuration
//! - [`emit`]: Declaration emitter collecting the output file
//! - [`operand`]: Operands and write targets
//! - [`oracle`]: Typing rules the builder consults
//! - [`overload`]: Overload resolution by argument count
//! - [`package`]: [`Package`], the entry point
//! - [`stack`]: The operand stack
//! - [`type_expr`]: Type expressions for declarations and conversions
//! - [`vfields`]: Bitfield and overlap field synthesis

pub mod block;
pub mod builder;
pub mod config;
pub mod emit;
mod expr;
pub mod operand;
pub mod oracle;
pub mod overload;
pub mod package;
pub mod stack;
mod stmt;
pub mod type_expr;
pub mod vfields;

pub use builder::CodeBuilder;
pub use config::BuilderConfig;
pub use emit::{DeclarationEmitter, FileEmitter};
pub use operand::{Operand, OperandKind, Target};
pub use oracle::{GoOracle, TypeOracle};
pub use overload::{OverloadMatch, resolve_overload};
pub use package::{Func, Package};
