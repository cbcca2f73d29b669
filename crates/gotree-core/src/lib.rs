//! Core types for the gotree builder.
//!
//! ## Modules
//!
//! - [`ast`]: Syntax tree nodes the builder produces
//! - [`constant`]: Constant values and folding
//! - [`error`]: Registration and build errors
//! - [`ops`]: Binary and unary operators
//! - [`types`]: Static type model
//! - [`type_hash`]: Deterministic identity for named types

pub mod ast;
pub mod constant;
pub mod error;
pub mod ops;
pub mod type_hash;
pub mod types;

pub use constant::ConstValue;
pub use error::{BuildError, GotreeError, RegistrationError};
pub use ops::{BinaryOp, Op, UnaryOp};
pub use type_hash::TypeHash;
pub use types::{BasicInfo, BasicKind, Field, Param, Signature, StructType, Type};
