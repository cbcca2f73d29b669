//! Expression operations of the [`CodeBuilder`](crate::CodeBuilder).
//!
//! Every operation pops its operands from the stack, checks them, and pushes
//! one result operand. Checks run before the stack is touched, so a rejected
//! call leaves it unchanged.
//!
//! - literals: `val`, `nil`, `type_val`
//! - identifiers: `var_val`, `var_ref`
//! - member: `member_val`, `member_ref`, with virtual field synthesis
//! - unary: `unary_op`, `addr_of`, `deref`
//! - binary: `binary_op`
//! - calls: `call`, conversions and overload groups
//! - assignment: `assign`

mod assignment;
mod binary;
mod calls;
mod identifiers;
mod literals;
mod member;
mod unary;
