//! Error types for the builder.
//!
//! ## Error Hierarchy
//!
//! ```text
//! GotreeError (top-level wrapper)
//! ├── RegistrationError - type, method, virtual field and overload registration
//! └── BuildError        - builder calls rejected because of their input
//! ```
//!
//! Both are recoverable: a failed call leaves the builder's operand stack as
//! it was. Violations of the builder protocol itself (unbalanced stack,
//! duplicate overload index, registering virtual fields twice) are bugs in
//! the calling code generator and panic instead.

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while declaring types, methods, virtual fields and
/// overload groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists in the package.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A method with this name already exists on the type.
    #[error("duplicate method: {type_name}.{method}")]
    DuplicateMethod { type_name: String, method: String },

    /// Virtual fields require a struct type.
    #[error("type '{0}' is not a struct")]
    NotAStruct(String),

    /// A bitfield names a storage field the struct doesn't declare.
    #[error("type '{type_name}' has no field '{field}'")]
    FieldNotFound { type_name: String, field: String },

    /// A bitfield's storage field is not of integer type.
    #[error("field '{field}' of '{type_name}' is not an integer")]
    NotAnInteger { type_name: String, field: String },

    /// A bitfield's range doesn't fit in its storage field.
    #[error(
        "bitfield '{name}' (offset {offset}, width {width}) exceeds the {storage_bits}-bit storage field"
    )]
    BitRangeOverflow {
        name: String,
        offset: u32,
        width: u32,
        storage_bits: u32,
    },

    /// An overlap field reaches past the end of its aggregate.
    #[error("overlap field '{name}' ({size} bytes at offset {offset}) exceeds the {aggregate_size}-byte aggregate")]
    OverlapOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        aggregate_size: u32,
    },

    /// An overload candidate's name doesn't carry a valid `__<index>` suffix.
    #[error("malformed overload name '{name}': {reason}")]
    MalformedOverloadName { name: String, reason: String },
}

// ============================================================================
// Build Errors
// ============================================================================

/// Errors reported by builder calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A referenced name is not visible from the current scope.
    #[error("undefined: {name}")]
    UndefinedReference {
        /// The name that wasn't found.
        name: String,
    },

    /// Neither a declared field, method, promoted field nor virtual field
    /// matches.
    #[error("{type_name} has no field or method {member}")]
    UnknownMember {
        /// The member being selected.
        member: String,
        /// The type it was selected on.
        type_name: String,
    },

    /// The type oracle rejected the operand types, or the operand cannot be
    /// used this way.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of what's invalid.
        message: String,
    },

    /// An overload group has no candidate for the call-site argument count.
    #[error("no overload of {name} accepts {arg_count} argument(s)")]
    NoMatchingOverload {
        /// The overload group name.
        name: String,
        /// Number of arguments at the call site.
        arg_count: usize,
    },

    /// A name is declared twice in the same block.
    #[error("{name} redeclared in this block")]
    Redeclared { name: String },

    /// A value cannot be used where a value of another type is expected.
    #[error("cannot use {got} as {expected} value in {context}")]
    TypeMismatch {
        expected: String,
        got: String,
        /// Where the value was used (`assignment`, `argument`, ...).
        context: String,
    },
}

impl BuildError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        BuildError::InvalidOperation {
            message: message.into(),
        }
    }
}

// ============================================================================
// Unified error
// ============================================================================

/// Either kind of recoverable error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GotreeError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl GotreeError {
    pub fn is_registration(&self) -> bool {
        matches!(self, GotreeError::Registration(_))
    }

    pub fn is_build(&self) -> bool {
        matches!(self, GotreeError::Build(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_member_display() {
        let err = BuildError::UnknownMember {
            member: "z3".to_string(),
            type_name: "main.T".to_string(),
        };
        assert_eq!(format!("{err}"), "main.T has no field or method z3");
    }

    #[test]
    fn no_matching_overload_display() {
        let err = BuildError::NoMatchingOverload {
            name: "Cast".to_string(),
            arg_count: 2,
        };
        assert_eq!(format!("{err}"), "no overload of Cast accepts 2 argument(s)");
    }

    #[test]
    fn bit_range_display() {
        let err = RegistrationError::BitRangeOverflow {
            name: "z".to_string(),
            offset: 60,
            width: 8,
            storage_bits: 64,
        };
        assert_eq!(
            format!("{err}"),
            "bitfield 'z' (offset 60, width 8) exceeds the 64-bit storage field"
        );
    }

    #[test]
    fn unified_error_from_build() {
        let err: GotreeError = BuildError::UndefinedReference {
            name: "x".to_string(),
        }
        .into();
        assert!(err.is_build());
        assert!(!err.is_registration());
        assert_eq!(format!("{err}"), "undefined: x");
    }

    #[test]
    fn unified_error_from_registration() {
        let err: GotreeError = RegistrationError::TypeNotFound("T".to_string()).into();
        assert!(err.is_registration());
    }
}
