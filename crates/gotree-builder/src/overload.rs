//! Overload resolution for calls through an overload group.
//!
//! ## Algorithm
//!
//! Candidates are indexed by the argument count they accept. A call with `N`
//! arguments selects the candidate registered at index `N`; there is no
//! ranking or fallback to variadic candidates at other indices. Argument
//! types are checked afterwards against the selected candidate, as for any
//! other call.

use gotree_core::BuildError;
use gotree_registry::{FuncEntry, OverloadGroup};
use tracing::trace;

/// Result of successful overload resolution.
#[derive(Debug, Clone, Copy)]
pub struct OverloadMatch<'g> {
    /// The index the candidate was registered at.
    pub index: usize,
    pub func: &'g FuncEntry,
}

/// Select the candidate of `group` for a call with `arg_count` arguments.
pub fn resolve_overload(
    group: &OverloadGroup,
    arg_count: usize,
) -> Result<OverloadMatch<'_>, BuildError> {
    match group.candidate(arg_count) {
        Some(func) => {
            trace!(
                group = group.name(),
                arg_count,
                candidate = %func.name,
                "overload selected"
            );
            Ok(OverloadMatch {
                index: arg_count,
                func,
            })
        }
        None => Err(BuildError::NoMatchingOverload {
            name: group.name().to_string(),
            arg_count,
        }),
    }
}
