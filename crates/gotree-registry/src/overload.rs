//! Overload groups.
//!
//! The target language has no overloading. A group binds one call-site name
//! to several ordinary functions, one per argument count; the builder picks
//! the candidate at index `N` for a call with `N` arguments.
//!
//! Groups are normally assembled explicitly with [`OverloadGroup::builder`].
//! [`parse_overload_name`] recognizes the `Name__<index>` convention used when
//! a group's candidates come from existing declarations, where `<index>` is
//! a single base-36 digit (`0`-`9`, `a`-`z`).

use gotree_core::RegistrationError;

use crate::entries::FuncEntry;

/// Separator between the group name and the candidate index.
pub const OVERLOAD_SEPARATOR: &str = "__";

/// Arity-indexed candidates sharing one name. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadGroup {
    name: String,
    candidates: Vec<Option<FuncEntry>>,
}

impl OverloadGroup {
    pub fn builder(name: impl Into<String>) -> OverloadGroupBuilder {
        OverloadGroupBuilder {
            name: name.into(),
            candidates: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The candidate registered at `index`.
    pub fn candidate(&self, index: usize) -> Option<&FuncEntry> {
        self.candidates.get(index).and_then(Option::as_ref)
    }

    /// Registered candidates with their indices, ascending.
    pub fn candidates(&self) -> impl Iterator<Item = (usize, &FuncEntry)> {
        self.candidates
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|f| (i, f)))
    }

    pub fn len(&self) -> usize {
        self.candidates.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects candidates for an [`OverloadGroup`].
#[derive(Debug)]
pub struct OverloadGroupBuilder {
    name: String,
    candidates: Vec<Option<FuncEntry>>,
}

impl OverloadGroupBuilder {
    /// Register `func` as the candidate for calls with `index` arguments.
    ///
    /// # Panics
    ///
    /// If `index` is already taken, or `func` cannot be called with `index`
    /// arguments.
    pub fn candidate(mut self, index: usize, func: FuncEntry) -> Self {
        assert!(
            func.sig.accepts_arg_count(index),
            "overload candidate {} of {} registered at index {index} does not accept {index} argument(s)",
            func.name,
            self.name
        );
        if self.candidates.len() <= index {
            self.candidates.resize(index + 1, None);
        }
        assert!(
            self.candidates[index].is_none(),
            "duplicate overload index {index} in group {}",
            self.name
        );
        self.candidates[index] = Some(func);
        self
    }

    pub fn build(self) -> OverloadGroup {
        OverloadGroup {
            name: self.name,
            candidates: self.candidates,
        }
    }
}

/// Split `Name__<digit>` into the group name and candidate index.
///
/// Returns `Ok(None)` for names that don't use the convention, and an error
/// when the separator is present but the index digit is not base-36.
pub fn parse_overload_name(name: &str) -> Result<Option<(&str, usize)>, RegistrationError> {
    let mut chars = name.char_indices().rev();
    let Some((digit_at, digit)) = chars.next() else {
        return Ok(None);
    };
    let base = &name[..digit_at];
    let Some(group) = base.strip_suffix(OVERLOAD_SEPARATOR) else {
        return Ok(None);
    };
    if group.is_empty() || group.ends_with('_') {
        return Ok(None);
    }

    match decode_index(digit) {
        Some(index) => Ok(Some((group, index))),
        None => Err(RegistrationError::MalformedOverloadName {
            name: name.to_string(),
            reason: format!("'{digit}' is not a base-36 digit"),
        }),
    }
}

fn decode_index(digit: char) -> Option<usize> {
    if digit.is_ascii_digit() || digit.is_ascii_lowercase() {
        digit.to_digit(36).map(|d| d as usize)
    } else {
        None
    }
}
