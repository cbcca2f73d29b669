//! Block-local scope management.
//!
//! [`LocalScope`] tracks names declared inside function bodies, closures and
//! nested blocks. It handles:
//! - Declaration with redeclaration checks per block
//! - Nested block scopes
//! - Shadowing with restoration on scope exit
//!
//! Package and universe scopes live in [`SymbolRegistry`](crate::SymbolRegistry).

use gotree_core::BuildError;
use rustc_hash::FxHashMap;

use crate::entries::Object;

/// A name visible in some block.
#[derive(Debug, Clone)]
struct LocalEntry {
    object: Object,
    /// Block depth where declared.
    depth: u32,
}

/// Names declared in the currently open blocks.
#[derive(Debug, Default)]
pub struct LocalScope {
    /// Innermost visible declaration per name.
    names: FxHashMap<String, LocalEntry>,

    /// Current block depth (0 = no block open).
    depth: u32,

    /// Declarations hidden by a shadowing one: (shadowing depth, name, entry).
    shadowed: Vec<(u32, String, LocalEntry)>,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a new block.
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave the current block, dropping its declarations and restoring what
    /// they shadowed.
    pub fn pop_scope(&mut self) {
        assert!(self.depth > 0, "pop_scope without a matching push_scope");

        let depth = self.depth;
        self.names.retain(|_, entry| entry.depth < depth);

        while self
            .shadowed
            .last()
            .is_some_and(|(shadowing_depth, _, _)| *shadowing_depth == depth)
        {
            if let Some((_, name, entry)) = self.shadowed.pop() {
                self.names.insert(name, entry);
            }
        }

        self.depth -= 1;
    }

    /// Current block depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    // ==========================================================================
    // Declaration & Lookup
    // ==========================================================================

    /// Declare `name` in the innermost block.
    ///
    /// The blank identifier declares nothing.
    pub fn declare(&mut self, name: &str, object: Object) -> Result<(), BuildError> {
        assert!(self.depth > 0, "local declaration outside of any block");
        if name == "_" {
            return Ok(());
        }

        if let Some(existing) = self.names.get(name) {
            if existing.depth == self.depth {
                return Err(BuildError::Redeclared {
                    name: name.to_string(),
                });
            }
            self.shadowed
                .push((self.depth, name.to_string(), existing.clone()));
        }

        self.names.insert(
            name.to_string(),
            LocalEntry {
                object,
                depth: self.depth,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Object> {
        self.names.get(name).map(|entry| &entry.object)
    }

    /// Whether `name` was declared in the innermost block.
    pub fn declared_in_current(&self, name: &str) -> bool {
        self.names
            .get(name)
            .is_some_and(|entry| entry.depth == self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gotree_core::Type;

    #[test]
    fn declare_and_lookup() {
        let mut scope = LocalScope::new();
        scope.push_scope();
        scope.declare("a", Object::var(Type::INT)).unwrap();
        assert_eq!(scope.lookup("a"), Some(&Object::var(Type::INT)));
        assert!(scope.lookup("b").is_none());
    }

    #[test]
    fn redeclaration_in_same_block_fails() {
        let mut scope = LocalScope::new();
        scope.push_scope();
        scope.declare("a", Object::var(Type::INT)).unwrap();
        let err = scope.declare("a", Object::var(Type::BOOL)).unwrap_err();
        assert_eq!(
            err,
            BuildError::Redeclared {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn shadowing_restored_on_pop() {
        let mut scope = LocalScope::new();
        scope.push_scope();
        scope.declare("a", Object::var(Type::INT)).unwrap();

        scope.push_scope();
        scope.declare("a", Object::var(Type::STRING)).unwrap();
        scope.declare("b", Object::var(Type::BOOL)).unwrap();
        assert_eq!(scope.lookup("a"), Some(&Object::var(Type::STRING)));
        assert!(scope.declared_in_current("a"));

        scope.pop_scope();
        assert_eq!(scope.lookup("a"), Some(&Object::var(Type::INT)));
        assert!(scope.lookup("b").is_none());
        assert_eq!(scope.depth(), 1);
    }

    #[test]
    fn blank_identifier_is_never_declared() {
        let mut scope = LocalScope::new();
        scope.push_scope();
        scope.declare("_", Object::var(Type::INT)).unwrap();
        scope.declare("_", Object::var(Type::INT)).unwrap();
        assert!(scope.lookup("_").is_none());
    }

    #[test]
    #[should_panic(expected = "pop_scope without a matching push_scope")]
    fn unbalanced_pop_panics() {
        let mut scope = LocalScope::new();
        scope.pop_scope();
    }
}
