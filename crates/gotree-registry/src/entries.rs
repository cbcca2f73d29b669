//! Entries stored in the registry and its scopes.

use std::sync::Arc;

use gotree_core::{ConstValue, Signature, Type, TypeHash};

use crate::overload::OverloadGroup;

// ============================================================================
// Functions
// ============================================================================

/// A declared function or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncEntry {
    /// Unqualified name as it appears at call sites.
    pub name: String,
    pub hash: TypeHash,
    pub sig: Signature,
}

impl FuncEntry {
    /// A package-level function.
    pub fn function(name: impl Into<String>, sig: Signature) -> Self {
        let name = name.into();
        Self {
            hash: TypeHash::from_function(&name),
            name,
            sig,
        }
    }

    /// A method declared on `owner`.
    pub fn method(owner: TypeHash, name: impl Into<String>, sig: Signature) -> Self {
        let name = name.into();
        Self {
            hash: TypeHash::from_method(owner, &name),
            name,
            sig,
        }
    }

    /// Whether the receiver is a pointer.
    pub fn has_pointer_receiver(&self) -> bool {
        self.sig
            .recv
            .as_ref()
            .is_some_and(|recv| matches!(recv.ty, Type::Pointer(_)))
    }
}

// ============================================================================
// Named types
// ============================================================================

/// A type declared with `type Name ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Unqualified name.
    pub name: String,
    /// `package.Name`
    pub qualified: String,
    pub hash: TypeHash,
    /// `None` between `new_type` and `init_type`.
    pub underlying: Option<Type>,
    /// Methods in declaration order.
    pub methods: Vec<FuncEntry>,
}

impl NamedType {
    pub fn new(package: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        let qualified = format!("{package}.{name}");
        Self {
            hash: TypeHash::from_name(&qualified),
            name,
            qualified,
            underlying: None,
            methods: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&FuncEntry> {
        self.methods.iter().find(|m| m.name == name)
    }
}

// ============================================================================
// Scope objects
// ============================================================================

/// Anything a name can resolve to.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A variable. Addressable.
    Var { ty: Type },
    /// A named constant.
    Const { ty: Type, value: ConstValue },
    Func(FuncEntry),
    /// A type name, usable as a conversion callee.
    TypeName(Type),
    /// Arity-indexed candidates sharing one call-site name.
    Overload(Arc<OverloadGroup>),
}

impl Object {
    pub fn var(ty: Type) -> Self {
        Object::Var { ty }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Object::Var { .. })
    }
}
