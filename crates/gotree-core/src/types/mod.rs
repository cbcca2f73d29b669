//! The static type model the builder checks expressions against.
//!
//! Types are plain values. Named types are referenced by [`TypeHash`] and
//! resolved to their underlying type through the registry, so `Type` stays
//! cheap to clone and can describe recursive structures.

mod basic;

pub use basic::{BasicInfo, BasicKind};

use crate::TypeHash;

/// A static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A predeclared or untyped kind.
    Basic(BasicKind),
    /// A declared type, resolved through the registry.
    Named(TypeHash),
    /// `*T`
    Pointer(Box<Type>),
    /// `[]T`
    Slice(Box<Type>),
    /// `struct { ... }`
    Struct(StructType),
    /// `func(...) ...`
    Signature(Signature),
    /// Multiple results of a call. The empty tuple is the type of a void call.
    Tuple(Vec<Type>),
}

impl Type {
    pub const INT: Type = Type::Basic(BasicKind::Int);
    pub const UINT: Type = Type::Basic(BasicKind::Uint);
    pub const BOOL: Type = Type::Basic(BasicKind::Bool);
    pub const STRING: Type = Type::Basic(BasicKind::String);
    pub const FLOAT32: Type = Type::Basic(BasicKind::Float32);
    pub const FLOAT64: Type = Type::Basic(BasicKind::Float64);
    pub const UINTPTR: Type = Type::Basic(BasicKind::Uintptr);
    pub const UNSAFE_POINTER: Type = Type::Basic(BasicKind::UnsafePointer);

    /// The type of a call to a function without results.
    pub const fn void() -> Type {
        Type::Tuple(Vec::new())
    }

    /// `*elem`
    pub fn pointer_to(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    /// `[]elem`
    pub fn slice_of(elem: Type) -> Type {
        Type::Slice(Box::new(elem))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Tuple(items) if items.is_empty())
    }

    pub fn as_basic(&self) -> Option<BasicKind> {
        match self {
            Type::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_untyped(&self) -> bool {
        self.as_basic().is_some_and(BasicKind::is_untyped)
    }

    /// Element type of a pointer.
    pub fn pointer_elem(&self) -> Option<&Type> {
        match self {
            Type::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    /// Named type hash, if this is a named type.
    pub fn named_hash(&self) -> Option<TypeHash> {
        match self {
            Type::Named(hash) => Some(*hash),
            _ => None,
        }
    }

    /// Replace untyped kinds with their default type.
    pub fn defaulted(&self) -> Type {
        match self {
            Type::Basic(kind) => Type::Basic(kind.default_type()),
            other => other.clone(),
        }
    }
}

impl From<BasicKind> for Type {
    fn from(kind: BasicKind) -> Self {
        Type::Basic(kind)
    }
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name. For embedded fields this is the embedded type's name.
    pub name: String,
    pub ty: Type,
    /// Whether the field is embedded (anonymous).
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    pub fn embedded(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: true,
        }
    }
}

/// `struct { fields }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructType {
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Find a declared (non-promoted) field by name.
    pub fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Embedded fields in declaration order.
    pub fn embedded_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.embedded)
    }
}

/// A function parameter or result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// A parameter without a name.
    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}

/// A function signature.
///
/// When `variadic` is set the last parameter has a slice type and accepts any
/// number of trailing arguments of its element type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    pub recv: Option<Box<Param>>,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Param>, results: Vec<Param>, variadic: bool) -> Self {
        Self {
            recv: None,
            params,
            results,
            variadic,
        }
    }

    pub fn with_recv(mut self, recv: Param) -> Self {
        self.recv = Some(Box::new(recv));
        self
    }

    /// Whether `n` call-site arguments fit this parameter list.
    pub fn accepts_arg_count(&self, n: usize) -> bool {
        if self.variadic {
            n + 1 >= self.params.len()
        } else {
            n == self.params.len()
        }
    }

    /// Type expected for the argument at `index`, expanding the variadic tail.
    pub fn param_type_at(&self, index: usize) -> Option<&Type> {
        let last = self.params.len().checked_sub(1)?;
        if self.variadic && index >= last {
            match &self.params[last].ty {
                Type::Slice(elem) => Some(elem),
                other => Some(other),
            }
        } else {
            self.params.get(index).map(|p| &p.ty)
        }
    }

    /// Type of a call: void, a single result, or a tuple.
    pub fn result_type(&self) -> Type {
        match self.results.as_slice() {
            [single] => single.ty.clone(),
            many => Type::Tuple(many.iter().map(|p| p.ty.clone()).collect()),
        }
    }
}
