//! SymbolRegistry - one package's types, functions and scope chain.
//!
//! # Storage Model
//!
//! - **Named types**: stored by [`TypeHash`] of their qualified name. A type
//!   is declared first and given its underlying type later, so declarations
//!   can refer to each other.
//! - **Methods**: kept on their [`NamedType`] in declaration order.
//! - **Names**: a three-level chain. Block-local names live in a
//!   [`LocalScope`], package-level names and the predeclared universe in flat
//!   maps. Lookup walks innermost to outermost.
//! - **Virtual fields**: a [`VirtualFieldTable`] validated against the struct
//!   definitions held here.
//!
//! # Example
//!
//! ```
//! use gotree_core::{Field, StructType, Type};
//! use gotree_registry::{BitField, SymbolRegistry};
//!
//! let mut registry = SymbolRegistry::new("main", 8);
//! let t = registry.declare_type("T").unwrap();
//! registry
//!     .init_type(t, Type::Struct(StructType::new(vec![Field::new("x", Type::INT)])))
//!     .unwrap();
//! registry
//!     .register_bitfields(&Type::Named(t), vec![BitField::new("z1", "x", 0, 1)])
//!     .unwrap();
//! assert!(registry.vfields().find(t, "z1").is_some());
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

use gotree_core::{
    BasicKind, BuildError, ConstValue, RegistrationError, Signature, StructType, Type, TypeHash,
};

use crate::entries::{FuncEntry, NamedType, Object};
use crate::overload::{OverloadGroup, parse_overload_name};
use crate::scope::LocalScope;
use crate::vfields::{BitField, OverlapField, VirtualFieldTable, VirtualFields};

/// Predeclared type names.
const UNIVERSE_TYPES: &[&str] = &[
    "bool", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
    "uint64", "uintptr", "float32", "float64", "string", "byte", "rune",
];

/// Types, methods and names of one package.
#[derive(Debug)]
pub struct SymbolRegistry {
    package: String,
    /// Size of `int`, `uint`, `uintptr` and pointers, in bytes.
    word_size: u32,

    types: FxHashMap<TypeHash, NamedType>,

    universe: FxHashMap<String, Object>,
    package_scope: FxHashMap<String, Object>,
    /// Package-level names in declaration order.
    package_order: Vec<String>,
    locals: LocalScope,

    vfields: VirtualFieldTable,
}

impl SymbolRegistry {
    /// Create a registry for `package` with the universe scope populated.
    pub fn new(package: impl Into<String>, word_size: u32) -> Self {
        let mut universe = FxHashMap::default();
        for name in UNIVERSE_TYPES {
            if let Some(kind) = BasicKind::from_name(name) {
                universe.insert(name.to_string(), Object::TypeName(Type::Basic(kind)));
            }
        }
        for (name, value) in [("true", true), ("false", false)] {
            universe.insert(
                name.to_string(),
                Object::Const {
                    ty: Type::Basic(BasicKind::UntypedBool),
                    value: ConstValue::Bool(value),
                },
            );
        }

        Self {
            package: package.into(),
            word_size,
            types: FxHashMap::default(),
            universe,
            package_scope: FxHashMap::default(),
            package_order: Vec::new(),
            locals: LocalScope::new(),
            vfields: VirtualFieldTable::new(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn word_size(&self) -> u32 {
        self.word_size
    }

    // ==========================================================================
    // Named Types
    // ==========================================================================

    /// Declare `type name`; the underlying type is set by [`init_type`](Self::init_type).
    pub fn declare_type(&mut self, name: &str) -> Result<TypeHash, RegistrationError> {
        if self.package_scope.contains_key(name) {
            return Err(RegistrationError::DuplicateType(format!(
                "{}.{name}",
                self.package
            )));
        }
        let named = NamedType::new(&self.package, name);
        let hash = named.hash;
        self.types.insert(hash, named);
        self.insert_package_name(name, Object::TypeName(Type::Named(hash)));
        Ok(hash)
    }

    /// Set the underlying type of a declared type.
    ///
    /// A named underlying type is resolved to its own underlying type.
    pub fn init_type(&mut self, hash: TypeHash, underlying: Type) -> Result<(), RegistrationError> {
        let resolved = match &underlying {
            Type::Named(other) => self
                .types
                .get(other)
                .and_then(|t| t.underlying.clone())
                .ok_or_else(|| RegistrationError::TypeNotFound(other.to_string()))?,
            _ => underlying,
        };
        let named = self
            .types
            .get_mut(&hash)
            .ok_or_else(|| RegistrationError::TypeNotFound(hash.to_string()))?;
        named.underlying = Some(resolved);
        Ok(())
    }

    pub fn named(&self, hash: TypeHash) -> Option<&NamedType> {
        self.types.get(&hash)
    }

    /// Resolve a type name visible at package level.
    pub fn lookup_type(&self, name: &str) -> Option<Type> {
        match self.package_scope.get(name).or_else(|| self.universe.get(name)) {
            Some(Object::TypeName(ty)) => Some(ty.clone()),
            _ => None,
        }
    }

    /// The underlying type; non-named types are their own underlying type.
    pub fn underlying<'a>(&'a self, ty: &'a Type) -> &'a Type {
        match ty {
            Type::Named(hash) => self
                .types
                .get(hash)
                .and_then(|t| t.underlying.as_ref())
                .unwrap_or(ty),
            _ => ty,
        }
    }

    /// The struct behind `ty`, looking through names.
    pub fn struct_of<'a>(&'a self, ty: &'a Type) -> Option<&'a StructType> {
        match self.underlying(ty) {
            Type::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Bit width of an integer type, looking through names.
    pub fn integer_bits(&self, ty: &Type) -> Option<u32> {
        match self.underlying(ty) {
            Type::Basic(kind) if kind.is_integer() && !kind.is_untyped() => {
                kind.bit_width(self.word_size)
            }
            _ => None,
        }
    }

    /// Whether `ty` is an unsigned integer type, looking through names.
    pub fn is_unsigned(&self, ty: &Type) -> bool {
        self.underlying(ty)
            .as_basic()
            .is_some_and(BasicKind::is_unsigned)
    }

    // ==========================================================================
    // Methods
    // ==========================================================================

    /// Declare a method on a named type.
    pub fn add_method(
        &mut self,
        owner: TypeHash,
        name: &str,
        sig: Signature,
    ) -> Result<TypeHash, RegistrationError> {
        let field_clash = self
            .types
            .get(&owner)
            .and_then(|t| t.underlying.as_ref())
            .and_then(|u| match u {
                Type::Struct(st) => st.field(name),
                _ => None,
            })
            .is_some();

        let named = self
            .types
            .get_mut(&owner)
            .ok_or_else(|| RegistrationError::TypeNotFound(owner.to_string()))?;
        if field_clash || named.method(name).is_some() {
            return Err(RegistrationError::DuplicateMethod {
                type_name: named.qualified.clone(),
                method: name.to_string(),
            });
        }
        let entry = FuncEntry::method(owner, name, sig);
        let hash = entry.hash;
        named.methods.push(entry);
        Ok(hash)
    }

    /// Find a method declared directly on `owner`.
    pub fn method(&self, owner: TypeHash, name: &str) -> Option<&FuncEntry> {
        self.types.get(&owner)?.method(name)
    }

    // ==========================================================================
    // Virtual Fields
    // ==========================================================================

    pub fn vfields(&self) -> &VirtualFieldTable {
        &self.vfields
    }

    /// Validate and install bitfields on the struct type `owner`.
    ///
    /// # Panics
    ///
    /// If `owner` already has virtual fields.
    pub fn register_bitfields(
        &mut self,
        owner: &Type,
        fields: Vec<BitField>,
    ) -> Result<(), RegistrationError> {
        let (hash, st) = self.virtual_owner(owner)?;
        for field in &fields {
            let (_, storage) = st.field(&field.storage_field).ok_or_else(|| {
                RegistrationError::FieldNotFound {
                    type_name: self.type_name(owner),
                    field: field.storage_field.clone(),
                }
            })?;
            let storage_bits =
                self.integer_bits(&storage.ty)
                    .ok_or_else(|| RegistrationError::NotAnInteger {
                        type_name: self.type_name(owner),
                        field: field.storage_field.clone(),
                    })?;
            let end = field.offset.checked_add(field.width);
            if field.width == 0 || end.is_none_or(|end| end > storage_bits) {
                return Err(RegistrationError::BitRangeOverflow {
                    name: field.name.clone(),
                    offset: field.offset,
                    width: field.width,
                    storage_bits,
                });
            }
        }
        self.vfields.insert(hash, VirtualFields::Bitfields(fields));
        Ok(())
    }

    /// Validate and install overlap fields on the struct type `owner`.
    ///
    /// # Panics
    ///
    /// If `owner` already has virtual fields.
    pub fn register_overlap_fields(
        &mut self,
        owner: &Type,
        fields: Vec<OverlapField>,
    ) -> Result<(), RegistrationError> {
        let (hash, _) = self.virtual_owner(owner)?;
        let aggregate_size = self
            .size_of(owner)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.type_name(owner)))?;
        for field in &fields {
            let size = self
                .size_of(&field.ty)
                .ok_or_else(|| RegistrationError::TypeNotFound(self.type_name(&field.ty)))?;
            if field.offset.checked_add(size).is_none_or(|end| end > aggregate_size) {
                return Err(RegistrationError::OverlapOutOfBounds {
                    name: field.name.clone(),
                    offset: field.offset,
                    size,
                    aggregate_size,
                });
            }
        }
        self.vfields.insert(hash, VirtualFields::Overlap(fields));
        Ok(())
    }

    fn virtual_owner<'a>(
        &'a self,
        owner: &'a Type,
    ) -> Result<(TypeHash, &'a StructType), RegistrationError> {
        let hash = owner
            .named_hash()
            .ok_or_else(|| RegistrationError::NotAStruct(self.type_name(owner)))?;
        if !self.types.contains_key(&hash) {
            return Err(RegistrationError::TypeNotFound(hash.to_string()));
        }
        assert!(
            !self.vfields.contains(hash),
            "virtual fields of {} registered twice",
            self.type_name(owner)
        );
        let st = self
            .struct_of(owner)
            .ok_or_else(|| RegistrationError::NotAStruct(self.type_name(owner)))?;
        Ok((hash, st))
    }

    // ==========================================================================
    // Scope Chain
    // ==========================================================================

    /// Enter a function body or nested block.
    pub fn push_scope(&mut self) {
        self.locals.push_scope();
    }

    /// Leave the innermost block.
    pub fn pop_scope(&mut self) {
        self.locals.pop_scope();
    }

    /// Number of open blocks.
    pub fn local_depth(&self) -> u32 {
        self.locals.depth()
    }

    /// Declare `name` in the innermost open block, or at package level when
    /// no block is open.
    pub fn declare(&mut self, name: &str, object: Object) -> Result<(), BuildError> {
        if self.locals.depth() > 0 {
            self.locals.declare(name, object)
        } else {
            self.declare_package(name, object)
        }
    }

    /// Declare `name` at package level.
    pub fn declare_package(&mut self, name: &str, object: Object) -> Result<(), BuildError> {
        if name == "_" {
            return Ok(());
        }
        if self.package_scope.contains_key(name) {
            return Err(BuildError::Redeclared {
                name: name.to_string(),
            });
        }
        self.insert_package_name(name, object);
        Ok(())
    }

    fn insert_package_name(&mut self, name: &str, object: Object) {
        self.package_order.push(name.to_string());
        self.package_scope.insert(name.to_string(), object);
    }

    /// Whether `name` is declared in the innermost open block, or at package
    /// level when no block is open.
    pub fn declared_here(&self, name: &str) -> bool {
        if self.locals.depth() > 0 {
            self.locals.declared_in_current(name)
        } else {
            self.package_scope.contains_key(name)
        }
    }

    /// Resolve `name` innermost block first, then package, then universe.
    pub fn lookup(&self, name: &str) -> Option<&Object> {
        self.locals
            .lookup(name)
            .or_else(|| self.package_scope.get(name))
            .or_else(|| self.universe.get(name))
    }

    // ==========================================================================
    // Overload Groups
    // ==========================================================================

    /// Bind a group's name at package level.
    pub fn insert_overload_group(&mut self, group: OverloadGroup) -> Result<(), BuildError> {
        let name = group.name().to_string();
        self.declare_package(&name, Object::Overload(Arc::new(group)))
    }

    /// Group package functions named `Name__<index>` under `Name`.
    ///
    /// Returns the number of groups created. Names already bound at package
    /// level are left alone.
    pub fn collect_overloads(&mut self) -> Result<usize, RegistrationError> {
        let mut groups: Vec<(String, Vec<(usize, FuncEntry)>)> = Vec::new();

        for name in &self.package_order {
            let Some(Object::Func(func)) = self.package_scope.get(name) else {
                continue;
            };
            let Some((base, index)) = parse_overload_name(name)? else {
                continue;
            };
            if !func.sig.accepts_arg_count(index) {
                return Err(RegistrationError::MalformedOverloadName {
                    name: name.clone(),
                    reason: format!("candidate does not accept {index} argument(s)"),
                });
            }
            match groups.iter_mut().find(|(g, _)| g == base) {
                Some((_, members)) => members.push((index, func.clone())),
                None => groups.push((base.to_string(), vec![(index, func.clone())])),
            }
        }

        let mut created = 0;
        for (base, members) in groups {
            if self.package_scope.contains_key(&base) {
                continue;
            }
            let group = members
                .into_iter()
                .fold(OverloadGroup::builder(&base), |b, (index, func)| {
                    b.candidate(index, func)
                })
                .build();
            self.insert_package_name(&base, Object::Overload(Arc::new(group)));
            created += 1;
        }
        Ok(created)
    }

    // ==========================================================================
    // Type Queries
    // ==========================================================================

    /// Human-readable type name, package-qualified for named types.
    pub fn type_name(&self, ty: &Type) -> String {
        match ty {
            Type::Basic(kind) => kind.to_string(),
            Type::Named(hash) => self
                .types
                .get(hash)
                .map(|t| t.qualified.clone())
                .unwrap_or_else(|| hash.to_string()),
            Type::Pointer(elem) => format!("*{}", self.type_name(elem)),
            Type::Slice(elem) => format!("[]{}", self.type_name(elem)),
            Type::Struct(st) => {
                let fields: Vec<String> = st
                    .fields
                    .iter()
                    .map(|f| {
                        if f.embedded {
                            self.type_name(&f.ty)
                        } else {
                            format!("{} {}", f.name, self.type_name(&f.ty))
                        }
                    })
                    .collect();
                format!("struct{{{}}}", fields.join("; "))
            }
            Type::Signature(sig) => self.signature_name(sig),
            Type::Tuple(items) => {
                let items: Vec<String> = items.iter().map(|t| self.type_name(t)).collect();
                format!("({})", items.join(", "))
            }
        }
    }

    fn signature_name(&self, sig: &Signature) -> String {
        let last = sig.params.len().saturating_sub(1);
        let params: Vec<String> = sig
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| match (&p.ty, sig.variadic && i == last) {
                (Type::Slice(elem), true) => format!("...{}", self.type_name(elem)),
                (ty, _) => self.type_name(ty),
            })
            .collect();
        let results = match sig.results.as_slice() {
            [] => String::new(),
            [single] => format!(" {}", self.type_name(&single.ty)),
            many => {
                let items: Vec<String> = many.iter().map(|p| self.type_name(&p.ty)).collect();
                format!(" ({})", items.join(", "))
            }
        };
        format!("func({}){results}", params.join(", "))
    }

    /// Size in bytes, `None` for types without a memory layout.
    pub fn size_of(&self, ty: &Type) -> Option<u32> {
        let word = self.word_size;
        match self.underlying(ty) {
            Type::Basic(kind) => kind.size(word),
            Type::Pointer(_) | Type::Signature(_) => Some(word),
            Type::Slice(_) => Some(word * 3),
            Type::Struct(st) => {
                let mut offset = 0;
                let mut max_align = 1;
                for field in &st.fields {
                    let align = self.align_of(&field.ty)?;
                    offset = align_up(offset, align) + self.size_of(&field.ty)?;
                    max_align = max_align.max(align);
                }
                Some(align_up(offset, max_align))
            }
            Type::Named(_) | Type::Tuple(_) => None,
        }
    }

    /// Alignment in bytes.
    pub fn align_of(&self, ty: &Type) -> Option<u32> {
        let word = self.word_size;
        match self.underlying(ty) {
            Type::Basic(BasicKind::String) => Some(word),
            Type::Basic(kind) => kind.size(word).map(|size| size.min(word)),
            Type::Pointer(_) | Type::Signature(_) | Type::Slice(_) => Some(word),
            Type::Struct(st) => st
                .fields
                .iter()
                .try_fold(1, |acc, f| self.align_of(&f.ty).map(|a| acc.max(a))),
            Type::Named(_) | Type::Tuple(_) => None,
        }
    }
}

fn align_up(offset: u32, align: u32) -> u32 {
    offset.div_ceil(align) * align
}
