//! Virtual Field Table.
//!
//! Struct types may declare synthetic fields that the builder rewrites into
//! ordinary expressions on access:
//!
//! - **Bitfields** pack several narrow integers into one integer storage
//!   field.
//! - **Overlap fields** view the aggregate's bytes as another type, the way a
//!   C union does.
//!
//! A type carries one kind or the other, never both. The table is filled once
//! per type during registration and only read afterwards. Validation against
//! the struct definition happens in
//! [`SymbolRegistry::register_bitfields`](crate::SymbolRegistry::register_bitfields).

use gotree_core::{Type, TypeHash};
use rustc_hash::FxHashMap;

/// A packed sub-word field: bits `[offset, offset + width)` of `storage_field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitField {
    pub name: String,
    pub storage_field: String,
    pub offset: u32,
    pub width: u32,
}

impl BitField {
    pub fn new(name: impl Into<String>, storage_field: impl Into<String>, offset: u32, width: u32) -> Self {
        Self {
            name: name.into(),
            storage_field: storage_field.into(),
            offset,
            width,
        }
    }
}

/// A view of the aggregate's bytes at `offset` as `ty`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlapField {
    pub name: String,
    pub ty: Type,
    /// Byte offset from the start of the aggregate.
    pub offset: u32,
}

impl OverlapField {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            offset: 0,
        }
    }

    pub fn at(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// The virtual fields of one aggregate, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualFields {
    Bitfields(Vec<BitField>),
    Overlap(Vec<OverlapField>),
}

/// A single resolved virtual field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDescriptor<'a> {
    Bit(&'a BitField),
    Overlap(&'a OverlapField),
}

impl FieldDescriptor<'_> {
    pub fn name(&self) -> &str {
        match self {
            FieldDescriptor::Bit(field) => &field.name,
            FieldDescriptor::Overlap(field) => &field.name,
        }
    }
}

impl VirtualFields {
    pub fn find(&self, name: &str) -> Option<FieldDescriptor<'_>> {
        match self {
            VirtualFields::Bitfields(fields) => fields
                .iter()
                .find(|f| f.name == name)
                .map(FieldDescriptor::Bit),
            VirtualFields::Overlap(fields) => fields
                .iter()
                .find(|f| f.name == name)
                .map(FieldDescriptor::Overlap),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VirtualFields::Bitfields(fields) => fields.len(),
            VirtualFields::Overlap(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aggregate type -> its virtual fields.
#[derive(Debug, Default)]
pub struct VirtualFieldTable {
    entries: FxHashMap<TypeHash, VirtualFields>,
}

impl VirtualFieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the virtual fields of `owner`.
    ///
    /// # Panics
    ///
    /// If `owner` already has virtual fields.
    pub fn insert(&mut self, owner: TypeHash, fields: VirtualFields) {
        assert!(
            !self.entries.contains_key(&owner),
            "virtual fields of {owner} registered twice"
        );
        self.entries.insert(owner, fields);
    }

    pub fn contains(&self, owner: TypeHash) -> bool {
        self.entries.contains_key(&owner)
    }

    pub fn get(&self, owner: TypeHash) -> Option<&VirtualFields> {
        self.entries.get(&owner)
    }

    /// Find the virtual field `name` of `owner`.
    pub fn find(&self, owner: TypeHash, name: &str) -> Option<FieldDescriptor<'_>> {
        self.entries.get(&owner)?.find(name)
    }
}
