//! Virtual field synthesis.
//!
//! Rewrites access to a registered virtual field into ordinary expressions
//! over the aggregate's real storage.
//!
//! ## Modules
//!
//! - [`bitfield`]: Shift-and-mask reads, masked read-modify-write stores
//! - [`overlap`]: Reinterpreting pointer views through `unsafe.Pointer`

pub mod bitfield;
pub mod overlap;

pub use bitfield::BitLayout;

use gotree_core::Type;
use gotree_core::ast::Expr;
use gotree_registry::{BitField, FieldDescriptor, OverlapField};

/// An owned copy of a registered descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum VirtualField {
    Bit(BitField),
    Overlap(OverlapField),
}

impl From<FieldDescriptor<'_>> for VirtualField {
    fn from(desc: FieldDescriptor<'_>) -> Self {
        match desc {
            FieldDescriptor::Bit(field) => VirtualField::Bit(field.clone()),
            FieldDescriptor::Overlap(field) => VirtualField::Overlap(field.clone()),
        }
    }
}

/// Where a virtual field was found.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualSite {
    /// Expression denoting the aggregate or a pointer to it. For fields found
    /// through an embedded field this is the embedded selector.
    pub base: Expr,
    /// Static type of `base`.
    pub base_ty: Type,
    /// The named aggregate type declaring the virtual field.
    pub owner: Type,
    /// Whether `base` denotes addressable storage.
    pub addressable: bool,
}
