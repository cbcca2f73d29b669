//! Member selection: `x.name`.
//!
//! ## Lookup order
//!
//! 1. A declared field of the (pointed-to) struct.
//! 2. A method of the named type.
//! 3. A field or method promoted from an embedded field, one level deep.
//! 4. A virtual field registered for the named type.
//! 5. A virtual field registered for the type of an embedded field.
//!
//! Virtual fields are rewritten into expressions over real storage, see
//! [`crate::vfields`].

use gotree_core::ast::Expr;
use gotree_core::{BuildError, Field, Type};
use gotree_registry::{BitField, FuncEntry, OverlapField};
use tracing::trace;

use crate::builder::{CodeBuilder, Result};
use crate::emit::DeclarationEmitter;
use crate::operand::{BitTarget, Operand, Target};
use crate::vfields::bitfield::{self, BitLayout};
use crate::vfields::overlap::{self, UNSAFE_PACKAGE};
use crate::vfields::{VirtualField, VirtualSite};

/// What a selector resolved to.
enum Selection {
    Field { ty: Type, addressable: bool },
    Method(FuncEntry),
    Virtual { site: VirtualSite, field: VirtualField },
}

impl<E: DeclarationEmitter> CodeBuilder<E> {
    /// Replace the operand on top with its member `name`, read as a value.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn member_val(&mut self, name: &str) -> Result<&mut Self> {
        self.assert_operands(1, "member_val");
        let base = &self.stack.top(1)[0];
        let selection = self.select(base, name)?;

        let (operand, uses_unsafe) = match selection {
            Selection::Field { ty, addressable } => {
                let expr = Expr::selector(base.expr.clone(), name);
                let operand = if addressable {
                    Operand::addressable(expr, ty)
                } else {
                    Operand::value(expr, ty)
                };
                (operand, false)
            }
            Selection::Method(method) => {
                let mut sig = method.sig.clone();
                sig.recv = None;
                let expr = Expr::selector(base.expr.clone(), name);
                (Operand::value(expr, Type::Signature(sig)), false)
            }
            Selection::Virtual {
                site,
                field: VirtualField::Bit(field),
            } => {
                let (layout, storage_ty) = self.bit_layout(&site, &field)?;
                let storage = Expr::selector(site.base.clone(), field.storage_field.clone());
                trace!(
                    owner = %self.type_name(&site.owner),
                    field = name,
                    offset = layout.offset,
                    width = layout.width,
                    "bitfield read synthesized"
                );
                let expr = bitfield::read_expr(storage, &layout);
                (Operand::value(expr, storage_ty), false)
            }
            Selection::Virtual {
                site,
                field: VirtualField::Overlap(field),
            } => {
                let view = self.overlap_view(&site, &field)?;
                (Operand::addressable(view, field.ty.clone()), true)
            }
        };

        if uses_unsafe {
            self.emitter.require_import(UNSAFE_PACKAGE);
        }
        self.stack.replace(1, operand);
        Ok(self)
    }

    /// Replace the operand on top with its member `name` as a write target.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn member_ref(&mut self, name: &str) -> Result<&mut Self> {
        self.assert_operands(1, "member_ref");
        let base = &self.stack.top(1)[0];
        let selection = self.select(base, name)?;

        let (operand, uses_unsafe) = match selection {
            Selection::Field { ty, addressable } => {
                if !addressable {
                    return Err(BuildError::invalid_operation(format!(
                        "cannot assign to field {name} of non-addressable {} value",
                        self.type_name(&base.ty)
                    )));
                }
                let expr = Expr::selector(base.expr.clone(), name);
                (Operand::target(expr, ty, Target::Plain), false)
            }
            Selection::Method(_) => {
                return Err(BuildError::invalid_operation(format!(
                    "cannot assign to method {name}"
                )));
            }
            Selection::Virtual {
                site,
                field: VirtualField::Bit(field),
            } => {
                let through_pointer = matches!(
                    self.registry.underlying(&site.base_ty),
                    Type::Pointer(_)
                );
                if !site.addressable && !through_pointer {
                    return Err(BuildError::invalid_operation(format!(
                        "cannot assign to bitfield {name} of non-addressable {} value",
                        self.type_name(&site.base_ty)
                    )));
                }
                let (layout, storage_ty) = self.bit_layout(&site, &field)?;
                let storage = Expr::selector(site.base.clone(), field.storage_field.clone());
                let target = Target::Bitfield(BitTarget {
                    storage: storage.clone(),
                    layout,
                });
                (Operand::target(storage, storage_ty, target), false)
            }
            Selection::Virtual {
                site,
                field: VirtualField::Overlap(field),
            } => {
                let view = self.overlap_view(&site, &field)?;
                (
                    Operand::target(view, field.ty.clone(), Target::Overlap),
                    true,
                )
            }
        };

        if uses_unsafe {
            self.emitter.require_import(UNSAFE_PACKAGE);
        }
        self.stack.replace(1, operand);
        Ok(self)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// `ty`, or its element and `true` when it is a pointer.
    fn deref_type(&self, ty: &Type) -> (Type, bool) {
        match self.registry.underlying(ty) {
            Type::Pointer(elem) => ((**elem).clone(), true),
            _ => (ty.clone(), false),
        }
    }

    fn select(&self, base: &Operand, name: &str) -> Result<Selection> {
        if !base.can_select() {
            self.require_value(base)?;
        }

        let (elem, via_pointer) = self.deref_type(&base.ty);
        let addressable = via_pointer || base.is_addressable();
        let st = self.registry.struct_of(&elem);

        if let Some((_, field)) = st.and_then(|st| st.field(name)) {
            return Ok(Selection::Field {
                ty: field.ty.clone(),
                addressable,
            });
        }

        if let Some(method) = elem.named_hash().and_then(|h| self.registry.method(h, name)) {
            if method.has_pointer_receiver() && !addressable {
                return Err(BuildError::invalid_operation(format!(
                    "cannot call pointer method {name} on {}",
                    self.type_name(&base.ty)
                )));
            }
            return Ok(Selection::Method(method.clone()));
        }

        let embedded: Vec<&Field> = st
            .map(|st| st.embedded_fields().collect())
            .unwrap_or_default();

        let mut promoted = Vec::new();
        for emb in &embedded {
            let (emb_elem, emb_pointer) = self.deref_type(&emb.ty);
            let reachable = addressable || emb_pointer;
            if let Some((_, field)) = self
                .registry
                .struct_of(&emb_elem)
                .and_then(|st| st.field(name))
            {
                promoted.push(Selection::Field {
                    ty: field.ty.clone(),
                    addressable: reachable,
                });
            } else if let Some(method) = emb_elem
                .named_hash()
                .and_then(|h| self.registry.method(h, name))
                && (reachable || !method.has_pointer_receiver())
            {
                promoted.push(Selection::Method(method.clone()));
            }
        }
        if let Some(selection) = self.single(promoted, name)? {
            return Ok(selection);
        }

        if let Some(field) = elem
            .named_hash()
            .and_then(|h| self.registry.vfields().find(h, name))
        {
            return Ok(Selection::Virtual {
                site: VirtualSite {
                    base: base.expr.clone(),
                    base_ty: base.ty.clone(),
                    owner: elem.clone(),
                    addressable,
                },
                field: field.into(),
            });
        }

        let mut found = Vec::new();
        for emb in &embedded {
            let (emb_elem, _) = self.deref_type(&emb.ty);
            if let Some(field) = emb_elem
                .named_hash()
                .and_then(|h| self.registry.vfields().find(h, name))
            {
                found.push(Selection::Virtual {
                    site: VirtualSite {
                        base: Expr::selector(base.expr.clone(), emb.name.clone()),
                        base_ty: emb.ty.clone(),
                        owner: emb_elem.clone(),
                        addressable,
                    },
                    field: field.into(),
                });
            }
        }
        if let Some(selection) = self.single(found, name)? {
            return Ok(selection);
        }

        Err(BuildError::UnknownMember {
            member: name.to_string(),
            type_name: self.type_name(&base.ty),
        })
    }

    /// The only candidate found at one lookup depth.
    fn single(&self, mut found: Vec<Selection>, name: &str) -> Result<Option<Selection>> {
        if found.len() > 1 {
            return Err(BuildError::invalid_operation(format!(
                "ambiguous selector {name}"
            )));
        }
        Ok(found.pop())
    }

    // ==========================================================================
    // Virtual fields
    // ==========================================================================

    fn bit_layout(&self, site: &VirtualSite, field: &BitField) -> Result<(BitLayout, Type)> {
        let storage_ty = self
            .registry
            .struct_of(&site.owner)
            .and_then(|st| st.field(&field.storage_field))
            .map(|(_, f)| f.ty.clone());
        let Some(storage_ty) = storage_ty else {
            return Err(BuildError::invalid_operation(format!(
                "bitfield storage {} missing from {}",
                field.storage_field,
                self.type_name(&site.owner)
            )));
        };
        let Some(storage_bits) = self.registry.integer_bits(&storage_ty) else {
            return Err(BuildError::invalid_operation(format!(
                "bitfield storage {} is not an integer",
                field.storage_field
            )));
        };
        let layout = BitLayout {
            offset: field.offset,
            width: field.width,
            storage_bits,
            unsigned: self.registry.is_unsigned(&storage_ty),
        };
        Ok((layout, storage_ty))
    }

    fn overlap_view(&self, site: &VirtualSite, field: &OverlapField) -> Result<Expr> {
        let addr = overlap::address_of(&self.registry, site)?;
        trace!(
            owner = %self.type_name(&site.owner),
            field = %field.name,
            offset = field.offset,
            "overlap view synthesized"
        );
        Ok(overlap::view_expr(&self.registry, addr, field))
    }
}
