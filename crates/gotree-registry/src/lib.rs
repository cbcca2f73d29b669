//! Symbol storage for the gotree builder.
//!
//! ## Modules
//!
//! - [`entries`]: Named types, functions and scope objects
//! - [`overload`]: Overload groups and the `Name__<index>` naming convention
//! - [`registry`]: [`SymbolRegistry`], the package's types and scope chain
//! - [`scope`]: Block-local scopes with shadowing
//! - [`vfields`]: Virtual field descriptors per aggregate type

pub mod entries;
pub mod overload;
pub mod registry;
pub mod scope;
pub mod vfields;

pub use entries::{FuncEntry, NamedType, Object};
pub use overload::{OverloadGroup, OverloadGroupBuilder, parse_overload_name};
pub use registry::SymbolRegistry;
pub use scope::LocalScope;
pub use vfields::{BitField, FieldDescriptor, OverlapField, VirtualFieldTable, VirtualFields};
