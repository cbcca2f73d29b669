//! Basic (predeclared) type kinds and their classification flags.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Properties of a basic type, used by the type oracle to decide which
    /// operators apply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BasicInfo: u16 {
        /// `bool` and untyped booleans.
        const BOOLEAN = 1 << 0;
        /// All signed and unsigned integers, including untyped ints and runes.
        const INTEGER = 1 << 1;
        /// Unsigned integers.
        const UNSIGNED = 1 << 2;
        /// Floating point numbers.
        const FLOAT = 1 << 3;
        /// Strings.
        const STRING = 1 << 4;
        /// Untyped constants.
        const UNTYPED = 1 << 5;

        /// Types supporting `<`, `<=`, `>`, `>=`.
        const ORDERED = Self::INTEGER.bits() | Self::FLOAT.bits() | Self::STRING.bits();
        /// Types supporting arithmetic.
        const NUMERIC = Self::INTEGER.bits() | Self::FLOAT.bits();
        /// Types a constant may have.
        const CONST_TYPE = Self::BOOLEAN.bits() | Self::NUMERIC.bits() | Self::STRING.bits();
    }
}

/// Predeclared types, plus the untyped kinds constants carry until they are
/// assigned a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    String,
    UnsafePointer,

    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    /// Classification flags for this kind.
    pub const fn info(self) -> BasicInfo {
        use BasicKind::*;
        match self {
            Bool => BasicInfo::BOOLEAN,
            Int | Int8 | Int16 | Int32 | Int64 => BasicInfo::INTEGER,
            Uint | Uint8 | Uint16 | Uint32 | Uint64 | Uintptr => {
                BasicInfo::INTEGER.union(BasicInfo::UNSIGNED)
            }
            Float32 | Float64 => BasicInfo::FLOAT,
            String => BasicInfo::STRING,
            UnsafePointer => BasicInfo::empty(),
            UntypedBool => BasicInfo::BOOLEAN.union(BasicInfo::UNTYPED),
            UntypedInt | UntypedRune => BasicInfo::INTEGER.union(BasicInfo::UNTYPED),
            UntypedFloat => BasicInfo::FLOAT.union(BasicInfo::UNTYPED),
            UntypedString => BasicInfo::STRING.union(BasicInfo::UNTYPED),
            UntypedNil => BasicInfo::UNTYPED,
        }
    }

    /// The spelling used in source. Untyped kinds return a descriptive name.
    pub const fn name(self) -> &'static str {
        use BasicKind::*;
        match self {
            Bool => "bool",
            Int => "int",
            Int8 => "int8",
            Int16 => "int16",
            Int32 => "int32",
            Int64 => "int64",
            Uint => "uint",
            Uint8 => "uint8",
            Uint16 => "uint16",
            Uint32 => "uint32",
            Uint64 => "uint64",
            Uintptr => "uintptr",
            Float32 => "float32",
            Float64 => "float64",
            String => "string",
            UnsafePointer => "Pointer",
            UntypedBool => "untyped bool",
            UntypedInt => "untyped int",
            UntypedRune => "untyped rune",
            UntypedFloat => "untyped float",
            UntypedString => "untyped string",
            UntypedNil => "untyped nil",
        }
    }

    /// Look up a predeclared type by its source spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        use BasicKind::*;
        let kind = match name {
            "bool" => Bool,
            "int" => Int,
            "int8" => Int8,
            "int16" => Int16,
            "int32" | "rune" => Int32,
            "int64" => Int64,
            "uint" => Uint,
            "uint8" | "byte" => Uint8,
            "uint16" => Uint16,
            "uint32" => Uint32,
            "uint64" => Uint64,
            "uintptr" => Uintptr,
            "float32" => Float32,
            "float64" => Float64,
            "string" => String,
            _ => return None,
        };
        Some(kind)
    }

    /// Size in bytes, given the target's word size.
    pub const fn size(self, word_size: u32) -> Option<u32> {
        use BasicKind::*;
        match self {
            Bool | Int8 | Uint8 => Some(1),
            Int16 | Uint16 => Some(2),
            Int32 | Uint32 | Float32 => Some(4),
            Int64 | Uint64 | Float64 => Some(8),
            Int | Uint | Uintptr | UnsafePointer => Some(word_size),
            String => Some(word_size * 2),
            _ => None,
        }
    }

    /// Width in bits of an integer kind.
    pub const fn bit_width(self, word_size: u32) -> Option<u32> {
        if !self.is_integer() || self.is_untyped() {
            return None;
        }
        match self.size(word_size) {
            Some(bytes) => Some(bytes * 8),
            None => None,
        }
    }

    pub const fn is_integer(self) -> bool {
        self.info().contains(BasicInfo::INTEGER)
    }

    pub const fn is_unsigned(self) -> bool {
        self.info().contains(BasicInfo::UNSIGNED)
    }

    pub const fn is_float(self) -> bool {
        self.info().contains(BasicInfo::FLOAT)
    }

    pub const fn is_numeric(self) -> bool {
        self.info().intersects(BasicInfo::NUMERIC)
    }

    pub const fn is_boolean(self) -> bool {
        self.info().contains(BasicInfo::BOOLEAN)
    }

    pub const fn is_string(self) -> bool {
        self.info().contains(BasicInfo::STRING)
    }

    pub const fn is_ordered(self) -> bool {
        self.info().intersects(BasicInfo::ORDERED)
    }

    pub const fn is_untyped(self) -> bool {
        self.info().contains(BasicInfo::UNTYPED)
    }

    /// The type an untyped constant takes when nothing else constrains it.
    pub const fn default_type(self) -> BasicKind {
        use BasicKind::*;
        match self {
            UntypedBool => Bool,
            UntypedInt => Int,
            UntypedRune => Int32,
            UntypedFloat => Float64,
            UntypedString => String,
            other => other,
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicKind::UnsafePointer => write!(f, "unsafe.Pointer"),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_classification() {
        assert!(BasicKind::Int.is_integer());
        assert!(!BasicKind::Int.is_unsigned());
        assert!(BasicKind::Uintptr.is_unsigned());
        assert!(BasicKind::UntypedInt.is_integer());
        assert!(BasicKind::UntypedInt.is_untyped());
        assert!(!BasicKind::Float32.is_integer());
    }

    #[test]
    fn word_sized_widths() {
        assert_eq!(BasicKind::Int.bit_width(8), Some(64));
        assert_eq!(BasicKind::Uint.bit_width(4), Some(32));
        assert_eq!(BasicKind::Int8.bit_width(8), Some(8));
        assert_eq!(BasicKind::Float64.bit_width(8), None);
        assert_eq!(BasicKind::UntypedInt.bit_width(8), None);
    }

    #[test]
    fn untyped_defaults() {
        assert_eq!(BasicKind::UntypedInt.default_type(), BasicKind::Int);
        assert_eq!(BasicKind::UntypedFloat.default_type(), BasicKind::Float64);
        assert_eq!(BasicKind::Int16.default_type(), BasicKind::Int16);
    }

    #[test]
    fn names_round_trip() {
        for kind in [BasicKind::Int, BasicKind::Uint8, BasicKind::Float32, BasicKind::String] {
            assert_eq!(BasicKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BasicKind::from_name("byte"), Some(BasicKind::Uint8));
        assert_eq!(BasicKind::from_name("float"), None);
    }

    #[test]
    fn unsafe_pointer_display() {
        assert_eq!(BasicKind::UnsafePointer.to_string(), "unsafe.Pointer");
        assert_eq!(BasicKind::Uintptr.to_string(), "uintptr");
    }
}
