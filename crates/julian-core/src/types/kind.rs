//! Type kind tags.

use std::fmt;

/// The kind tag every [`Type`](super::Type) exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Boolean,
    Char,
    Float,
    Integer,
    Byte,
    Void,
    Any,
    Class,
    Platform,
}

impl TypeKind {
    /// Whether this is one of the five basic kinds.
    pub const fn is_basic(self) -> bool {
        matches!(
            self,
            TypeKind::Boolean | TypeKind::Char | TypeKind::Float | TypeKind::Integer | TypeKind::Byte
        )
    }

    /// Whether values of this kind are held by reference.
    pub const fn is_object(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Platform)
    }
}

/// The basic (non-object) types.
///
/// The declaration order is the row/column order of the conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Char,
    Float,
    Int,
    Byte,
}

impl BasicKind {
    /// All basic kinds in table order.
    pub const ALL: [BasicKind; 5] = [
        BasicKind::Bool,
        BasicKind::Char,
        BasicKind::Float,
        BasicKind::Int,
        BasicKind::Byte,
    ];

    /// Index into the conversion table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The script-level type name.
    pub const fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Char => "char",
            BasicKind::Float => "float",
            BasicKind::Int => "int",
            BasicKind::Byte => "byte",
        }
    }

    /// The corresponding kind tag.
    pub const fn type_kind(self) -> TypeKind {
        match self {
            BasicKind::Bool => TypeKind::Boolean,
            BasicKind::Char => TypeKind::Char,
            BasicKind::Float => TypeKind::Float,
            BasicKind::Int => TypeKind::Integer,
            BasicKind::Byte => TypeKind::Byte,
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
