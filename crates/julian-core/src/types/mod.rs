//! Type metadata.
//!
//! This module provides the types the interpreter core reasons about:
//!
//! - [`Type`]: Any type a value, parameter, field or return can carry
//! - [`ClassType`]: Script classes with single inheritance
//! - [`PlatformType`]: Host classes exposed to scripts
//! - [`FunctionType`]: Resolved callables
//! - Members: [`Parameter`], [`FieldDecl`], [`ConstructorMember`], [`Initializer`]

mod class;
mod function;
mod kind;
mod member;
mod platform;

pub use class::{
    ClassFlags, ClassRef, ClassType, ClassTypeBuilder, Lineage, attribute_class, object_class,
    string_class,
};
pub use function::{FunctionKind, FunctionType, ReturnType};
pub use kind::{BasicKind, TypeKind};
pub use member::{
    ConstructorMember, FieldDecl, ForwardInfo, ForwardTarget, Initializer, Parameter, THIS,
};
pub use platform::{HostClass, PlatformType};

use std::fmt;
use std::sync::Arc;

use crate::{Convertibility, TypeHash, convertibility};

/// A resolved type.
#[derive(Clone)]
pub enum Type {
    /// `bool`, `char`, `float`, `int` or `byte`.
    Basic(BasicKind),
    /// `void`; only legal as a return type.
    Void,
    /// The dynamic type (`var`).
    Any,
    /// A script class, including the built-in `string`.
    Class(ClassRef),
    /// A host class exposed to scripts.
    Platform(Arc<PlatformType>),
}

impl Type {
    pub fn bool() -> Self {
        Type::Basic(BasicKind::Bool)
    }

    pub fn char() -> Self {
        Type::Basic(BasicKind::Char)
    }

    pub fn float() -> Self {
        Type::Basic(BasicKind::Float)
    }

    pub fn int() -> Self {
        Type::Basic(BasicKind::Int)
    }

    pub fn byte() -> Self {
        Type::Basic(BasicKind::Byte)
    }

    /// The built-in `string` class.
    pub fn string() -> Self {
        Type::Class(string_class().clone())
    }

    /// The root `Object` class.
    pub fn object() -> Self {
        Type::Class(object_class().clone())
    }

    /// The kind tag.
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Basic(b) => b.type_kind(),
            Type::Void => TypeKind::Void,
            Type::Any => TypeKind::Any,
            Type::Class(_) => TypeKind::Class,
            Type::Platform(_) => TypeKind::Platform,
        }
    }

    /// The script-level type name.
    pub fn name(&self) -> &str {
        match self {
            Type::Basic(b) => b.name(),
            Type::Void => "void",
            Type::Any => "Any",
            Type::Class(c) => c.name(),
            Type::Platform(p) => p.name(),
        }
    }

    /// Type hash, derived from the type name.
    pub fn hash(&self) -> TypeHash {
        match self {
            Type::Class(c) => c.hash(),
            Type::Platform(p) => p.hash(),
            other => TypeHash::from_name(other.name()),
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Type::Basic(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// Whether values of this type are objects held by reference.
    pub fn is_object(&self) -> bool {
        self.kind().is_object()
    }

    /// The class, if this is a class type.
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Type::Class(c) => Some(c),
            _ => None,
        }
    }

    /// The basic kind, if this is a basic type.
    pub fn as_basic(&self) -> Option<BasicKind> {
        match self {
            Type::Basic(b) => Some(*b),
            _ => None,
        }
    }

    /// How safely a value of this type can be used where `to` is expected.
    pub fn convertibility_to(&self, to: &Type) -> Convertibility {
        convertibility(self, to)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Basic(a), Type::Basic(b)) => a == b,
            (Type::Void, Type::Void) | (Type::Any, Type::Any) => true,
            (Type::Class(a), Type::Class(b)) => a.hash() == b.hash(),
            (Type::Platform(a), Type::Platform(b)) => a.hash() == b.hash(),
            _ => false,
        }
    }
}

impl Eq for Type {}

impl From<BasicKind> for Type {
    fn from(kind: BasicKind) -> Self {
        Type::Basic(kind)
    }
}

impl From<ClassRef> for Type {
    fn from(class: ClassRef) -> Self {
        Type::Class(class)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.name())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
