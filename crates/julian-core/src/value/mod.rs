//! Runtime values.
//!
//! ## Modules
//!
//! - [`object`]: Heap objects and their fixed representations
//! - `defaults`: Type defaults and value replication

mod defaults;
pub mod object;

pub use defaults::{default_value, replicate};
pub use object::{ConstLift, HostSlot, Object, ObjectKind, ObjectRef, ObjectRepr};

use crate::types::Type;

/// A null reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Null {
    /// Not yet bound to a declared type.
    Generic,
    /// Bound to a class or platform type.
    Typed(Type),
}

/// A reference to an object, possibly null.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Null(Null),
    Object(ObjectRef),
}

/// The variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Byte,
    Char,
    Float,
    Int,
    Void,
    Object,
    Reference,
    Any,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Char(char),
    Float(f64),
    Int(i32),
    /// The result of a `void` call.
    Void,
    /// An object held directly, as produced by allocation.
    Object(ObjectRef),
    /// A reference to an object; what variables, fields and arguments hold.
    Reference(Reference),
    /// A value stored under the dynamic `Any` type.
    Any(Box<Value>),
}

impl Value {
    /// A null that has not been bound to a type.
    pub fn generic_null() -> Self {
        Value::Reference(Reference::Null(Null::Generic))
    }

    /// A null bound to `ty`.
    pub fn typed_null(ty: Type) -> Self {
        Value::Reference(Reference::Null(Null::Typed(ty)))
    }

    /// A new string object.
    pub fn string(text: impl Into<String>) -> Self {
        Value::Object(Object::string(text))
    }

    /// A reference to `object`.
    pub fn reference(object: ObjectRef) -> Self {
        Value::Reference(Reference::Object(object))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Char(_) => ValueKind::Char,
            Value::Float(_) => ValueKind::Float,
            Value::Int(_) => ValueKind::Int,
            Value::Void => ValueKind::Void,
            Value::Object(_) => ValueKind::Object,
            Value::Reference(_) => ValueKind::Reference,
            Value::Any(_) => ValueKind::Any,
        }
    }

    /// The runtime type. `None` only for a generic null.
    pub fn ty(&self) -> Option<Type> {
        match self {
            Value::Bool(_) => Some(Type::bool()),
            Value::Byte(_) => Some(Type::byte()),
            Value::Char(_) => Some(Type::char()),
            Value::Float(_) => Some(Type::float()),
            Value::Int(_) => Some(Type::int()),
            Value::Void => Some(Type::Void),
            Value::Object(o) => Some(o.ty()),
            Value::Reference(Reference::Object(o)) => Some(o.ty()),
            Value::Reference(Reference::Null(Null::Typed(t))) => Some(t.clone()),
            Value::Reference(Reference::Null(Null::Generic)) => None,
            Value::Any(_) => Some(Type::Any),
        }
    }

    /// Whether this is a null reference, generic or typed.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Reference(Reference::Null(_)))
    }

    pub fn is_generic_null(&self) -> bool {
        matches!(self, Value::Reference(Reference::Null(Null::Generic)))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Value::Any(_))
    }

    /// Bind a generic null to `ty`. Any other value is left untouched.
    pub fn retype_null(&mut self, ty: &Type) {
        if self.is_generic_null() {
            *self = Value::typed_null(ty.clone());
        }
    }

    /// The object this value holds, refers to, or wraps.
    pub fn deref_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) | Value::Reference(Reference::Object(o)) => Some(o),
            Value::Any(inner) => inner.deref_object(),
            _ => None,
        }
    }

    /// Remove one `Any` layer.
    pub fn unwrap_any(self) -> Value {
        match self {
            Value::Any(inner) => *inner,
            other => other,
        }
    }

    /// The content of an `Any` envelope.
    pub fn any_content(&self) -> Option<&Value> {
        match self {
            Value::Any(inner) => Some(inner),
            _ => None,
        }
    }

    /// Wrap in an `Any` envelope unless already wrapped.
    pub fn into_any(self) -> Value {
        match self {
            Value::Any(_) => self,
            other => Value::Any(Box::new(other)),
        }
    }

    /// Hold an object by reference rather than directly.
    pub fn into_reference(self) -> Value {
        match self {
            Value::Object(o) => Value::Reference(Reference::Object(o)),
            other => other,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.peel() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.peel() {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.peel() {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self.peel() {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self.peel() {
            Value::Byte(b) => Some(*b),
            _ => None,
        }
    }

    /// The text of a string object this value holds or refers to.
    pub fn as_str(&self) -> Option<&str> {
        self.deref_object().and_then(|o| o.as_str())
    }

    fn peel(&self) -> &Value {
        match self {
            Value::Any(inner) => inner.peel(),
            other => other,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_null_has_no_type_until_retyped() {
        let mut v = Value::generic_null();
        assert!(v.ty().is_none());
        v.retype_null(&Type::string());
        assert_eq!(v.ty(), Some(Type::string()));
        assert!(v.is_null());
        assert!(!v.is_generic_null());

        let mut n = Value::Int(1);
        n.retype_null(&Type::string());
        assert_eq!(n, Value::Int(1));
    }

    #[test]
    fn any_wrapping_is_single_layer() {
        let v = Value::Int(5).into_any().into_any();
        assert_eq!(v, Value::Any(Box::new(Value::Int(5))));
        assert_eq!(v.ty(), Some(Type::Any));
        assert_eq!(v.as_int(), Some(5));
        assert_eq!(v.unwrap_any(), Value::Int(5));
    }

    #[test]
    fn deref_sees_through_references_and_envelopes() {
        let s = Value::string("abc").into_reference().into_any();
        assert_eq!(s.as_str(), Some("abc"));
        assert!(s.deref_object().is_some());
        assert!(Value::Int(1).deref_object().is_none());
    }
}
