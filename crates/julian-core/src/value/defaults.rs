//! Type defaults and value replication.

use super::{Null, Object, Reference, Value};
use crate::types::{BasicKind, Type};
use crate::FatalError;

/// The value an uninitialized slot of type `ty` holds.
pub fn default_value(ty: &Type) -> Result<Value, FatalError> {
    Ok(match ty {
        Type::Basic(BasicKind::Bool) => Value::Bool(false),
        Type::Basic(BasicKind::Char) => Value::Char('\0'),
        Type::Basic(BasicKind::Float) => Value::Float(0.0),
        Type::Basic(BasicKind::Int) => Value::Int(0),
        Type::Basic(BasicKind::Byte) => Value::Byte(0),
        Type::Any => Value::Any(Box::new(Value::typed_null(Type::object()))),
        Type::Class(_) | Type::Platform(_) => Value::typed_null(ty.clone()),
        Type::Void => {
            return Err(FatalError::NoDefaultValue {
                type_name: ty.name().to_string(),
            });
        }
    })
}

/// Copy `value` for storage in another frame or slot.
///
/// With a target type, basic values are converted to it and nulls are bound to
/// it. Without one, the value keeps its own type. Strings are copied; other
/// objects are shared through a new reference.
pub fn replicate(value: &Value, target: Option<&Type>) -> Result<Value, FatalError> {
    let Some(target) = target else {
        return Ok(replicate_as_is(value));
    };

    match target {
        Type::Any => Ok(replicate_as_is(value).into_any()),
        Type::Void => match value {
            Value::Void => Ok(Value::Void),
            _ => Err(mismatch(value, target)),
        },
        Type::Basic(kind) => {
            let content = match value {
                Value::Any(inner) => inner.as_ref(),
                other => other,
            };
            convert_basic(content, *kind).ok_or_else(|| mismatch(value, target))
        }
        Type::Class(_) | Type::Platform(_) => match value {
            Value::Reference(Reference::Null(_)) => Ok(Value::typed_null(target.clone())),
            Value::Object(_) | Value::Reference(_) => Ok(replicate_as_is(value)),
            Value::Any(inner) => replicate(inner, Some(target)),
            _ => Err(mismatch(value, target)),
        },
    }
}

fn replicate_as_is(value: &Value) -> Value {
    match value {
        Value::Object(o) | Value::Reference(Reference::Object(o)) => match o.as_str() {
            Some(text) => Value::Object(Object::string(text)),
            None => Value::Reference(Reference::Object(o.clone())),
        },
        Value::Any(inner) => Value::Any(Box::new(replicate_as_is(inner))),
        Value::Reference(Reference::Null(n)) => Value::Reference(Reference::Null(n.clone())),
        basic => basic.clone(),
    }
}

fn convert_basic(value: &Value, kind: BasicKind) -> Option<Value> {
    let (int, float) = match value {
        Value::Bool(b) => (i64::from(*b), f64::from(u8::from(*b))),
        Value::Byte(b) => (i64::from(*b), f64::from(*b)),
        Value::Char(c) => (i64::from(u32::from(*c)), f64::from(u32::from(*c))),
        Value::Int(i) => (i64::from(*i), f64::from(*i)),
        Value::Float(f) => (*f as i64, *f),
        _ => return None,
    };
    Some(match kind {
        BasicKind::Bool => Value::Bool(int != 0),
        BasicKind::Char => Value::Char(char::from_u32(int as u32).unwrap_or('\0')),
        BasicKind::Float => Value::Float(float),
        BasicKind::Int => Value::Int(int as i32),
        BasicKind::Byte => Value::Byte(int as u8),
    })
}

fn mismatch(value: &Value, target: &Type) -> FatalError {
    FatalError::Replication {
        from: value
            .ty()
            .map_or_else(|| "null".to_string(), |t| t.name().to_string()),
        to: target.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassType;

    #[test]
    fn basic_defaults() {
        assert_eq!(default_value(&Type::bool()).unwrap(), Value::Bool(false));
        assert_eq!(default_value(&Type::char()).unwrap(), Value::Char('\0'));
        assert_eq!(default_value(&Type::float()).unwrap(), Value::Float(0.0));
        assert_eq!(default_value(&Type::int()).unwrap(), Value::Int(0));
        assert_eq!(default_value(&Type::byte()).unwrap(), Value::Byte(0));
    }

    #[test]
    fn reference_defaults_are_typed_nulls() {
        let class = Type::Class(ClassType::builder("Car").build());
        assert_eq!(
            default_value(&class).unwrap(),
            Value::typed_null(class.clone())
        );
        let any = default_value(&Type::Any).unwrap();
        assert_eq!(any.any_content(), Some(&Value::typed_null(Type::object())));
        assert!(matches!(
            default_value(&Type::Void),
            Err(FatalError::NoDefaultValue { .. })
        ));
    }

    #[test]
    fn replication_converts_basics() {
        assert_eq!(
            replicate(&Value::Int(3), Some(&Type::float())).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            replicate(&Value::Float(2.9), Some(&Type::int())).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            replicate(&Value::Int(300), Some(&Type::byte())).unwrap(),
            Value::Byte(44)
        );
        assert_eq!(replicate(&Value::Int(3), None).unwrap(), Value::Int(3));
        assert!(replicate(&Value::string("x"), Some(&Type::int())).is_err());
    }

    #[test]
    fn replication_copies_strings_and_shares_objects() {
        let s = Value::string("abc");
        let copy = replicate(&s, None).unwrap();
        assert_eq!(copy.as_str(), Some("abc"));
        assert_ne!(copy.deref_object(), s.deref_object());

        let class = ClassType::builder("Car").build();
        let obj = Object::allocate(&class, crate::ObjectKind::Plain).unwrap();
        let shared = replicate(&Value::Object(obj.clone()), None).unwrap();
        assert_eq!(shared, Value::reference(obj));
    }

    #[test]
    fn replication_binds_nulls_to_target() {
        let target = Type::string();
        assert_eq!(
            replicate(&Value::generic_null(), Some(&target)).unwrap(),
            Value::typed_null(target)
        );
        assert!(replicate(&Value::generic_null(), None)
            .unwrap()
            .is_generic_null());
    }
}
