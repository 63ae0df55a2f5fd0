//! Variable declaration.

use julian_core::{EngineError, ThreadRuntime, Type, Value, ValueKind, default_value};
use tracing::trace;

/// Declare `name` in the current scope and return the bound value.
///
/// - `Any`: the value (or a generic null) is stored in an `Any` envelope; a
///   string is held by reference inside it
/// - no value: the default of `ty`
/// - an object: held by reference, so the variable aliases it
pub fn declare_variable(
    rt: &mut ThreadRuntime,
    name: &str,
    ty: &Type,
    value: Option<Value>,
) -> Result<Value, EngineError> {
    let bound = match (ty, value) {
        (Type::Any, value) => {
            let value = value.unwrap_or_else(Value::generic_null);
            let value = if value.deref_object().is_some_and(|o| o.is_string()) {
                value.into_reference()
            } else {
                value
            };
            value.into_any()
        }
        (ty, None) => default_value(ty)?,
        (_, Some(value)) if value.kind() == ValueKind::Object => value.into_reference(),
        (_, Some(value)) => value,
    };

    trace!(name, ty = ty.name(), "declare variable");
    rt.bind(name, bound.clone());
    Ok(bound)
}
