//! Argument binding.
//!
//! Matches the values supplied at a call site to the declared parameters of the
//! callee, then checks the bound arguments against the declared types.
//!
//! ## Binding Rules
//!
//! 1. A receiver, if given, is bound as argument 0 (`this`)
//! 2. Strict mode rejects any difference between supplied and declared counts
//! 3. Loose mode drops excess values and pads missing ones with type defaults
//! 4. Values bound to untyped parameters are wrapped in an `Any` envelope

use julian_core::{
    Argument, CallSite, Convertibility, EngineError, GuestError, Parameter, Type, TypeKind, Value,
    default_value,
};
use tracing::debug;

/// Bind `values` to `params`.
///
/// Errors are attributed to `callee`. With `skip_first`, the first supplied value is not bound; it stands for the
/// receiver that `instance` replaces.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn prepare_arguments(
    callee: &CallSite,
    params: &[Parameter],
    values: Vec<Value>,
    instance: Option<Value>,
    skip_first: bool,
    loose: bool,
) -> Result<Vec<Argument>, EngineError> {
    let mut args = Vec::with_capacity(params.len());
    let start = usize::from(instance.is_some());
    if let Some(instance) = instance {
        if params.is_empty() {
            return Err(GuestError::ArgumentCount {
                callee: callee.clone(),
                expected: 0,
                got: 1,
            }
            .into());
        }
        args.push(Argument::this(instance));
    }

    let skip = usize::from(skip_first);
    let expected = params.len() - start;
    let supplied = values.len().saturating_sub(skip);
    if supplied != expected {
        if !loose {
            return Err(GuestError::ArgumentCount {
                callee: callee.clone(),
                expected,
                got: supplied,
            }
            .into());
        }
        debug!(callee = %callee.name, expected, supplied, "loose call: adjusting argument count");
    }

    let mut supplied = values.into_iter().skip(skip);
    for param in &params[start..] {
        let value = match supplied.next() {
            Some(value) if param.is_untyped => value.into_any(),
            Some(value) => value,
            None => default_value(&param.ty)?,
        };
        args.push(Argument::new(param.name.clone(), value));
    }

    Ok(args)
}

/// Check bound arguments against their declared parameter types.
///
/// A generic null bound to a class or platform parameter is retyped in place.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn check_arg_types(
    callee: &CallSite,
    args: &mut [Argument],
    params: &[Parameter],
) -> Result<(), GuestError> {
    if args.len() != params.len() {
        return Err(GuestError::ArgumentCount {
            callee: callee.clone(),
            expected: params.len(),
            got: args.len(),
        });
    }

    for (arg, param) in args.iter_mut().zip(params) {
        if param.is_untyped {
            continue;
        }
        if arg.value.is_generic_null()
            && matches!(param.ty.kind(), TypeKind::Class | TypeKind::Platform)
        {
            arg.value.retype_null(&param.ty);
            continue;
        }
        check_convertibility(&arg.value, &param.ty)
            .map_err(|(from, to)| GuestError::TypeIncompatible {
                from,
                to,
                callee: Some(callee.clone()),
            })?;
    }

    Ok(())
}

fn check_convertibility(value: &Value, ty: &Type) -> Result<(), (String, String)> {
    let Some(actual) = value.ty() else {
        // A generic null fits anything held by reference.
        return match ty.kind() {
            TypeKind::Any | TypeKind::Class | TypeKind::Platform => Ok(()),
            _ => Err(("null".to_string(), ty.name().to_string())),
        };
    };

    match actual.convertibility_to(ty) {
        Convertibility::Unconvertible => Err((actual.name().to_string(), ty.name().to_string())),
        Convertibility::Unsafe => match value.any_content() {
            Some(content) => check_convertibility(content, ty),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}
