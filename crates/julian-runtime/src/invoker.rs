//! Function invocation.
//!
//! The [`Invoker`] runs a resolved callable on a [`ThreadRuntime`]:
//!
//! 1. Check argument types (typed callables only)
//! 2. Push a frame, bind the arguments, run the executable, pop the frame
//! 3. Check the returned value against the declared return type
//! 4. Replicate the result for the caller
//!
//! A guest exception escaping the executable gets a stack-trace entry for the
//! callee appended before it is re-raised.

use julian_core::{
    Argument, CallSite, Convertibility, EngineConfig, EngineError, ExecError, Executable,
    FatalError, FunctionType, GuestError, GuestException, Parameter, ThreadRuntime, Type, Value,
    default_value, replicate,
};
use tracing::{debug, trace};

use crate::binder;

/// Runs callables under strict or loose typing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Invoker {
    loose: bool,
}

impl Invoker {
    pub fn new(loose: bool) -> Self {
        Self { loose }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.loose_typing)
    }

    pub fn is_loose(&self) -> bool {
        self.loose
    }

    /// Bind values to `func`'s parameters under this invoker's typing mode.
    pub fn prepare_arguments(
        &self,
        func: &FunctionType,
        values: Vec<Value>,
        instance: Option<Value>,
        skip_first: bool,
    ) -> Result<Vec<Argument>, EngineError> {
        binder::prepare_arguments(
            &func.call_site(),
            func.params(),
            values,
            instance,
            skip_first,
            self.loose,
        )
    }

    /// Invoke `func` with already bound arguments.
    ///
    /// For a method, argument 0 must be the receiver.
    pub fn invoke_function(
        &self,
        rt: &mut ThreadRuntime,
        func: &FunctionType,
        name: &str,
        args: Vec<Argument>,
    ) -> Result<Value, EngineError> {
        self.invoke(rt, func, func.executable().as_ref(), name, args)
    }

    /// Invoke a method on `instance` (`None` for static methods) with plain values.
    pub fn invoke_method_internal(
        &self,
        rt: &mut ThreadRuntime,
        method: &FunctionType,
        values: Vec<Value>,
        instance: Option<Value>,
    ) -> Result<Value, EngineError> {
        let args = self.prepare_arguments(method, values, instance, false)?;
        self.invoke_function(rt, method, method.name(), args)
    }

    /// Invoke `exec` under the contract declared by `func`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn invoke(
        &self,
        rt: &mut ThreadRuntime,
        func: &FunctionType,
        exec: &dyn Executable,
        name: &str,
        mut args: Vec<Argument>,
    ) -> Result<Value, EngineError> {
        let param_names = Parameter::names(func.params());
        let site = CallSite::new(name, param_names.clone()).at(func.location().clone());
        if func.is_typed() {
            binder::check_arg_types(&site, &mut args, func.params())?;
        }

        trace!(function = name, kind = ?func.kind(), "invoke");
        rt.push_frame(name)?;
        for arg in &args {
            rt.bind(arg.name.clone(), arg.value.clone());
        }
        let result = exec.execute(rt, &mut args);
        rt.pop_frame();

        let value = match result {
            Ok(value) => value,
            Err(ExecError::Thrown(mut ex)) => {
                let location = ex.location.clone();
                ex.add_stack_trace(name, &param_names, location);
                trace!(function = name, "attached stack frame");
                return Err(ex.into());
            }
            Err(ExecError::Failed { message }) => {
                return Err(FatalError::InvocationFailed {
                    callee: site,
                    message,
                }
                .into());
            }
            Err(ExecError::Fatal(e)) => return Err(e.into()),
        };

        self.complete_return(func, &site, value)
    }

    /// Check and replicate a returned value.
    fn complete_return(
        &self,
        func: &FunctionType,
        site: &CallSite,
        value: Value,
    ) -> Result<Value, EngineError> {
        // A generic null carries no type to check.
        let Some(mut actual) = value.ty() else {
            return Ok(value);
        };
        if let Some(content) = value.any_content() {
            match content.ty() {
                Some(ty) => actual = ty,
                None => return Ok(value),
            }
        }

        let declared = &func.return_type().ty;
        let loose_return = self.loose && actual.is_void();
        let mut target = None;

        if func.is_typed() && !func.return_type().is_untyped {
            match actual.convertibility_to(declared) {
                Convertibility::Promoted => target = Some(declared),
                Convertibility::Demoted if self.loose => target = Some(declared),
                Convertibility::Equivalent | Convertibility::Downgraded => {}
                _ if loose_return => {}
                _ => {
                    let mut ex = GuestException::new(GuestError::TypeIncompatible {
                        from: actual.name().to_string(),
                        to: declared.name().to_string(),
                        callee: Some(site.clone()),
                    });
                    ex.add_stack_trace(&site.name, &site.params, site.location.clone());
                    return Err(ex.into());
                }
            }
        }

        if !actual.is_void() {
            return Ok(replicate(&value, target)?);
        }
        if loose_return {
            let coerced = match declared {
                Type::Void => Type::object(),
                other => other.clone(),
            };
            debug!(function = %site.name, to = coerced.name(), "loose return: substituting default");
            return Ok(default_value(&coerced)?);
        }
        Ok(Value::Void)
    }
}
