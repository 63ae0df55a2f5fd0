//! Executable bodies and their arguments.

use std::sync::Arc;

use super::ThreadRuntime;
use crate::types::THIS;
use crate::{ExecError, Value};

/// A named argument slot.
///
/// The value is mutable because a generic null is retyped in place while
/// arguments are checked against their parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The receiver argument.
    pub fn this(value: Value) -> Self {
        Self::new(THIS, value)
    }

    /// Find an argument by name.
    pub fn find<'a>(args: &'a [Argument], name: &str) -> Option<&'a Value> {
        args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// A body the host knows how to run.
///
/// Implemented by the interpreter for script bodies and by embedders for
/// native ones. Closures with the matching signature implement it directly.
pub trait Executable: Send + Sync {
    /// Run the body against bound arguments and return its result.
    ///
    /// An exception raised by guest code is reported as [`ExecError::Thrown`].
    fn execute(&self, rt: &mut ThreadRuntime, args: &mut [Argument]) -> Result<Value, ExecError>;
}

impl<F> Executable for F
where
    F: Fn(&mut ThreadRuntime, &mut [Argument]) -> Result<Value, ExecError> + Send + Sync,
{
    fn execute(&self, rt: &mut ThreadRuntime, args: &mut [Argument]) -> Result<Value, ExecError> {
        (self)(rt, args)
    }
}

/// Evaluates the argument expressions of a `this(...)` / `super(...)` call
/// against the arguments of the constructor that declares it.
pub trait ArgumentEvaluator: Send + Sync {
    fn evaluate(&self, rt: &mut ThreadRuntime, args: &[Argument]) -> Result<Vec<Value>, ExecError>;
}

impl<F> ArgumentEvaluator for F
where
    F: Fn(&mut ThreadRuntime, &[Argument]) -> Result<Vec<Value>, ExecError> + Send + Sync,
{
    fn evaluate(&self, rt: &mut ThreadRuntime, args: &[Argument]) -> Result<Vec<Value>, ExecError> {
        (self)(rt, args)
    }
}

/// An empty body returning `void`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBody;

impl Executable for NoopBody {
    fn execute(&self, _rt: &mut ThreadRuntime, _args: &mut [Argument]) -> Result<Value, ExecError> {
        Ok(Value::Void)
    }
}

/// Wrap a closure as a shared [`Executable`].
pub fn executable<F>(f: F) -> Arc<dyn Executable>
where
    F: Fn(&mut ThreadRuntime, &mut [Argument]) -> Result<Value, ExecError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a shared [`ArgumentEvaluator`].
pub fn evaluator<F>(f: F) -> Arc<dyn ArgumentEvaluator>
where
    F: Fn(&mut ThreadRuntime, &[Argument]) -> Result<Vec<Value>, ExecError> + Send + Sync + 'static,
{
    Arc::new(f)
}
