//! Per-thread execution context and the host execution contract.
//!
//! ## Key Types
//!
//! - [`ThreadRuntime`]: The call stack of one guest thread
//! - [`Frame`]: One activation with its variable scopes
//! - [`Executable`]: A body the host can run (function, constructor, initializer)
//! - [`ArgumentEvaluator`]: Evaluates the argument expressions of a forward call
//! - [`Argument`]: A named, mutable argument slot

mod executable;
mod thread;

pub use executable::{
    Argument, ArgumentEvaluator, Executable, NoopBody, evaluator, executable,
};
pub use thread::{Frame, ThreadRuntime};
