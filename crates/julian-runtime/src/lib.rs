//! Julian Runtime
//!
//! The calling convention and object lifecycle of the Julian interpreter core.
//!
//! ## Modules
//!
//! - [`binder`]: Matches supplied values to declared parameters
//! - [`invoker`]: Runs callables and checks their results
//! - [`construct`]: Allocates objects and drives constructor chains
//! - [`cache`]: Engine-owned constructor resolution cache
//! - [`declare`]: Binds new variables

pub mod binder;
pub mod cache;
pub mod construct;
pub mod declare;
pub mod invoker;

pub use binder::{check_arg_types, prepare_arguments};
pub use cache::{CtorCache, CtorKey};
pub use construct::{CtorArgs, ObjectFactory, TypeChain};
pub use declare::declare_variable;
pub use invoker::Invoker;
