//! Julian
//!
//! The interpreter core of the Julian scripting language: argument binding,
//! function invocation, object construction and variable declaration.
//!
//! An [`Engine`] owns the configuration and the engine-wide caches. Each guest
//! thread runs on its own [`ThreadRuntime`](julian_core::ThreadRuntime),
//! obtained from [`Engine::new_thread`].
//!
//! ## Crates
//!
//! - `julian-core`: Types, values, the conversion lattice and errors
//! - `julian-runtime`: The binder, invoker and constructor protocol

mod engine;
mod error;

pub use engine::Engine;
pub use error::PropertyError;

pub use julian_core;
pub use julian_runtime;

pub mod prelude {
    pub use crate::{Engine, PropertyError};
    pub use julian_core::{
        Argument, ArgumentEvaluator, CallSite, ClassFlags, ClassRef, ClassType, ConstructorMember,
        Convertibility, EngineConfig, EngineError, EngineProperty, ExecError, Executable,
        FatalError, FieldDecl, ForwardInfo, FunctionType, GuestError, GuestException, HostClass,
        Initializer, NoopBody, Null, Object, ObjectKind, ObjectRef, Parameter, PlatformType,
        Reference, ReturnType, SourceLocation, ThreadRuntime, Type, Value, attribute_class,
        convertibility, evaluator, executable, object_class, string_class,
    };
    pub use julian_runtime::{CtorArgs, Invoker, ObjectFactory};
}
