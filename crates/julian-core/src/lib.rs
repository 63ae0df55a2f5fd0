//! Julian Core
//!
//! Leaf types shared by every part of the Julian interpreter core.
//!
//! ## Modules
//!
//! - [`types`]: Type metadata (`Type`, `ClassType`, `PlatformType`, members)
//! - [`convert`]: The convertibility lattice
//! - [`value`]: Runtime values, objects, defaults and replication
//! - [`runtime`]: Per-thread execution context and the host `Executable` contract
//! - [`error`]: Guest-catchable exceptions and fatal engine errors
//! - [`config`]: Engine configuration

pub mod config;
pub mod convert;
pub mod error;
mod location;
pub mod runtime;
mod type_hash;
pub mod types;
pub mod value;

pub use config::{EngineConfig, EngineProperty};
pub use convert::{Convertibility, convertibility};
pub use error::{
    CallSite, EngineError, ExecError, FatalError, GuestError, GuestException, StackFrame,
};
pub use location::SourceLocation;
pub use runtime::{
    Argument, ArgumentEvaluator, Executable, Frame, NoopBody, ThreadRuntime, evaluator,
    executable,
};
pub use type_hash::TypeHash;
pub use types::{
    BasicKind, ClassFlags, ClassRef, ClassType, ClassTypeBuilder, ConstructorMember, FieldDecl,
    ForwardInfo, ForwardTarget, FunctionKind, FunctionType, HostClass, Initializer, Parameter,
    PlatformType, ReturnType, Type, TypeKind, attribute_class, object_class, string_class,
};
pub use value::{
    ConstLift, Null, Object, ObjectKind, ObjectRef, ObjectRepr, Reference, Value, ValueKind,
    default_value, replicate,
};
