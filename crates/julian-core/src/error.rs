//! Error types for the Julian interpreter core.
//!
//! Errors fall into two families that must never be confused:
//!
//! ```text
//! EngineError (top-level wrapper)
//! ├── GuestException  - guest-catchable; a script `try/catch` may observe it
//! │   └── GuestError  - argument count/type, constructor-not-found,
//! │                     runtime checks, stack overflow, thrown by guest code
//! └── FatalError      - engine invariant violations; abort the operation
//! ```
//!
//! [`ExecError`] is what a host [`Executable`](crate::Executable) reports. The
//! invoker and the constructor protocol translate it into an [`EngineError`]:
//! a thrown guest exception gets a stack frame appended, any other failure
//! becomes [`FatalError::InvocationFailed`].

use std::fmt;

use thiserror::Error;

use crate::SourceLocation;

// ============================================================================
// Call Sites and Stack Frames
// ============================================================================

/// The callable an error is attributed to: its name, declared parameter names
/// and source location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallSite {
    /// Function, method or constructor name.
    pub name: String,
    /// Declared parameter names, in order.
    pub params: Vec<String>,
    /// Where the callable is declared.
    pub location: SourceLocation,
}

impl CallSite {
    /// Create a call site without location information.
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
            location: SourceLocation::unknown(),
        }
    }

    /// Attach a source location.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(","))
    }
}

/// One entry of a guest exception's stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Function or constructor name.
    pub function: String,
    /// Declared parameter names.
    pub params: Vec<String>,
    /// File and line the exception was recorded at.
    pub location: SourceLocation,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.params.join(","))?;
        if !self.location.is_unknown() {
            write!(f, "  ({})", self.location)?;
        }
        Ok(())
    }
}

// ============================================================================
// Guest-Catchable Errors
// ============================================================================

/// Errors a guest script can catch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuestError {
    /// The number of supplied values does not match the declared parameters.
    #[error("wrong number of arguments when calling {callee}: expected {expected}, got {got}")]
    ArgumentCount {
        /// The callee.
        callee: CallSite,
        /// Declared parameter count.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A value cannot be used where a value of another type is expected.
    #[error("type incompatible: a value of type '{from}' cannot be converted to '{to}'")]
    TypeIncompatible {
        /// The actual type.
        from: String,
        /// The expected type.
        to: String,
        /// The callee whose parameter or return type was violated, if any.
        callee: Option<CallSite>,
    },

    /// No declared constructor accepts the supplied values.
    #[error("no matching constructor found for class '{class}' (type chain: {})", .chain.join(" -> "))]
    ConstructorNotFound {
        /// The class on which resolution failed.
        class: String,
        /// Ordered class names visited while resolving constructor forwarding.
        chain: Vec<String>,
    },

    /// A runtime check failed, e.g. instantiating an abstract class.
    #[error("runtime check failed: {message}")]
    RuntimeCheck {
        /// Description of the failed check.
        message: String,
    },

    /// Call or constructor-forwarding depth exceeded the configured limit.
    #[error("stack overflow: depth {depth} exceeds the limit of {limit}")]
    StackOverflow {
        /// The depth that was attempted.
        depth: usize,
        /// The configured limit.
        limit: usize,
    },

    /// An exception thrown by guest code.
    #[error("{class}: {message}")]
    Thrown {
        /// The guest exception class name.
        class: String,
        /// The exception message.
        message: String,
    },
}

impl GuestError {
    /// Shorthand for a failed runtime check.
    pub fn runtime_check(message: impl Into<String>) -> Self {
        GuestError::RuntimeCheck {
            message: message.into(),
        }
    }

    /// Shorthand for an exception thrown by guest code.
    pub fn thrown(class: impl Into<String>, message: impl Into<String>) -> Self {
        GuestError::Thrown {
            class: class.into(),
            message: message.into(),
        }
    }
}

/// A guest-catchable exception with its recorded location and stack trace.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct GuestException {
    /// What went wrong.
    pub error: GuestError,
    /// File and line the exception was raised at.
    pub location: SourceLocation,
    stack: Vec<StackFrame>,
}

impl GuestException {
    /// Create an exception with no location and an empty stack trace.
    pub fn new(error: GuestError) -> Self {
        Self {
            error,
            location: SourceLocation::unknown(),
            stack: Vec::new(),
        }
    }

    /// Record where the exception was raised.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Append a frame to the stack trace. Frames are appended innermost first.
    pub fn add_stack_trace(
        &mut self,
        function: impl Into<String>,
        params: &[String],
        location: SourceLocation,
    ) {
        self.stack.push(StackFrame {
            function: function.into(),
            params: params.to_vec(),
            location,
        });
    }

    /// The stack trace, innermost frame first.
    pub fn stack_trace(&self) -> &[StackFrame] {
        &self.stack
    }
}

impl From<GuestError> for GuestException {
    fn from(error: GuestError) -> Self {
        GuestException::new(error)
    }
}

// ============================================================================
// Fatal Errors
// ============================================================================

/// Engine invariant violations. These are never observable by guest code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FatalError {
    /// A `super(...)` forward was declared on a class without a parent.
    #[error("class '{class}' calls the constructor of its parent class, but no parent class is defined")]
    MissingParent {
        /// The class declaring the forward.
        class: String,
    },

    /// The host failed to run an executable for a reason other than a guest exception.
    #[error("an error occurs while invoking {callee}: {message}")]
    InvocationFailed {
        /// The callable being invoked.
        callee: CallSite,
        /// Host-supplied failure description.
        message: String,
    },

    /// Object creation was requested for a type that is not a class.
    #[error("cannot instantiate a non-class type '{type_name}'")]
    NotAClass {
        /// The offending type.
        type_name: String,
    },

    /// A const field was assigned outside of its initializer.
    #[error("cannot assign to const field '{field}' of class '{class}'")]
    ConstViolation {
        /// The class declaring the field.
        class: String,
        /// The field name.
        field: String,
    },

    /// A field lookup named a field that was never allocated.
    #[error("class '{class}' has no field named '{field}'")]
    UnknownField {
        /// The class the lookup was made against.
        class: String,
        /// The field name.
        field: String,
    },

    /// No default value exists for the requested type.
    #[error("cannot initialize a value of type '{type_name}'")]
    NoDefaultValue {
        /// The type.
        type_name: String,
    },

    /// A value could not be replicated as the requested type.
    #[error("unable to replicate a value of type '{from}' as '{to}'")]
    Replication {
        /// The value's own type.
        from: String,
        /// The requested type.
        to: String,
    },
}

// ============================================================================
// Host Execution Errors
// ============================================================================

/// The outcome of a failed [`Executable::execute`](crate::Executable::execute).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    /// Guest code raised an exception that escaped the executable.
    #[error(transparent)]
    Thrown(GuestException),

    /// The host could not run the executable.
    #[error("{message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },

    /// A fatal error raised by a nested operation.
    #[error(transparent)]
    Fatal(FatalError),
}

impl ExecError {
    /// Shorthand for a host invocation failure.
    pub fn failed(message: impl Into<String>) -> Self {
        ExecError::Failed {
            message: message.into(),
        }
    }
}

impl From<GuestError> for ExecError {
    fn from(error: GuestError) -> Self {
        ExecError::Thrown(error.into())
    }
}

impl From<GuestException> for ExecError {
    fn from(exception: GuestException) -> Self {
        ExecError::Thrown(exception)
    }
}

impl From<FatalError> for ExecError {
    fn from(error: FatalError) -> Self {
        ExecError::Fatal(error)
    }
}

impl From<EngineError> for ExecError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Guest(e) => ExecError::Thrown(e),
            EngineError::Fatal(e) => ExecError::Fatal(e),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type returned by every core operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A guest-catchable exception.
    #[error(transparent)]
    Guest(#[from] GuestException),

    /// A fatal engine error.
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl EngineError {
    /// Check if a guest script may catch this error.
    pub fn is_guest(&self) -> bool {
        matches!(self, EngineError::Guest(_))
    }

    /// Check if this is a fatal engine error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Fatal(_))
    }

    /// The guest exception, if this is one.
    pub fn as_guest(&self) -> Option<&GuestException> {
        match self {
            EngineError::Guest(e) => Some(e),
            EngineError::Fatal(_) => None,
        }
    }

    /// The guest error kind, if this is a guest exception.
    pub fn guest_error(&self) -> Option<&GuestError> {
        self.as_guest().map(|e| &e.error)
    }

    /// The fatal error, if this is one.
    pub fn as_fatal(&self) -> Option<&FatalError> {
        match self {
            EngineError::Fatal(e) => Some(e),
            EngineError::Guest(_) => None,
        }
    }
}

impl From<GuestError> for EngineError {
    fn from(error: GuestError) -> Self {
        EngineError::Guest(error.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
