//! Class members consumed by argument binding and object construction.

use std::fmt;
use std::sync::Arc;

use crate::runtime::{ArgumentEvaluator, Executable, NoopBody};
use crate::{SourceLocation, Type};

/// Name of the implicit receiver argument.
pub const THIS: &str = "this";

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name; also the name of the bound argument.
    pub name: String,
    /// Declared type. `Any` for untyped parameters.
    pub ty: Type,
    /// Declared without a type; bound values are wrapped in an Any envelope.
    pub is_untyped: bool,
}

impl Parameter {
    /// A typed parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_untyped: false,
        }
    }

    /// An untyped parameter.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Type::Any,
            is_untyped: true,
        }
    }

    /// The implicit `this` parameter of methods and constructors.
    pub fn this() -> Self {
        Self::untyped(THIS)
    }

    /// Declared names of a parameter list.
    pub fn names(params: &[Parameter]) -> Vec<String> {
        params.iter().map(|p| p.name.clone()).collect()
    }
}

/// A field declared directly on a class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Const fields can only be written by their initializer.
    pub is_const: bool,
}

impl FieldDecl {
    /// A mutable field.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_const: false,
        }
    }

    /// A const field.
    pub fn constant(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_const: true,
        }
    }
}

/// Which class a forward constructor call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardTarget {
    /// `this(...)`: another constructor of the same class.
    This,
    /// `super(...)`: a constructor of the parent class.
    Super,
}

/// A `this(...)` / `super(...)` call that runs before the constructor body.
#[derive(Clone)]
pub struct ForwardInfo {
    /// Forward target.
    pub target: ForwardTarget,
    /// Evaluates the forward call's argument expressions.
    pub arguments: Arc<dyn ArgumentEvaluator>,
}

impl ForwardInfo {
    /// A `this(...)` forward.
    pub fn this(arguments: Arc<dyn ArgumentEvaluator>) -> Self {
        Self {
            target: ForwardTarget::This,
            arguments,
        }
    }

    /// A `super(...)` forward.
    pub fn super_(arguments: Arc<dyn ArgumentEvaluator>) -> Self {
        Self {
            target: ForwardTarget::Super,
            arguments,
        }
    }

    /// Whether this forwards to the parent class.
    pub fn is_super(&self) -> bool {
        self.target == ForwardTarget::Super
    }
}

impl fmt::Debug for ForwardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardInfo")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// A declared constructor.
///
/// The parameter list always starts with the implicit `this` parameter, so a
/// constructor declared as `Point(int x, int y)` has three parameters.
#[derive(Clone)]
pub struct ConstructorMember {
    params: Vec<Parameter>,
    body: Arc<dyn Executable>,
    forward: Option<ForwardInfo>,
    location: SourceLocation,
}

impl ConstructorMember {
    /// Create a constructor from its declared (non-`this`) parameters and body.
    pub fn new(declared: Vec<Parameter>, body: Arc<dyn Executable>) -> Self {
        let mut params = Vec::with_capacity(declared.len() + 1);
        params.push(Parameter::this());
        params.extend(declared);
        Self {
            params,
            body,
            forward: None,
            location: SourceLocation::unknown(),
        }
    }

    /// The parameterless constructor with an empty body.
    pub fn default_ctor() -> Self {
        Self::new(Vec::new(), Arc::new(NoopBody))
    }

    /// Add a forward call.
    pub fn with_forward(mut self, forward: ForwardInfo) -> Self {
        self.forward = Some(forward);
        self
    }

    /// Set the declaration location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// All parameters, `this` first.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Parameters as written in the declaration (without `this`).
    pub fn declared_params(&self) -> &[Parameter] {
        &self.params[1..]
    }

    /// The constructor body.
    pub fn body(&self) -> &Arc<dyn Executable> {
        &self.body
    }

    /// The forward call, if any.
    pub fn forward(&self) -> Option<&ForwardInfo> {
        self.forward.as_ref()
    }

    /// Declaration location.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

impl fmt::Debug for ConstructorMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorMember")
            .field("params", &Parameter::names(&self.params))
            .field("forward", &self.forward)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// A field initializer (`int x = expr;`), run once per class per instance.
#[derive(Clone)]
pub struct Initializer {
    field: String,
    executable: Arc<dyn Executable>,
    location: SourceLocation,
}

impl Initializer {
    /// Create an initializer for the named field.
    pub fn new(field: impl Into<String>, executable: Arc<dyn Executable>) -> Self {
        Self {
            field: field.into(),
            executable,
            location: SourceLocation::unknown(),
        }
    }

    /// Set the location of the initializer expression.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The initialized field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Evaluates the initializer expression; receives only `this`.
    pub fn executable(&self) -> &Arc<dyn Executable> {
        &self.executable
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}
