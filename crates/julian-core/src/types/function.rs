//! Resolved callables.

use std::fmt;
use std::sync::Arc;

use super::{Parameter, Type};
use crate::runtime::Executable;
use crate::{CallSite, SourceLocation};

/// What kind of callable a [`FunctionType`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// A free function.
    Function,
    /// An instance method; the first parameter is `this`.
    Method,
    /// A static method.
    StaticMethod,
    /// A lambda; untyped unless declared otherwise.
    Lambda,
}

/// A declared return type.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnType {
    /// The declared type. `Any` when untyped.
    pub ty: Type,
    /// Declared without a type; the result is never checked.
    pub is_untyped: bool,
}

impl ReturnType {
    /// A typed return.
    pub fn typed(ty: Type) -> Self {
        Self {
            ty,
            is_untyped: false,
        }
    }

    /// An untyped return.
    pub fn untyped() -> Self {
        Self {
            ty: Type::Any,
            is_untyped: true,
        }
    }

    /// `void`.
    pub fn void() -> Self {
        Self::typed(Type::Void)
    }
}

/// A resolved function, method or lambda.
#[derive(Clone)]
pub struct FunctionType {
    name: String,
    kind: FunctionKind,
    params: Vec<Parameter>,
    ret: ReturnType,
    is_typed: bool,
    executable: Arc<dyn Executable>,
    location: SourceLocation,
}

impl FunctionType {
    /// A typed free function.
    pub fn new(
        name: impl Into<String>,
        params: Vec<Parameter>,
        ret: ReturnType,
        executable: Arc<dyn Executable>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Function,
            params,
            ret,
            is_typed: true,
            executable,
            location: SourceLocation::unknown(),
        }
    }

    /// A typed instance method. `this` is prepended to `declared`.
    pub fn method(
        name: impl Into<String>,
        declared: Vec<Parameter>,
        ret: ReturnType,
        executable: Arc<dyn Executable>,
    ) -> Self {
        let mut params = Vec::with_capacity(declared.len() + 1);
        params.push(Parameter::this());
        params.extend(declared);
        Self::new(name, params, ret, executable).with_kind(FunctionKind::Method)
    }

    /// An untyped lambda: neither arguments nor the result are checked.
    pub fn lambda(params: Vec<Parameter>, executable: Arc<dyn Executable>) -> Self {
        Self::new("<lambda>", params, ReturnType::untyped(), executable)
            .with_kind(FunctionKind::Lambda)
            .with_typed(false)
    }

    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_typed(mut self, is_typed: bool) -> Self {
        self.is_typed = is_typed;
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn return_type(&self) -> &ReturnType {
        &self.ret
    }

    /// Whether argument and return types are enforced.
    pub fn is_typed(&self) -> bool {
        self.is_typed
    }

    pub fn executable(&self) -> &Arc<dyn Executable> {
        &self.executable
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The call site errors raised while invoking this function are attributed to.
    pub fn call_site(&self) -> CallSite {
        CallSite::new(self.name.clone(), Parameter::names(&self.params)).at(self.location.clone())
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .field("is_typed", &self.is_typed)
            .finish_non_exhaustive()
    }
}
