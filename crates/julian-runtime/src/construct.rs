//! Object construction.
//!
//! Constructing an object runs in three phases:
//!
//! 1. **Allocate** an object whose representation follows the class flags
//! 2. **Resolve** the first declared constructor accepting the supplied values
//! 3. **Invoke** it recursively:
//!    - run the `this(...)` / `super(...)` forward call, or the parent's
//!      parameterless constructor when there is no forward call
//!    - run the class's field initializers, once per class per instance
//!    - run the constructor body
//!
//! A `this(...)` forward stays on the same class, so initializers of that class
//! run only in the constructor that ends the `this(...)` chain.

use std::sync::Arc;

use julian_core::{
    Argument, ArgumentEvaluator, CallSite, ClassRef, ClassType, ConstructorMember, Convertibility,
    EngineError, ExecError, FatalError, GuestError, GuestException, Initializer, Object,
    ObjectKind, ObjectRef, Parameter, SourceLocation, ThreadRuntime, Type, TypeKind, Value,
    attribute_class, replicate,
};
use tracing::{debug, trace};

use crate::binder;
use crate::cache::{CtorCache, CtorKey};

/// The values a `new` expression supplies.
#[derive(Clone)]
pub enum CtorArgs {
    /// Already evaluated values.
    Values(Vec<Value>),
    /// Argument expressions, evaluated after the object is allocated.
    Expressions(Arc<dyn ArgumentEvaluator>),
}

impl From<Vec<Value>> for CtorArgs {
    fn from(values: Vec<Value>) -> Self {
        CtorArgs::Values(values)
    }
}

/// Classes visited while following constructor forward calls.
#[derive(Debug, Default, Clone)]
pub struct TypeChain {
    classes: Vec<ClassRef>,
}

impl TypeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `class` unless it is already the most recent entry.
    pub fn visit(&mut self, class: &ClassRef) {
        if self.classes.last().map(|c| c.hash()) != Some(class.hash()) {
            self.classes.push(class.clone());
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The error for a failed resolution on `failed`: the visited classes
    /// followed by the lineage of `failed` below the root.
    pub fn not_found(&self, failed: &ClassType) -> GuestError {
        let mut chain = self.names();
        for class in failed.lineage().take_while(|c| !c.is_root()) {
            if !chain.iter().any(|name| name == class.name()) {
                chain.push(class.name().to_string());
            }
        }
        GuestError::ConstructorNotFound {
            class: failed.name().to_string(),
            chain,
        }
    }
}

/// Builds objects through their constructor chains.
#[derive(Debug, Clone)]
pub struct ObjectFactory<'e> {
    cache: Option<&'e CtorCache>,
    location: SourceLocation,
}

impl<'e> ObjectFactory<'e> {
    /// A factory memoizing resolution in `cache`.
    pub fn new(cache: &'e CtorCache) -> Self {
        Self {
            cache: Some(cache),
            location: SourceLocation::unknown(),
        }
    }

    /// A factory that resolves every time.
    pub fn uncached() -> Self {
        Self {
            cache: None,
            location: SourceLocation::unknown(),
        }
    }

    /// Attribute errors of the outermost constructor call to the `new`
    /// expression at `location`.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Construct an instance of `ty`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn construct(
        &self,
        rt: &mut ThreadRuntime,
        ty: &Type,
        args: CtorArgs,
    ) -> Result<ObjectRef, EngineError> {
        let class = ty.as_class().ok_or_else(|| FatalError::NotAClass {
            type_name: ty.name().to_string(),
        })?;
        self.construct_class(rt, class, args)
    }

    /// Construct an instance of `class`.
    pub fn construct_class(
        &self,
        rt: &mut ThreadRuntime,
        class: &ClassRef,
        args: CtorArgs,
    ) -> Result<ObjectRef, EngineError> {
        let obj = Self::allocate(class)?;

        let mut values = vec![Value::Object(obj.clone())];
        match args {
            CtorArgs::Values(supplied) => values.extend(supplied),
            CtorArgs::Expressions(exprs) => {
                let evaluated = exprs
                    .evaluate(rt, &[])
                    .map_err(|e| {
                        let site = CallSite::new(class.name(), vec![]).at(self.location.clone());
                        lift_exec_error(e, site)
                    })?;
                values.extend(evaluated);
            }
        }

        let mut chain = TypeChain::new();
        let ctor = self
            .resolve(rt, class, &values, true)
            .ok_or_else(|| {
                GuestException::new(chain.not_found(class)).at(self.location.clone())
            })?;
        let args = bind_constructor_args(class, ctor, values)?;
        self.invoke_constructor(rt, class, ctor, args, &obj, &mut chain, 0)?;

        Ok(obj)
    }

    /// Allocate an uninitialized instance of `class`.
    pub fn allocate(class: &ClassRef) -> Result<ObjectRef, EngineError> {
        let kind = if class.is_attribute() {
            if class.hash() == attribute_class().hash() {
                return Err(GuestError::runtime_check("Cannot instantiate Attribute class.").into());
            }
            ObjectKind::Attribute
        } else if class.is_abstract() {
            return Err(GuestError::runtime_check(format!(
                "Cannot instantiate an abstract class: {}",
                class.name()
            ))
            .into());
        } else if class.is_hosted() {
            ObjectKind::Hosted
        } else if class.is_dynamic() {
            ObjectKind::Dynamic
        } else {
            ObjectKind::Plain
        };

        debug!(class = class.name(), ?kind, "allocate");
        Ok(Object::allocate(class, kind)?)
    }

    /// The first constructor of `class` accepting `values`.
    ///
    /// `values[0]` is the instance. With `match_this` false it is not
    /// compared against the `this` parameter.
    pub fn resolve<'c>(
        &self,
        rt: &ThreadRuntime,
        class: &'c ClassType,
        values: &[Value],
        match_this: bool,
    ) -> Option<&'c ConstructorMember> {
        let cache = self
            .cache
            .filter(|_| rt.config().cache_constructor_lookups);
        let Some(cache) = cache else {
            return find_constructor(class, values, match_this)
                .and_then(|i| class.constructors().get(i));
        };

        let key = CtorKey::new(class.hash(), values, match_this);
        let index = match cache.get(&key) {
            Some(hit) => {
                trace!(class = class.name(), "constructor cache hit");
                hit
            }
            None => {
                let found = find_constructor(class, values, match_this);
                trace!(class = class.name(), ?found, "constructor cache miss");
                cache.insert(key, found);
                found
            }
        };
        index.and_then(|i| class.constructors().get(i))
    }

    #[allow(clippy::too_many_arguments)]
    fn invoke_constructor(
        &self,
        rt: &mut ThreadRuntime,
        class: &ClassRef,
        ctor: &ConstructorMember,
        mut args: Vec<Argument>,
        obj: &ObjectRef,
        chain: &mut TypeChain,
        depth: usize,
    ) -> Result<(), EngineError> {
        let limit = rt.config().max_forward_depth;
        if depth > limit {
            return Err(GuestError::StackOverflow { depth, limit }.into());
        }

        let mut first_call_to_class = true;
        if let Some(forward) = ctor.forward() {
            first_call_to_class = forward.is_super();
            let target = if forward.is_super() {
                class.parent().ok_or_else(|| FatalError::MissingParent {
                    class: class.name().to_string(),
                })?
            } else {
                class
            };

            // Argument expressions run before the target constructor is resolved.
            let forwarded = forward
                .arguments
                .evaluate(rt, &args)
                .map_err(|e| lift_exec_error(e, constructor_site(class, ctor)))?;
            let mut values = Vec::with_capacity(forwarded.len() + 1);
            values.push(Value::Object(obj.clone()));
            values.extend(forwarded);

            debug!(from = class.name(), to = target.name(), target_kind = ?forward.target, "forward constructor call");
            chain.visit(class);
            self.call_forward(rt, ctor, target, values, obj, chain, depth + 1)?;
        } else if let Some(parent) = class.parent().filter(|p| !p.is_root()) {
            chain.visit(class);
            let values = vec![Value::Object(obj.clone())];
            self.call_forward(rt, ctor, parent, values, obj, chain, depth + 1)?;
        }

        if first_call_to_class {
            run_initializers(rt, class, obj)?;
        }

        run_body(rt, class, ctor, &mut args)
    }

    /// Resolve and run the constructor of `target` that `from` forwards to.
    #[allow(clippy::too_many_arguments)]
    fn call_forward(
        &self,
        rt: &mut ThreadRuntime,
        from: &ConstructorMember,
        target: &ClassRef,
        values: Vec<Value>,
        obj: &ObjectRef,
        chain: &mut TypeChain,
        depth: usize,
    ) -> Result<(), EngineError> {
        let ctor = self
            .resolve(rt, target, &values, false)
            .ok_or_else(|| {
                GuestException::new(chain.not_found(target)).at(from.location().clone())
            })?;
        let args = bind_constructor_args(target, ctor, values)?;
        self.invoke_constructor(rt, target, ctor, args, obj, chain, depth)
    }
}

/// Index of the first constructor whose parameters accept `values`.
fn find_constructor(class: &ClassType, values: &[Value], match_this: bool) -> Option<usize> {
    let start = usize::from(!match_this);
    class.constructors().iter().position(|ctor| {
        let params = ctor.params();
        params.len() == values.len()
            && params
                .iter()
                .zip(values)
                .skip(start)
                .all(|(param, value)| accepts(param, value))
    })
}

fn accepts(param: &Parameter, value: &Value) -> bool {
    if param.is_untyped {
        return true;
    }
    match value.ty() {
        None => matches!(
            param.ty.kind(),
            TypeKind::Any | TypeKind::Class | TypeKind::Platform
        ),
        Some(ty) => ty.convertibility_to(&param.ty).is_safe(),
    }
}

/// Bind resolved values to a constructor's parameters and check them.
fn bind_constructor_args(
    class: &ClassType,
    ctor: &ConstructorMember,
    values: Vec<Value>,
) -> Result<Vec<Argument>, EngineError> {
    let mut args: Vec<Argument> = ctor
        .params()
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (param, value))| match i {
            0 => Argument::this(value),
            _ if param.is_untyped => Argument::new(param.name.clone(), value.into_any()),
            _ => Argument::new(param.name.clone(), value),
        })
        .collect();
    binder::check_arg_types(&constructor_site(class, ctor), &mut args, ctor.params())?;
    Ok(args)
}

fn constructor_site(class: &ClassType, ctor: &ConstructorMember) -> CallSite {
    CallSite::new(class.name(), Parameter::names(ctor.params())).at(ctor.location().clone())
}

fn initializer_site(class: &ClassType, initializer: &Initializer) -> CallSite {
    CallSite::new(format!("{}.{}", class.name(), initializer.field()), vec![])
        .at(initializer.location().clone())
}

/// Map a failure of a nested evaluation that is not a constructor body.
fn lift_exec_error(error: ExecError, callee: CallSite) -> EngineError {
    match error {
        ExecError::Thrown(ex) => ex.into(),
        ExecError::Failed { message } => FatalError::InvocationFailed { callee, message }.into(),
        ExecError::Fatal(e) => e.into(),
    }
}

/// Run the initializers declared directly on `class`, in declaration order.
fn run_initializers(
    rt: &mut ThreadRuntime,
    class: &ClassRef,
    obj: &ObjectRef,
) -> Result<(), EngineError> {
    for initializer in class.initializers() {
        let field = initializer.field();
        let decl = class.field(field).ok_or_else(|| FatalError::UnknownField {
            class: class.name().to_string(),
            field: field.to_string(),
        })?;
        trace!(class = class.name(), field, "run initializer");

        let mut args = vec![Argument::this(Value::reference(obj.clone()))];
        rt.push_frame(class.name())?;
        rt.bind(julian_core::types::THIS, Value::reference(obj.clone()));
        let result = initializer.executable().execute(rt, &mut args);
        rt.pop_frame();

        let site = initializer_site(class, initializer);
        let value = result.map_err(|e| lift_exec_error(e, site.clone()))?;
        let value = coerce_field_value(value, &decl.ty, site)?;

        let _lift = obj.lift_const(class, field)?;
        obj.set_field(class, field, value)?;
    }
    Ok(())
}

/// Convert an initializer result to the declared field type.
fn coerce_field_value(value: Value, ty: &Type, site: CallSite) -> Result<Value, EngineError> {
    if value.is_generic_null() {
        return Ok(match ty.kind() {
            TypeKind::Class | TypeKind::Platform => Value::typed_null(ty.clone()),
            _ => value,
        });
    }

    let actual = match (value.ty(), value.any_content()) {
        (_, Some(content)) if !ty.is_any() => content.ty(),
        (own, _) => own,
    };
    let conv = match &actual {
        Some(actual) => actual.convertibility_to(ty),
        None if ty.is_object() || ty.is_any() => Convertibility::Equivalent,
        None => Convertibility::Unconvertible,
    };
    if !conv.is_safe() {
        return Err(GuestError::TypeIncompatible {
            from: actual.map_or_else(|| "null".to_string(), |a| a.name().to_string()),
            to: ty.name().to_string(),
            callee: Some(site),
        }
        .into());
    }
    Ok(replicate(&value, Some(ty))?)
}

/// Run a constructor body against the instance.
fn run_body(
    rt: &mut ThreadRuntime,
    class: &ClassType,
    ctor: &ConstructorMember,
    args: &mut [Argument],
) -> Result<(), EngineError> {
    rt.push_frame(class.name())?;
    for arg in args.iter() {
        rt.bind(arg.name.clone(), arg.value.clone());
    }
    let result = ctor.body().execute(rt, args);
    rt.pop_frame();

    match result {
        Ok(_) => Ok(()),
        Err(ExecError::Thrown(mut ex)) => {
            let location = ex.location.clone();
            ex.add_stack_trace(class.name(), &Parameter::names(ctor.params()), location);
            Err(ex.into())
        }
        Err(other) => Err(lift_exec_error(other, constructor_site(class, ctor))),
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use julian_core::{
        ClassFlags, EngineConfig, FieldDecl, ForwardInfo, Initializer, NoopBody, evaluator,
        executable,
    };

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging(log: &Log, entry: &str) -> Arc<dyn julian_core::Executable> {
        let log = log.clone();
        let entry = entry.to_string();
        executable(move |_, _| {
            log.lock().push(entry.clone());
            Ok(Value::Void)
        })
    }

    fn logging_init(log: &Log, entry: &str, value: Value) -> Arc<dyn julian_core::Executable> {
        let log = log.clone();
        let entry = entry.to_string();
        executable(move |_, _| {
            log.lock().push(entry.clone());
            Ok(value.clone())
        })
    }

    fn construct(class: &ClassRef, values: Vec<Value>) -> Result<ObjectRef, EngineError> {
        ObjectFactory::uncached().construct_class(&mut ThreadRuntime::default(), class, values.into())
    }

    #[test]
    fn abstract_classes_cannot_be_instantiated() {
        let shape = ClassType::builder("Shape")
            .flags(ClassFlags::ABSTRACT)
            .build();
        let err = construct(&shape, vec![]).unwrap_err();
        assert!(matches!(
            err.guest_error(),
            Some(GuestError::RuntimeCheck { .. })
        ));
    }

    #[test]
    fn attribute_base_cannot_be_instantiated() {
        let err = construct(attribute_class(), vec![]).unwrap_err();
        assert!(err.to_string().contains("Attribute"));
    }

    #[test]
    fn representation_follows_flags() {
        let author = ClassType::builder("Author")
            .parent(attribute_class().clone())
            .build();
        let bag = ClassType::builder("Bag").flags(ClassFlags::DYNAMIC).build();
        let shell = ClassType::builder("Shell").flags(ClassFlags::HOSTED).build();
        let plain = ClassType::builder("Plain").build();

        assert_eq!(construct(&author, vec![]).unwrap().kind(), ObjectKind::Attribute);
        assert_eq!(construct(&bag, vec![]).unwrap().kind(), ObjectKind::Dynamic);
        assert_eq!(construct(&shell, vec![]).unwrap().kind(), ObjectKind::Hosted);
        assert_eq!(construct(&plain, vec![]).unwrap().kind(), ObjectKind::Plain);
    }

    #[test]
    fn first_declared_match_wins() {
        let log = Log::default();
        let class = ClassType::builder("P")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("s", Type::string())],
                logging(&log, "string"),
            ))
            .constructor(ConstructorMember::new(
                vec![Parameter::new("f", Type::float())],
                logging(&log, "float"),
            ))
            .constructor(ConstructorMember::new(
                vec![Parameter::new("i", Type::int())],
                logging(&log, "int"),
            ))
            .build();

        construct(&class, vec![Value::Int(1)]).unwrap();
        construct(&class, vec![Value::string("x")]).unwrap();
        assert_eq!(*log.lock(), vec!["float", "string"]);
    }

    #[test]
    fn super_forward_runs_parent_first() {
        let log = Log::default();
        let base = ClassType::builder("Base")
            .field(FieldDecl::new("b", Type::int()))
            .initializer(Initializer::new("b", logging_init(&log, "Base.init", Value::Int(1))))
            .constructor(ConstructorMember::new(
                vec![Parameter::new("x", Type::int())],
                logging(&log, "Base(x)"),
            ))
            .build();
        let derived = ClassType::builder("Derived")
            .parent(base.clone())
            .field(FieldDecl::new("d", Type::int()))
            .initializer(Initializer::new("d", logging_init(&log, "Derived.init", Value::Int(2))))
            .constructor(
                ConstructorMember::new(
                    vec![Parameter::new("x", Type::int())],
                    logging(&log, "Derived(x)"),
                )
                .with_forward(ForwardInfo::super_(evaluator(|_, args| {
                    Ok(vec![Argument::find(args, "x").cloned().unwrap_or(Value::Int(0))])
                }))),
            )
            .build();

        let obj = construct(&derived, vec![Value::Int(5)]).unwrap();
        assert_eq!(
            *log.lock(),
            vec!["Base.init", "Base(x)", "Derived.init", "Derived(x)"]
        );
        assert_eq!(obj.field(&base, "b").unwrap(), Value::Int(1));
        assert_eq!(obj.field(&derived, "d").unwrap(), Value::Int(2));
    }

    #[test]
    fn this_chain_runs_initializers_once() {
        let log = Log::default();
        let base = ClassType::builder("Base")
            .field(FieldDecl::new("n", Type::int()))
            .initializer(Initializer::new("n", logging_init(&log, "Base.init", Value::Int(1))))
            .build();
        let derived = ClassType::builder("Derived")
            .parent(base)
            .field(FieldDecl::new("d", Type::int()))
            .initializer(Initializer::new("d", logging_init(&log, "Derived.init", Value::Int(2))))
            .constructor(
                ConstructorMember::new(vec![], logging(&log, "Derived()"))
                    .with_forward(ForwardInfo::this(evaluator(|_, _| Ok(vec![Value::Int(7)])))),
            )
            .constructor(
                ConstructorMember::new(
                    vec![Parameter::new("x", Type::int())],
                    logging(&log, "Derived(x)"),
                )
                .with_forward(ForwardInfo::this(evaluator(|_, args| {
                    let x = Argument::find(args, "x").cloned().unwrap_or(Value::Int(0));
                    Ok(vec![x, Value::Int(0)])
                }))),
            )
            .constructor(ConstructorMember::new(
                vec![Parameter::new("x", Type::int()), Parameter::new("y", Type::int())],
                logging(&log, "Derived(x,y)"),
            ))
            .build();

        construct(&derived, vec![]).unwrap();
        assert_eq!(
            *log.lock(),
            vec![
                "Base.init",
                "Derived.init",
                "Derived(x,y)",
                "Derived(x)",
                "Derived()"
            ]
        );
    }

    #[test]
    fn not_found_chain_names_derived_and_base() {
        let base = ClassType::builder("Base").build();
        let derived = ClassType::builder("Derived").parent(base).build();

        let err = construct(&derived, vec![Value::Int(1)]).unwrap_err();
        assert_eq!(
            err.guest_error(),
            Some(&GuestError::ConstructorNotFound {
                class: "Derived".into(),
                chain: vec!["Derived".into(), "Base".into()],
            })
        );
    }

    #[test]
    fn forward_resolution_failure_reports_visited_chain() {
        let base = ClassType::builder("Base")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("s", Type::string())],
                Arc::new(NoopBody),
            ))
            .build();
        let derived = ClassType::builder("Derived")
            .parent(base)
            .constructor(
                ConstructorMember::new(vec![Parameter::new("x", Type::int())], Arc::new(NoopBody))
                    .with_forward(ForwardInfo::super_(evaluator(|_, _| Ok(vec![Value::Int(1)])))),
            )
            .build();

        let err = construct(&derived, vec![Value::Int(1)]).unwrap_err();
        assert_eq!(
            err.guest_error(),
            Some(&GuestError::ConstructorNotFound {
                class: "Base".into(),
                chain: vec!["Derived".into(), "Base".into()],
            })
        );
    }

    #[test]
    fn implicit_parent_call_needs_parameterless_constructor() {
        let base = ClassType::builder("Base")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("x", Type::int())],
                Arc::new(NoopBody),
            ))
            .build();
        let derived = ClassType::builder("Derived").parent(base).build();

        let err = construct(&derived, vec![]).unwrap_err();
        assert!(matches!(
            err.guest_error(),
            Some(GuestError::ConstructorNotFound { class, .. }) if class == "Base"
        ));
    }

    #[test]
    fn forward_arguments_are_evaluated_before_resolution() {
        let log = Log::default();
        let base = ClassType::builder("Base").build();
        let evaluated = log.clone();
        let derived = ClassType::builder("Derived")
            .parent(base)
            .constructor(
                ConstructorMember::new(vec![], Arc::new(NoopBody)).with_forward(
                    ForwardInfo::super_(evaluator(move |_, _| {
                        evaluated.lock().push("evaluated".into());
                        Ok(vec![Value::Int(1)])
                    })),
                ),
            )
            .build();

        assert!(construct(&derived, vec![]).is_err());
        assert_eq!(*log.lock(), vec!["evaluated"]);
    }

    #[test]
    fn super_without_parent_is_fatal() {
        let root = julian_core::object_class().clone();
        let ctor = ConstructorMember::new(vec![], Arc::new(NoopBody))
            .with_forward(ForwardInfo::super_(evaluator(|_, _| Ok(vec![]))));
        let mut rt = ThreadRuntime::default();
        let obj = Object::allocate(&root, ObjectKind::Plain).unwrap();
        let err = ObjectFactory::uncached()
            .invoke_constructor(
                &mut rt,
                &root,
                &ctor,
                vec![Argument::this(Value::Object(obj.clone()))],
                &obj,
                &mut TypeChain::new(),
                0,
            )
            .unwrap_err();
        assert!(matches!(
            err.as_fatal(),
            Some(FatalError::MissingParent { .. })
        ));
    }

    #[test]
    fn const_fields_are_written_by_initializers_only() {
        let class = ClassType::builder("Id")
            .field(FieldDecl::constant("value", Type::float()))
            .initializer(Initializer::new(
                "value",
                executable(|_, _| Ok(Value::Int(3))),
            ))
            .build();

        let obj = construct(&class, vec![]).unwrap();
        assert_eq!(obj.field(&class, "value").unwrap(), Value::Float(3.0));
        assert!(obj.set_field(&class, "value", Value::Float(1.0)).is_err());
    }

    #[test]
    fn initializer_result_must_fit_field_type() {
        let class = ClassType::builder("Id")
            .field(FieldDecl::constant("value", Type::int()))
            .initializer(Initializer::new(
                "value",
                executable(|_, _| Ok(Value::string("oops"))),
            ))
            .build();
        let err = construct(&class, vec![]).unwrap_err();
        assert!(matches!(
            err.guest_error(),
            Some(GuestError::TypeIncompatible { .. })
        ));
    }

    #[test]
    fn body_exceptions_gain_a_constructor_frame() {
        let class = ClassType::builder("Fragile")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("n", Type::int())],
                executable(|_, _| Err(GuestError::thrown("Exception", "no").into())),
            ))
            .build();
        let err = construct(&class, vec![Value::Int(1)]).unwrap_err();
        let frames = err.as_guest().unwrap().stack_trace();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].to_string(), "Fragile(this,n)");
    }

    #[test]
    fn runaway_this_forwarding_overflows() {
        let class = ClassType::builder("Loop")
            .constructor(
                ConstructorMember::new(vec![], Arc::new(NoopBody))
                    .with_forward(ForwardInfo::this(evaluator(|_, _| Ok(vec![])))),
            )
            .build();
        let mut rt = ThreadRuntime::new(EngineConfig::default().with_max_forward_depth(8));
        let err = ObjectFactory::uncached()
            .construct_class(&mut rt, &class, CtorArgs::Values(vec![]))
            .unwrap_err();
        assert!(matches!(
            err.guest_error(),
            Some(GuestError::StackOverflow { limit: 8, .. })
        ));
    }

    #[test]
    fn resolution_is_cached_per_engine() {
        let cache = CtorCache::new();
        let class = ClassType::builder("Point")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("x", Type::int())],
                Arc::new(NoopBody),
            ))
            .build();
        let factory = ObjectFactory::new(&cache);
        let mut rt = ThreadRuntime::default();

        factory
            .construct_class(&mut rt, &class, vec![Value::Int(1)].into())
            .unwrap();
        factory
            .construct_class(&mut rt, &class, vec![Value::Int(2)].into())
            .unwrap();
        assert_eq!(cache.len(), 1);

        let mut uncached_rt = ThreadRuntime::new(EngineConfig::default().with_constructor_cache(false));
        factory
            .construct_class(&mut uncached_rt, &class, vec![Value::Byte(2)].into())
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn non_class_types_are_rejected() {
        let err = ObjectFactory::uncached()
            .construct(&mut ThreadRuntime::default(), &Type::int(), CtorArgs::Values(vec![]))
            .unwrap_err();
        assert!(matches!(err.as_fatal(), Some(FatalError::NotAClass { .. })));
    }

    #[test]
    fn same_named_classes_keep_separate_cache_entries() {
        let log = Log::default();
        let first = ClassType::builder("Point")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("x", Type::int())],
                logging(&log, "first(int)"),
            ))
            .build();
        let second = ClassType::builder("Point")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("s", Type::string())],
                logging(&log, "second(string)"),
            ))
            .constructor(ConstructorMember::new(
                vec![Parameter::new("x", Type::int())],
                logging(&log, "second(int)"),
            ))
            .build();
        let cache = CtorCache::new();
        let factory = ObjectFactory::new(&cache);
        let mut rt = ThreadRuntime::default();

        factory
            .construct_class(&mut rt, &first, vec![Value::Int(1)].into())
            .unwrap();
        factory
            .construct_class(&mut rt, &second, vec![Value::Int(1)].into())
            .unwrap();
        assert_eq!(*log.lock(), vec!["first(int)", "second(int)"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn unmatched_new_expression_reports_its_location() {
        let class = ClassType::builder("Point").build();
        let site = SourceLocation::new("main.jul", 3);
        let err = ObjectFactory::uncached()
            .at(site.clone())
            .construct_class(&mut ThreadRuntime::default(), &class, vec![Value::Int(1)].into())
            .unwrap_err();
        let ex = err.as_guest().unwrap();
        assert!(matches!(ex.error, GuestError::ConstructorNotFound { .. }));
        assert_eq!(ex.location, site);
    }

    #[test]
    fn unmatched_forward_reports_the_forwarding_constructor() {
        let base = ClassType::builder("Base")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("s", Type::string())],
                Arc::new(NoopBody),
            ))
            .build();
        let site = SourceLocation::new("derived.jul", 9);
        let derived = ClassType::builder("Derived")
            .parent(base)
            .constructor(
                ConstructorMember::new(vec![], Arc::new(NoopBody))
                    .with_forward(ForwardInfo::super_(evaluator(|_, _| Ok(vec![Value::Int(1)]))))
                    .with_location(site.clone()),
            )
            .build();
        let err = construct(&derived, vec![]).unwrap_err();
        assert_eq!(err.as_guest().unwrap().location, site);
    }

    #[test]
    fn constructor_argument_errors_name_the_constructor() {
        let site = SourceLocation::new("point.jul", 2);
        let class = ClassType::builder("Point")
            .constructor(
                ConstructorMember::new(vec![Parameter::new("x", Type::float())], Arc::new(NoopBody))
                    .with_location(site.clone()),
            )
            .build();
        let obj = ObjectFactory::allocate(&class).unwrap();
        let ctor = &class.constructors()[0];

        let err = bind_constructor_args(&class, ctor, vec![Value::Object(obj), Value::Bool(true)])
            .unwrap_err();
        match err.guest_error() {
            Some(GuestError::TypeIncompatible { callee: Some(callee), .. }) => {
                assert_eq!(callee.to_string(), "Point(this,x)");
                assert_eq!(callee.location, site);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn initializer_errors_name_the_field() {
        let site = SourceLocation::new("id.jul", 5);
        let class = ClassType::builder("Id")
            .field(FieldDecl::new("value", Type::int()))
            .initializer(
                Initializer::new("value", executable(|_, _| Ok(Value::Bool(true))))
                    .with_location(site.clone()),
            )
            .build();
        let err = construct(&class, vec![]).unwrap_err();
        match err.guest_error() {
            Some(GuestError::TypeIncompatible { callee: Some(callee), .. }) => {
                assert_eq!(callee.name, "Id.value");
                assert_eq!(callee.location, site);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn generic_null_matches_platform_parameters() {
        let file = Type::Platform(Arc::new(julian_core::PlatformType::new(Arc::new(
            julian_core::HostClass::new("java.io.File"),
        ))));
        let log = Log::default();
        let class = ClassType::builder("Reader")
            .constructor(ConstructorMember::new(
                vec![Parameter::new("n", Type::int())],
                logging(&log, "Reader(int)"),
            ))
            .constructor(ConstructorMember::new(
                vec![Parameter::new("f", file)],
                logging(&log, "Reader(File)"),
            ))
            .build();

        construct(&class, vec![Value::generic_null()]).unwrap();
        assert_eq!(*log.lock(), vec!["Reader(File)"]);
    }

    #[test]
    fn abstract_check_precedes_hosted_representation() {
        let shape = ClassType::builder("Shape")
            .flags(ClassFlags::ABSTRACT)
            .build();
        let canvas = ClassType::builder("Canvas")
            .parent(shape.clone())
            .flags(ClassFlags::HOSTED)
            .build();
        assert_eq!(construct(&canvas, vec![]).unwrap().kind(), ObjectKind::Hosted);

        let sketch = ClassType::builder("Sketch")
            .parent(shape)
            .flags(ClassFlags::HOSTED | ClassFlags::ABSTRACT)
            .build();
        let err = construct(&sketch, vec![]).unwrap_err();
        assert!(err.to_string().contains("Cannot instantiate an abstract class: Sketch"));
    }
}
