//! The engine facade.

use julian_core::{
    EngineConfig, EngineError, EngineProperty, FunctionType, ObjectRef, SourceLocation,
    ThreadRuntime, Type, Value,
};
use julian_runtime::{CtorArgs, CtorCache, Invoker, ObjectFactory, declare_variable};
use tracing::{debug, info};

use crate::PropertyError;

/// Owns the configuration and engine-wide caches.
///
/// Threads snapshot the configuration when they are created, so property
/// changes only reach threads created afterwards.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    ctor_cache: CtorCache,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        info!(?config, "engine created");
        Self {
            config,
            ctor_cache: CtorCache::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_property(&mut self, property: EngineProperty, value: usize) {
        self.config.set(property, value);
        if property == EngineProperty::CacheConstructorLookups && value == 0 {
            self.ctor_cache.clear();
        }
        debug!(?property, value, "engine property set");
    }

    pub fn property(&self, property: EngineProperty) -> usize {
        self.config.get(property)
    }

    /// Set a property by its numeric id.
    pub fn set_property_id(&mut self, id: u32, value: usize) -> Result<(), PropertyError> {
        let property =
            EngineProperty::try_from(id).map_err(|_| PropertyError::UnknownProperty(id))?;
        self.set_property(property, value);
        Ok(())
    }

    /// Read a property by its numeric id.
    pub fn property_id(&self, id: u32) -> Result<usize, PropertyError> {
        EngineProperty::try_from(id)
            .map(|property| self.property(property))
            .map_err(|_| PropertyError::UnknownProperty(id))
    }

    /// A fresh execution context for one guest thread.
    pub fn new_thread(&self) -> ThreadRuntime {
        ThreadRuntime::new(self.config.clone())
    }

    pub fn ctor_cache(&self) -> &CtorCache {
        &self.ctor_cache
    }

    /// Evaluate `new ty(values...)`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn construct_object(
        &self,
        rt: &mut ThreadRuntime,
        ty: &Type,
        values: Vec<Value>,
    ) -> Result<ObjectRef, EngineError> {
        self.construct_with(rt, ty, CtorArgs::Values(values), SourceLocation::unknown())
    }

    /// Evaluate the `new ty(...)` expression at `location`, with arguments
    /// that may still be unevaluated.
    pub fn construct_with(
        &self,
        rt: &mut ThreadRuntime,
        ty: &Type,
        args: CtorArgs,
        location: SourceLocation,
    ) -> Result<ObjectRef, EngineError> {
        ObjectFactory::new(&self.ctor_cache)
            .at(location)
            .construct(rt, ty, args)
    }

    /// Call `func` with plain values. `instance` is the receiver of a method.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn invoke_function(
        &self,
        rt: &mut ThreadRuntime,
        func: &FunctionType,
        values: Vec<Value>,
        instance: Option<Value>,
    ) -> Result<Value, EngineError> {
        Invoker::from_config(rt.config()).invoke_method_internal(rt, func, values, instance)
    }

    /// Declare a variable in the current scope of `rt`.
    pub fn declare_variable(
        &self,
        rt: &mut ThreadRuntime,
        name: &str,
        ty: &Type,
        value: Option<Value>,
    ) -> Result<Value, EngineError> {
        declare_variable(rt, name, ty, value)
    }
}
