//! Engine configuration.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Configuration shared by every thread of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Tolerate argument-count and void-return mismatches by substituting defaults.
    pub loose_typing: bool,
    /// Maximum number of frames on a thread's call stack.
    pub max_call_depth: usize,
    /// Maximum depth of `this(...)` / `super(...)` constructor forwarding.
    pub max_forward_depth: usize,
    /// Memoize constructor overload resolution per engine.
    pub cache_constructor_lookups: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            loose_typing: false,
            max_call_depth: 1024,
            max_forward_depth: 256,
            cache_constructor_lookups: true,
        }
    }
}

impl EngineConfig {
    /// Enable or disable loose typing.
    pub fn with_loose_typing(mut self, loose: bool) -> Self {
        self.loose_typing = loose;
        self
    }

    /// Set the call-stack depth limit.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Set the constructor-forwarding depth limit.
    pub fn with_max_forward_depth(mut self, depth: usize) -> Self {
        self.max_forward_depth = depth;
        self
    }

    /// Enable or disable the constructor resolution cache.
    pub fn with_constructor_cache(mut self, enabled: bool) -> Self {
        self.cache_constructor_lookups = enabled;
        self
    }

    /// Set a property by numeric value. Boolean properties treat non-zero as `true`.
    pub fn set(&mut self, property: EngineProperty, value: usize) {
        match property {
            EngineProperty::LooseTyping => self.loose_typing = value != 0,
            EngineProperty::MaxCallDepth => self.max_call_depth = value,
            EngineProperty::MaxForwardDepth => self.max_forward_depth = value,
            EngineProperty::CacheConstructorLookups => self.cache_constructor_lookups = value != 0,
        }
    }

    /// Read a property as a numeric value.
    pub fn get(&self, property: EngineProperty) -> usize {
        match property {
            EngineProperty::LooseTyping => self.loose_typing as usize,
            EngineProperty::MaxCallDepth => self.max_call_depth,
            EngineProperty::MaxForwardDepth => self.max_forward_depth,
            EngineProperty::CacheConstructorLookups => self.cache_constructor_lookups as usize,
        }
    }
}

/// Engine properties addressable by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum EngineProperty {
    /// Loose typing (default: false).
    LooseTyping = 1,
    /// Maximum call depth (default: 1024).
    MaxCallDepth = 2,
    /// Maximum constructor forwarding depth (default: 256).
    MaxForwardDepth = 3,
    /// Cache constructor resolution (default: true).
    CacheConstructorLookups = 4,
}
