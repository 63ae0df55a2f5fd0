//! Constructor resolution cache.
//!
//! Resolution depends only on the class and the types of the supplied values,
//! so the outcome (including "no match") is memoized per engine.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use julian_core::{TypeHash, Value};

/// Cache key: the class declaration, the type of each supplied value, and
/// whether the receiver takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CtorKey {
    class: TypeHash,
    shape: Vec<Option<TypeHash>>,
    match_this: bool,
}

impl CtorKey {
    pub fn new(class: TypeHash, values: &[Value], match_this: bool) -> Self {
        Self {
            class,
            shape: values.iter().map(|v| v.ty().map(|t| t.hash())).collect(),
            match_this,
        }
    }
}

/// Engine-owned memo of constructor overload resolution.
///
/// Values are the index of the selected constructor, or `None` when no
/// declared constructor matched.
#[derive(Debug, Default)]
pub struct CtorCache {
    entries: RwLock<FxHashMap<CtorKey, Option<usize>>>,
}

impl CtorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cached resolution. The outer `Option` is `None` on a miss.
    pub fn get(&self, key: &CtorKey) -> Option<Option<usize>> {
        self.entries.read().get(key).copied()
    }

    pub fn insert(&self, key: CtorKey, resolved: Option<usize>) {
        self.entries.write().insert(key, resolved);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Forget every entry, e.g. after class metadata was reloaded.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
