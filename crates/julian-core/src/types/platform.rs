//! Platform (host) types.
//!
//! A platform type exposes a host class to scripts. Script classes may also be
//! *mapped* onto a host class, which makes them convertible to the platform
//! types that class is assignable to.

use std::fmt;
use std::sync::Arc;

use crate::{Convertibility, TypeHash};

/// A class in the host's own type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostClass {
    name: String,
    parent: Option<Arc<HostClass>>,
    interfaces: Vec<Arc<HostClass>>,
}

impl HostClass {
    /// Create a host class with no supertypes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
        }
    }

    /// Set the superclass.
    pub fn with_parent(mut self, parent: Arc<HostClass>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: Arc<HostClass>) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Fully qualified host class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a value of `source` can be stored where `self` is expected.
    pub fn is_assignable_from(&self, source: &HostClass) -> bool {
        if self.name == source.name {
            return true;
        }
        source
            .parent
            .iter()
            .chain(source.interfaces.iter())
            .any(|sup| self.is_assignable_from(sup))
    }

    /// Equivalent if identical, Downgraded if assignable, `None` otherwise.
    pub fn assignability_from(&self, source: &HostClass) -> Option<Convertibility> {
        if self.name == source.name {
            Some(Convertibility::Equivalent)
        } else if self.is_assignable_from(source) {
            Some(Convertibility::Downgraded)
        } else {
            None
        }
    }
}

/// A script-visible type backed by a host class.
#[derive(Debug, Clone)]
pub struct PlatformType {
    name: String,
    hash: TypeHash,
    host: Arc<HostClass>,
}

impl PlatformType {
    /// Expose a host class under its own name.
    pub fn new(host: Arc<HostClass>) -> Self {
        let name = host.name().to_string();
        Self {
            hash: TypeHash::from_name(&name),
            name,
            host,
        }
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type hash.
    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    /// The backing host class.
    pub fn host(&self) -> &Arc<HostClass> {
        &self.host
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignability_walks_parents_and_interfaces() {
        let object = Arc::new(HostClass::new("java.lang.Object"));
        let runnable = Arc::new(HostClass::new("java.lang.Runnable"));
        let thread = HostClass::new("java.lang.Thread")
            .with_parent(object.clone())
            .with_interface(runnable.clone());

        assert_eq!(
            thread.assignability_from(&thread),
            Some(Convertibility::Equivalent)
        );
        assert_eq!(
            object.assignability_from(&thread),
            Some(Convertibility::Downgraded)
        );
        assert_eq!(
            runnable.assignability_from(&thread),
            Some(Convertibility::Downgraded)
        );
        assert_eq!(thread.assignability_from(&object), None);
    }
}
