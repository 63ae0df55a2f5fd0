//! Class types.
//!
//! A [`ClassType`] is immutable once built. Classes are shared as [`ClassRef`]
//! (`Arc<ClassType>`) so that metadata can be read concurrently by every guest
//! thread without locking.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use lazy_static::lazy_static;

use super::{ConstructorMember, FieldDecl, HostClass, Initializer};
use crate::TypeHash;

static NEXT_DECLARATION: AtomicU64 = AtomicU64::new(0);

/// Shared handle to an immutable class type.
pub type ClassRef = Arc<ClassType>;

bitflags! {
    /// Class properties that decide how instances are allocated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u32 {
        /// Cannot be instantiated.
        const ABSTRACT = 1 << 0;
        /// Instances are shells around a host object.
        const HOSTED = 1 << 1;
        /// Instances accept properties not declared by the class.
        const DYNAMIC = 1 << 2;
        /// Derives from the built-in `Attribute` class.
        const ATTRIBUTE = 1 << 3;
        /// Cannot be derived from.
        const FINAL = 1 << 4;
    }
}

lazy_static! {
    static ref OBJECT_CLASS: ClassRef = ClassTypeBuilder::root("Object").build();
    static ref STRING_CLASS: ClassRef = ClassType::builder("string")
        .flags(ClassFlags::FINAL)
        .build();
    static ref ATTRIBUTE_CLASS: ClassRef = ClassType::builder("Attribute")
        .flags(ClassFlags::ATTRIBUTE | ClassFlags::ABSTRACT)
        .build();
}

/// The root of every class hierarchy.
pub fn object_class() -> &'static ClassRef {
    &OBJECT_CLASS
}

/// The built-in string class.
pub fn string_class() -> &'static ClassRef {
    &STRING_CLASS
}

/// The root of all attribute classes.
pub fn attribute_class() -> &'static ClassRef {
    &ATTRIBUTE_CLASS
}

/// A script (or built-in) class.
pub struct ClassType {
    name: String,
    hash: TypeHash,
    parent: Option<ClassRef>,
    flags: ClassFlags,
    fields: Vec<FieldDecl>,
    constructors: Vec<ConstructorMember>,
    initializers: Vec<Initializer>,
    mapped: Option<Arc<HostClass>>,
}

impl ClassType {
    /// Start building a class that derives from `Object` unless a parent is given.
    pub fn builder(name: impl Into<String>) -> ClassTypeBuilder {
        ClassTypeBuilder::new(name.into())
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type hash.
    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    /// Parent class. Only `Object` has none.
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// Class flags.
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ClassFlags::ABSTRACT)
    }

    pub fn is_hosted(&self) -> bool {
        self.flags.contains(ClassFlags::HOSTED)
    }

    pub fn is_dynamic(&self) -> bool {
        self.flags.contains(ClassFlags::DYNAMIC)
    }

    pub fn is_attribute(&self) -> bool {
        self.flags.contains(ClassFlags::ATTRIBUTE)
    }

    /// Fields declared directly on this class, in declaration order.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// A field declared directly on this class.
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared constructors, in declaration order.
    pub fn constructors(&self) -> &[ConstructorMember] {
        &self.constructors
    }

    /// Field initializers declared directly on this class, in declaration order.
    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }

    /// The host class this script class is mapped onto.
    pub fn mapped_host(&self) -> Option<&Arc<HostClass>> {
        self.mapped.as_ref()
    }

    /// This class followed by each ancestor up to `Object`.
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// Whether this class is `other` or derives from it.
    pub fn is_derived_from(&self, other: &ClassType, include_self: bool) -> bool {
        self.lineage()
            .skip(usize::from(!include_self))
            .any(|c| c.hash == other.hash)
    }

    /// `Object` or `Attribute`; the implicit parent constructor call stops here.
    pub fn is_root(&self) -> bool {
        self.hash == OBJECT_CLASS.hash || self.hash == ATTRIBUTE_CLASS.hash
    }

    /// Whether this is the built-in string class.
    pub fn is_string(&self) -> bool {
        self.hash == STRING_CLASS.hash
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for ClassType {}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassType")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("flags", &self.flags)
            .field("fields", &self.fields)
            .field("constructors", &self.constructors.len())
            .field("initializers", &self.initializers.len())
            .finish()
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Iterator over a class and its ancestors.
pub struct Lineage<'a> {
    next: Option<&'a ClassType>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a ClassType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

/// Builder for [`ClassType`].
pub struct ClassTypeBuilder {
    name: String,
    parent: Option<ClassRef>,
    is_root: bool,
    flags: ClassFlags,
    fields: Vec<FieldDecl>,
    constructors: Vec<ConstructorMember>,
    initializers: Vec<Initializer>,
    mapped: Option<Arc<HostClass>>,
}

impl ClassTypeBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            is_root: false,
            flags: ClassFlags::empty(),
            fields: Vec::new(),
            constructors: Vec::new(),
            initializers: Vec::new(),
            mapped: None,
        }
    }

    fn root(name: &str) -> Self {
        let mut builder = Self::new(name.to_string());
        builder.is_root = true;
        builder
    }

    /// Set the parent class.
    pub fn parent(mut self, parent: ClassRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add class flags.
    pub fn flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Declare a field.
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a constructor.
    pub fn constructor(mut self, ctor: ConstructorMember) -> Self {
        self.constructors.push(ctor);
        self
    }

    /// Declare a field initializer.
    pub fn initializer(mut self, initializer: Initializer) -> Self {
        self.initializers.push(initializer);
        self
    }

    /// Map this class onto a host class.
    pub fn mapped_to(mut self, host: Arc<HostClass>) -> Self {
        self.mapped = Some(host);
        self
    }

    /// Finish the class.
    ///
    /// Every build declares a new type, even under a name already in use.
    /// Without an explicit parent the class derives from `Object`. A class that
    /// declares no constructor receives the parameterless default constructor.
    pub fn build(self) -> ClassRef {
        let parent = match (self.parent, self.is_root) {
            (Some(parent), _) => Some(parent),
            (None, true) => None,
            (None, false) => Some(object_class().clone()),
        };

        let mut flags = self.flags;
        if parent.as_ref().is_some_and(|p| p.is_attribute()) {
            flags |= ClassFlags::ATTRIBUTE;
        }

        let mut constructors = self.constructors;
        if constructors.is_empty() {
            constructors.push(ConstructorMember::default_ctor());
        }

        Arc::new(ClassType {
            hash: TypeHash::from_declaration(
                &self.name,
                NEXT_DECLARATION.fetch_add(1, Ordering::Relaxed),
            ),
            name: self.name,
            parent,
            flags,
            fields: self.fields,
            constructors,
            initializers: self.initializers,
            mapped: self.mapped,
        })
    }
}
