//! Heap objects.
//!
//! An [`Object`] is shared as an [`ObjectRef`] (`Arc<Object>`). Its
//! representation ([`ObjectRepr`]) is chosen when it is allocated and never
//! changes kind afterwards. Field slots are keyed by the defining class and
//! field name, so a field redeclared in a subclass does not shadow its parent's.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{Value, default_value};
use crate::types::{ClassRef, ClassType, Type, string_class};
use crate::{FatalError, TypeHash};

/// Shared handle to a heap object. Equality is identity.
pub type ObjectRef = Arc<Object>;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// The representation kinds an object can be allocated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// An ordinary script object.
    Plain,
    /// A shell around a host object.
    Hosted,
    /// An object with an open property bag.
    Dynamic,
    /// An instance of an attribute class.
    Attribute,
    /// A string.
    Str,
}

/// Slot holding the host object behind a hosted shell. Empty until the host
/// attaches one.
#[derive(Default)]
pub struct HostSlot {
    inner: RwLock<Option<Box<dyn Any + Send + Sync>>>,
}

impl HostSlot {
    /// Attach the host object, replacing any previous one.
    pub fn attach(&self, host: Box<dyn Any + Send + Sync>) {
        *self.inner.write() = Some(host);
    }

    pub fn is_attached(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Run `f` against the attached host object if it has type `T`.
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.inner.read();
        guard.as_ref()?.downcast_ref::<T>().map(f)
    }
}

/// The concrete representation of an object.
pub enum ObjectRepr {
    Plain,
    Hosted(HostSlot),
    Dynamic(RwLock<FxHashMap<String, Value>>),
    Attribute,
    Str(String),
}

impl ObjectRepr {
    fn for_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Plain => ObjectRepr::Plain,
            ObjectKind::Hosted => ObjectRepr::Hosted(HostSlot::default()),
            ObjectKind::Dynamic => ObjectRepr::Dynamic(RwLock::new(FxHashMap::default())),
            ObjectKind::Attribute => ObjectRepr::Attribute,
            ObjectKind::Str => ObjectRepr::Str(String::new()),
        }
    }

    /// The representation kind.
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRepr::Plain => ObjectKind::Plain,
            ObjectRepr::Hosted(_) => ObjectKind::Hosted,
            ObjectRepr::Dynamic(_) => ObjectKind::Dynamic,
            ObjectRepr::Attribute => ObjectKind::Attribute,
            ObjectRepr::Str(_) => ObjectKind::Str,
        }
    }
}

struct FieldSlot {
    name: String,
    value: Value,
    is_const: bool,
    lifted: bool,
}

/// A heap object.
pub struct Object {
    id: u64,
    class: ClassRef,
    repr: ObjectRepr,
    fields: RwLock<FxHashMap<TypeHash, FieldSlot>>,
}

impl Object {
    /// Allocate an instance of `class` with the given representation.
    ///
    /// Every field declared along the inheritance line is created holding the
    /// default value of its declared type.
    pub fn allocate(class: &ClassRef, kind: ObjectKind) -> Result<ObjectRef, FatalError> {
        let mut fields = FxHashMap::default();
        for owner in class.lineage() {
            for decl in owner.fields() {
                fields.insert(
                    TypeHash::from_field(owner.hash(), &decl.name),
                    FieldSlot {
                        name: decl.name.clone(),
                        value: default_value(&decl.ty)?,
                        is_const: decl.is_const,
                        lifted: false,
                    },
                );
            }
        }

        Ok(Arc::new(Object {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: class.clone(),
            repr: ObjectRepr::for_kind(kind),
            fields: RwLock::new(fields),
        }))
    }

    /// A string object.
    pub fn string(text: impl Into<String>) -> ObjectRef {
        Arc::new(Object {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: string_class().clone(),
            repr: ObjectRepr::Str(text.into()),
            fields: RwLock::new(FxHashMap::default()),
        })
    }

    /// Unique object id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The runtime class.
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// The runtime type.
    pub fn ty(&self) -> Type {
        Type::Class(self.class.clone())
    }

    pub fn repr(&self) -> &ObjectRepr {
        &self.repr
    }

    pub fn kind(&self) -> ObjectKind {
        self.repr.kind()
    }

    /// The text of a string object.
    pub fn as_str(&self) -> Option<&str> {
        match &self.repr {
            ObjectRepr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self.repr, ObjectRepr::Str(_))
    }

    /// The host slot of a hosted shell.
    pub fn host_slot(&self) -> Option<&HostSlot> {
        match &self.repr {
            ObjectRepr::Hosted(slot) => Some(slot),
            _ => None,
        }
    }

    fn unknown_field(&self, name: &str) -> FatalError {
        FatalError::UnknownField {
            class: self.class.name().to_string(),
            field: name.to_string(),
        }
    }

    /// Read the field `name` declared by `owner`.
    pub fn field(&self, owner: &ClassType, name: &str) -> Result<Value, FatalError> {
        self.fields
            .read()
            .get(&TypeHash::from_field(owner.hash(), name))
            .map(|slot| slot.value.clone())
            .ok_or_else(|| self.unknown_field(name))
    }

    /// Read a field by name, starting the search at the runtime class.
    pub fn field_by_name(&self, name: &str) -> Option<Value> {
        let fields = self.fields.read();
        self.class
            .lineage()
            .find_map(|owner| fields.get(&TypeHash::from_field(owner.hash(), name)))
            .map(|slot| slot.value.clone())
    }

    /// Write the field `name` declared by `owner`.
    pub fn set_field(&self, owner: &ClassType, name: &str, value: Value) -> Result<(), FatalError> {
        let mut fields = self.fields.write();
        let slot = fields
            .get_mut(&TypeHash::from_field(owner.hash(), name))
            .ok_or_else(|| self.unknown_field(name))?;
        if slot.is_const && !slot.lifted {
            return Err(FatalError::ConstViolation {
                class: owner.name().to_string(),
                field: slot.name.clone(),
            });
        }
        slot.value = value;
        Ok(())
    }

    /// Temporarily allow writes to a const field. The protection is restored
    /// when the returned guard is dropped.
    pub fn lift_const(&self, owner: &ClassType, name: &str) -> Result<ConstLift<'_>, FatalError> {
        let key = TypeHash::from_field(owner.hash(), name);
        let mut fields = self.fields.write();
        let slot = fields.get_mut(&key).ok_or_else(|| self.unknown_field(name))?;
        slot.lifted = true;
        Ok(ConstLift { object: self, key })
    }

    /// Read a property of a dynamic object. Declared fields are found first.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.field_by_name(name).or_else(|| match &self.repr {
            ObjectRepr::Dynamic(bag) => bag.read().get(name).cloned(),
            _ => None,
        })
    }

    /// Add or replace a property of a dynamic object. Returns `false` if the
    /// object is not dynamic.
    pub fn set_property(&self, name: impl Into<String>, value: Value) -> bool {
        match &self.repr {
            ObjectRepr::Dynamic(bag) => {
                bag.write().insert(name.into(), value);
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Object {}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            ObjectRepr::Str(s) => write!(f, "Object#{}({:?})", self.id, s),
            repr => write!(f, "Object#{}({}, {:?})", self.id, self.class.name(), repr.kind()),
        }
    }
}

/// Scoped write permission for one const field.
pub struct ConstLift<'a> {
    object: &'a Object,
    key: TypeHash,
}

impl Drop for ConstLift<'_> {
    fn drop(&mut self) {
        if let Some(slot) = self.object.fields.write().get_mut(&self.key) {
            slot.lifted = false;
        }
    }
}
