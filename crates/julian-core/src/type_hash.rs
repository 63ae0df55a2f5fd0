//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a type's qualified name. Two
//! types with the same name always produce the same hash, so hashes can be
//! used as cache keys before (or without) holding the type itself.
//!
//! Script classes are hashed per declaration with [`TypeHash::from_declaration`]:
//! two classes built under the same name are different types.
//!
//! ```
//! use julian_core::TypeHash;
//!
//! let a = TypeHash::from_name("Person");
//! let b = TypeHash::from_name("Person");
//! assert_eq!(a, b);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for field hashes
    pub const FIELD: u64 = 0x1a095090689d4647;
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a hash for the `seq`-th declaration of a type named `name`.
    #[inline]
    pub fn from_declaration(name: &str, seq: u64) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), seq.wrapping_add(1)))
    }

    /// Create a hash for a field declared on `owner`.
    #[inline]
    pub fn from_field(owner: TypeHash, field: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ owner.0.rotate_left(17) ^ xxh64(field.as_bytes(), 0))
    }

}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_hash() {
        assert_eq!(TypeHash::from_name("Person"), TypeHash::from_name("Person"));
        assert_ne!(TypeHash::from_name("Person"), TypeHash::from_name("Employee"));
    }

    #[test]
    fn field_hash_depends_on_owner() {
        let a = TypeHash::from_name("A");
        let b = TypeHash::from_name("B");
        assert_ne!(TypeHash::from_field(a, "x"), TypeHash::from_field(b, "x"));
        assert_ne!(TypeHash::from_field(a, "x"), TypeHash::from_field(a, "y"));
    }

    #[test]
    fn declarations_of_one_name_differ() {
        let first = TypeHash::from_declaration("Point", 0);
        assert_eq!(first, TypeHash::from_declaration("Point", 0));
        assert_ne!(first, TypeHash::from_declaration("Point", 1));
        assert_ne!(first, TypeHash::from_name("Point"));
    }
}
