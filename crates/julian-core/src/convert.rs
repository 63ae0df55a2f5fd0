//! The convertibility lattice.
//!
//! [`convertibility`] ranks how safely a value of one type may be used where a
//! value of another type is expected. It is pure and total: every pair of types
//! yields exactly one [`Convertibility`].
//!
//! ## Basic Types
//!
//! Conversions among `bool`, `char`, `float`, `int` and `byte` follow a fixed
//! table (row = from, column = to):
//!
//! ```text
//!          bool     char     float    int      byte
//! bool     Equiv    Unconv   Unconv   Cast     Cast
//! char     Unconv   Equiv    Unconv   Cast     Cast
//! float    Unconv   Unconv   Equiv    Demote   Demote
//! int      Cast     Cast     Promote  Equiv    Demote
//! byte     Cast     Cast     Promote  Promote  Equiv
//! ```

use crate::types::{BasicKind, Type};

/// How safely a value of one type can be used where another is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convertibility {
    /// Same type.
    Equivalent,
    /// Widening numeric conversion.
    Promoted,
    /// Narrowing numeric conversion.
    Demoted,
    /// Requires an explicit cast.
    Castable,
    /// Subtype to supertype.
    Downgraded,
    /// No conversion exists.
    Unconvertible,
    /// Depends on the runtime content of an `Any` value.
    Unsafe,
}

impl Convertibility {
    /// Conversions that may happen implicitly.
    pub fn is_safe(self) -> bool {
        matches!(
            self,
            Convertibility::Equivalent
                | Convertibility::Promoted
                | Convertibility::Demoted
                | Convertibility::Downgraded
        )
    }
}

use Convertibility::{
    Castable as C, Demoted as D, Equivalent as E, Promoted as P, Unconvertible as U,
};

/// Indexed by [`BasicKind::index`], row = from, column = to.
const BASIC_TABLE: [[Convertibility; 5]; 5] = [
    //  bool  char  float int  byte
    [E, U, U, C, C], // bool
    [U, E, U, C, C], // char
    [U, U, E, D, D], // float
    [C, C, P, E, D], // int
    [C, C, P, P, E], // byte
];

fn basic(from: BasicKind, to: BasicKind) -> Convertibility {
    BASIC_TABLE[from.index()][to.index()]
}

/// How safely a value of type `from` can be used where `to` is expected.
pub fn convertibility(from: &Type, to: &Type) -> Convertibility {
    match (from, to) {
        (Type::Any, Type::Any) => Convertibility::Equivalent,
        (Type::Any, _) => Convertibility::Unsafe,
        (Type::Void, Type::Void) => Convertibility::Equivalent,
        (Type::Void, _) => Convertibility::Unconvertible,
        (_, Type::Any) => Convertibility::Downgraded,
        (_, Type::Void) => Convertibility::Unconvertible,

        (Type::Basic(a), Type::Basic(b)) => basic(*a, *b),
        (Type::Basic(_), Type::Class(c)) if c.is_string() => Convertibility::Castable,
        (Type::Basic(_), _) => Convertibility::Unconvertible,

        (Type::Class(c), Type::Basic(_)) if c.is_string() => Convertibility::Castable,
        (Type::Class(a), Type::Class(b)) => {
            if a.hash() == b.hash() {
                Convertibility::Equivalent
            } else if a.is_derived_from(b, false) {
                Convertibility::Downgraded
            } else {
                Convertibility::Unconvertible
            }
        }
        (Type::Class(c), Type::Platform(p)) => c
            .mapped_host()
            .and_then(|host| p.host().assignability_from(host))
            .unwrap_or(Convertibility::Unconvertible),

        (Type::Platform(a), Type::Platform(b)) => b
            .host()
            .assignability_from(a.host())
            .unwrap_or(Convertibility::Unconvertible),
        (Type::Platform(p), Type::Class(c)) => c
            .mapped_host()
            .and_then(|host| host.assignability_from(p.host()))
            .unwrap_or(Convertibility::Unconvertible),

        (Type::Class(_), _) | (Type::Platform(_), _) => Convertibility::Unconvertible,
    }
}
