use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key under which an abstraction is registered and later requested.
///
/// Derived from the abstraction type with [`AbstractionId::of`]. The abstraction
/// may be unsized, so `dyn Trait` is a valid key and every implementation of that
/// trait is registered under the same identifier.
///
/// Equality and hashing only look at the `TypeId`; the type name is carried along
/// for error messages and tracing.
#[derive(Debug, Clone, Copy)]
pub struct AbstractionId {
    type_id: TypeId,
    type_name: &'static str,
}

impl AbstractionId {
    /// Identifier of the abstraction `A`.
    pub fn of<A: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<A>(),
            type_name: std::any::type_name::<A>(),
        }
    }

    /// The `TypeId` of the abstraction.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human readable name of the abstraction (e.g. `"alloc::string::String"`).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for AbstractionId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for AbstractionId {}

impl Hash for AbstractionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for AbstractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
