use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a factory, shared between every caller that observed it.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Error kinds surfaced by registry operations.
///
/// Each variant carries the name of the abstraction involved.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A strict registration collided with an existing entry.
    #[error("{type_name} is already registered")]
    AlreadyRegistered { type_name: &'static str },

    /// Nothing is registered for the abstraction, either on lookup or when a
    /// `Replace` registration had nothing to replace.
    #[error("{type_name} is not registered")]
    NotRegistered { type_name: &'static str },

    /// The registered factory failed. The abstraction stays pending.
    #[error("failed to construct {type_name}: {source}")]
    ConstructionFailed {
        type_name: &'static str,
        source: SharedError,
    },

    /// The stored value is not an `Arc` of the requested abstraction.
    #[error("{type_name} is stored as a different type")]
    TypeMismatch { type_name: &'static str },
}

impl RegistryError {
    /// Name of the abstraction the error refers to.
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryError::AlreadyRegistered { type_name }
            | RegistryError::NotRegistered { type_name }
            | RegistryError::ConstructionFailed { type_name, .. }
            | RegistryError::TypeMismatch { type_name } => type_name,
        }
    }

    pub fn is_already_registered(&self) -> bool {
        matches!(self, RegistryError::AlreadyRegistered { .. })
    }

    pub fn is_not_registered(&self) -> bool {
        matches!(self, RegistryError::NotRegistered { .. })
    }

    pub fn is_construction_failed(&self) -> bool {
        matches!(self, RegistryError::ConstructionFailed { .. })
    }
}
