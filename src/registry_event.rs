use std::fmt;

/// What a registration stored: a factory awaiting first use or a ready instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Factory,
    Instance,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Factory => f.write_str("factory"),
            EntryKind::Instance => f.write_str("instance"),
        }
    }
}

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use singleton_container::{EntryKind, RegistryEvent};
///
/// let event = RegistryEvent::Register {
///     type_name: "i32",
///     kind: EntryKind::Instance,
///     applied: true,
/// };
/// assert_eq!(
///     event.to_string(),
///     "register { type_name: i32, kind: instance, applied: true }"
/// );
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A registration passed its policy check.
    Register {
        /// The abstraction the entry was registered under
        type_name: &'static str,
        /// Factory or instance registration
        kind: EntryKind,
        /// `false` when an existing entry was kept in place
        applied: bool,
    },

    /// A value was requested from the registry.
    Get {
        /// The abstraction that was requested
        type_name: &'static str,
        /// Whether an instance was returned
        found: bool,
    },

    /// A pending factory was invoked.
    Construct {
        type_name: &'static str,
        succeeded: bool,
    },

    /// A type existence check was performed.
    Contains {
        type_name: &'static str,
        found: bool,
    },

    /// The registry was cleared.
    Clear {},
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Register {
                type_name,
                kind,
                applied,
            } => write!(
                f,
                "register {{ type_name: {type_name}, kind: {kind}, applied: {applied} }}"
            ),
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Construct {
                type_name,
                succeeded,
            } => write!(
                f,
                "construct {{ type_name: {type_name}, succeeded: {succeeded} }}"
            ),
            RegistryEvent::Contains { type_name, found } => {
                write!(f, "contains {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Clear {} => write!(f, "clear {{}}"),
        }
    }
}
