//! The process-wide registry and free functions delegating to it.
//!
//! # Examples
//!
//! ```
//! use singleton_container::{get, register_instance, RegisterPolicy};
//! use std::sync::Arc;
//!
//! // Register a value
//! register_instance("Hello, World!".to_string(), RegisterPolicy::None).unwrap();
//!
//! // Retrieve the value
//! let message: Arc<String> = get().unwrap();
//! assert_eq!(&*message, "Hello, World!");
//! ```

use std::sync::{Arc, LazyLock};

use crate::{BoxError, RegisterPolicy, Registry, RegistryError, RegistryEvent};

/// Global registry, created on first access and never torn down.
static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Returns the process-wide registry.
///
/// Every call returns the same object; concurrent first calls all observe the one
/// registry created by `LazyLock`.
pub fn instance() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// Registers a factory for `A` in the global registry.
///
/// # Examples
///
/// ```
/// use singleton_container::{get, register_factory, RegisterPolicy};
/// use std::sync::Arc;
///
/// struct Pool {
///     size: usize,
/// }
///
/// register_factory(|| Arc::new(Pool { size: 8 }), RegisterPolicy::None).unwrap();
///
/// let pool: Arc<Pool> = get().unwrap();
/// assert_eq!(pool.size, 8);
/// ```
pub fn register_factory<A, F>(factory: F, policy: RegisterPolicy) -> Result<(), RegistryError>
where
    A: ?Sized + Send + Sync + 'static,
    F: Fn() -> Arc<A> + Send + Sync + 'static,
{
    instance().register_factory(factory, policy)
}

/// Registers a fallible factory for `A` in the global registry.
pub fn register_fallible_factory<A, F, E>(
    factory: F,
    policy: RegisterPolicy,
) -> Result<(), RegistryError>
where
    A: ?Sized + Send + Sync + 'static,
    F: Fn() -> Result<Arc<A>, E> + Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    instance().register_fallible_factory(factory, policy)
}

/// Registers a value of type `T` in the global registry.
///
/// # Examples
///
/// ```
/// use singleton_container::{get, register_instance, RegisterPolicy};
/// use std::sync::Arc;
///
/// register_instance(42i32, RegisterPolicy::None).unwrap();
///
/// // A second strict registration is rejected
/// assert!(register_instance(7i32, RegisterPolicy::None).is_err());
///
/// let num: Arc<i32> = get().unwrap();
/// assert_eq!(*num, 42);
/// ```
pub fn register_instance<T: Send + Sync + 'static>(
    value: T,
    policy: RegisterPolicy,
) -> Result<(), RegistryError> {
    instance().register_instance(value, policy)
}

/// Registers an `Arc`-wrapped value for `A` in the global registry.
pub fn register_instance_arc<A: ?Sized + Send + Sync + 'static>(
    value: Arc<A>,
    policy: RegisterPolicy,
) -> Result<(), RegistryError> {
    instance().register_instance_arc(value, policy)
}

/// Retrieves the instance for `A` from the global registry, constructing it on
/// first access.
pub fn get<A: ?Sized + Send + Sync + 'static>() -> Result<Arc<A>, RegistryError> {
    instance().get()
}

/// Retrieves a clone of the value stored for `T` in the global registry.
pub fn get_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, RegistryError> {
    instance().get_cloned()
}

/// Checks if `A` has an entry in the global registry.
pub fn contains<A: ?Sized + Send + Sync + 'static>() -> bool {
    instance().contains::<A>()
}

/// Sets a tracing callback on the global registry.
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    instance().set_trace_callback(callback)
}

/// Clears the tracing callback of the global registry.
pub fn clear_trace_callback() {
    instance().clear_trace_callback()
}
