//! Macro for declaring additional named, process-wide registries.

/// Declares a module holding its own process-wide [`Registry`](crate::Registry).
///
/// The macro generates a module containing:
/// - A hidden `LazyLock<Registry>` static
/// - `instance()` returning that registry
/// - Free functions mirroring the crate-level ones (`register_factory`, `get`, ...)
///
/// # Examples
///
/// ```rust
/// use singleton_container::{define_registry, RegisterPolicy};
/// use std::sync::Arc;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::register_instance("db_connection".to_string(), RegisterPolicy::None).unwrap();
/// cache::register_factory(|| Arc::new("redis_connection".to_string()), RegisterPolicy::None)
///     .unwrap();
///
/// // No interference between registries
/// assert_eq!(&*database::get::<String>().unwrap(), "db_connection");
/// assert_eq!(&*cache::get::<String>().unwrap(), "redis_connection");
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            use $crate::{BoxError, RegisterPolicy, Registry, RegistryError, RegistryEvent};

            static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

            /// The registry owned by this module.
            pub fn instance() -> &'static Registry {
                &REGISTRY
            }

            /// Register a factory in the registry.
            pub fn register_factory<A, F>(
                factory: F,
                policy: RegisterPolicy,
            ) -> Result<(), RegistryError>
            where
                A: ?Sized + Send + Sync + 'static,
                F: Fn() -> Arc<A> + Send + Sync + 'static,
            {
                REGISTRY.register_factory(factory, policy)
            }

            /// Register a fallible factory in the registry.
            pub fn register_fallible_factory<A, F, E>(
                factory: F,
                policy: RegisterPolicy,
            ) -> Result<(), RegistryError>
            where
                A: ?Sized + Send + Sync + 'static,
                F: Fn() -> Result<Arc<A>, E> + Send + Sync + 'static,
                E: Into<BoxError> + 'static,
            {
                REGISTRY.register_fallible_factory(factory, policy)
            }

            /// Register a value in the registry.
            pub fn register_instance<T: Send + Sync + 'static>(
                value: T,
                policy: RegisterPolicy,
            ) -> Result<(), RegistryError> {
                REGISTRY.register_instance(value, policy)
            }

            /// Register an Arc-wrapped value in the registry.
            pub fn register_instance_arc<A: ?Sized + Send + Sync + 'static>(
                value: Arc<A>,
                policy: RegisterPolicy,
            ) -> Result<(), RegistryError> {
                REGISTRY.register_instance_arc(value, policy)
            }

            /// Retrieve a value from the registry.
            pub fn get<A: ?Sized + Send + Sync + 'static>() -> Result<Arc<A>, RegistryError> {
                REGISTRY.get()
            }

            /// Retrieve a cloned value from the registry.
            pub fn get_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, RegistryError> {
                REGISTRY.get_cloned()
            }

            /// Check if a type is registered in the registry.
            pub fn contains<A: ?Sized + Send + Sync + 'static>() -> bool {
                REGISTRY.contains::<A>()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::RegisterPolicy;
    use std::sync::Arc;

    #[test]
    fn test_define_registry_macro() {
        define_registry!(test_reg);

        test_reg::register_instance(100i32, RegisterPolicy::None).unwrap();
        let value: Arc<i32> = test_reg::get().unwrap();
        assert_eq!(*value, 100);

        assert!(test_reg::contains::<i32>());
        assert!(!test_reg::contains::<f64>());
    }

    #[test]
    fn test_multiple_registries() {
        define_registry!(reg_a);
        define_registry!(reg_b);

        reg_a::register_instance(1i32, RegisterPolicy::None).unwrap();
        reg_b::register_factory(|| Arc::new(2i32), RegisterPolicy::None).unwrap();

        let a_val: Arc<i32> = reg_a::get().unwrap();
        let b_val: Arc<i32> = reg_b::get().unwrap();

        assert_eq!(*a_val, 1);
        assert_eq!(*b_val, 2);
        assert!(!std::ptr::eq(reg_a::instance(), reg_b::instance()));
    }
}
