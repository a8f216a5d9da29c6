//! # Singleton Container
//!
//! A thread-safe, process-wide object registry. Register a factory or a ready
//! instance under an abstraction (a concrete type or a `dyn Trait`) and retrieve the
//! single shared instance for it later.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_container::{get, register_factory, RegisterPolicy};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         1_700_000_000
//!     }
//! }
//!
//! // Nothing is constructed yet
//! register_factory::<dyn Clock, _>(
//!     || Arc::new(FixedClock) as Arc<dyn Clock>,
//!     RegisterPolicy::None,
//! )
//! .unwrap();
//!
//! // First access runs the factory, later ones share the same instance
//! let clock = get::<dyn Clock>().unwrap();
//! assert_eq!(clock.now(), 1_700_000_000);
//! assert!(Arc::ptr_eq(&clock, &get::<dyn Clock>().unwrap()));
//! ```
//!
//! ## Features
//!
//! - **Lazy**: factories run on first [`get`], at most once per successful construction
//! - **Thread-safe**: concurrent first accesses wait for one construction and share its result
//! - **Policies**: [`RegisterPolicy`] decides what happens when registering over an entry
//! - **Retryable**: a failed construction is reported and retried on the next `get`
//! - **Observable**: `tracing` events plus an optional [`RegistryEvent`] callback
//!
//! ## Main Functions
//!
//! - [`instance`] - The process-wide [`Registry`]
//! - [`register_factory`] / [`register_fallible_factory`] - Register a lazy factory
//! - [`register_instance`] / [`register_instance_arc`] - Register a ready value
//! - [`get`] - Retrieve the shared instance as `Arc<A>`
//! - [`contains`] - Check if an abstraction is registered
//! - [`define_registry!`] - Declare additional named process-wide registries

mod abstraction_id;
mod global;
mod macros;
mod register_policy;
mod registry;
mod registry_error;
mod registry_event;

pub use abstraction_id::AbstractionId;
pub use global::{
    clear_trace_callback, contains, get, get_cloned, instance, register_factory,
    register_fallible_factory, register_instance, register_instance_arc, set_trace_callback,
};
pub use register_policy::{ParsePolicyError, RegisterPolicy};
pub use registry::{BoxError, Registry, TraceCallback};
pub use registry_error::{RegistryError, SharedError};
pub use registry_event::{EntryKind, RegistryEvent};
