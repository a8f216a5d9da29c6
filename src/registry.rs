//! Core registry: policy-checked registration and lazy, exactly-once resolution.
//!
//! Every abstraction has at most one entry, which is either a pending factory or a
//! resolved instance. The first successful [`Registry::get`] turns a pending entry
//! into a resolved one; every later call returns the same `Arc`.
//!
//! # Locking
//!
//! The entry table sits behind an `RwLock` that is only held for map operations.
//! Each pending entry owns its own construction gate, which is held across the
//! "still pending? -> invoke factory -> store" sequence. A factory may therefore
//! resolve other abstractions from the same registry, and registrations never wait
//! for an unrelated construction to finish.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::{
    AbstractionId, EntryKind, RegisterPolicy, RegistryError, RegistryEvent, SharedError,
};

/// Error type accepted from fallible factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because registries are shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Type-erased `Arc<A>`.
type Instance = Arc<dyn Any + Send + Sync>;

type Factory = Box<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

struct Pending {
    factory: Factory,
    /// Number of failed constructions so far.
    failures: AtomicU64,
    /// Held while the factory runs. Stores the most recent failure so callers that
    /// waited on a failing construction get the same error back.
    gate: Mutex<Option<SharedError>>,
}

impl Pending {
    fn new(factory: Factory) -> Self {
        Self {
            factory,
            failures: AtomicU64::new(0),
            gate: Mutex::new(None),
        }
    }
}

enum Entry {
    Pending(Arc<Pending>),
    Resolved(Instance),
}

impl Entry {
    fn is_pending(&self, pending: &Arc<Pending>) -> bool {
        matches!(self, Entry::Pending(current) if Arc::ptr_eq(current, pending))
    }
}

/// Thread-safe registry mapping abstractions to lazily created, shared instances.
///
/// Use [`Registry::new`] for an isolated registry (tests, plugins) or
/// [`Registry::global`] for the process-wide one.
///
/// # Examples
///
/// ```rust
/// use singleton_container::{RegisterPolicy, Registry};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let registry = Registry::new();
/// registry
///     .register_factory::<dyn Greeter, _>(
///         || Arc::new(English) as Arc<dyn Greeter>,
///         RegisterPolicy::None,
///     )
///     .unwrap();
///
/// let first = registry.get::<dyn Greeter>().unwrap();
/// let second = registry.get::<dyn Greeter>().unwrap();
/// assert_eq!(first.greet(), "hello");
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct Registry {
    entries: RwLock<HashMap<AbstractionId, Entry>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.read();
        let resolved = entries
            .values()
            .filter(|entry| matches!(entry, Entry::Resolved(_)))
            .count();
        f.debug_struct("Registry")
            .field("pending", &(entries.len() - resolved))
            .field("resolved", &resolved)
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry, independent of the global one.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            trace: Mutex::new(None),
        }
    }

    /// The process-wide registry. See [`crate::instance`].
    pub fn global() -> &'static Registry {
        crate::instance()
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked after the registry has released its locks, so it may
    /// call back into the same registry.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback. Registered values are not affected.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Registers a factory for the abstraction `A`.
    ///
    /// Nothing is constructed until the first [`get`](Self::get). The factory runs at
    /// most once per successful construction.
    ///
    /// Once `A` has a constructed instance, later factories never displace it: under
    /// every policy other than `None` the registration is accepted as a no-op.
    ///
    /// # Errors
    ///
    /// - `AlreadyRegistered` under [`RegisterPolicy::None`] when `A` has an entry
    /// - `NotRegistered` under [`RegisterPolicy::Replace`] when `A` has no entry
    pub fn register_factory<A, F>(
        &self,
        factory: F,
        policy: RegisterPolicy,
    ) -> Result<(), RegistryError>
    where
        A: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<A> + Send + Sync + 'static,
    {
        self.register_fallible_factory::<A, _, std::convert::Infallible>(
            move || Ok(factory()),
            policy,
        )
    }

    /// Registers a factory that may fail.
    ///
    /// A failure is reported to the caller of [`get`](Self::get) as
    /// `ConstructionFailed`; the entry stays pending and the next `get` tries again.
    pub fn register_fallible_factory<A, F, E>(
        &self,
        factory: F,
        policy: RegisterPolicy,
    ) -> Result<(), RegistryError>
    where
        A: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<A>, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        let factory: Factory = Box::new(move || -> Result<Instance, BoxError> {
            match factory() {
                Ok(instance) => Ok(Arc::new(instance) as Instance),
                Err(err) => Err(err.into()),
            }
        });

        self.insert_entry(
            AbstractionId::of::<A>(),
            EntryKind::Factory,
            policy,
            Entry::Pending(Arc::new(Pending::new(factory))),
        )
    }

    /// Registers a ready value. Takes ownership and wraps it in an `Arc`.
    pub fn register_instance<T: Send + Sync + 'static>(
        &self,
        value: T,
        policy: RegisterPolicy,
    ) -> Result<(), RegistryError> {
        self.register_instance_arc(Arc::new(value), policy)
    }

    /// Registers an `Arc`-wrapped value for the abstraction `A`.
    ///
    /// Name the abstraction explicitly to register an implementation under a trait:
    /// `register_instance_arc::<dyn Greeter>(Arc::new(English), policy)`.
    pub fn register_instance_arc<A: ?Sized + Send + Sync + 'static>(
        &self,
        instance: Arc<A>,
        policy: RegisterPolicy,
    ) -> Result<(), RegistryError> {
        self.insert_entry(
            AbstractionId::of::<A>(),
            EntryKind::Instance,
            policy,
            Entry::Resolved(Arc::new(instance)),
        )
    }

    fn insert_entry(
        &self,
        id: AbstractionId,
        kind: EntryKind,
        policy: RegisterPolicy,
        entry: Entry,
    ) -> Result<(), RegistryError> {
        // Displaced entries are dropped after the lock is released.
        let outcome = {
            let mut entries = self.write();
            let current = entries.get(&id);
            let exists = current.is_some();
            // A constructed instance outlives any later factory for the same abstraction.
            let keeps_instance =
                kind == EntryKind::Factory && matches!(current, Some(Entry::Resolved(_)));
            match policy {
                RegisterPolicy::None if exists => Err(RegistryError::AlreadyRegistered {
                    type_name: id.type_name(),
                }),
                RegisterPolicy::Replace if !exists => Err(RegistryError::NotRegistered {
                    type_name: id.type_name(),
                }),
                RegisterPolicy::SkipIfRegistered if exists => Ok(None),
                _ if keeps_instance => Ok(None),
                _ => Ok(Some(entries.insert(id, entry))),
            }
        };

        let applied = match outcome {
            Ok(displaced) => displaced.is_some(),
            Err(err) => {
                debug!(
                    abstraction = id.type_name(),
                    %kind,
                    %policy,
                    error = %err,
                    "registration rejected"
                );
                return Err(err);
            }
        };

        debug!(
            abstraction = id.type_name(),
            %kind,
            %policy,
            applied,
            "registration accepted"
        );
        self.emit_event(&RegistryEvent::Register {
            type_name: id.type_name(),
            kind,
            applied,
        });

        Ok(())
    }

    // -------------------------------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------------------------------

    /// Retrieves the instance registered for the abstraction `A`.
    ///
    /// A pending factory is invoked on first access; concurrent callers wait for that
    /// single construction and receive the same `Arc`.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` if `A` has neither a factory nor an instance
    /// - `ConstructionFailed` if the factory failed (the entry stays pending)
    pub fn get<A: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<A>, RegistryError> {
        let id = AbstractionId::of::<A>();

        let result = self.resolve(id).and_then(|instance| {
            instance
                .downcast_ref::<Arc<A>>()
                .cloned()
                .ok_or(RegistryError::TypeMismatch {
                    type_name: id.type_name(),
                })
        });

        trace!(abstraction = id.type_name(), found = result.is_ok(), "get");
        self.emit_event(&RegistryEvent::Get {
            type_name: id.type_name(),
            found: result.is_ok(),
        });

        result
    }

    /// Retrieves a clone of the instance registered for `T`.
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(&self) -> Result<T, RegistryError> {
        let arc = self.get::<T>()?;
        Ok((*arc).clone())
    }

    fn resolve(&self, id: AbstractionId) -> Result<Instance, RegistryError> {
        let pending = match self.read().get(&id) {
            Some(Entry::Resolved(instance)) => return Ok(Arc::clone(instance)),
            Some(Entry::Pending(pending)) => Arc::clone(pending),
            None => {
                return Err(RegistryError::NotRegistered {
                    type_name: id.type_name(),
                })
            }
        };

        self.materialize(id, pending)
    }

    fn materialize(
        &self,
        id: AbstractionId,
        mut pending: Arc<Pending>,
    ) -> Result<Instance, RegistryError> {
        loop {
            let seen_failures = pending.failures.load(Ordering::Acquire);
            let mut last_failure = pending
                .gate
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            // Re-check under the gate: another caller may have finished first.
            match self.read().get(&id) {
                Some(Entry::Resolved(instance)) => return Ok(Arc::clone(instance)),
                Some(entry) if entry.is_pending(&pending) => {}
                Some(Entry::Pending(current)) => {
                    // Re-registered while we waited.
                    let current = Arc::clone(current);
                    drop(last_failure);
                    pending = current;
                    continue;
                }
                None => {
                    return Err(RegistryError::NotRegistered {
                        type_name: id.type_name(),
                    })
                }
            }

            if pending.failures.load(Ordering::Acquire) != seen_failures {
                if let Some(source) = last_failure.as_ref() {
                    return Err(RegistryError::ConstructionFailed {
                        type_name: id.type_name(),
                        source: Arc::clone(source),
                    });
                }
            }

            debug!(abstraction = id.type_name(), "constructing instance");

            match (pending.factory)() {
                Ok(instance) => {
                    let promoted = {
                        let mut entries = self.write();
                        match entries.get_mut(&id) {
                            Some(entry) if entry.is_pending(&pending) => {
                                *entry = Entry::Resolved(Arc::clone(&instance));
                                true
                            }
                            _ => false,
                        }
                    };
                    drop(last_failure);

                    if !promoted {
                        debug!(
                            abstraction = id.type_name(),
                            "entry changed during construction, instance not cached"
                        );
                    }
                    self.emit_event(&RegistryEvent::Construct {
                        type_name: id.type_name(),
                        succeeded: true,
                    });
                    return Ok(instance);
                }
                Err(err) => {
                    let source: SharedError = Arc::from(err);
                    *last_failure = Some(Arc::clone(&source));
                    pending.failures.fetch_add(1, Ordering::Release);
                    drop(last_failure);

                    warn!(abstraction = id.type_name(), error = %source, "construction failed");
                    self.emit_event(&RegistryEvent::Construct {
                        type_name: id.type_name(),
                        succeeded: false,
                    });
                    return Err(RegistryError::ConstructionFailed {
                        type_name: id.type_name(),
                        source,
                    });
                }
            }
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------------------------------

    /// Check if the abstraction `A` has an entry, pending or resolved.
    pub fn contains<A: ?Sized + Send + Sync + 'static>(&self) -> bool {
        let id = AbstractionId::of::<A>();
        let found = self.read().contains_key(&id);

        trace!(abstraction = id.type_name(), found, "contains");
        self.emit_event(&RegistryEvent::Contains {
            type_name: id.type_name(),
            found,
        });

        found
    }

    /// Check if the abstraction `A` already has a constructed instance.
    pub fn is_resolved<A: ?Sized + Send + Sync + 'static>(&self) -> bool {
        matches!(
            self.read().get(&AbstractionId::of::<A>()),
            Some(Entry::Resolved(_))
        )
    }

    /// Number of registered abstractions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove all entries from the registry.
    ///
    /// Intended for tests. Already retrieved `Arc<T>` references remain valid and the
    /// tracing callback is kept.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.emit_event(&RegistryEvent::Clear {});

        let drained: Vec<Entry> = self.write().drain().map(|(_, entry)| entry).collect();
        drop(drained);
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<AbstractionId, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<AbstractionId, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
