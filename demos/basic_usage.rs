//! Basic usage example for singleton-container.
//!
//! Demonstrates:
//! - Registering a lazy factory under a trait abstraction
//! - Registering a ready instance
//! - Conflict handling with `RegisterPolicy`
//! - Retrying a factory that fails on first use
//!
//! Run with: `cargo run --example basic_usage`

use singleton_container::{define_registry, RegisterPolicy, RegistryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(app);

trait Storage: Send + Sync {
    fn describe(&self) -> String;
}

struct MemoryStorage {
    capacity: usize,
}

impl Storage for MemoryStorage {
    fn describe(&self) -> String {
        format!("in-memory storage ({} slots)", self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct AppConfig {
    name: String,
    version: u32,
}

fn main() -> Result<(), RegistryError> {
    println!("=== singleton-container: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Register a ready instance
    // -------------------------------------------------------------------------
    println!("1. Registering configuration...");

    app::register_instance(
        AppConfig {
            name: "demo".to_string(),
            version: 1,
        },
        RegisterPolicy::None,
    )?;

    let config: AppConfig = app::get_cloned()?;
    println!("   {} v{}\n", config.name, config.version);

    // -------------------------------------------------------------------------
    // 2. Register a lazy factory under a trait
    // -------------------------------------------------------------------------
    println!("2. Registering storage factory (nothing built yet)...");

    app::register_factory::<dyn Storage, _>(
        || {
            println!("   -> building storage");
            Arc::new(MemoryStorage { capacity: 64 }) as Arc<dyn Storage>
        },
        RegisterPolicy::None,
    )?;

    let storage = app::get::<dyn Storage>()?;
    let again = app::get::<dyn Storage>()?;
    println!("   {}", storage.describe());
    println!("   same instance: {}\n", Arc::ptr_eq(&storage, &again));

    // -------------------------------------------------------------------------
    // 3. Policies
    // -------------------------------------------------------------------------
    println!("3. Registering over existing entries...");

    match app::register_instance(AppConfig::default_config(), RegisterPolicy::None) {
        Err(err) => println!("   strict: {err}"),
        Ok(()) => println!("   strict: unexpectedly accepted"),
    }
    app::register_instance(AppConfig::default_config(), RegisterPolicy::SkipIfRegistered)?;
    println!("   skip: still {:?}", app::get_cloned::<AppConfig>()?.name);
    app::register_instance(AppConfig::default_config(), RegisterPolicy::Replace)?;
    println!("   replace: now {:?}\n", app::get_cloned::<AppConfig>()?.name);

    // -------------------------------------------------------------------------
    // 4. Failed construction is retried on the next access
    // -------------------------------------------------------------------------
    println!("4. Flaky factory...");

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    app::register_fallible_factory(
        move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("remote not reachable yet".to_string())
            } else {
                Ok(Arc::new(42u64))
            }
        },
        RegisterPolicy::None,
    )?;

    if let Err(err) = app::get::<u64>() {
        println!("   first access: {err}");
    }
    println!("   second access: {}", app::get::<u64>()?);
    println!("   attempts: {}", attempts.load(Ordering::SeqCst));

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

impl AppConfig {
    fn default_config() -> Self {
        AppConfig {
            name: "fallback".to_string(),
            version: 0,
        }
    }
}
