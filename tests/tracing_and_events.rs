//! Integration tests for tracing and event monitoring.
//!
//! The trace callback sees every registration, lookup, construction and
//! existence check, which is useful for debugging and logging.

use singleton_container::{define_registry, RegisterPolicy, RegistryEvent};
use std::sync::{Arc, Mutex};

fn collect(events: &Arc<Mutex<Vec<String>>>) -> impl Fn(&RegistryEvent) + Send + Sync + 'static {
    let events = events.clone();
    move |event: &RegistryEvent| events.lock().unwrap().push(event.to_string())
}

#[test]
fn test_basic_tracing() {
    define_registry!(traced1);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced1::set_trace_callback(collect(&events));

    traced1::register_instance(42i32, RegisterPolicy::None).unwrap();
    let _: Arc<i32> = traced1::get().unwrap();
    let _ = traced1::contains::<i32>();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert!(captured[0].starts_with("register"));
    assert!(captured[1].starts_with("get"));
    assert!(captured[2].starts_with("contains"));
}

#[test]
fn test_trace_lazy_construction() {
    define_registry!(traced2);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced2::set_trace_callback(collect(&events));

    traced2::register_factory(|| Arc::new(999u32), RegisterPolicy::None).unwrap();
    let _ = traced2::get::<u32>();
    let _ = traced2::get::<u32>();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "register { type_name: u32, kind: factory, applied: true }",
            "construct { type_name: u32, succeeded: true }",
            "get { type_name: u32, found: true }",
            "get { type_name: u32, found: true }",
        ]
    );

    traced2::clear_trace_callback();
}

#[test]
fn test_trace_get_found_and_not_found() {
    define_registry!(traced3);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced3::set_trace_callback(collect(&events));

    traced3::register_instance(123i64, RegisterPolicy::None).unwrap();
    let _: Arc<i64> = traced3::get().unwrap();
    let _ = traced3::get::<f32>();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[1], "get { type_name: i64, found: true }");
    assert_eq!(captured[2], "get { type_name: f32, found: false }");

    traced3::clear_trace_callback();
}

#[test]
fn test_trace_failed_construction() {
    define_registry!(traced4);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced4::set_trace_callback(collect(&events));

    traced4::register_fallible_factory(
        || -> Result<Arc<u16>, String> { Err("no capacity".to_string()) },
        RegisterPolicy::None,
    )
    .unwrap();
    let _ = traced4::get::<u16>();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[1], "construct { type_name: u16, succeeded: false }");
    assert_eq!(captured[2], "get { type_name: u16, found: false }");

    traced4::clear_trace_callback();
}

#[test]
fn test_rejected_registration_is_not_traced() {
    define_registry!(traced5);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced5::set_trace_callback(collect(&events));

    traced5::register_instance(1u8, RegisterPolicy::None).unwrap();
    assert!(traced5::register_instance(2u8, RegisterPolicy::None).is_err());
    assert!(traced5::register_instance(1i8, RegisterPolicy::Replace).is_err());

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 1);
}

#[test]
fn test_clear_trace_callback_stops_events() {
    define_registry!(traced6);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced6::set_trace_callback(collect(&events));

    traced6::register_instance(10u16, RegisterPolicy::None).unwrap();
    assert_eq!(events.lock().unwrap().len(), 1);

    traced6::clear_trace_callback();

    traced6::register_instance(20u16, RegisterPolicy::AddOrReplace).unwrap();
    let _ = traced6::get::<u16>();
    let _ = traced6::contains::<u16>();

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_event_pattern_matching() {
    define_registry!(traced7);

    let constructions = Arc::new(Mutex::new(Vec::new()));
    let constructions_clone = constructions.clone();

    traced7::set_trace_callback(move |event| {
        if let RegistryEvent::Construct {
            type_name,
            succeeded,
        } = event
        {
            constructions_clone
                .lock()
                .unwrap()
                .push((*type_name, *succeeded));
        }
    });

    traced7::register_factory(|| Arc::new(String::from("lazy")), RegisterPolicy::None).unwrap();
    traced7::register_instance(5u8, RegisterPolicy::None).unwrap();
    let _ = traced7::get::<String>();
    let _ = traced7::get::<u8>();

    let captured = constructions.lock().unwrap();
    assert_eq!(*captured, vec![("alloc::string::String", true)]);
}
