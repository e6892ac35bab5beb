//! Library handle and loader error-state behavior.

use std::sync::Mutex;

use oslink::{HandleError, HandleKind, Library, LoaderError, last_error};

// The loader error state is process-wide; tests that touch native
// loader calls serialize on this lock so the harness's parallel test
// threads cannot interleave a clear between a failure and its query.
static LOADER_STATE: Mutex<()> = Mutex::new(());

#[test]
fn unknown_option_fails_before_any_native_load() {
    // Pure validation, no native call, no lock needed.
    let err = Library::open("/lib/irrelevant.so", &["not-a-flag"]).unwrap_err();
    assert!(matches!(err, LoaderError::Option(_)));
    assert!(err.to_string().contains("not-a-flag"));
}

#[test]
fn missing_object_reports_and_records_the_error() {
    let _guard = LOADER_STATE.lock().unwrap();

    let err = Library::open("/no/such/object.so", &["now"]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("/no/such/object.so"), "got: {msg}");

    // The failure is queryable until the next loader operation.
    let recorded = last_error();
    assert!(!recorded.is_empty());
    assert_eq!(last_error(), recorded, "the query must not clear the state");
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn library_lifecycle_against_libm() {
    let _guard = LOADER_STATE.lock().unwrap();

    let mut lib = Library::open("libm.so.6", &["now", "global"]).unwrap();
    assert!(lib.is_live());
    assert!(last_error().is_empty());

    let cos = lib.symbol("cos").unwrap();
    assert_ne!(cos.addr(), 0);
    assert!(!cos.as_ptr().is_null());

    // A missing symbol fails and records the loader diagnostic.
    let err = lib.symbol("definitely_not_a_symbol_9917").unwrap_err();
    assert!(matches!(err, LoaderError::Symbol { .. }));
    assert!(!last_error().is_empty());

    assert!(lib.close());
    assert!(!lib.is_live());
    assert!(!lib.close());

    // Symbol resolution on a closed handle fails with the closed
    // condition, never reaching the native loader.
    let err = lib.symbol("cos").unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Handle(HandleError::Closed(HandleKind::Library))
    ));
}

#[test]
fn path_with_interior_nul_is_rejected() {
    let err = Library::open("/tmp/\0bad.so", &["now"]).unwrap_err();
    assert!(matches!(err, LoaderError::BadPath { .. }));
}
