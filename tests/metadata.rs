// tests/metadata.rs

//! Integration tests for batch metadata retrieval and handle lifecycle.
//!
//! These tests verify that:
//! 1. Batch outcomes come back in input order, one per resolved input
//! 2. A failing item never aborts its siblings
//! 3. Attribute acquisitions and releases stay paired, failures included
//! 4. Owned handles release when their item completes; borrowed ones do not

mod common;

use common::{engine_with, win32_attrs, FakeApi, FakeLib, FakeResolver, LibSpec};
use std::rc::Rc;
use tlbtool::{ErrorKind, HResult, LibraryKey, LibrarySource, LibraryVersion, Subject, SysKind};
use uuid::Uuid;

fn guid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[test]
fn test_batch_outcomes_in_input_order_with_single_failure() {
    let api = FakeApi::new();
    api.add_library("a.tlb", LibSpec::new("LibA", win32_attrs(guid(1), 1, 0, 0)));
    api.add_library("c.tlb", LibSpec::new("LibC", win32_attrs(guid(3), 3, 0, 0)));

    let resolver = FakeResolver::new()
        .wildcard("a*", &["a.tlb"])
        .wildcard("b*", &[])
        .wildcard("c*", &["c.tlb"]);

    let (engine, _counters) = engine_with(api, resolver);
    let patterns = vec!["a*".to_string(), "b*".to_string(), "c*".to_string()];
    let outcomes = engine.metadata(&LibrarySource::Paths(&patterns));

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_ref().unwrap().name, "LibA");

    let err = outcomes[1].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
    assert_eq!(*err.subject(), Subject::Path("b*".to_string()));
    assert_eq!(err.native_code(), Some(HResult::FILE_NOT_FOUND));

    assert_eq!(outcomes[2].as_ref().unwrap().name, "LibC");
}

#[test]
fn test_wildcard_expands_to_multiple_results() {
    let api = FakeApi::new();
    api.add_library("a.tlb", LibSpec::new("LibA", win32_attrs(guid(1), 1, 0, 0)));
    api.add_library("b.tlb", LibSpec::new("LibB", win32_attrs(guid(2), 1, 0, 0)));

    let resolver = FakeResolver::new().wildcard("*.tlb", &["a.tlb", "b.tlb"]);
    let (engine, _counters) = engine_with(api, resolver);

    let patterns = vec!["*.tlb".to_string()];
    let outcomes = engine.metadata(&LibrarySource::Paths(&patterns));

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].as_ref().unwrap().name, "LibA");
    assert_eq!(outcomes[1].as_ref().unwrap().name, "LibB");
}

#[test]
fn test_unhandled_provider_is_not_implemented() {
    let resolver = FakeResolver::new().provider("Registry::HKLM\\x", "Registry");
    let (engine, _counters) = engine_with(FakeApi::new(), resolver);

    let patterns = vec!["Registry::HKLM\\x".to_string()];
    let outcomes = engine.metadata(&LibrarySource::Paths(&patterns));

    assert_eq!(outcomes.len(), 1);
    let err = outcomes[0].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert_eq!(*err.subject(), Subject::Provider("Registry".to_string()));
}

#[test]
fn test_missing_literal_yields_resource_unavailable_and_no_handle() {
    let (engine, counters) = engine_with(FakeApi::new(), FakeResolver::new());

    let literals = vec!["C:\\nope.tlb".to_string()];
    let outcomes = engine.import(&LibrarySource::LiteralPaths(&literals));

    assert_eq!(outcomes.len(), 1);
    let err = outcomes[0].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
    assert_eq!(*err.subject(), Subject::Path("C:\\nope.tlb".to_string()));

    // No load was even attempted, so no handle exists to leak.
    assert_eq!(counters.loads.get(), 0);
    assert_eq!(counters.dropped_libs.get(), 0);
}

#[test]
fn test_inspected_attributes_match_exactly() {
    let g = guid(0x1234_5678_9abc_def0);
    let spec = LibSpec::new("Widgets", win32_attrs(g, 2, 1, 0));
    let counters = Rc::default();
    let lib = FakeLib::new(spec, counters);

    let (engine, _counters) = engine_with(FakeApi::new(), FakeResolver::new());
    let outcomes = engine.metadata(&LibrarySource::Handle(&lib));

    assert_eq!(outcomes.len(), 1);
    let metadata = outcomes[0].as_ref().unwrap();
    assert_eq!(metadata.attributes.guid, g);
    assert_eq!(metadata.attributes.version, LibraryVersion::new(2, 1));
    assert_eq!(metadata.attributes.lcid, 0);
    assert_eq!(metadata.attributes.syskind, SysKind::Win32);
    assert_eq!(metadata.source_file, None);
    assert_eq!(metadata.name, "Widgets");
}

#[test]
fn test_attribute_release_pairs_with_acquire_across_failures() {
    let api = FakeApi::new();
    api.add_library("ok.tlb", LibSpec::new("Ok", win32_attrs(guid(1), 1, 0, 0)));
    api.add_library(
        "broken.tlb",
        LibSpec::new("Broken", win32_attrs(guid(2), 1, 0, 0)).with_failing_doc(),
    );

    let resolver = FakeResolver::new().literal("ok.tlb").literal("broken.tlb");
    let (engine, counters) = engine_with(api, resolver);

    let literals = vec!["ok.tlb".to_string(), "broken.tlb".to_string()];
    let outcomes = engine.metadata(&LibrarySource::LiteralPaths(&literals));

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_ok());
    // The documentation failure is classified and scoped to its path.
    let err = outcomes[1].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResult);
    assert_eq!(*err.subject(), Subject::Path("broken.tlb".to_string()));

    // The mid-extraction failure still released its attribute block.
    assert!(counters.acquired.get() > 0);
    assert_eq!(counters.acquired.get(), counters.released.get());
}

#[test]
fn test_owned_handles_release_when_their_item_completes() {
    let api = FakeApi::new();
    api.add_library("ok.tlb", LibSpec::new("Ok", win32_attrs(guid(1), 1, 0, 0)));
    api.add_library(
        "broken.tlb",
        LibSpec::new("Broken", win32_attrs(guid(2), 1, 0, 0)).with_failing_doc(),
    );

    let resolver = FakeResolver::new().literal("ok.tlb").literal("broken.tlb");
    let (engine, counters) = engine_with(api, resolver);

    let literals = vec!["ok.tlb".to_string(), "broken.tlb".to_string()];
    let _outcomes = engine.metadata(&LibrarySource::LiteralPaths(&literals));

    // Both loads completed their item, so both handles are gone, the
    // failed one included.
    assert_eq!(counters.loads.get(), 2);
    assert_eq!(counters.dropped_libs.get(), 2);
}

#[test]
fn test_borrowed_handle_is_not_released() {
    let spec = LibSpec::new("Kept", win32_attrs(guid(7), 1, 0, 0));
    let counters = Rc::default();
    let lib = FakeLib::new(spec, Rc::clone(&counters));

    let (engine, _engine_counters) = engine_with(FakeApi::new(), FakeResolver::new());
    let outcomes = engine.metadata(&LibrarySource::Handle(&lib));

    assert!(outcomes[0].is_ok());
    // The caller still owns the handle; the operation released nothing.
    assert_eq!(counters.dropped_libs.get(), 0);
    drop(lib);
    assert_eq!(counters.dropped_libs.get(), 1);
}

#[test]
fn test_registered_triple_reports_catalog_path() {
    let g = guid(42);
    let key = LibraryKey::new(g, LibraryVersion::new(1, 0), 1033);

    let api = FakeApi::new();
    api.add_library(
        "C:\\libs\\answers.tlb",
        LibSpec::new("Answers", win32_attrs(g, 1, 0, 1033)),
    );
    api.add_catalog_entry(key.clone(), "C:\\libs\\answers.tlb");

    let (engine, _counters) = engine_with(api, FakeResolver::new());
    let outcomes = engine.metadata(&LibrarySource::Registered(key));

    assert_eq!(outcomes.len(), 1);
    let metadata = outcomes[0].as_ref().unwrap();
    assert_eq!(
        metadata.source_file.as_deref(),
        Some(std::path::Path::new("C:\\libs\\answers.tlb"))
    );
    assert_eq!(metadata.attributes.guid, g);
}

#[test]
fn test_unregistered_triple_is_invalid_result() {
    let key = LibraryKey::new(guid(9), LibraryVersion::new(4, 2), 0);
    let (engine, _counters) = engine_with(FakeApi::new(), FakeResolver::new());

    let outcomes = engine.metadata(&LibrarySource::Registered(key.clone()));

    assert_eq!(outcomes.len(), 1);
    let err = outcomes[0].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResult);
    assert_eq!(*err.subject(), Subject::Key(key));
    assert_eq!(err.native_code(), Some(HResult::LIB_NOT_REGISTERED));
}

#[test]
fn test_import_hands_out_owned_handles() {
    let api = FakeApi::new();
    api.add_library("a.tlb", LibSpec::new("LibA", win32_attrs(guid(1), 1, 0, 0)));

    let resolver = FakeResolver::new().literal("a.tlb");
    let (engine, counters) = engine_with(api, resolver);

    let literals = vec!["a.tlb".to_string()];
    let outcomes = engine.import(&LibrarySource::LiteralPaths(&literals));

    assert_eq!(outcomes.len(), 1);
    let imported = outcomes[0].as_ref().unwrap();
    assert_eq!(
        imported.source_file.as_deref(),
        Some(std::path::Path::new("a.tlb"))
    );
    // Ownership is with the caller until the outcome drops.
    assert_eq!(counters.dropped_libs.get(), 0);
    drop(outcomes);
    assert_eq!(counters.dropped_libs.get(), 1);
}

#[test]
fn test_import_from_handle_is_not_implemented() {
    let spec = LibSpec::new("Lib", win32_attrs(guid(1), 1, 0, 0));
    let lib = FakeLib::new(spec, Rc::default());

    let (engine, _counters) = engine_with(FakeApi::new(), FakeResolver::new());
    let outcomes = engine.import(&LibrarySource::Handle(&lib));

    assert_eq!(outcomes.len(), 1);
    let err = outcomes[0].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert_eq!(*err.subject(), Subject::Shape("handle"));
}
