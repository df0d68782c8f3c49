// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end discovery over on-disk module trees.

use spindle_core::{ErrorCode, PluginMarker, StaticTypeCatalog, TypeInfo};
use spindle_plugin::{DiscoverySettings, LoadState};
use spindle_test_utils::TestHarness;
use spindle_test_utils::fixtures::*;
use tracing_test::traced_test;

fn healthy() -> TestHarness {
    TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE, TRANSPORT])
        .with_implementations("core", &[MEMORY_CACHE, IN_PROCESS_TRANSPORT])
        .build()
        .unwrap()
}

#[test]
fn loads_both_registries() {
    let harness = healthy();
    let report = harness.reload().unwrap();

    assert_eq!(report.generation, 1);
    assert_eq!(harness.interface_names(), vec!["cache", "transport"]);
    assert_eq!(harness.implementation_names(), vec!["in-process", "memory"]);
    assert_eq!(harness.factory.state(), LoadState::Loaded);

    let cache = harness.factory.get_interface_registry().get("cache").unwrap();
    assert_eq!(cache.owner_name(), CACHE);
    assert_eq!(cache.description(), Some("Key/value cache provider"));
    assert!(cache.is_standard());
}

#[test]
fn manifests_from_several_modules_are_merged() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE])
        .with_interfaces("messaging", &[TRANSPORT])
        .with_implementations("core", &[MEMORY_CACHE])
        .with_implementations("messaging", &["", "  spindle.messaging.InProcessTransport  ", ""])
        .build()
        .unwrap();

    harness.reload().unwrap();
    assert_eq!(harness.interface_names(), vec!["cache", "transport"]);
    assert_eq!(harness.implementation_names(), vec!["in-process", "memory"]);

    let notes = harness.factory.notes();
    assert_eq!(
        notes
            .iter()
            .filter(|n| n.starts_with("resource found at "))
            .count(),
        4
    );
}

#[test]
fn same_type_in_two_modules_is_one_candidate() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("a", &[CACHE])
        .with_interfaces("b", &[CACHE])
        .with_implementations("a", &[MEMORY_CACHE])
        .build()
        .unwrap();

    harness.reload().unwrap();
    assert_eq!(harness.interface_names(), vec!["cache"]);
}

#[test]
fn non_standard_namespace_is_flagged() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_settings(DiscoverySettings::with_namespace("vendor."))
        .with_interfaces("core", &[CACHE])
        .with_implementations("core", &[MEMORY_CACHE])
        .build()
        .unwrap();

    harness.reload().unwrap();
    let cache = harness.factory.get_interface_registry().get("cache").unwrap();
    assert!(!cache.is_standard());
}

#[test]
fn unmarked_entries_are_ignored() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE, LOCAL_CACHE])
        .with_implementations("core", &[MEMORY_CACHE, UNMARKED_HELPER])
        .build()
        .unwrap();

    harness.reload().unwrap();
    assert_eq!(harness.interface_names(), vec!["cache"]);
    assert_eq!(harness.implementation_names(), vec!["memory"]);
    assert!(
        harness
            .factory
            .notes()
            .iter()
            .any(|n| n.contains(UNMARKED_HELPER) && n.contains("no plugin marker"))
    );
}

#[test]
fn disabled_implementations_are_still_registered() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE])
        .with_implementations("core", &[TIERED_CACHE])
        .build()
        .unwrap();

    harness.reload().unwrap();
    let tiered = harness
        .factory
        .get_implementation_registry()
        .get("tiered")
        .unwrap();
    assert!(!tiered.enabled());
}

#[test]
#[traced_test]
fn missing_dependency_soft_skips_implementation() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE])
        .with_implementations("core", &[MEMORY_CACHE])
        .with_implementations("vendor", &[REDIS_CACHE])
        .build()
        .unwrap();

    let report = harness.reload().unwrap();
    assert_eq!(harness.implementation_names(), vec!["memory"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].code, ErrorCode::LoadLinkageError);
    assert_eq!(report.skipped[0].args[0], REDIS_CACHE);
    assert_eq!(report.skipped[0].args[2], "vendor.redis.native.Client");
    assert!(logs_contain("vendor.redis.native.Client"));
}

#[test]
fn missing_dependency_in_interface_manifest_is_fatal() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("vendor", &[REDIS_CACHE])
        .build()
        .unwrap();

    let err = harness.reload().unwrap_err();
    assert_eq!(err.code(), ErrorCode::LoadClassNotFound);
    assert_eq!(err.len(), 1);
    assert_eq!(harness.factory.state(), LoadState::Unloaded);
}

#[test]
fn unknown_implementation_is_fatal() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE])
        .with_implementations("core", &[MEMORY_CACHE, "vendor.gone.Missing"])
        .build()
        .unwrap();

    let err = harness.reload().unwrap_err();
    assert_eq!(err.code(), ErrorCode::LoadClassNotFound);
    let record = err.records().iter().next().unwrap();
    assert_eq!(record.args[0], "vendor.gone.Missing");
    assert!(record.args[1].ends_with("META-INF/spindle/implementations:2"));
}

#[test]
fn unreadable_manifest_is_load_ioe() {
    let mut harness = healthy();
    let manifest = harness.tree.settings().implementation_manifest.clone();
    harness
        .tree
        .write_raw("core", &manifest, &[0xff, 0xfe, b'\n'])
        .unwrap();

    let err = harness.reload().unwrap_err();
    assert_eq!(err.code(), ErrorCode::LoadIoe);
}

#[test]
fn kind_violations_are_reported_together() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE, MEMORY_CACHE])
        .with_implementations("core", &[ABSTRACT_CACHE, ENV_SOURCE])
        .build()
        .unwrap();

    let err = harness.reload().unwrap_err();
    assert_eq!(err.code(), ErrorCode::LoadDeclareAll);

    let not_interface: Vec<_> = err.with_code(ErrorCode::DeclareNotAnInterface).collect();
    assert_eq!(not_interface.len(), 1);
    assert_eq!(not_interface[0].args[0], MEMORY_CACHE);

    let not_concrete: Vec<_> = err.with_code(ErrorCode::DeclareNotAConcreteClass).collect();
    assert_eq!(not_concrete.len(), 1);
    assert_eq!(not_concrete[0].args[0], ABSTRACT_CACHE);

    let no_interface: Vec<_> = err.with_code(ErrorCode::DeclareNoInterface).collect();
    assert_eq!(no_interface.len(), 1);
    assert_eq!(no_interface[0].args[0], ENV_SOURCE);

    assert_eq!(err.len(), 3);
}

#[test]
fn duplicate_implementation_name_rejects_load() {
    let catalog = StaticTypeCatalog::new()
        .with(TypeInfo::interface("app.Foo").marked(PluginMarker::new("foo")))
        .with(TypeInfo::interface("app.Bar").marked(PluginMarker::new("bar")))
        .with(
            TypeInfo::concrete_class("app.FooImpl")
                .implements("app.Foo")
                .marked(PluginMarker::new("foo-impl")),
        )
        .with(
            TypeInfo::concrete_class("app.BarImpl")
                .implements("app.Bar")
                .marked(PluginMarker::new("bar-impl")),
        )
        .with(
            TypeInfo::concrete_class("app.BadImpl")
                .implements("app.Foo")
                .marked(PluginMarker::new("foo-impl")),
        );
    let mut harness = TestHarness::builder(catalog)
        .with_interfaces("a", &["app.Foo", "app.Bar"])
        .with_implementations("b", &["app.FooImpl", "app.BarImpl"])
        .build()
        .unwrap();
    harness.reload().unwrap();

    harness
        .tree
        .write_implementations("b", &["app.FooImpl", "app.BarImpl", "app.BadImpl"])
        .unwrap();
    let err = harness.reload().unwrap_err();

    assert_eq!(err.code(), ErrorCode::LoadDeclareAll);
    assert_eq!(err.len(), 1);
    let record = err.records().iter().next().unwrap();
    assert_eq!(record.code, ErrorCode::DeclareNonUniqueName);
    assert_eq!(record.args, vec!["foo-impl", "app.FooImpl", "app.BadImpl"]);

    assert_eq!(harness.factory.generation(), 1);
    assert_eq!(harness.implementation_names(), vec!["bar-impl", "foo-impl"]);
    assert_eq!(
        harness
            .factory
            .get_implementation_registry()
            .get("foo-impl")
            .unwrap()
            .owner_name(),
        "app.FooImpl"
    );
}

#[test]
fn duplicate_fixture_name_is_one_record() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE])
        .with_implementations("core", &[MEMORY_CACHE])
        .with_implementations("vendor", &[SHADOW_CACHE])
        .build()
        .unwrap();

    let err = harness.reload().unwrap_err();
    let records: Vec<_> = err.with_code(ErrorCode::DeclareNonUniqueName).collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].args.contains(&MEMORY_CACHE.to_string()));
    assert!(records[0].args.contains(&SHADOW_CACHE.to_string()));
}

#[test]
fn find_by_interface_reaches_through_unmarked_subinterface() {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE, TRANSPORT])
        .with_implementations("core", &[MEMORY_CACHE, TIERED_CACHE, IN_PROCESS_TRANSPORT])
        .build()
        .unwrap();
    harness.reload().unwrap();

    let caches: Vec<String> = harness
        .factory
        .find_by_interface(CACHE)
        .unwrap()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(caches, vec!["memory", "tiered"]);

    let transports = harness.factory.find_by_interface(TRANSPORT).unwrap();
    assert_eq!(transports.len(), 1);

    let err = harness.factory.find_by_interface(LOCAL_CACHE).unwrap_err();
    assert_eq!(err.code, ErrorCode::FindNotAnExtensionPoint);
}

#[test]
fn dry_run_reports_without_publishing() {
    let harness = healthy();
    let inspection = harness.factory.dry_run().unwrap();
    assert_eq!(inspection.interfaces.len(), 2);
    assert!(harness.interface_names().is_empty());
    assert_eq!(harness.factory.state(), LoadState::Unloaded);
}
