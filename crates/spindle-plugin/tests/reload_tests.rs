// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reload semantics: replacement, failure isolation, and concurrent access.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use spindle_core::ErrorCode;
use spindle_plugin::LoadState;
use spindle_test_utils::TestHarness;
use spindle_test_utils::fixtures::*;

fn loaded() -> TestHarness {
    let harness = TestHarness::builder(plugin_catalog())
        .with_interfaces("core", &[CACHE, TRANSPORT])
        .with_implementations("core", &[MEMORY_CACHE, IN_PROCESS_TRANSPORT])
        .build()
        .unwrap();
    harness.reload().unwrap();
    harness
}

#[test]
fn reload_replaces_contents_without_leftovers() {
    let mut harness = loaded();
    assert_eq!(harness.implementation_names(), vec!["in-process", "memory"]);

    harness
        .tree
        .write_implementations("core", &[TIERED_CACHE])
        .unwrap();
    let report = harness.reload().unwrap();

    assert_eq!(report.generation, 2);
    assert_eq!(harness.implementation_names(), vec!["tiered"]);
    assert!(!harness.factory.get_implementation_registry().contains("memory"));
}

#[test]
fn reload_with_no_manifests_empties_registries() {
    let mut harness = loaded();
    harness.tree.clear_module("core").unwrap();

    let report = harness.reload().unwrap();
    assert_eq!(report.interfaces, 0);
    assert!(harness.interface_names().is_empty());
    assert!(harness.implementation_names().is_empty());
    assert_eq!(harness.factory.state(), LoadState::Loaded);
}

// Registries are only swapped after a clean coherence pass, so a broken
// reload must leave the previous generation readable.
#[test]
fn failed_reload_leaves_previous_snapshot_visible() {
    let mut harness = loaded();
    let before = harness.factory.get_implementation_registry().snapshot();

    harness
        .tree
        .write_implementations("core", &[MEMORY_CACHE, IN_PROCESS_TRANSPORT, SHADOW_CACHE])
        .unwrap();
    let err = harness.reload().unwrap_err();

    assert_eq!(err.code(), ErrorCode::LoadDeclareAll);
    assert_eq!(harness.factory.generation(), 1);
    assert_eq!(harness.interface_names(), vec!["cache", "transport"]);
    assert_eq!(harness.implementation_names(), vec!["in-process", "memory"]);

    let after = harness.factory.get_implementation_registry().snapshot();
    assert!(Arc::ptr_eq(&before, &after));

    // Notes describe the failed attempt, not the last successful one.
    assert!(
        harness
            .factory
            .notes()
            .iter()
            .any(|n| n.contains(SHADOW_CACHE))
    );
}

#[test]
fn recovered_reload_publishes_again() {
    let mut harness = loaded();
    harness
        .tree
        .write_implementations("core", &[MEMORY_CACHE, SHADOW_CACHE])
        .unwrap();
    harness.reload().unwrap_err();

    harness
        .tree
        .write_implementations("core", &[SHADOW_CACHE])
        .unwrap();
    let report = harness.reload().unwrap();
    assert_eq!(report.generation, 2);
    assert_eq!(
        harness
            .factory
            .get_implementation_registry()
            .get("memory")
            .unwrap()
            .owner_name(),
        SHADOW_CACHE
    );
}

#[test]
fn readers_never_observe_empty_registries_during_reloads() {
    let harness = loaded();
    let factory = harness.factory.clone();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let factory = factory.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut last_generation = 0;
                while !done.load(Ordering::Acquire) {
                    let interfaces = factory.get_interface_registry().snapshot();
                    let implementations = factory.get_implementation_registry().snapshot();
                    assert_eq!(interfaces.len(), 2);
                    assert_eq!(implementations.len(), 2);
                    assert!(!factory.find_by_interface(CACHE).unwrap().is_empty());

                    let generation = factory.generation();
                    assert!(generation >= last_generation);
                    last_generation = generation;
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..3)
        .map(|_| {
            let factory = factory.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    factory.reload().unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(factory.generation(), 31);
}

#[test]
fn pinned_pair_always_comes_from_one_load() {
    let mut harness = loaded();
    let factory = harness.factory.clone();
    let done = Arc::new(AtomicBool::new(false));

    // Odd generations publish two extension points and two implementations,
    // even generations one of each.
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let factory = factory.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let pair = factory.snapshot();
                    let expected = if pair.generation() % 2 == 1 { 2 } else { 1 };
                    assert_eq!(pair.interfaces().len(), expected);
                    assert_eq!(pair.implementations().len(), expected);
                }
            })
        })
        .collect();

    for round in 0..100 {
        if round % 2 == 0 {
            harness.tree.write_interfaces("core", &[CACHE]).unwrap();
            harness
                .tree
                .write_implementations("core", &[MEMORY_CACHE])
                .unwrap();
        } else {
            harness
                .tree
                .write_interfaces("core", &[CACHE, TRANSPORT])
                .unwrap();
            harness
                .tree
                .write_implementations("core", &[MEMORY_CACHE, IN_PROCESS_TRANSPORT])
                .unwrap();
        }
        harness.reload().unwrap();
    }

    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(factory.generation(), 101);
}
