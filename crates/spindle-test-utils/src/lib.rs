// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Spindle integration tests.
//!
//! # Components
//!
//! - [`fixtures`] - A shared type catalog with working and broken plugins
//! - [`ManifestTree`] - Temp-dir module trees with manifest fragments
//! - [`TestHarness`] - A `PluginFactory` wired to a `ManifestTree`

pub mod fixtures;
pub mod harness;

pub use harness::{ManifestTree, TestHarness, TestHarnessBuilder};
