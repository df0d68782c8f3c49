// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery, coherence checking, and lookup registries.
//!
//! Extension points and their implementations are listed in two manifests
//! spread across the module search path. The [`PluginFactory`] reads both,
//! resolves every entry through a [`TypeCatalog`](spindle_core::TypeCatalog),
//! validates the result with the [`CoherenceChecker`], and publishes two
//! read-only registries.

pub mod coherence;
pub mod factory;
pub mod inspector;
pub mod manifest;
pub mod notes;
pub mod registry;

pub use coherence::{Candidates, CoherenceChecker, CoherenceRule, RegistryScope};
pub use factory::{LoadReport, LoadState, PluginFactory};
pub use inspector::{
    DescriptorInspector, DiscoveryPass, DiscoverySettings, Inspection, PluginInspector,
};
pub use manifest::{
    DirectoryEntry, EmbeddedEntry, ManifestEntry, ManifestResolver, SearchPathEntry,
};
pub use notes::DiagnosticLog;
pub use registry::{PluginImplementationRegistry, PluginRegistry, RegistryPair, RegistrySnapshot};
