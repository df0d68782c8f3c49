// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Spindle discovery engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default relative path of the extension point manifest.
pub const DEFAULT_INTERFACE_MANIFEST: &str = "META-INF/spindle/extension-points";

/// Default relative path of the implementation manifest.
pub const DEFAULT_IMPLEMENTATION_MANIFEST: &str = "META-INF/spindle/implementations";

/// Top-level Spindle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpindleConfig {
    /// Manifest locations and namespace settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Log filter handed to the embedding application's subscriber.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where manifests are looked up and how descriptors are classified.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Relative path of the extension point manifest inside every search path root.
    #[serde(default = "default_interface_manifest")]
    pub interface_manifest: String,

    /// Relative path of the implementation manifest inside every search path root.
    #[serde(default = "default_implementation_manifest")]
    pub implementation_manifest: String,

    /// Ordered module search path. Every root may contribute manifest fragments.
    #[serde(default)]
    pub search_path: Vec<PathBuf>,

    /// Type name prefix that marks a descriptor as standard (project-owned).
    #[serde(default = "default_standard_namespace")]
    pub standard_namespace: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interface_manifest: default_interface_manifest(),
            implementation_manifest: default_implementation_manifest(),
            search_path: Vec::new(),
            standard_namespace: default_standard_namespace(),
        }
    }
}

fn default_interface_manifest() -> String {
    DEFAULT_INTERFACE_MANIFEST.to_string()
}

fn default_implementation_manifest() -> String {
    DEFAULT_IMPLEMENTATION_MANIFEST.to_string()
}

fn default_standard_namespace() -> String {
    "spindle.".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive string.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "spindle=info,warn".to_string()
}
