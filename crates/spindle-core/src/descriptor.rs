// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable plugin descriptors built from marked types.

use std::sync::Arc;

use serde::Serialize;

use crate::types::{PluginMarker, TypeInfo};

/// Metadata record for a discovered extension point or implementation.
///
/// Descriptors are created during a load pass and never mutated. A reload
/// replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    name: String,
    owner_type: Arc<TypeInfo>,
    description: String,
    version: String,
    enabled: bool,
    is_standard: bool,
}

impl PluginDescriptor {
    /// Copy the marker fields of `owner_type` into a new descriptor.
    pub fn from_marker(
        owner_type: Arc<TypeInfo>,
        marker: &PluginMarker,
        is_standard: bool,
    ) -> Self {
        Self {
            name: marker.name.clone(),
            description: marker.description.clone(),
            version: marker.version.clone(),
            enabled: marker.enabled,
            is_standard,
            owner_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_type(&self) -> &Arc<TypeInfo> {
        &self.owner_type
    }

    /// Fully-qualified name of the owner type.
    pub fn owner_name(&self) -> &str {
        &self.owner_type.name
    }

    /// Description from the marker, `None` when left empty.
    pub fn description(&self) -> Option<&str> {
        Some(self.description.as_str()).filter(|d| !d.is_empty())
    }

    /// Version string from the marker, `None` when left empty.
    pub fn version(&self) -> Option<&str> {
        Some(self.version.as_str()).filter(|v| !v.is_empty())
    }

    /// The version parsed as semver. Informational only: an unparsable
    /// version is not an error.
    pub fn semantic_version(&self) -> Option<semver::Version> {
        self.version().and_then(|v| semver::Version::parse(v).ok())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the owner type lives in the project's own namespace.
    pub fn is_standard(&self) -> bool {
        self.is_standard
    }

    pub fn is_interface_kind(&self) -> bool {
        self.owner_type.is_interface()
    }

    pub fn is_concrete_class_kind(&self) -> bool {
        self.owner_type.is_concrete_class()
    }
}

impl std::fmt::Display for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.owner_type.name)
    }
}
