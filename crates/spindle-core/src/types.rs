// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type handles and the declarative marker tag.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What kind of type a handle refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Interface,
    AbstractClass,
    ConcreteClass,
}

/// The declarative marker tag that makes a type discoverable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginMarker {
    /// Logical name, unique within its registry.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PluginMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: String::new(),
            enabled: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A resolved type handle.
///
/// Interfaces list the interfaces they extend in `interfaces`; classes list
/// the interfaces they implement directly and name their superclass.
/// `requires` names additional types that must be resolvable for this type to
/// link (for example an optional native backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub kind: TypeKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub requires: Vec<String>,
    pub marker: Option<PluginMarker>,
}

impl TypeInfo {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            requires: Vec::new(),
            marker: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::AbstractClass)
    }

    pub fn concrete_class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::ConcreteClass)
    }

    /// Set the superclass. For an interface this adds a super-interface
    /// instead, since interfaces only extend other interfaces.
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        match self.kind {
            TypeKind::Interface => self.interfaces.push(name.into()),
            _ => self.superclass = Some(name.into()),
        }
        self
    }

    pub fn implements(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    pub fn requires(mut self, name: impl Into<String>) -> Self {
        self.requires.push(name.into());
        self
    }

    pub fn marked(mut self, marker: PluginMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_concrete_class(&self) -> bool {
        self.kind == TypeKind::ConcreteClass
    }

    pub fn is_marked(&self) -> bool {
        self.marker.is_some()
    }

    /// Names of every type this one links against directly.
    pub fn direct_dependencies(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .chain(self.requires.iter())
            .map(String::as_str)
    }
}
