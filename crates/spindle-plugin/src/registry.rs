// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only, lock-free descriptor registries.
//!
//! Both registries are views over one [`RegistryPair`] held in an
//! `ArcSwap`. Readers load the current pair without blocking; the factory
//! replaces it with a single pointer swap after a successful load. Nothing
//! outside this crate can write to a registry.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use spindle_core::{
    marked_interfaces, CodedError, ErrorCode, PluginDescriptor, TypeCatalog,
};

/// Immutable name → descriptor map.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    entries: HashMap<String, Arc<PluginDescriptor>>,
}

impl RegistrySnapshot {
    /// Build a snapshot from descriptors whose names were already checked
    /// for uniqueness.
    pub(crate) fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = PluginDescriptor>,
    {
        Self {
            entries: descriptors
                .into_iter()
                .map(|d| (d.name().to_string(), Arc::new(d)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PluginDescriptor>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Descriptors sorted by name.
    pub fn descriptors(&self) -> Vec<&Arc<PluginDescriptor>> {
        let mut descriptors: Vec<&Arc<PluginDescriptor>> = self.entries.values().collect();
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        descriptors
    }

    /// Unordered iteration over `(name, descriptor)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<PluginDescriptor>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both registries of one successful load.
///
/// The factory publishes a whole pair with a single swap, so a pinned pair
/// never mixes extension points from one load with implementations from
/// another.
#[derive(Debug, Default)]
pub struct RegistryPair {
    generation: u64,
    interfaces: Arc<RegistrySnapshot>,
    implementations: Arc<RegistrySnapshot>,
}

impl RegistryPair {
    pub(crate) fn new(
        generation: u64,
        interfaces: RegistrySnapshot,
        implementations: RegistrySnapshot,
    ) -> Self {
        Self {
            generation,
            interfaces: Arc::new(interfaces),
            implementations: Arc::new(implementations),
        }
    }

    /// The load that produced this pair; 0 before the first load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interfaces(&self) -> &Arc<RegistrySnapshot> {
        &self.interfaces
    }

    pub fn implementations(&self) -> &Arc<RegistrySnapshot> {
        &self.implementations
    }
}

/// Shared publication slot read by both registry views.
pub(crate) type PublishedPair = Arc<ArcSwap<RegistryPair>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegistrySide {
    Interfaces,
    Implementations,
}

/// Read-only view of one side of the published [`RegistryPair`].
///
/// Every accessor reads the snapshot current at call time. Use
/// [`snapshot`](Self::snapshot) to pin one view across several reads.
pub struct PluginRegistry {
    published: PublishedPair,
    side: RegistrySide,
}

impl PluginRegistry {
    pub(crate) fn view(published: PublishedPair, side: RegistrySide) -> Self {
        Self { published, side }
    }

    /// Pin the current contents.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        let pair = self.published.load();
        match self.side {
            RegistrySide::Interfaces => pair.interfaces.clone(),
            RegistrySide::Implementations => pair.implementations.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<PluginDescriptor>> {
        self.snapshot().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot().contains(name)
    }

    /// Key set, sorted.
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Values, sorted by name.
    pub fn descriptors(&self) -> Vec<Arc<PluginDescriptor>> {
        self.snapshot().descriptors().into_iter().cloned().collect()
    }

    /// Entry set, sorted by name.
    pub fn entries(&self) -> Vec<(String, Arc<PluginDescriptor>)> {
        self.descriptors()
            .into_iter()
            .map(|d| (d.name().to_string(), d))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("side", &self.side)
            .field("names", &self.names())
            .finish()
    }
}

/// Registry of implementation descriptors, with lookup by extension point.
pub struct PluginImplementationRegistry {
    registry: PluginRegistry,
    catalog: Arc<dyn TypeCatalog>,
}

impl PluginImplementationRegistry {
    pub(crate) fn view(published: PublishedPair, catalog: Arc<dyn TypeCatalog>) -> Self {
        Self {
            registry: PluginRegistry::view(published, RegistrySide::Implementations),
            catalog,
        }
    }

    /// Every registered implementation whose marked interface closure
    /// contains `interface_name`, sorted by descriptor name.
    ///
    /// `interface_name` must name a marked interface; anything else is a
    /// usage error.
    pub fn find_by_interface(
        &self,
        interface_name: &str,
    ) -> Result<Vec<Arc<PluginDescriptor>>, CodedError> {
        find_in(self.catalog.as_ref(), &self.registry.snapshot(), interface_name)
    }
}

fn find_in(
    catalog: &dyn TypeCatalog,
    snapshot: &RegistrySnapshot,
    interface_name: &str,
) -> Result<Vec<Arc<PluginDescriptor>>, CodedError> {
    let interface = catalog.lookup(interface_name).ok_or_else(|| {
        CodedError::new(ErrorCode::LoadClassNotFound, [interface_name, "find_by_interface"])
    })?;
    if !interface.is_interface() || !interface.is_marked() {
        return Err(CodedError::new(
            ErrorCode::FindNotAnExtensionPoint,
            [interface_name],
        ));
    }

    Ok(snapshot
        .descriptors()
        .into_iter()
        .filter(|d| {
            marked_interfaces(catalog, d.owner_type())
                .iter()
                .any(|i| i.name == interface_name)
        })
        .cloned()
        .collect())
}

impl std::ops::Deref for PluginImplementationRegistry {
    type Target = PluginRegistry;

    fn deref(&self) -> &PluginRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for PluginImplementationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginImplementationRegistry")
            .field("count", &self.registry.len())
            .field("names", &self.registry.names())
            .finish()
    }
}
