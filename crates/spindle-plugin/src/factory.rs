// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin factory: owner of both registries and of the reload path.
//!
//! A load either fully succeeds, after which both registries are replaced,
//! or fully fails, after which the previously published registries (empty on
//! first boot) stay visible. New contents are built privately and both
//! registries are published together with one atomic swap, so readers never
//! observe an emptied, half-filled, or mixed pair while a reload is running.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use spindle_config::SpindleConfig;
use spindle_core::{AggregateError, CodedError, PluginDescriptor, TypeCatalog};

use crate::inspector::{DiscoverySettings, Inspection, PluginInspector};
use crate::manifest::{DirectoryEntry, SearchPathEntry};
use crate::notes::DiagnosticLog;
use crate::registry::{
    PluginImplementationRegistry, PluginRegistry, PublishedPair, RegistryPair, RegistrySide,
    RegistrySnapshot,
};

/// Externally visible load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load has succeeded yet; registries are empty.
    Unloaded,
    /// At least one load succeeded.
    Loaded,
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadState::Unloaded => write!(f, "unloaded"),
            LoadState::Loaded => write!(f, "loaded"),
        }
    }
}

/// Summary of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub generation: u64,
    pub interfaces: usize,
    pub implementations: usize,
    /// Implementation entries skipped because of missing dependencies.
    pub skipped: Vec<CodedError>,
}

/// Façade over discovery, validation, and lookup.
pub struct PluginFactory {
    catalog: Arc<dyn TypeCatalog>,
    search_path: Vec<Arc<dyn SearchPathEntry>>,
    settings: DiscoverySettings,
    published: PublishedPair,
    interfaces: PluginRegistry,
    implementations: PluginImplementationRegistry,
    reload_lock: Mutex<()>,
    notes: ArcSwap<DiagnosticLog>,
}

impl PluginFactory {
    /// An unloaded factory. Call [`reload`](Self::reload) to populate it.
    pub fn new(
        catalog: Arc<dyn TypeCatalog>,
        search_path: Vec<Arc<dyn SearchPathEntry>>,
        settings: DiscoverySettings,
    ) -> Self {
        let published = PublishedPair::default();
        Self {
            interfaces: PluginRegistry::view(published.clone(), RegistrySide::Interfaces),
            implementations: PluginImplementationRegistry::view(
                published.clone(),
                catalog.clone(),
            ),
            published,
            catalog,
            search_path,
            settings,
            reload_lock: Mutex::new(()),
            notes: ArcSwap::from_pointee(DiagnosticLog::new()),
        }
    }

    /// Create a factory and run the first load.
    pub fn bootstrap(
        catalog: Arc<dyn TypeCatalog>,
        search_path: Vec<Arc<dyn SearchPathEntry>>,
        settings: DiscoverySettings,
    ) -> Result<Self, AggregateError> {
        let factory = Self::new(catalog, search_path, settings);
        factory.reload()?;
        Ok(factory)
    }

    /// An unloaded factory whose search path is the configured directories.
    pub fn from_config(catalog: Arc<dyn TypeCatalog>, config: &SpindleConfig) -> Self {
        let search_path = config
            .discovery
            .search_path
            .iter()
            .map(|root| Arc::new(DirectoryEntry::new(root)) as Arc<dyn SearchPathEntry>)
            .collect();
        Self::new(catalog, search_path, DiscoverySettings::from(&config.discovery))
    }

    pub fn state(&self) -> LoadState {
        if self.generation() == 0 {
            LoadState::Unloaded
        } else {
            LoadState::Loaded
        }
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.published.load().generation()
    }

    /// Pin both registries as published by the same load.
    pub fn snapshot(&self) -> Arc<RegistryPair> {
        self.published.load_full()
    }

    pub fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    pub fn get_interface_registry(&self) -> &PluginRegistry {
        &self.interfaces
    }

    pub fn get_implementation_registry(&self) -> &PluginImplementationRegistry {
        &self.implementations
    }

    /// Implementations of the marked interface `interface_name`.
    pub fn find_by_interface(
        &self,
        interface_name: &str,
    ) -> Result<Vec<Arc<PluginDescriptor>>, CodedError> {
        self.implementations.find_by_interface(interface_name)
    }

    /// Notes recorded by the most recent load attempt, successful or not.
    pub fn notes(&self) -> Vec<String> {
        self.notes.load().entries()
    }

    /// A fresh inspector over this factory's catalog and search path.
    pub fn inspector(&self) -> PluginInspector {
        self.inspector_with(Arc::new(DiagnosticLog::new()))
    }

    /// Run the whole pipeline without publishing anything.
    pub fn dry_run(&self) -> Result<Inspection, AggregateError> {
        self.inspector().inspect_all()
    }

    /// Re-run discovery and publish the result.
    ///
    /// Concurrent callers are serialized. On failure the registries keep
    /// their previous contents and the aggregate error lists every problem.
    pub fn reload(&self) -> Result<LoadReport, AggregateError> {
        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let notes = Arc::new(DiagnosticLog::new());
        self.notes.store(notes.clone());

        let inspection = match self.inspector_with(notes).inspect_all() {
            Ok(inspection) => inspection,
            Err(err) => {
                tracing::error!(
                    code = %err.code(),
                    problems = err.len(),
                    details = %err,
                    "plugin load failed, registries left unchanged"
                );
                return Err(err);
            }
        };

        let interfaces = inspection.interfaces.len();
        let implementations = inspection.implementations.len();
        let generation = self.generation() + 1;
        self.published.store(Arc::new(RegistryPair::new(
            generation,
            RegistrySnapshot::from_descriptors(inspection.interfaces),
            RegistrySnapshot::from_descriptors(inspection.implementations),
        )));

        tracing::info!(
            generation,
            interfaces,
            implementations,
            skipped = inspection.skipped.len(),
            "plugin registries loaded"
        );

        Ok(LoadReport {
            generation,
            interfaces,
            implementations,
            skipped: inspection.skipped,
        })
    }

    fn inspector_with(&self, notes: Arc<DiagnosticLog>) -> PluginInspector {
        PluginInspector::new(
            self.catalog.clone(),
            self.search_path.clone(),
            self.settings.clone(),
            notes,
        )
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactory")
            .field("state", &self.state())
            .field("generation", &self.generation())
            .field("interfaces", &self.interfaces.len())
            .field("implementations", &self.implementations.len())
            .finish()
    }
}
