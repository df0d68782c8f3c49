// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk module trees and a factory harness for integration tests.
//!
//! `ManifestTree` lays out one directory per module under a temp dir, each
//! with its own manifest fragments. `TestHarness` wires such a tree into a
//! `PluginFactory` and lets tests rewrite manifests between reloads.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spindle_core::{AggregateError, StaticTypeCatalog, TypeCatalog};
use spindle_plugin::{DirectoryEntry, DiscoverySettings, PluginFactory, SearchPathEntry};
use tempfile::TempDir;

/// A temp directory holding one sub-directory per module.
pub struct ManifestTree {
    dir: TempDir,
    modules: Vec<PathBuf>,
    settings: DiscoverySettings,
}

impl ManifestTree {
    pub fn new(settings: DiscoverySettings) -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            modules: Vec::new(),
            settings,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a module directory, creating it and appending it to the
    /// search path on first use.
    pub fn module(&mut self, name: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if !self.modules.contains(&path) {
            std::fs::create_dir_all(&path)?;
            self.modules.push(path.clone());
        }
        Ok(path)
    }

    /// Write the extension point manifest of `module`.
    pub fn write_interfaces<S: AsRef<str>>(&mut self, module: &str, lines: &[S]) -> io::Result<()> {
        let manifest = self.settings.interface_manifest.clone();
        self.write(module, &manifest, lines)
    }

    /// Write the implementation manifest of `module`.
    pub fn write_implementations<S: AsRef<str>>(
        &mut self,
        module: &str,
        lines: &[S],
    ) -> io::Result<()> {
        let manifest = self.settings.implementation_manifest.clone();
        self.write(module, &manifest, lines)
    }

    /// Write raw bytes to a module's manifest (for I/O failure tests).
    pub fn write_raw(&mut self, module: &str, manifest: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.module(module)?.join(manifest);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
    }

    /// Delete both manifests of `module`.
    pub fn clear_module(&mut self, module: &str) -> io::Result<()> {
        let root = self.module(module)?;
        for manifest in [
            &self.settings.interface_manifest,
            &self.settings.implementation_manifest,
        ] {
            match std::fs::remove_file(root.join(manifest)) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
        }
        Ok(())
    }

    /// The module directories as search path entries, in creation order.
    pub fn search_path(&self) -> Vec<Arc<dyn SearchPathEntry>> {
        self.modules
            .iter()
            .map(|m| Arc::new(DirectoryEntry::new(m)) as Arc<dyn SearchPathEntry>)
            .collect()
    }

    pub fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    fn write<S: AsRef<str>>(
        &mut self,
        module: &str,
        manifest: &str,
        lines: &[S],
    ) -> io::Result<()> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }
        self.write_raw(module, manifest, content.as_bytes())
    }
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    catalog: StaticTypeCatalog,
    settings: DiscoverySettings,
    interfaces: Vec<(String, Vec<String>)>,
    implementations: Vec<(String, Vec<String>)>,
}

impl TestHarnessBuilder {
    fn new(catalog: StaticTypeCatalog) -> Self {
        Self {
            catalog,
            settings: DiscoverySettings::default(),
            interfaces: Vec::new(),
            implementations: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: DiscoverySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add an extension point manifest fragment for `module`.
    pub fn with_interfaces(mut self, module: &str, lines: &[&str]) -> Self {
        self.interfaces
            .push((module.to_string(), lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    /// Add an implementation manifest fragment for `module`.
    pub fn with_implementations(mut self, module: &str, lines: &[&str]) -> Self {
        self.implementations
            .push((module.to_string(), lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    /// Write the tree and create an unloaded factory over it.
    pub fn build(self) -> io::Result<TestHarness> {
        let mut tree = ManifestTree::new(self.settings.clone())?;
        for (module, lines) in &self.interfaces {
            tree.write_interfaces(module, lines.as_slice())?;
        }
        for (module, lines) in &self.implementations {
            tree.write_implementations(module, lines.as_slice())?;
        }

        let catalog: Arc<dyn TypeCatalog> = Arc::new(self.catalog);
        let factory = Arc::new(PluginFactory::new(
            catalog,
            tree.search_path(),
            self.settings,
        ));
        tracing::debug!(root = %tree.root().display(), "test harness ready");

        Ok(TestHarness { tree, factory })
    }
}

/// A factory backed by a temp-dir module tree.
pub struct TestHarness {
    pub tree: ManifestTree,
    pub factory: Arc<PluginFactory>,
}

impl TestHarness {
    pub fn builder(catalog: StaticTypeCatalog) -> TestHarnessBuilder {
        TestHarnessBuilder::new(catalog)
    }

    /// Reload the factory.
    pub fn reload(&self) -> Result<spindle_plugin::LoadReport, AggregateError> {
        self.factory.reload()
    }

    /// Interface registry names, sorted.
    pub fn interface_names(&self) -> Vec<String> {
        self.factory.get_interface_registry().names()
    }

    /// Implementation registry names, sorted.
    pub fn implementation_names(&self) -> Vec<String> {
        self.factory.get_implementation_registry().names()
    }
}
