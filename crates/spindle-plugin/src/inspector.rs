// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The discovery pipeline: manifest entries → resolved types → descriptors,
//! followed by the coherence check.

use std::collections::HashSet;
use std::sync::Arc;

use spindle_config::model::{
    DiscoveryConfig, DEFAULT_IMPLEMENTATION_MANIFEST, DEFAULT_INTERFACE_MANIFEST,
};
use spindle_core::{
    AggregateError, CodedError, ErrorCode, PluginDescriptor, ResolveError, TypeCatalog, TypeInfo,
};

use crate::coherence::{Candidates, CoherenceChecker};
use crate::manifest::{ManifestEntry, ManifestResolver, SearchPathEntry};
use crate::notes::DiagnosticLog;

/// Settings that shape one discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySettings {
    pub interface_manifest: String,
    pub implementation_manifest: String,
    pub standard_namespace: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for DiscoverySettings {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            interface_manifest: config.interface_manifest.clone(),
            implementation_manifest: config.implementation_manifest.clone(),
            standard_namespace: config.standard_namespace.clone(),
        }
    }
}

impl DiscoverySettings {
    /// Default manifest paths with a custom standard namespace.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            interface_manifest: DEFAULT_INTERFACE_MANIFEST.to_string(),
            implementation_manifest: DEFAULT_IMPLEMENTATION_MANIFEST.to_string(),
            standard_namespace: namespace.into(),
        }
    }
}

/// Builds descriptors from marked types.
#[derive(Debug, Clone)]
pub struct DescriptorInspector {
    standard_namespace: String,
}

impl DescriptorInspector {
    pub fn new(standard_namespace: impl Into<String>) -> Self {
        Self {
            standard_namespace: standard_namespace.into(),
        }
    }

    /// The descriptor for `ty`, or `None` if it carries no marker.
    pub fn inspect(&self, ty: Arc<TypeInfo>) -> Option<PluginDescriptor> {
        let marker = ty.marker.clone()?;
        let is_standard = ty.name.starts_with(&self.standard_namespace);
        Some(PluginDescriptor::from_marker(ty, &marker, is_standard))
    }
}

/// Result of a single manifest pass.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryPass {
    pub descriptors: Vec<PluginDescriptor>,
    /// `load.linkageerror` records for entries that were soft-skipped.
    pub skipped: Vec<CodedError>,
}

/// Both passes after a clean coherence check.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    pub interfaces: Vec<PluginDescriptor>,
    pub implementations: Vec<PluginDescriptor>,
    pub skipped: Vec<CodedError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Interfaces,
    Implementations,
}

/// Runs manifest resolution, descriptor inspection, and coherence checking.
pub struct PluginInspector {
    catalog: Arc<dyn TypeCatalog>,
    resolver: ManifestResolver,
    descriptors: DescriptorInspector,
    checker: CoherenceChecker,
    settings: DiscoverySettings,
    notes: Arc<DiagnosticLog>,
}

impl PluginInspector {
    pub fn new(
        catalog: Arc<dyn TypeCatalog>,
        search_path: Vec<Arc<dyn SearchPathEntry>>,
        settings: DiscoverySettings,
        notes: Arc<DiagnosticLog>,
    ) -> Self {
        Self {
            catalog,
            resolver: ManifestResolver::new(search_path, notes.clone()),
            descriptors: DescriptorInspector::new(settings.standard_namespace.clone()),
            checker: CoherenceChecker::standard(),
            settings,
            notes,
        }
    }

    /// Replace the coherence rule set.
    pub fn with_checker(mut self, checker: CoherenceChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn notes(&self) -> &Arc<DiagnosticLog> {
        &self.notes
    }

    /// Interface pass. Any resolution failure is fatal.
    pub fn load_interfaces(&self) -> Result<DiscoveryPass, AggregateError> {
        self.run_pass(Pass::Interfaces)
    }

    /// Implementation pass. A missing transitive dependency skips the entry;
    /// an unknown implementation name is fatal.
    pub fn load_implementations(&self) -> Result<DiscoveryPass, AggregateError> {
        self.run_pass(Pass::Implementations)
    }

    /// Run every coherence rule over the full candidate sets.
    pub fn check_coherence(
        &self,
        interfaces: &[PluginDescriptor],
        implementations: &[PluginDescriptor],
    ) -> Result<(), AggregateError> {
        let violations = self.checker.check(&Candidates {
            catalog: self.catalog.as_ref(),
            interfaces,
            implementations,
        });
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::declarations(violations))
        }
    }

    /// Both passes followed by the coherence check.
    pub fn inspect_all(&self) -> Result<Inspection, AggregateError> {
        let interfaces = self.load_interfaces()?;
        let implementations = self.load_implementations()?;
        self.check_coherence(&interfaces.descriptors, &implementations.descriptors)?;

        Ok(Inspection {
            interfaces: interfaces.descriptors,
            implementations: implementations.descriptors,
            skipped: implementations.skipped,
        })
    }

    fn run_pass(&self, pass: Pass) -> Result<DiscoveryPass, AggregateError> {
        let manifest = match pass {
            Pass::Interfaces => &self.settings.interface_manifest,
            Pass::Implementations => &self.settings.implementation_manifest,
        };
        let entries = self.resolver.resolve(manifest).map_err(AggregateError::fatal)?;

        let mut outcome = DiscoveryPass::default();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in entries {
            // The same type contributed by several modules is one candidate.
            if !seen.insert(entry.type_name.clone()) {
                self.notes.debug(format!(
                    "entry {} at {} already listed, ignoring",
                    entry.type_name,
                    entry.position()
                ));
                continue;
            }

            let ty = match self.catalog.resolve(&entry.type_name) {
                Ok(ty) => ty,
                Err(ResolveError::Linkage { missing, .. }) if pass == Pass::Implementations => {
                    let record = linkage_error(&entry, &missing);
                    self.notes.warn(record.message());
                    outcome.skipped.push(record);
                    continue;
                }
                Err(err) => return Err(AggregateError::fatal(class_not_found(&entry, &err))),
            };

            match self.descriptors.inspect(ty) {
                Some(descriptor) => outcome.descriptors.push(descriptor),
                None => self.notes.debug(format!(
                    "entry {} at {} carries no plugin marker, ignoring",
                    entry.type_name,
                    entry.position()
                )),
            }
        }

        Ok(outcome)
    }
}

impl std::fmt::Debug for PluginInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginInspector")
            .field("settings", &self.settings)
            .field("search_path", &self.resolver.search_path().len())
            .field("checker", &self.checker)
            .finish()
    }
}

fn class_not_found(entry: &ManifestEntry, err: &ResolveError) -> CodedError {
    CodedError::new(
        ErrorCode::LoadClassNotFound,
        [entry.type_name.clone(), entry.position(), err.to_string()],
    )
}

fn linkage_error(entry: &ManifestEntry, missing: &str) -> CodedError {
    CodedError::new(
        ErrorCode::LoadLinkageError,
        [entry.type_name.clone(), entry.position(), missing.to_string()],
    )
}
