// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coherence rules evaluated over the complete candidate sets.
//!
//! Each rule is an independent object that sees both candidate sets and
//! returns zero or more violation records. The checker runs every rule and
//! concatenates the results; it never stops at the first violation.

use std::collections::BTreeMap;

use spindle_core::{marked_interfaces, CodedError, ErrorCode, PluginDescriptor, TypeCatalog};

/// Everything a rule may look at.
pub struct Candidates<'a> {
    pub catalog: &'a dyn TypeCatalog,
    pub interfaces: &'a [PluginDescriptor],
    pub implementations: &'a [PluginDescriptor],
}

/// A single coherence rule.
pub trait CoherenceRule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, candidates: &Candidates<'_>) -> Vec<CodedError>;
}

/// Extension point declarations must be interfaces.
#[derive(Debug, Default)]
pub struct DeclaredInterfacesAreInterfaces;

impl CoherenceRule for DeclaredInterfacesAreInterfaces {
    fn name(&self) -> &'static str {
        "interfaces-are-interfaces"
    }

    fn check(&self, candidates: &Candidates<'_>) -> Vec<CodedError> {
        candidates
            .interfaces
            .iter()
            .filter(|d| !d.is_interface_kind())
            .map(|d| {
                CodedError::new(ErrorCode::DeclareNotAnInterface, [d.owner_name(), d.name()])
            })
            .collect()
    }
}

/// Implementation declarations must be concrete classes.
#[derive(Debug, Default)]
pub struct DeclaredImplementationsAreConcrete;

impl CoherenceRule for DeclaredImplementationsAreConcrete {
    fn name(&self) -> &'static str {
        "implementations-are-concrete"
    }

    fn check(&self, candidates: &Candidates<'_>) -> Vec<CodedError> {
        candidates
            .implementations
            .iter()
            .filter(|d| !d.is_concrete_class_kind())
            .map(|d| {
                CodedError::new(ErrorCode::DeclareNotAConcreteClass, [d.owner_name(), d.name()])
            })
            .collect()
    }
}

/// Which candidate set a uniqueness rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryScope {
    Interfaces,
    Implementations,
}

/// Names must be unique within one registry.
///
/// One record is produced per duplicated name. Its arguments are the name
/// followed by every owner type declaring it, in manifest order.
#[derive(Debug)]
pub struct UniqueNames {
    scope: RegistryScope,
}

impl UniqueNames {
    pub fn new(scope: RegistryScope) -> Self {
        Self { scope }
    }
}

impl CoherenceRule for UniqueNames {
    fn name(&self) -> &'static str {
        match self.scope {
            RegistryScope::Interfaces => "unique-interface-names",
            RegistryScope::Implementations => "unique-implementation-names",
        }
    }

    fn check(&self, candidates: &Candidates<'_>) -> Vec<CodedError> {
        let descriptors = match self.scope {
            RegistryScope::Interfaces => candidates.interfaces,
            RegistryScope::Implementations => candidates.implementations,
        };

        let mut owners_by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for d in descriptors {
            owners_by_name.entry(d.name()).or_default().push(d.owner_name());
        }

        owners_by_name
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(name, owners)| {
                CodedError::new(
                    ErrorCode::DeclareNonUniqueName,
                    std::iter::once(name).chain(owners),
                )
            })
            .collect()
    }
}

/// Every implementation must implement at least one marked interface,
/// directly or through its superclass and interface closure.
#[derive(Debug, Default)]
pub struct ImplementsMarkedInterface;

impl CoherenceRule for ImplementsMarkedInterface {
    fn name(&self) -> &'static str {
        "implements-marked-interface"
    }

    fn check(&self, candidates: &Candidates<'_>) -> Vec<CodedError> {
        candidates
            .implementations
            .iter()
            .filter(|d| marked_interfaces(candidates.catalog, d.owner_type()).is_empty())
            .map(|d| CodedError::new(ErrorCode::DeclareNoInterface, [d.owner_name(), d.name()]))
            .collect()
    }
}

/// Ordered list of rules.
pub struct CoherenceChecker {
    rules: Vec<Box<dyn CoherenceRule>>,
}

impl CoherenceChecker {
    /// A checker with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The five standard rules, in order.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(DeclaredInterfacesAreInterfaces)
            .with_rule(DeclaredImplementationsAreConcrete)
            .with_rule(UniqueNames::new(RegistryScope::Interfaces))
            .with_rule(UniqueNames::new(RegistryScope::Implementations))
            .with_rule(ImplementsMarkedInterface)
    }

    pub fn with_rule(mut self, rule: impl CoherenceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule and return all violations.
    pub fn check(&self, candidates: &Candidates<'_>) -> Vec<CodedError> {
        self.rules
            .iter()
            .flat_map(|rule| {
                let violations = rule.check(candidates);
                if !violations.is_empty() {
                    tracing::debug!(
                        rule = rule.name(),
                        count = violations.len(),
                        "coherence rule violated"
                    );
                }
                violations
            })
            .collect()
    }
}

impl Default for CoherenceChecker {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for CoherenceChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoherenceChecker")
            .field("rules", &self.rule_names())
            .finish()
    }
}
