// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type resolution by name.
//!
//! The engine never inspects real Rust types. Instead every discoverable
//! type is described by a [`TypeInfo`] registered in a [`TypeCatalog`],
//! usually a [`StaticTypeCatalog`] populated at startup from a generated
//! registration table.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use thiserror::Error;

use crate::types::TypeInfo;

/// Why a type name could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The name itself is unknown.
    #[error("type not found: {name}")]
    NotFound { name: String },

    /// The type is known but something it links against is not.
    #[error("type {name} cannot be linked: missing dependency {missing}")]
    Linkage { name: String, missing: String },
}

impl ResolveError {
    /// The name that was being resolved.
    pub fn name(&self) -> &str {
        match self {
            ResolveError::NotFound { name } | ResolveError::Linkage { name, .. } => name,
        }
    }
}

/// Name-addressable type lookup.
pub trait TypeCatalog: Send + Sync {
    /// Raw lookup without any linkage check.
    fn lookup(&self, name: &str) -> Option<Arc<TypeInfo>>;

    /// Resolve a type and verify that its full dependency graph
    /// (superclass, interfaces, required types, recursively) is present.
    fn resolve(&self, name: &str) -> Result<Arc<TypeInfo>, ResolveError> {
        let ty = self.lookup(name).ok_or_else(|| ResolveError::NotFound {
            name: name.to_string(),
        })?;

        let mut visited: HashSet<String> = HashSet::from([name.to_string()]);
        let mut pending: Vec<String> = ty.direct_dependencies().map(str::to_string).collect();
        while let Some(dep) = pending.pop() {
            if !visited.insert(dep.clone()) {
                continue;
            }
            match self.lookup(&dep) {
                Some(dep_ty) => pending.extend(dep_ty.direct_dependencies().map(str::to_string)),
                None => {
                    return Err(ResolveError::Linkage {
                        name: name.to_string(),
                        missing: dep,
                    });
                }
            }
        }

        Ok(ty)
    }
}

/// Every interface reachable from `ty` through its superclass chain and
/// interface inheritance, in breadth-first discovery order. `ty` itself is
/// not included. Unknown names are skipped.
pub fn interface_closure<C>(catalog: &C, ty: &TypeInfo) -> Vec<Arc<TypeInfo>>
where
    C: TypeCatalog + ?Sized,
{
    let mut seen: HashSet<String> = HashSet::from([ty.name.clone()]);
    let mut pending: VecDeque<String> = ty
        .superclass
        .iter()
        .chain(ty.interfaces.iter())
        .cloned()
        .collect();
    let mut closure = Vec::new();

    while let Some(name) = pending.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let Some(found) = catalog.lookup(&name) else {
            continue;
        };
        pending.extend(found.superclass.iter().chain(found.interfaces.iter()).cloned());
        if found.is_interface() {
            closure.push(found);
        }
    }

    closure
}

/// The members of [`interface_closure`] that carry the marker tag.
pub fn marked_interfaces<C>(catalog: &C, ty: &TypeInfo) -> Vec<Arc<TypeInfo>>
where
    C: TypeCatalog + ?Sized,
{
    interface_closure(catalog, ty)
        .into_iter()
        .filter(|i| i.is_marked())
        .collect()
}

/// Table-backed catalog: an explicit name → [`TypeInfo`] registration map.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeCatalog {
    types: HashMap<String, Arc<TypeInfo>>,
}

impl StaticTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, ty: TypeInfo) -> &mut Self {
        self.types.insert(ty.name.clone(), Arc::new(ty));
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, ty: TypeInfo) -> Self {
        self.register(ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<TypeInfo> for StaticTypeCatalog {
    fn from_iter<T: IntoIterator<Item = TypeInfo>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for ty in iter {
            catalog.register(ty);
        }
        catalog
    }
}

impl TypeCatalog for StaticTypeCatalog {
    fn lookup(&self, name: &str) -> Option<Arc<TypeInfo>> {
        self.types.get(name).cloned()
    }
}
