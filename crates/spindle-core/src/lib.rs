// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Spindle plugin discovery engine.
//!
//! This crate provides the descriptor model, the [`TypeCatalog`] capability
//! used to resolve type names, and the coded error taxonomy shared by the
//! rest of the workspace.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{
    interface_closure, marked_interfaces, ResolveError, StaticTypeCatalog, TypeCatalog,
};
pub use descriptor::PluginDescriptor;
pub use error::{AggregateError, CodedError, ErrorCode};
pub use types::{PluginMarker, TypeInfo, TypeKind};
