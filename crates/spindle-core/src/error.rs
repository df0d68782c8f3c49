// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coded error records and the aggregate error surfaced by a load attempt.
//!
//! Every problem found while discovering plugins is reported as a
//! [`CodedError`]: a stable dotted code plus positional arguments. A
//! localization service can turn the pair into user-facing text; the
//! `Display` impls here render a plain English fallback.

use std::collections::BTreeSet;

use strum::{Display, EnumString};
use thiserror::Error;

/// Stable error codes emitted by the discovery engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
pub enum ErrorCode {
    /// A located manifest resource could not be read.
    #[strum(serialize = "load.ioe")]
    LoadIoe,
    /// A manifest line names a type that is not known at all.
    #[strum(serialize = "load.classnotfound")]
    LoadClassNotFound,
    /// A transitive dependency of an implementation type is missing.
    #[strum(serialize = "load.linkageerror")]
    LoadLinkageError,
    /// An extension point declaration is not an interface.
    #[strum(serialize = "declare.notaninterface")]
    DeclareNotAnInterface,
    /// An implementation declaration is not a concrete class.
    #[strum(serialize = "declare.notaconcreteclass")]
    DeclareNotAConcreteClass,
    /// Two declarations in the same registry share a name.
    #[strum(serialize = "declare.nonunique.name")]
    DeclareNonUniqueName,
    /// An implementation does not implement any marked extension point.
    #[strum(serialize = "declare.nointerface")]
    DeclareNoInterface,
    /// Aggregate wrapper for one or more declaration problems.
    #[strum(serialize = "load.declare.all")]
    LoadDeclareAll,
    /// A lookup was made with a type that is not a marked interface.
    #[strum(serialize = "find.notanextensionpoint")]
    FindNotAnExtensionPoint,
}

/// A single coded error: a code plus the positional arguments a message
/// template needs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
#[error("[{code}] {}", render_message(.code, .args))]
pub struct CodedError {
    pub code: ErrorCode,
    pub args: Vec<String>,
}

impl CodedError {
    pub fn new<I, S>(code: ErrorCode, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The rendered message without the code prefix.
    pub fn message(&self) -> String {
        render_message(&self.code, &self.args)
    }
}

/// Default English rendering for each code.
fn render_message(code: &ErrorCode, args: &[String]) -> String {
    let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("?");
    match code {
        ErrorCode::LoadIoe => format!("failed to read manifest resource {}: {}", arg(0), arg(1)),
        ErrorCode::LoadClassNotFound => match args.get(2) {
            Some(cause) => format!(
                "type `{}` listed at {} could not be resolved ({cause})",
                arg(0),
                arg(1)
            ),
            None => format!("type `{}` listed at {} could not be resolved", arg(0), arg(1)),
        },
        ErrorCode::LoadLinkageError => format!(
            "type `{}` listed at {} was skipped: dependency `{}` could not be resolved",
            arg(0),
            arg(1),
            arg(2)
        ),
        ErrorCode::DeclareNotAnInterface => format!(
            "`{}` is declared as extension point `{}` but is not an interface",
            arg(0),
            arg(1)
        ),
        ErrorCode::DeclareNotAConcreteClass => format!(
            "`{}` is declared as implementation `{}` but is not a concrete class",
            arg(0),
            arg(1)
        ),
        ErrorCode::DeclareNonUniqueName => format!(
            "name `{}` is declared by more than one type: {}",
            arg(0),
            args.get(1..).unwrap_or_default().join(", ")
        ),
        ErrorCode::DeclareNoInterface => format!(
            "implementation `{}` (`{}`) does not implement any marked extension point",
            arg(0),
            arg(1)
        ),
        ErrorCode::LoadDeclareAll => args.join("; "),
        ErrorCode::FindNotAnExtensionPoint => {
            format!("`{}` is not a marked extension point interface", arg(0))
        }
    }
}

/// The single failure value of a load attempt.
///
/// Fatal load errors (`load.ioe`, `load.classnotfound`) carry their own code
/// and exactly one record. Coherence failures carry `load.declare.all` and one
/// record per violation. Records are kept in a set so the same violation is
/// never reported twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {}", render_records(.records))]
pub struct AggregateError {
    code: ErrorCode,
    records: BTreeSet<CodedError>,
}

impl AggregateError {
    /// Wrap a fatal error that aborted a load pass.
    pub fn fatal(record: CodedError) -> Self {
        let code = record.code;
        Self {
            code,
            records: BTreeSet::from([record]),
        }
    }

    /// Wrap the complete set of coherence violations.
    pub fn declarations<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CodedError>,
    {
        Self {
            code: ErrorCode::LoadDeclareAll,
            records: records.into_iter().collect(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn records(&self) -> &BTreeSet<CodedError> {
        &self.records
    }

    /// Number of underlying records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records carrying the given code.
    pub fn with_code(&self, code: ErrorCode) -> impl Iterator<Item = &CodedError> {
        self.records.iter().filter(move |r| r.code == code)
    }
}

fn render_records(records: &BTreeSet<CodedError>) -> String {
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
