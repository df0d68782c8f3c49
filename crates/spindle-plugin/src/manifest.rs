// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest discovery across the module search path.
//!
//! A manifest is a UTF-8 text resource at a well-known relative path that
//! lists one fully-qualified type name per line. Every search path entry may
//! contribute its own fragment, so the resolver reads the manifest from
//! *every* entry that has one, in search path order.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spindle_core::{CodedError, ErrorCode};

use crate::notes::DiagnosticLog;

/// One root of the module search path.
pub trait SearchPathEntry: Send + Sync + fmt::Debug {
    /// Human-readable location used in notes and error records.
    fn location(&self) -> String;

    /// Open the resource at `relative_path`. `Ok(None)` means this entry
    /// does not provide it.
    fn open(&self, relative_path: &str) -> io::Result<Option<Box<dyn BufRead + Send>>>;
}

/// A filesystem directory on the search path.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    root: PathBuf,
}

impl DirectoryEntry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SearchPathEntry for DirectoryEntry {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn open(&self, relative_path: &str) -> io::Result<Option<Box<dyn BufRead + Send>>> {
        match File::open(self.root.join(relative_path)) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Manifests compiled into the binary, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedEntry {
    label: String,
    resources: HashMap<String, Arc<str>>,
}

impl EmbeddedEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            resources: HashMap::new(),
        }
    }

    pub fn with_resource(
        mut self,
        relative_path: impl Into<String>,
        content: impl Into<Arc<str>>,
    ) -> Self {
        self.resources.insert(relative_path.into(), content.into());
        self
    }
}

impl SearchPathEntry for EmbeddedEntry {
    fn location(&self) -> String {
        format!("embedded:{}", self.label)
    }

    fn open(&self, relative_path: &str) -> io::Result<Option<Box<dyn BufRead + Send>>> {
        Ok(self.resources.get(relative_path).map(|content| {
            let reader: Box<dyn BufRead + Send> =
                Box::new(Cursor::new(content.as_bytes().to_vec()));
            reader
        }))
    }
}

/// A single type name read from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Location of the manifest resource the entry came from.
    pub source: String,
    /// 1-based line number within that resource.
    pub line: usize,
    pub type_name: String,
}

impl ManifestEntry {
    /// `source:line`, used as the position argument in error records.
    pub fn position(&self) -> String {
        format!("{}:{}", self.source, self.line)
    }
}

/// Reads a manifest from every search path entry.
#[derive(Debug, Clone)]
pub struct ManifestResolver {
    search_path: Vec<Arc<dyn SearchPathEntry>>,
    notes: Arc<DiagnosticLog>,
}

impl ManifestResolver {
    pub fn new(search_path: Vec<Arc<dyn SearchPathEntry>>, notes: Arc<DiagnosticLog>) -> Self {
        Self { search_path, notes }
    }

    pub fn search_path(&self) -> &[Arc<dyn SearchPathEntry>] {
        &self.search_path
    }

    /// All non-blank lines of `manifest_path` across the search path, in
    /// search path order then line order.
    ///
    /// Fails with `load.ioe` if a located resource cannot be opened or read.
    pub fn resolve(&self, manifest_path: &str) -> Result<Vec<ManifestEntry>, CodedError> {
        let mut entries = Vec::new();

        for entry in &self.search_path {
            let resource = format!("{}/{}", entry.location(), manifest_path);
            let reader = match entry.open(manifest_path) {
                Ok(Some(reader)) => reader,
                Ok(None) => continue,
                Err(e) => return Err(io_error(&resource, &e)),
            };
            self.notes.debug(format!("resource found at {resource}"));

            for (index, line) in reader.lines().enumerate() {
                let line = line.map_err(|e| io_error(&resource, &e))?;
                let type_name = line.trim();
                if type_name.is_empty() {
                    continue;
                }
                self.notes
                    .debug(format!("processing entry {type_name} from {resource}"));
                entries.push(ManifestEntry {
                    source: resource.clone(),
                    line: index + 1,
                    type_name: type_name.to_string(),
                });
            }
        }

        Ok(entries)
    }
}

fn io_error(resource: &str, err: &io::Error) -> CodedError {
    CodedError::new(ErrorCode::LoadIoe, [resource.to_string(), err.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "META-INF/spindle/extension-points";

    fn resolver(entries: Vec<Arc<dyn SearchPathEntry>>) -> (ManifestResolver, Arc<DiagnosticLog>) {
        let notes = Arc::new(DiagnosticLog::new());
        (ManifestResolver::new(entries, notes.clone()), notes)
    }

    #[derive(Debug)]
    struct BrokenEntry;

    impl SearchPathEntry for BrokenEntry {
        fn location(&self) -> String {
            "broken".to_string()
        }

        fn open(&self, _relative_path: &str) -> io::Result<Option<Box<dyn BufRead + Send>>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn skips_blank_lines_and_trims() {
        let entry = EmbeddedEntry::new("core")
            .with_resource(MANIFEST, "acme.Foo\n\n  \r\n acme.Bar \r\n");
        let (resolver, _) = resolver(vec![Arc::new(entry)]);
        let entries = resolver.resolve(MANIFEST).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.type_name.as_str()).collect();
        assert_eq!(names, vec!["acme.Foo", "acme.Bar"]);
        assert_eq!(entries[0].line, 1);
        assert_eq!(entries[1].line, 4);
        assert_eq!(entries[1].position(), format!("embedded:core/{MANIFEST}:4"));
    }

    #[test]
    fn reads_every_contributing_entry_in_order() {
        let a = EmbeddedEntry::new("a").with_resource(MANIFEST, "acme.A1\nacme.A2");
        let none = EmbeddedEntry::new("none");
        let b = EmbeddedEntry::new("b").with_resource(MANIFEST, "acme.B1");
        let (resolver, notes) = resolver(vec![Arc::new(a), Arc::new(none), Arc::new(b)]);
        let names: Vec<String> = resolver
            .resolve(MANIFEST)
            .unwrap()
            .into_iter()
            .map(|e| e.type_name)
            .collect();
        assert_eq!(names, vec!["acme.A1", "acme.A2", "acme.B1"]);

        let notes = notes.entries();
        assert!(notes[0].starts_with("resource found at embedded:a/"));
        assert!(notes.iter().any(|n| n.starts_with("resource found at embedded:b/")));
        assert!(!notes.iter().any(|n| n.contains("embedded:none")));
    }

    #[test]
    fn missing_manifest_everywhere_is_empty() {
        let (resolver, notes) = resolver(vec![Arc::new(EmbeddedEntry::new("x"))]);
        assert!(resolver.resolve(MANIFEST).unwrap().is_empty());
        assert!(notes.is_empty());
    }

    #[test]
    fn unreadable_resource_is_load_ioe() {
        let (resolver, _) = resolver(vec![Arc::new(BrokenEntry)]);
        let err = resolver.resolve(MANIFEST).unwrap_err();
        assert_eq!(err.code, ErrorCode::LoadIoe);
        assert_eq!(err.args[0], format!("broken/{MANIFEST}"));
    }

    #[test]
    fn invalid_utf8_is_load_ioe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [b'a', 0xff, 0xfe, b'\n']).unwrap();

        let (resolver, _) = resolver(vec![Arc::new(DirectoryEntry::new(dir.path()))]);
        let err = resolver.resolve(MANIFEST).unwrap_err();
        assert_eq!(err.code, ErrorCode::LoadIoe);
    }

    #[test]
    fn directory_entry_reads_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "acme.Foo\n").unwrap();

        let (resolver, _) = resolver(vec![
            Arc::new(DirectoryEntry::new(dir.path())),
            Arc::new(DirectoryEntry::new(dir.path().join("absent"))),
        ]);
        let entries = resolver.resolve(MANIFEST).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].type_name, "acme.Foo");
    }
}
