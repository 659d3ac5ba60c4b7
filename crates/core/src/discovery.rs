use crate::error::{Result, ScanError};
use crate::model::ClassDecl;
use crate::namespace::{class_from_relative_path, namespace_directory, trim_namespace};
use crate::source::ClassSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Namespaces to expand by directory listing, plus the filters applied to
/// what the listing finds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceScan {
    pub namespaces: Vec<String>,
    pub only: Vec<String>,
    pub except: Vec<String>,
}

impl NamespaceScan {
    pub fn new<S: AsRef<str>>(namespaces: &[S]) -> Self {
        Self {
            namespaces: namespaces.iter().map(|n| n.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn only<S: AsRef<str>>(mut self, classes: &[S]) -> Self {
        self.only = classes.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn except<S: AsRef<str>>(mut self, classes: &[S]) -> Self {
        self.except = classes.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedClass {
    pub class: String,
    pub reason: String,
}

/// Classes that resolved, in encounter order, and the identifiers that
/// did not.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    pub classes: Vec<ClassDecl>,
    pub skipped: Vec<SkippedClass>,
}

impl DiscoveryResult {
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Keeps classes listed in `only` (when non-empty), then drops those listed
/// in `except`. Order is preserved.
pub fn apply_filters(classes: Vec<String>, only: &[String], except: &[String]) -> Vec<String> {
    let listed = |set: &[String], class: &str| set.iter().any(|c| trim_namespace(c) == class);

    classes
        .into_iter()
        .filter(|class| only.is_empty() || listed(only, class.as_str()))
        .filter(|class| except.is_empty() || !listed(except, class.as_str()))
        .collect()
}

/// Finds classes by walking the directories namespaces map to.
#[derive(Debug, Clone)]
pub struct ClassDiscovery {
    base_dir: PathBuf,
    root_namespace: String,
    extension: String,
}

impl ClassDiscovery {
    pub fn new(base_dir: impl Into<PathBuf>, root_namespace: &str, extension: &str) -> Self {
        Self {
            base_dir: base_dir.into(),
            root_namespace: root_namespace.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Lists every class under the directory `namespace` resolves to,
    /// recursively, in file-name order.
    pub fn classes_in_namespace(&self, namespace: &str) -> Result<Vec<String>> {
        let namespace = trim_namespace(namespace);
        let dir = namespace_directory(&self.base_dir, namespace, &self.root_namespace);
        if !dir.is_dir() {
            return Err(ScanError::filesystem(
                dir,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no directory for namespace {}", namespace),
                ),
            ));
        }

        let mut classes = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                ScanError::filesystem(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&dir) else {
                continue;
            };
            if let Some(class) = class_from_relative_path(namespace, relative) {
                classes.push(class);
            }
        }

        debug!(
            "Namespace {} ({}) lists {} classes",
            namespace,
            dir.display(),
            classes.len()
        );
        Ok(classes)
    }

    /// Expands every namespace in order and applies the scan's filters.
    pub fn expand(&self, scan: &NamespaceScan) -> Result<Vec<String>> {
        let mut classes = Vec::new();
        for namespace in &scan.namespaces {
            classes.extend(self.classes_in_namespace(namespace)?);
        }
        Ok(apply_filters(classes, &scan.only, &scan.except))
    }

    /// Explicit identifiers first, then the filtered namespace expansion.
    /// Duplicates are kept.
    pub fn identifiers(&self, explicit: &[String], scan: &NamespaceScan) -> Result<Vec<String>> {
        let mut classes = explicit.to_vec();
        classes.extend(self.expand(scan)?);
        Ok(classes)
    }
}

/// Resolves identifiers against `source`. Identifiers that fail to resolve
/// are recorded and skipped; the rest keep their order.
pub fn resolve_classes(source: &dyn ClassSource, identifiers: &[String]) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();
    for identifier in identifiers {
        match source.resolve(identifier) {
            Ok(decl) => result.classes.push(decl),
            Err(e) => {
                warn!("Skipping {}: {}", identifier, e);
                result.skipped.push(SkippedClass {
                    class: identifier.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    result
}
