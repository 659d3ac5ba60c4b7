use crate::error::{Result, ScanError};
use crate::model::AnnotationKind;
use crate::namespace::{NAMESPACE_SEPARATOR, trim_namespace};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

pub const ROUTING_NAMESPACE: &str = "Annoscan\\Routing\\Annotations";
pub const EVENTS_NAMESPACE: &str = "Annoscan\\Events\\Annotations";

static BUILTIN_NAMESPACES: Lazy<IndexMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut map = IndexMap::new();
    map.insert(
        ROUTING_NAMESPACE,
        vec![
            "Get",
            "Post",
            "Put",
            "Patch",
            "Delete",
            "Options",
            "Any",
            "Prefix",
            "Controller",
            "Group",
            "Middleware",
            "Where",
            "Resource",
        ],
    );
    map.insert(EVENTS_NAMESPACE, vec!["Hears"]);
    map
});

/// Annotation namespaces the reader recognizes, in registration order, each
/// with the short names it declares.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRegistry {
    namespaces: IndexMap<String, IndexSet<String>>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in routing annotations.
    pub fn routing() -> Self {
        let mut registry = Self::new();
        registry.add_builtin(ROUTING_NAMESPACE);
        registry
    }

    /// Registry holding only the built-in event annotations.
    pub fn events() -> Self {
        let mut registry = Self::new();
        registry.add_builtin(EVENTS_NAMESPACE);
        registry
    }

    pub fn is_builtin(namespace: &str) -> bool {
        BUILTIN_NAMESPACES.contains_key(trim_namespace(namespace))
    }

    /// Registers a built-in namespace; returns false for unknown names.
    pub fn add_builtin(&mut self, namespace: &str) -> bool {
        let namespace = trim_namespace(namespace);
        match BUILTIN_NAMESPACES.get(namespace) {
            Some(kinds) => {
                self.add_namespace(namespace, kinds.iter().copied());
                true
            }
            None => false,
        }
    }

    /// Registers (or extends) a namespace with the given short names.
    pub fn add_namespace<I, S>(&mut self, namespace: &str, kinds: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .namespaces
            .entry(trim_namespace(namespace).to_string())
            .or_default();
        for kind in kinds {
            entry.insert(kind.as_ref().to_string());
        }
        self
    }

    /// Registers a namespace whose annotation classes live under `path`:
    /// every source file stem becomes a recognized short name.
    pub fn register_path(&mut self, namespace: &str, path: &Path) -> Result<()> {
        if !path.is_dir() {
            return Err(ScanError::filesystem(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no annotation directory for {}", namespace),
                ),
            ));
        }

        let mut kinds = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ScanError::filesystem(path, e.into()))?;
            let file = entry.path();
            if !entry.file_type().is_file()
                || file.extension().and_then(|e| e.to_str()) != Some("php")
            {
                continue;
            }
            if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
                kinds.push(stem.to_string());
            }
        }

        debug!(
            "Annotation namespace {} declares {} kinds from {}",
            namespace,
            kinds.len(),
            path.display()
        );
        self.add_namespace(namespace, kinds);
        Ok(())
    }

    /// Resolves a name as written after `@` to its fully-qualified name and
    /// kind. Qualified names must match a registered namespace exactly; bare
    /// names resolve against namespaces in registration order.
    pub fn resolve(&self, written: &str) -> Option<(String, AnnotationKind)> {
        let written = trim_namespace(written);
        if written.is_empty() {
            return None;
        }

        match written.rsplit_once(NAMESPACE_SEPARATOR) {
            Some((namespace, short)) => {
                let kinds = self.namespaces.get(namespace)?;
                kinds
                    .contains(short)
                    .then(|| (written.to_string(), AnnotationKind::from_short_name(short)))
            }
            None => self
                .namespaces
                .iter()
                .find(|(_, kinds)| kinds.contains(written))
                .map(|(namespace, _)| {
                    (
                        format!("{}\\{}", namespace, written),
                        AnnotationKind::from_short_name(written),
                    )
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Verb;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_bare_and_qualified_names() {
        let registry = AnnotationRegistry::routing();

        let (name, kind) = registry.resolve("Get").unwrap();
        assert_eq!(name, "Annoscan\\Routing\\Annotations\\Get");
        assert_eq!(kind, AnnotationKind::Route(Verb::Get));

        let (_, kind) = registry
            .resolve("\\Annoscan\\Routing\\Annotations\\Prefix")
            .unwrap();
        assert_eq!(kind, AnnotationKind::Prefix);
    }

    #[test]
    fn test_unknown_names_do_not_resolve() {
        let registry = AnnotationRegistry::routing();
        assert!(registry.resolve("param").is_none());
        assert!(registry.resolve("Hears").is_none());
        assert!(registry.resolve("Other\\Namespace\\Get").is_none());
    }

    #[test]
    fn test_first_registered_namespace_wins() {
        let mut registry = AnnotationRegistry::new();
        registry.add_namespace("App\\Annotations", ["Get", "Audit"]);
        registry.add_builtin(ROUTING_NAMESPACE);

        let (name, _) = registry.resolve("Get").unwrap();
        assert_eq!(name, "App\\Annotations\\Get");

        let (_, kind) = registry.resolve("Audit").unwrap();
        assert_eq!(kind, AnnotationKind::Custom("Audit".to_string()));
    }

    #[test]
    fn test_register_path_reads_file_stems() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Audit.php"), "<?php").unwrap();
        fs::write(dir.path().join("Get.php"), "<?php").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let mut registry = AnnotationRegistry::new();
        registry
            .register_path("App\\Annotations", dir.path())
            .unwrap();

        assert!(registry.resolve("Audit").is_some());
        assert!(registry.resolve("Get").is_some());
        assert!(registry.resolve("README").is_none());
    }

    #[test]
    fn test_register_missing_path_fails() {
        let dir = tempdir().unwrap();
        let mut registry = AnnotationRegistry::new();
        let err = registry
            .register_path("App\\Annotations", &dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, ScanError::Filesystem { .. }));
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(AnnotationRegistry::is_builtin("\\Annoscan\\Events\\Annotations"));
        assert!(!AnnotationRegistry::is_builtin("App\\Annotations"));
        let mut registry = AnnotationRegistry::new();
        assert!(!registry.add_builtin("App\\Annotations"));
    }
}
