//! Scan configuration loaded from `annoscan.toml`.

use crate::annotation::AnnotationRegistry;
use crate::discovery::{ClassDiscovery, NamespaceScan};
use crate::error::{Result, ScanError};
use crate::namespace::{join_namespace, namespace_directory, prefix_classes};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "annoscan.toml";

/// An extra annotation namespace. Without `path`, its directory is derived
/// from the namespace under `app_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationNamespace {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Classes to scan for one kind of definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanTargets {
    /// Namespace prepended to every entry of `classes`.
    pub prefix: Option<String>,
    pub classes: Vec<String>,
    /// Namespaces expanded by directory listing.
    pub namespaces: Vec<String>,
    pub only: Vec<String>,
    pub except: Vec<String>,
    pub annotation_namespaces: Vec<AnnotationNamespace>,
}

impl ScanTargets {
    /// The configured classes with the prefix applied.
    pub fn explicit_classes(&self) -> Vec<String> {
        prefix_classes(self.prefix.as_deref().unwrap_or_default(), &self.classes)
    }

    pub fn namespace_scan(&self) -> NamespaceScan {
        NamespaceScan {
            namespaces: self.namespaces.clone(),
            only: self.only.clone(),
            except: self.except.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.namespaces.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTargets {
    #[serde(flatten)]
    pub targets: ScanTargets,
    /// Also scan every class under `{root_namespace}\Http\Controllers`.
    pub scan_controllers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub root_namespace: String,
    pub app_path: PathBuf,
    pub storage_path: PathBuf,
    pub environment: String,
    pub scan_when_local: bool,
    pub routes: RouteTargets,
    pub events: ScanTargets,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_namespace: "App".to_string(),
            app_path: PathBuf::from("app"),
            storage_path: PathBuf::from("storage"),
            environment: "production".to_string(),
            scan_when_local: false,
            routes: RouteTargets::default(),
            events: ScanTargets::default(),
        }
    }
}

impl ScanConfig {
    /// Loads `path`, falling back to defaults when it does not exist.
    /// Relative paths resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default().resolved_against(base));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ScanError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&contents)?.resolved_against(base))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Makes every relative path absolute with respect to `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.app_path);
        resolve(&mut self.storage_path);
        for namespace in self
            .routes
            .targets
            .annotation_namespaces
            .iter_mut()
            .chain(self.events.annotation_namespaces.iter_mut())
        {
            if let Some(path) = namespace.path.as_mut() {
                resolve(path);
            }
        }
        self
    }

    pub fn discovery(&self, extension: &str) -> ClassDiscovery {
        ClassDiscovery::new(&self.app_path, &self.root_namespace, extension)
    }

    /// Route identifiers: prefixed classes, the controllers namespace when
    /// enabled, then the filtered namespace expansion.
    pub fn route_identifiers(&self, discovery: &ClassDiscovery) -> Result<Vec<String>> {
        let targets = &self.routes.targets;
        let mut classes = targets.explicit_classes();
        if self.routes.scan_controllers {
            let controllers = join_namespace(&[self.root_namespace.as_str(), "Http", "Controllers"]);
            classes.extend(discovery.classes_in_namespace(&controllers)?);
        }
        discovery.identifiers(&classes, &targets.namespace_scan())
    }

    pub fn event_identifiers(&self, discovery: &ClassDiscovery) -> Result<Vec<String>> {
        discovery.identifiers(&self.events.explicit_classes(), &self.events.namespace_scan())
    }

    pub fn has_route_scans(&self) -> bool {
        !self.routes.targets.is_empty() || self.routes.scan_controllers
    }

    pub fn has_event_scans(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn route_registry(&self) -> Result<AnnotationRegistry> {
        let mut registry = AnnotationRegistry::routing();
        self.extend_registry(&mut registry, &self.routes.targets.annotation_namespaces)?;
        Ok(registry)
    }

    pub fn event_registry(&self) -> Result<AnnotationRegistry> {
        let mut registry = AnnotationRegistry::events();
        self.extend_registry(&mut registry, &self.events.annotation_namespaces)?;
        Ok(registry)
    }

    fn extend_registry(
        &self,
        registry: &mut AnnotationRegistry,
        namespaces: &[AnnotationNamespace],
    ) -> Result<()> {
        for extra in namespaces {
            if registry.add_builtin(&extra.namespace) {
                continue;
            }
            let path = match &extra.path {
                Some(path) => path.clone(),
                None => namespace_directory(&self.app_path, &extra.namespace, &self.root_namespace),
            };
            registry.register_path(&extra.namespace, &path)?;
        }
        Ok(())
    }
}
