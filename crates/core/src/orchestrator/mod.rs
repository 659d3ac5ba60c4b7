//! Scan lifecycle: discover, read, resolve, emit, persist and load.

mod finder;

pub use finder::{Finder, StorageFinder};

use crate::annotation::MetadataReader;
use crate::config::ScanConfig;
use crate::discovery::{DiscoveryResult, resolve_classes};
use crate::emitter;
use crate::error::{Result, ScanError};
use crate::model::{EndpointCollection, ListenerRecord};
use crate::resolver::{EventResolver, RouteResolver};
use crate::source::ClassSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// The application the generated files are loaded into.
pub trait Host {
    fn environment(&self) -> &str;

    /// Whether the route table is already populated by another mechanism.
    fn routes_are_cached(&self) -> bool;

    fn load_routes(&mut self, path: &Path) -> Result<()>;

    fn load_events(&mut self, path: &Path) -> Result<()>;
}

/// What one `boot` pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    pub routes_scanned: bool,
    pub events_scanned: bool,
    pub routes_loaded: Option<PathBuf>,
    pub events_loaded: Option<PathBuf>,
}

pub struct Orchestrator {
    config: ScanConfig,
    source: Arc<dyn ClassSource>,
    finder: Arc<dyn Finder>,
}

impl Orchestrator {
    pub fn new(config: ScanConfig, source: Arc<dyn ClassSource>) -> Self {
        let finder = Arc::new(StorageFinder::new(&config.storage_path));
        Self {
            config,
            source,
            finder,
        }
    }

    pub fn with_finder(mut self, finder: Arc<dyn Finder>) -> Self {
        self.finder = finder;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn finder(&self) -> &dyn Finder {
        self.finder.as_ref()
    }

    pub fn discover_routes(&self) -> Result<DiscoveryResult> {
        let discovery = self.config.discovery(self.source.source_extension());
        let identifiers = self.config.route_identifiers(&discovery)?;
        Ok(resolve_classes(self.source.as_ref(), &identifiers))
    }

    pub fn discover_events(&self) -> Result<DiscoveryResult> {
        let discovery = self.config.discovery(self.source.source_extension());
        let identifiers = self.config.event_identifiers(&discovery)?;
        Ok(resolve_classes(self.source.as_ref(), &identifiers))
    }

    pub fn endpoints(&self) -> Result<EndpointCollection> {
        let discovered = self.discover_routes()?;
        let reader = MetadataReader::new(self.config.route_registry()?);
        RouteResolver::new(reader).endpoints(&discovered.classes)
    }

    pub fn listeners(&self) -> Result<Vec<ListenerRecord>> {
        let discovered = self.discover_events()?;
        let reader = MetadataReader::new(self.config.event_registry()?);
        EventResolver::new(reader).listeners(&discovered.classes)
    }

    pub fn route_definitions(&self) -> Result<String> {
        Ok(emitter::route_definitions(&self.endpoints()?))
    }

    pub fn event_definitions(&self) -> Result<String> {
        Ok(emitter::event_definitions(&self.listeners()?))
    }

    /// Regenerates the routes file unconditionally. Nothing is written when
    /// resolution fails.
    pub fn scan_routes(&self) -> Result<PathBuf> {
        let definitions = self.route_definitions()?;
        let path = self.finder.scanned_routes_path();
        write_generated(&path, &definitions)?;
        info!("Routes scanned into {}", path.display());
        Ok(path)
    }

    pub fn scan_events(&self) -> Result<PathBuf> {
        let definitions = self.event_definitions()?;
        let path = self.finder.scanned_events_path();
        write_generated(&path, &definitions)?;
        info!("Events scanned into {}", path.display());
        Ok(path)
    }

    /// One lifecycle pass: events first, then routes unless the host
    /// already has a cached route table.
    pub fn boot(&self, host: &mut dyn Host) -> Result<BootReport> {
        let mut report = BootReport::default();
        let force = host.environment() == "local" && self.config.scan_when_local;

        if self.config.has_event_scans() {
            if force || !self.finder.events_are_scanned() {
                self.scan_events()?;
                report.events_scanned = true;
            }
            if self.finder.events_are_scanned() {
                let path = self.finder.scanned_events_path();
                host.load_events(&path)?;
                report.events_loaded = Some(path);
            }
        }

        if host.routes_are_cached() {
            info!("Route cache present, skipping annotated routes");
            return Ok(report);
        }

        if self.config.has_route_scans() {
            if force || !self.finder.routes_are_scanned() {
                self.scan_routes()?;
                report.routes_scanned = true;
            }
            if self.finder.routes_are_scanned() {
                let path = self.finder.scanned_routes_path();
                host.load_routes(&path)?;
                report.routes_loaded = Some(path);
            }
        }

        Ok(report)
    }
}

fn write_generated(path: &Path, definitions: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScanError::filesystem(parent, e))?;
    }
    if definitions.is_empty() {
        warn!("No definitions resolved for {}", path.display());
    }
    std::fs::write(path, emitter::wrap_file(definitions)).map_err(|e| ScanError::filesystem(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassDecl;
    use crate::source::InMemoryClassSource;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingHost {
        environment: String,
        cached: bool,
        routes: Vec<PathBuf>,
        events: Vec<PathBuf>,
    }

    impl Host for RecordingHost {
        fn environment(&self) -> &str {
            &self.environment
        }

        fn routes_are_cached(&self) -> bool {
            self.cached
        }

        fn load_routes(&mut self, path: &Path) -> Result<()> {
            self.routes.push(path.to_path_buf());
            Ok(())
        }

        fn load_events(&mut self, path: &Path) -> Result<()> {
            self.events.push(path.to_path_buf());
            Ok(())
        }
    }

    fn source() -> Arc<dyn ClassSource> {
        Arc::new(
            InMemoryClassSource::new()
                .with(
                    ClassDecl::new("App\\Http\\Controllers\\UserController")
                        .with_doc("/** @Prefix(\"/api\") */")
                        .with_method("index", Some("/** @Get(\"/users\") */")),
                )
                .with(
                    ClassDecl::new("App\\Handlers\\UserHandler").with_method(
                        "handle",
                        Some("/** @Hears(events={\"UserCreated\", \"UserUpdated\"}) */"),
                    ),
                ),
        )
    }

    fn config(storage: &Path) -> ScanConfig {
        let mut config = ScanConfig::default().resolved_against(storage);
        config.storage_path = storage.to_path_buf();
        config.routes.targets.classes = vec![
            "App\\Http\\Controllers\\UserController".to_string(),
            "App\\Http\\Controllers\\MissingController".to_string(),
        ];
        config.events.classes = vec!["App\\Handlers\\UserHandler".to_string()];
        config
    }

    #[test]
    fn test_scan_writes_generated_files() {
        let dir = tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), source());

        let routes = orchestrator.scan_routes().unwrap();
        assert_eq!(
            fs::read_to_string(routes).unwrap(),
            "<?php\n\n$router->get('/api/users', [\n\t'uses' => 'App\\\\Http\\\\Controllers\\\\UserController@index',\n]);\n"
        );

        let events = orchestrator.scan_events().unwrap();
        assert_eq!(
            fs::read_to_string(events).unwrap(),
            "<?php\n\n$events->listen(array('UserCreated','UserUpdated'), 'App\\\\Handlers\\\\UserHandler@handle');\n"
        );
    }

    #[test]
    fn test_scanning_twice_is_byte_identical() {
        let dir = tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), source());

        let first = fs::read(orchestrator.scan_routes().unwrap()).unwrap();
        let second = fs::read(orchestrator.scan_routes().unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_boot_scans_once_then_loads() {
        let dir = tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), source());
        let mut host = RecordingHost::default();

        let report = orchestrator.boot(&mut host).unwrap();
        assert!(report.routes_scanned);
        assert!(report.events_scanned);
        assert_eq!(host.routes.len(), 1);
        assert_eq!(host.events.len(), 1);

        let report = orchestrator.boot(&mut host).unwrap();
        assert!(!report.routes_scanned);
        assert!(!report.events_scanned);
        assert_eq!(host.routes.len(), 2);
    }

    #[test]
    fn test_boot_forces_rescan_when_local() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path());
        config.scan_when_local = true;
        let orchestrator = Orchestrator::new(config, source());
        orchestrator.scan_routes().unwrap();

        let mut host = RecordingHost {
            environment: "local".to_string(),
            ..Default::default()
        };
        let report = orchestrator.boot(&mut host).unwrap();
        assert!(report.routes_scanned);
    }

    #[test]
    fn test_boot_skips_routes_when_cached() {
        let dir = tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), source());
        let mut host = RecordingHost {
            cached: true,
            ..Default::default()
        };

        let report = orchestrator.boot(&mut host).unwrap();
        assert!(report.events_loaded.is_some());
        assert!(!report.routes_scanned);
        assert!(host.routes.is_empty());
        assert!(!orchestrator.finder().routes_are_scanned());
    }

    #[test]
    fn test_boot_without_scan_list_does_nothing() {
        let dir = tempdir().unwrap();
        let mut config = ScanConfig::default().resolved_against(dir.path());
        config.storage_path = dir.path().to_path_buf();
        let orchestrator = Orchestrator::new(config, source());
        let mut host = RecordingHost::default();

        assert_eq!(orchestrator.boot(&mut host).unwrap(), BootReport::default());
    }

    #[test]
    fn test_malformed_annotation_writes_nothing() {
        let dir = tempdir().unwrap();
        let source: Arc<dyn ClassSource> = Arc::new(InMemoryClassSource::new().with(
            ClassDecl::new("App\\Http\\Controllers\\UserController")
                .with_method("index", Some("/** @Get(\"/users\" */")),
        ));
        let orchestrator = Orchestrator::new(config(dir.path()), source);

        let err = orchestrator.scan_routes().unwrap_err();
        assert!(matches!(err, ScanError::MetadataParse { .. }));
        assert!(!orchestrator.finder().routes_are_scanned());
    }
}
