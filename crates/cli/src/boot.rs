use annoscan_core::error::Result;
use annoscan_core::orchestrator::{Host, Orchestrator};
use std::path::{Path, PathBuf};
use tracing::info;

/// Host that records the files it is asked to load.
pub struct LoggingHost {
    environment: String,
    pub loaded: Vec<PathBuf>,
}

impl LoggingHost {
    pub fn new(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            loaded: Vec::new(),
        }
    }
}

impl Host for LoggingHost {
    fn environment(&self) -> &str {
        &self.environment
    }

    fn routes_are_cached(&self) -> bool {
        false
    }

    fn load_routes(&mut self, path: &Path) -> Result<()> {
        info!("Loading routes from {}", path.display());
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn load_events(&mut self, path: &Path) -> Result<()> {
        info!("Loading events from {}", path.display());
        self.loaded.push(path.to_path_buf());
        Ok(())
    }
}

pub fn run(orchestrator: &Orchestrator) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut host = LoggingHost::new(&orchestrator.config().environment);
    let report = orchestrator.boot(&mut host)?;

    if report.events_scanned {
        println!("Events scanned!");
    }
    if report.routes_scanned {
        println!("Routes scanned!");
    }
    if host.loaded.is_empty() {
        println!("Nothing to load.");
    }
    for path in &host.loaded {
        println!("Loaded {}", path.display());
    }
    Ok(())
}
