use annoscan_core::config::{DEFAULT_CONFIG_FILE, ScanConfig};
use annoscan_core::error::Result;
use annoscan_core::orchestrator::Orchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Assembles an orchestrator backed by the PHP class source.
///
/// `app_path` overrides the configured application directory for this run.
pub fn build_orchestrator(config_path: &Path, app_path: Option<PathBuf>) -> Result<Orchestrator> {
    let mut config = ScanConfig::load(config_path)?;
    if let Some(app_path) = app_path {
        config.app_path = app_path;
    }
    build_with_config(config)
}

pub fn build_with_config(config: ScanConfig) -> Result<Orchestrator> {
    let source = annoscan_php::PhpClassSource::new(&config.app_path, &config.root_namespace)?;
    tracing::debug!(
        "PHP class source rooted at {} ({})",
        config.app_path.display(),
        config.root_namespace
    );
    Ok(Orchestrator::new(config, Arc::new(source)))
}

/// `annoscan.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(annoscan_core::logging::init_logging(component, to_stderr))
}
