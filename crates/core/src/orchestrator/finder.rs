use std::path::PathBuf;

/// Knows where generated files live and whether they exist yet.
pub trait Finder: Send + Sync {
    fn scanned_routes_path(&self) -> PathBuf;

    fn scanned_events_path(&self) -> PathBuf;

    fn routes_are_scanned(&self) -> bool {
        self.scanned_routes_path().exists()
    }

    fn events_are_scanned(&self) -> bool {
        self.scanned_events_path().exists()
    }
}

/// Generated files under `{storage}/framework/`.
#[derive(Debug, Clone)]
pub struct StorageFinder {
    storage_path: PathBuf,
}

impl StorageFinder {
    pub const ROUTES_FILE: &'static str = "routes.scanned.php";
    pub const EVENTS_FILE: &'static str = "events.scanned.php";

    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    pub fn framework_dir(&self) -> PathBuf {
        self.storage_path.join("framework")
    }
}

impl Finder for StorageFinder {
    fn scanned_routes_path(&self) -> PathBuf {
        self.framework_dir().join(Self::ROUTES_FILE)
    }

    fn scanned_events_path(&self) -> PathBuf {
        self.framework_dir().join(Self::EVENTS_FILE)
    }
}
