pub mod error;
pub mod logging;

pub mod annotation;
pub mod config;
pub mod discovery;
pub mod emitter;
pub mod model;
pub mod namespace;
pub mod orchestrator;
pub mod resolver;
pub mod source;

pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use orchestrator::{BootReport, Finder, Host, Orchestrator, StorageFinder};
pub use source::{ClassSource, InMemoryClassSource};
