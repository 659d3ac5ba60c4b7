use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("class {class} could not be resolved: {reason}")]
    ClassResolution { class: String, reason: String },
    #[error("malformed annotation on {class}{target}: {message}")]
    MetadataParse {
        class: String,
        /// Empty for class docblocks, `::method` for method docblocks.
        target: String,
        message: String,
    },
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("parsing error: {0}")]
    Parsing(String),
}

impl ScanError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn class_resolution(class: impl Into<String>, reason: impl Into<String>) -> Self {
        ScanError::ClassResolution {
            class: class.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
