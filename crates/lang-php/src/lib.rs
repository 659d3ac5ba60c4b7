pub mod parser;
pub mod queries;

use annoscan_core::error::{Result, ScanError};
use annoscan_core::model::ClassDecl;
use annoscan_core::namespace::{convert_namespace_to_path, trim_namespace};
use annoscan_core::source::ClassSource;
use std::path::PathBuf;
use tracing::debug;

pub use parser::PhpParser;

pub const PHP_EXTENSION: &str = "php";

/// Resolves classes by reading `{app_path}/{relative namespace path}.php`
/// and extracting the declaration with tree-sitter.
#[derive(Clone)]
pub struct PhpClassSource {
    app_path: PathBuf,
    root_namespace: String,
    parser: PhpParser,
}

impl PhpClassSource {
    pub fn new(app_path: impl Into<PathBuf>, root_namespace: &str) -> Result<Self> {
        Ok(Self {
            app_path: app_path.into(),
            root_namespace: root_namespace.to_string(),
            parser: PhpParser::new()?,
        })
    }

    /// File expected to declare `class`.
    pub fn path_for(&self, class: &str) -> PathBuf {
        let relative = convert_namespace_to_path(class, &self.root_namespace);
        self.app_path.join(format!("{}.{}", relative, PHP_EXTENSION))
    }
}

impl ClassSource for PhpClassSource {
    fn source_extension(&self) -> &str {
        PHP_EXTENSION
    }

    fn resolve(&self, class: &str) -> Result<ClassDecl> {
        let class = trim_namespace(class);
        let path = self.path_for(class);

        let source = std::fs::read_to_string(&path).map_err(|e| {
            ScanError::class_resolution(class, format!("cannot read {}: {}", path.display(), e))
        })?;
        let classes = self
            .parser
            .parse_classes(&source)
            .map_err(|e| ScanError::class_resolution(class, e.to_string()))?;

        // PHP class names are case-insensitive.
        let mut decl = classes
            .into_iter()
            .find(|decl| decl.name.eq_ignore_ascii_case(class))
            .ok_or_else(|| {
                ScanError::class_resolution(
                    class,
                    format!("{} does not declare it", path.display()),
                )
            })?;

        debug!(
            "Resolved {} with {} methods from {}",
            decl.name,
            decl.methods.len(),
            path.display()
        );
        decl.origin = Some(path);
        Ok(decl)
    }
}
