use crate::error::{Result, ScanError};
use crate::model::ClassDecl;
use crate::namespace::trim_namespace;
use indexmap::IndexMap;

/// Resolves class identifiers to their declarations.
///
/// Language plugins implement this over source files; the in-memory
/// registry below covers explicitly declared classes.
pub trait ClassSource: Send + Sync {
    /// Extension (without the dot) of files that hold scannable classes.
    fn source_extension(&self) -> &str;

    /// Looks up one fully-qualified class. Failure is a
    /// [`ScanError::ClassResolution`].
    fn resolve(&self, class: &str) -> Result<ClassDecl>;
}

/// Registry of class declarations populated up front.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClassSource {
    classes: IndexMap<String, ClassDecl>,
}

impl InMemoryClassSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, decl: ClassDecl) -> &mut Self {
        self.classes
            .insert(trim_namespace(&decl.name).to_string(), decl);
        self
    }

    pub fn with(mut self, decl: ClassDecl) -> Self {
        self.register(decl);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassSource for InMemoryClassSource {
    fn source_extension(&self) -> &str {
        "php"
    }

    fn resolve(&self, class: &str) -> Result<ClassDecl> {
        self.classes
            .get(trim_namespace(class))
            .cloned()
            .ok_or_else(|| ScanError::class_resolution(class, "class is not registered"))
    }
}
