use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity of one scannable class: its fully-qualified name and the
/// methods it declares, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    pub name: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub doc: Option<String>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, doc: Option<&str>) -> Self {
        Self {
            name: name.into(),
            doc: doc.map(str::to_string),
        }
    }
}

/// A class declaration as found in source: the raw docblocks attached to
/// the class and to each declared method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub doc: Option<String>,
    pub methods: Vec<MethodDecl>,
    /// File the declaration was read from, when it came from disk.
    pub origin: Option<PathBuf>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            methods: Vec::new(),
            origin: None,
        }
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_method(mut self, name: &str, doc: Option<&str>) -> Self {
        self.methods.push(MethodDecl::new(name, doc));
        self
    }

    pub fn class_ref(&self) -> ClassRef {
        ClassRef {
            name: self.name.clone(),
            methods: self.methods.iter().map(|m| m.name.clone()).collect(),
        }
    }
}
