//! Turns annotation sets into ordered route and listener records.

pub mod events;
pub mod routes;

pub use events::{EventResolver, listeners_for_class};
pub use routes::{RouteResolver, endpoints_for_class, join_path};

use crate::error::ScanError;
use crate::model::{Annotation, ClassDecl};
use indexmap::IndexMap;

/// Error for an annotation whose arguments have the wrong shape.
pub(crate) fn invalid(
    class: &ClassDecl,
    method: Option<&str>,
    annotation: &Annotation,
    message: &str,
) -> ScanError {
    let short = annotation
        .name
        .rsplit('\\')
        .next()
        .unwrap_or(&annotation.name);
    ScanError::MetadataParse {
        class: class.name.clone(),
        target: method.map(|m| format!("::{}", m)).unwrap_or_default(),
        message: format!("@{} {}", short, message),
    }
}

/// Typed access to annotation arguments, failing on type mismatches.
pub(crate) struct ArgReader<'a> {
    pub class: &'a ClassDecl,
    pub method: Option<&'a str>,
    pub annotation: &'a Annotation,
}

impl<'a> ArgReader<'a> {
    pub fn new(class: &'a ClassDecl, method: Option<&'a str>, annotation: &'a Annotation) -> Self {
        Self {
            class,
            method,
            annotation,
        }
    }

    fn fail(&self, message: &str) -> ScanError {
        invalid(self.class, self.method, self.annotation, message)
    }

    /// The default (first positional) argument as a string, or `fallback=`.
    pub fn required_value_str(&self, fallback: &str) -> crate::Result<String> {
        let args = &self.annotation.args;
        match args.value().or_else(|| args.get(fallback)) {
            Some(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| self.fail(&format!("expects a string {}", fallback))),
            None => Err(self.fail(&format!("requires a {}", fallback))),
        }
    }

    pub fn optional_str(&self, key: &str) -> crate::Result<Option<String>> {
        match self.annotation.args.get(key) {
            None | Some(crate::model::Value::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.fail(&format!("expects '{}' to be a string", key))),
        }
    }

    pub fn optional_list(&self, key: &str) -> crate::Result<Vec<String>> {
        match self.annotation.args.get(key) {
            None | Some(crate::model::Value::Null) => Ok(Vec::new()),
            Some(value) => value
                .string_list()
                .ok_or_else(|| self.fail(&format!("expects '{}' to be a string or list of strings", key))),
        }
    }

    pub fn optional_map(&self, key: &str) -> crate::Result<IndexMap<String, String>> {
        match self.annotation.args.get(key) {
            None | Some(crate::model::Value::Null) => Ok(IndexMap::new()),
            Some(value) => value
                .string_map()
                .ok_or_else(|| self.fail(&format!("expects '{}' to be a map of strings", key))),
        }
    }

    /// The default argument as a list of strings (a single string counts).
    pub fn value_list(&self) -> crate::Result<Vec<String>> {
        match self.annotation.args.value() {
            Some(value) => value
                .string_list()
                .filter(|list| !list.is_empty())
                .ok_or_else(|| self.fail("expects a string or a non-empty list of strings")),
            None => Err(self.fail("requires at least one value")),
        }
    }

    /// The default argument as a string map, or the named arguments when no
    /// default argument is given: `@Where({"id": "\d+"})` or `@Where(id="\d+")`.
    pub fn value_or_named_map(&self) -> crate::Result<IndexMap<String, String>> {
        let args = &self.annotation.args;
        match args.positional.first() {
            Some(value) => value
                .string_map()
                .ok_or_else(|| self.fail("expects a map of strings")),
            None => args
                .named
                .iter()
                .map(|(k, v)| {
                    v.as_str()
                        .map(|s| (k.clone(), s.to_string()))
                        .ok_or_else(|| self.fail(&format!("expects '{}' to be a string", k)))
                })
                .collect(),
        }
    }
}
