use super::parser::parse_docblock;
use super::registry::AnnotationRegistry;
use crate::error::{Result, ScanError};
use crate::model::{Annotation, AnnotationSet, ClassDecl};
use tracing::debug;

/// Reads the class-level and method-level annotations of a class.
#[derive(Debug, Clone)]
pub struct MetadataReader {
    registry: AnnotationRegistry,
}

impl MetadataReader {
    pub fn new(registry: AnnotationRegistry) -> Self {
        Self { registry }
    }

    /// Builds the annotation set of `class`. Every declared method gets an
    /// entry, possibly empty. A malformed docblock fails the whole class.
    pub fn read(&self, class: &ClassDecl) -> Result<AnnotationSet> {
        let mut set = AnnotationSet {
            class: self.parse(class, None, class.doc.as_deref())?,
            ..Default::default()
        };

        for method in &class.methods {
            let annotations = self.parse(class, Some(&method.name), method.doc.as_deref())?;
            set.methods.insert(method.name.clone(), annotations);
        }

        debug!(
            "Read {} class and {} method annotations from {}",
            set.class.len(),
            set.methods.values().map(Vec::len).sum::<usize>(),
            class.name
        );
        Ok(set)
    }

    fn parse(
        &self,
        class: &ClassDecl,
        method: Option<&str>,
        doc: Option<&str>,
    ) -> Result<Vec<Annotation>> {
        let Some(doc) = doc else {
            return Ok(Vec::new());
        };
        parse_docblock(doc, &self.registry).map_err(|e| ScanError::MetadataParse {
            class: class.name.clone(),
            target: method.map(|m| format!("::{}", m)).unwrap_or_default(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationKind, Verb};

    #[test]
    fn test_read_keeps_every_method() {
        let class = ClassDecl::new("App\\Http\\Controllers\\UserController")
            .with_doc("/** @Prefix(\"/api\") */")
            .with_method("index", Some("/** @Get(\"/users\") */"))
            .with_method("helper", None)
            .with_method("store", Some("/** Stores a user. */"));

        let set = MetadataReader::new(AnnotationRegistry::routing())
            .read(&class)
            .unwrap();

        assert_eq!(set.class.len(), 1);
        assert_eq!(set.class[0].kind, AnnotationKind::Prefix);
        let methods: Vec<_> = set.methods.keys().map(String::as_str).collect();
        assert_eq!(methods, vec!["index", "helper", "store"]);
        assert_eq!(set.method("index")[0].kind, AnnotationKind::Route(Verb::Get));
        assert!(set.method("helper").is_empty());
        assert!(set.method("store").is_empty());
    }

    #[test]
    fn test_read_reports_malformed_method_docblock() {
        let class = ClassDecl::new("App\\Broken").with_method("index", Some("/** @Get(\"/x\" */"));

        let err = MetadataReader::new(AnnotationRegistry::routing())
            .read(&class)
            .unwrap_err();

        match err {
            ScanError::MetadataParse { class, target, .. } => {
                assert_eq!(class, "App\\Broken");
                assert_eq!(target, "::index");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
