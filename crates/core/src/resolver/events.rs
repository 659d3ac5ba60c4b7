use super::ArgReader;
use crate::annotation::MetadataReader;
use crate::error::Result;
use crate::model::{AnnotationKind, AnnotationSet, ClassDecl, ListenerRecord};
use tracing::debug;

/// Reads and resolves classes into listener records.
#[derive(Debug, Clone)]
pub struct EventResolver {
    reader: MetadataReader,
}

impl EventResolver {
    pub fn new(reader: MetadataReader) -> Self {
        Self { reader }
    }

    pub fn listeners(&self, classes: &[ClassDecl]) -> Result<Vec<ListenerRecord>> {
        let mut listeners = Vec::new();
        for class in classes {
            let annotations = self.reader.read(class)?;
            listeners.extend(listeners_for_class(class, &annotations)?);
        }
        Ok(listeners)
    }
}

/// One record per `@Hears` in method order, then declaration order.
/// Class-level annotations carry no meaning for listeners.
pub fn listeners_for_class(class: &ClassDecl, set: &AnnotationSet) -> Result<Vec<ListenerRecord>> {
    let mut listeners = Vec::new();

    for (method, annotations) in &set.methods {
        for annotation in annotations {
            if annotation.kind != AnnotationKind::Hears {
                continue;
            }
            let args = ArgReader::new(class, Some(method), annotation);
            let events = match annotation.args.value() {
                Some(_) => args.value_list()?,
                None => args.optional_list("events")?,
            };
            if events.is_empty() {
                return Err(super::invalid(
                    class,
                    Some(method),
                    annotation,
                    "requires at least one event",
                ));
            }
            listeners.push(ListenerRecord::new(&class.name, method, events));
        }
    }

    debug!("{} resolves to {} listeners", class.name, listeners.len());
    Ok(listeners)
}
