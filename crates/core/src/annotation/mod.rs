//! Docblock annotations: the registry of recognized names, the parser for
//! their argument syntax, and the per-class metadata reader.

pub mod parser;
pub mod reader;
pub mod registry;

pub use parser::{DocParseError, clean_docblock, parse_docblock};
pub use reader::MetadataReader;
pub use registry::{AnnotationRegistry, EVENTS_NAMESPACE, ROUTING_NAMESPACE};
