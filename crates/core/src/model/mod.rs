pub mod annotation;
pub mod class;
pub mod endpoint;
pub mod listener;

pub use annotation::{Annotation, AnnotationKind, AnnotationSet, Arguments, Value};
pub use class::{ClassDecl, ClassRef, MethodDecl};
pub use endpoint::{EndpointCollection, EndpointRecord, Verb};
pub use listener::ListenerRecord;
