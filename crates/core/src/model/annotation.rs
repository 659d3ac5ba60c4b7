use super::endpoint::Verb;
use indexmap::IndexMap;
use serde::Serialize;

/// A literal value inside annotation arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// A class constant reference such as `Foo::BAR`, kept verbatim.
    Constant(String),
    /// `{ ... }` literal. Entries keep their declared order; keys are
    /// `None` for list-style entries.
    Array(Vec<(Option<String>, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// A single string or an array of strings, flattened to a list.
    pub fn string_list(&self) -> Option<Vec<String>> {
        match self {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(entries) => entries
                .iter()
                .map(|(_, v)| v.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }

    /// An array of `key: "string"` entries.
    pub fn string_map(&self) -> Option<IndexMap<String, String>> {
        match self {
            Value::Array(entries) => entries
                .iter()
                .map(|(k, v)| Some((k.clone()?, v.as_str()?.to_string())))
                .collect(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub named: IndexMap<String, Value>,
}

impl Arguments {
    /// The default argument: the first positional value, or `value=`.
    pub fn value(&self) -> Option<&Value> {
        self.positional.first().or_else(|| self.named.get("value"))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).and_then(Value::string_list)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// The behavior an annotation name maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnnotationKind {
    Route(Verb),
    Prefix,
    Controller,
    Group,
    Middleware,
    Where,
    Resource,
    Hears,
    /// Recognized through a configured namespace but carrying no built-in
    /// semantics; resolvers ignore it.
    Custom(String),
}

impl AnnotationKind {
    pub fn from_short_name(name: &str) -> Self {
        match name {
            "Get" => AnnotationKind::Route(Verb::Get),
            "Post" => AnnotationKind::Route(Verb::Post),
            "Put" => AnnotationKind::Route(Verb::Put),
            "Patch" => AnnotationKind::Route(Verb::Patch),
            "Delete" => AnnotationKind::Route(Verb::Delete),
            "Options" => AnnotationKind::Route(Verb::Options),
            "Any" => AnnotationKind::Route(Verb::Any),
            "Prefix" => AnnotationKind::Prefix,
            "Controller" => AnnotationKind::Controller,
            "Group" => AnnotationKind::Group,
            "Middleware" => AnnotationKind::Middleware,
            "Where" => AnnotationKind::Where,
            "Resource" => AnnotationKind::Resource,
            "Hears" => AnnotationKind::Hears,
            other => AnnotationKind::Custom(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Fully-qualified annotation name, e.g. `Annoscan\Routing\Annotations\Get`.
    pub name: String,
    pub kind: AnnotationKind,
    pub args: Arguments,
}

impl Annotation {
    pub fn new(name: impl Into<String>, kind: AnnotationKind, args: Arguments) -> Self {
        Self {
            name: name.into(),
            kind,
            args,
        }
    }
}

/// Annotations read from one class: class-level ones in declaration order
/// and, for every declared method (source order), that method's list.
/// Methods without annotations map to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationSet {
    pub class: Vec<Annotation>,
    pub methods: IndexMap<String, Vec<Annotation>>,
}

impl AnnotationSet {
    pub fn method(&self, name: &str) -> &[Annotation] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
