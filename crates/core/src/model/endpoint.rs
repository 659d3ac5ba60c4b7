use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Any,
}

impl Verb {
    /// Router method name used in generated registrations.
    pub fn method_name(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
            Verb::Options => "options",
            Verb::Any => "any",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.method_name().to_ascii_uppercase())
    }
}

/// One resolved route registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointRecord {
    pub class: String,
    pub method: String,
    /// `Class@method`
    pub uses: String,
    pub verbs: Vec<Verb>,
    pub path: String,
    pub name: Option<String>,
    /// Middleware contributed by class-level annotations, in fold order.
    pub class_middleware: Vec<String>,
    /// Middleware declared on the method itself.
    pub middleware: Vec<String>,
    #[serde(rename = "where")]
    pub wheres: IndexMap<String, String>,
    pub domain: Option<String>,
}

impl EndpointRecord {
    pub fn new(class: &str, method: &str, verbs: Vec<Verb>, path: impl Into<String>) -> Self {
        Self {
            class: class.to_string(),
            method: method.to_string(),
            uses: format!("{}@{}", class, method),
            verbs,
            path: path.into(),
            name: None,
            class_middleware: Vec::new(),
            middleware: Vec::new(),
            wheres: IndexMap::new(),
            domain: None,
        }
    }

    /// Full middleware chain: class-level entries run first.
    pub fn all_middleware(&self) -> Vec<String> {
        self.class_middleware
            .iter()
            .chain(self.middleware.iter())
            .cloned()
            .collect()
    }

    /// Human-readable verb list, e.g. `PUT|PATCH`.
    pub fn verb_label(&self) -> String {
        self.verbs
            .iter()
            .map(Verb::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Ordered endpoint records; insertion order is registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EndpointCollection {
    records: Vec<EndpointRecord>,
}

impl EndpointCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EndpointRecord) {
        self.records.push(record);
    }

    /// Appends `other` after the current records.
    pub fn merge(mut self, other: EndpointCollection) -> Self {
        self.records.extend(other.records);
        self
    }

    /// Rebuilds the collection by running `f` over every record.
    pub fn map(self, f: impl FnMut(EndpointRecord) -> EndpointRecord) -> Self {
        Self {
            records: self.records.into_iter().map(f).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EndpointRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[EndpointRecord] {
        &self.records
    }
}

impl From<Vec<EndpointRecord>> for EndpointCollection {
    fn from(records: Vec<EndpointRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for EndpointCollection {
    type Item = EndpointRecord;
    type IntoIter = std::vec::IntoIter<EndpointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a EndpointCollection {
    type Item = &'a EndpointRecord;
    type IntoIter = std::slice::Iter<'a, EndpointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_order() {
        let mut first = EndpointCollection::new();
        first.push(EndpointRecord::new("A", "one", vec![Verb::Get], "/a"));
        let mut second = EndpointCollection::new();
        second.push(EndpointRecord::new("B", "two", vec![Verb::Post], "/b"));
        second.push(EndpointRecord::new("B", "three", vec![Verb::Get], "/a"));

        let merged = first.merge(second);
        let uses: Vec<_> = merged.iter().map(|r| r.uses.as_str()).collect();
        assert_eq!(uses, vec!["A@one", "B@two", "B@three"]);
    }

    #[test]
    fn test_middleware_chain_puts_class_entries_first() {
        let mut record = EndpointRecord::new("A", "index", vec![Verb::Get], "/");
        record.middleware.push("throttle".to_string());
        record.class_middleware.push("auth".to_string());
        assert_eq!(record.all_middleware(), vec!["auth", "throttle"]);
    }

    #[test]
    fn test_verb_label() {
        let record = EndpointRecord::new("A", "update", vec![Verb::Put, Verb::Patch], "/x");
        assert_eq!(record.verb_label(), "PUT|PATCH");
    }
}
