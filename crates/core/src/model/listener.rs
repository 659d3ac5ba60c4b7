use serde::Serialize;

/// One resolved event listener: a handler bound to one or more events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerRecord {
    pub class: String,
    pub method: String,
    /// `Class@method`
    pub handler: String,
    pub events: Vec<String>,
}

impl ListenerRecord {
    pub fn new(class: &str, method: &str, events: Vec<String>) -> Self {
        Self {
            class: class.to_string(),
            method: method.to_string(),
            handler: format!("{}@{}", class, method),
            events,
        }
    }
}
