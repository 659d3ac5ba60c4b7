//! Renders resolved records as loadable PHP registration statements.

use crate::model::{EndpointCollection, EndpointRecord, ListenerRecord, Verb};
use indexmap::IndexMap;

const FILE_PREAMBLE: &str = "<?php";

/// Single-quoted PHP string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// `['a', 'b']`
pub fn short_array(values: &[String]) -> String {
    let items: Vec<_> = values.iter().map(|v| quote(v)).collect();
    format!("[{}]", items.join(", "))
}

/// `['key' => 'value']`
pub fn short_map(values: &IndexMap<String, String>) -> String {
    let items: Vec<_> = values
        .iter()
        .map(|(k, v)| format!("{} => {}", quote(k), quote(v)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// `array('a','b')`, the literal form used for listener event lists.
pub fn array_literal(values: &[String]) -> String {
    let items: Vec<_> = values.iter().map(|v| quote(v)).collect();
    format!("array({})", items.join(","))
}

pub fn route_statement(record: &EndpointRecord) -> String {
    let call = match record.verbs.as_slice() {
        [verb] => format!("$router->{}(", verb.method_name()),
        verbs => {
            let names: Vec<_> = verbs.iter().map(Verb::to_string).collect();
            format!("$router->match({}, ", short_array(&names))
        }
    };

    let mut options = vec![("uses", quote(&record.uses))];
    if let Some(name) = &record.name {
        options.push(("as", quote(name)));
    }
    let middleware = record.all_middleware();
    if !middleware.is_empty() {
        options.push(("middleware", short_array(&middleware)));
    }
    if !record.wheres.is_empty() {
        options.push(("where", short_map(&record.wheres)));
    }
    if let Some(domain) = &record.domain {
        options.push(("domain", quote(domain)));
    }

    let body: String = options
        .iter()
        .map(|(key, value)| format!("\t{} => {},\n", quote(key), value))
        .collect();
    format!("{}{}, [\n{}]);", call, quote(&record.path), body)
}

pub fn listener_statement(record: &ListenerRecord) -> String {
    format!(
        "$events->listen({}, {});",
        array_literal(&record.events),
        quote(&record.handler)
    )
}

/// Route statements separated by a blank line, trimmed.
pub fn route_definitions(endpoints: &EndpointCollection) -> String {
    let statements: Vec<_> = endpoints.iter().map(route_statement).collect();
    statements.join("\n\n").trim().to_string()
}

/// One listener statement per line, trimmed.
pub fn event_definitions(listeners: &[ListenerRecord]) -> String {
    let statements: Vec<_> = listeners.iter().map(listener_statement).collect();
    statements.join("\n").trim().to_string()
}

/// Wraps definitions into a complete source file.
pub fn wrap_file(definitions: &str) -> String {
    format!("{}\n\n{}\n", FILE_PREAMBLE, definitions.trim())
}
