use crate::queries::load_query;
use crate::queries::php_definitions::{PHP_DEFINITIONS_SCM, PhpIndices};
use annoscan_core::error::{Result, ScanError};
use annoscan_core::model::{ClassDecl, MethodDecl};
use annoscan_core::namespace::join_namespace;
use std::collections::HashMap;
use std::sync::Arc;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator, Tree};

const DOCBLOCK_OPEN: &str = "/**";

struct NamespaceScope {
    name: String,
    start: usize,
    /// Byte range of the braced body; `None` for `namespace Foo;`.
    body: Option<(usize, usize)>,
}

/// Extracts class declarations and their docblocks from PHP source.
pub struct PhpParser {
    pub language: tree_sitter::Language,
    query: Arc<Query>,
    indices: PhpIndices,
}

impl Clone for PhpParser {
    fn clone(&self) -> Self {
        Self {
            language: self.language.clone(),
            query: Arc::clone(&self.query),
            indices: self.indices.clone(),
        }
    }
}

impl PhpParser {
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_php::LANGUAGE_PHP.into();
        let query = load_query(&language, PHP_DEFINITIONS_SCM)?;
        let indices = PhpIndices::new(&query)?;
        Ok(Self {
            language,
            query: Arc::new(query),
            indices,
        })
    }

    pub fn parse_tree(&self, source: &str) -> Result<Tree> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ScanError::Parsing(format!("Failed to load PHP grammar: {}", e)))?;
        parser
            .parse(source, None)
            .ok_or_else(|| ScanError::Parsing("PHP parser produced no tree".to_string()))
    }

    /// Every class declared in `source`, in source order, with fully
    /// qualified names and declared methods in source order.
    pub fn parse_classes(&self, source: &str) -> Result<Vec<ClassDecl>> {
        let tree = self.parse_tree(source)?;
        let bytes = source.as_bytes();

        let mut namespaces = Vec::new();
        let mut classes: Vec<(Node, String)> = Vec::new();
        let mut methods: Vec<(Node, String)> = Vec::new();

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), bytes);
        while let Some(mat) = matches.next() {
            let capture = |index: u32| mat.captures.iter().find(|c| c.index == index).map(|c| c.node);
            let text = |node: Node| node.utf8_text(bytes).ok().map(str::to_string);

            if let (Some(def), Some(name)) = (
                capture(self.indices.namespace_def),
                capture(self.indices.namespace_name).and_then(text),
            ) {
                namespaces.push(NamespaceScope {
                    name,
                    start: def.start_byte(),
                    body: def
                        .child_by_field_name("body")
                        .map(|b| (b.start_byte(), b.end_byte())),
                });
            } else if let (Some(def), Some(name)) = (
                capture(self.indices.class_def),
                capture(self.indices.class_name).and_then(text),
            ) {
                classes.push((def, name));
            } else if let (Some(def), Some(name)) = (
                capture(self.indices.method_def),
                capture(self.indices.method_name).and_then(text),
            ) {
                methods.push((def, name));
            }
        }

        classes.sort_by_key(|(node, _)| node.start_byte());
        methods.sort_by_key(|(node, _)| node.start_byte());

        let mut decls = Vec::with_capacity(classes.len());
        let mut by_node = HashMap::new();
        for (node, short) in &classes {
            let namespace = enclosing_namespace(&namespaces, node.start_byte());
            let mut decl = ClassDecl::new(join_namespace(&[namespace, short.as_str()]));
            decl.doc = docblock(*node, bytes);
            by_node.insert(node.id(), decls.len());
            decls.push(decl);
        }

        for (node, name) in &methods {
            // method_declaration -> declaration_list -> class_declaration
            let owner = node
                .parent()
                .and_then(|list| list.parent())
                .filter(|owner| owner.kind() == "class_declaration");
            let Some(&index) = owner.and_then(|o| by_node.get(&o.id())) else {
                continue;
            };
            decls[index].methods.push(MethodDecl {
                name: name.clone(),
                doc: docblock(*node, bytes),
            });
        }

        Ok(decls)
    }
}

fn enclosing_namespace(namespaces: &[NamespaceScope], offset: usize) -> &str {
    let braced = namespaces
        .iter()
        .find(|ns| matches!(ns.body, Some((start, end)) if start <= offset && offset < end));
    if let Some(ns) = braced {
        return &ns.name;
    }
    namespaces
        .iter()
        .rev()
        .find(|ns| ns.body.is_none() && ns.start < offset)
        .map(|ns| ns.name.as_str())
        .unwrap_or("")
}

/// The `/** */` comment directly preceding `node`, if any.
fn docblock(node: Node, source: &[u8]) -> Option<String> {
    let prev = node.prev_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let text = prev.utf8_text(source).ok()?;
    text.starts_with(DOCBLOCK_OPEN).then(|| text.to_string())
}
