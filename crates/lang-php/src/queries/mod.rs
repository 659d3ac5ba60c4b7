use annoscan_core::error::{Result, ScanError};
use tree_sitter::{Language, Query};

pub mod php_definitions;

/// Loads a Tree-sitter query from an SCM string.
pub fn load_query(language: &Language, scm: &str) -> Result<Query> {
    Query::new(language, scm).map_err(|e| ScanError::Parsing(format!("Invalid query: {:?}", e)))
}

/// Gets the index of a capture name in a query.
pub fn get_capture_index(query: &Query, name: &str) -> Result<u32> {
    query
        .capture_index_for_name(name)
        .ok_or_else(|| ScanError::Parsing(format!("Capture name '{}' not found in SCM", name)))
}

/// Declares a struct of capture indices with a `new` that looks them up.
#[macro_export]
macro_rules! decl_indices {
    ($name:ident, { $($field:ident => $capture:expr),+ $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            $(pub $field: u32,)+
        }

        impl $name {
            pub fn new(query: &tree_sitter::Query) -> annoscan_core::error::Result<Self> {
                Ok(Self {
                    $($field: $crate::queries::get_capture_index(query, $capture)?,)+
                })
            }
        }
    };
}
