crate::decl_indices!(PhpIndices, {
    namespace_def => "namespace_def",
    namespace_name => "namespace_name",
    class_def => "class_def",
    class_name => "class_name",
    method_def => "method_def",
    method_name => "method_name",
});

pub const PHP_DEFINITIONS_SCM: &str = include_str!("php_definitions.scm");
