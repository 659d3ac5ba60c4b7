//! Pure conversions between namespace identifiers and relative paths.

use std::path::{Component, Path, PathBuf};

pub const NAMESPACE_SEPARATOR: char = '\\';

/// Trims whitespace and namespace separators from both ends.
pub fn trim_namespace(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == NAMESPACE_SEPARATOR)
}

/// Joins namespace segments with a single separator, skipping empty ones.
pub fn join_namespace(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| trim_namespace(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}

/// Strips the `root` namespace from the front of `namespace` when
/// `namespace` lives under it, then turns separators into `/`.
///
/// `App\Http\Controllers` with root `App` becomes `Http/Controllers`;
/// a namespace outside the root is converted as-is.
pub fn convert_namespace_to_path(namespace: &str, root: &str) -> String {
    let namespace = trim_namespace(namespace);
    let root = trim_namespace(root);

    let relative = if root.is_empty() {
        namespace
    } else if namespace == root {
        ""
    } else {
        namespace
            .strip_prefix(root)
            .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
            .unwrap_or(namespace)
    };

    trim_namespace(relative).replace(NAMESPACE_SEPARATOR, "/")
}

/// Directory a namespace resolves to below `base`.
pub fn namespace_directory(base: &Path, namespace: &str, root: &str) -> PathBuf {
    let relative = convert_namespace_to_path(namespace, root);
    if relative.is_empty() {
        base.to_path_buf()
    } else {
        base.join(relative)
    }
}

/// Prepends `prefix` to every class identifier. Both sides are trimmed of
/// whitespace and separators first; an empty prefix leaves the (trimmed)
/// identifiers untouched.
pub fn prefix_classes<S: AsRef<str>>(prefix: &str, classes: &[S]) -> Vec<String> {
    let prefix = trim_namespace(prefix);
    classes
        .iter()
        .map(|item| {
            let item = trim_namespace(item.as_ref());
            if prefix.is_empty() {
                item.to_string()
            } else {
                format!("{}\\{}", prefix, item)
            }
        })
        .collect()
}

/// Turns a source file path relative to a namespace's directory into the
/// class identifier it declares, e.g. `Foo/Bar/Baz.php` under `App\Base`
/// becomes `App\Base\Foo\Bar\Baz`.
pub fn class_from_relative_path(namespace: &str, relative: &Path) -> Option<String> {
    let stem = relative.file_stem()?.to_str()?;
    let mut segments = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            if let Component::Normal(part) = component {
                segments.push(part.to_str()?);
            }
        }
    }
    segments.push(stem);

    let mut parts = vec![namespace];
    parts.extend(segments);
    Some(join_namespace(&parts))
}
