//! The top-level unit the Initializer iterates over (§4.1 "Input").

use crate::decl::Statement;

#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Normalized path, without extension, e.g. `a/b` or `~lib/array`.
    pub path: String,
    pub is_library: bool,
    pub is_entry: bool,
    pub statements: Vec<Statement>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, is_library: bool, is_entry: bool) -> Self {
        Self { path: path.into(), is_library, is_entry, statements: Vec::new() }
    }

    /// `~lib/` prefix marks the standard library root (§3.1).
    pub fn under_library_prefix(path: &str, library_prefix: &str) -> bool {
        path.starts_with(library_prefix)
    }

    /// A path ending in `/index` is equivalent to its parent under import
    /// resolution (§6.3).
    pub fn index_alternative(path: &str) -> String {
        if let Some(stripped) = path.strip_suffix("/index") {
            stripped.to_string()
        } else {
            format!("{path}/index")
        }
    }
}
