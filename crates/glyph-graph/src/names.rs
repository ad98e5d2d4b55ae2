//! Internal name formation (§3.1). These are pure string functions; the
//! lookup table itself lives on [`crate::graph::ElementGraph`].

/// `path + "/" + simpleName` — top-level declarations.
pub fn file_level(path: &str, simple_name: &str) -> String {
    format!("{path}/{simple_name}")
}

/// `namespace.internalName + "." + name` — static members of a namespace/class.
pub fn static_member(owner_internal_name: &str, simple_name: &str) -> String {
    format!("{owner_internal_name}.{simple_name}")
}

/// `class#name` — instance members of a class.
pub fn instance_member(class_internal_name: &str, simple_name: &str) -> String {
    format!("{class_internal_name}#{simple_name}")
}

/// `function~name` — elements nested inside a function.
pub fn nested_in_function(function_internal_name: &str, simple_name: &str) -> String {
    format!("{function_internal_name}~{simple_name}")
}

/// Appends the canonicalized type-argument suffix for a generic instance.
pub fn with_type_arguments(base_internal_name: &str, canonicalized_args: &str) -> String {
    if canonicalized_args.is_empty() {
        base_internal_name.to_string()
    } else {
        format!("{base_internal_name}<{canonicalized_args}>")
    }
}

/// `get:name` / `set:name` accessor base names (§3.1).
pub fn getter_base(simple_name: &str) -> String {
    format!("get:{simple_name}")
}

pub fn setter_base(simple_name: &str) -> String {
    format!("set:{simple_name}")
}

/// Rewrites `~lib/...` relative prefixes; the standard library root marker.
pub const LIBRARY_PREFIX: &str = "~lib/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_internal_names_per_separator_rules() {
        assert_eq!(file_level("a", "Foo"), "a/Foo");
        assert_eq!(instance_member("a/Foo", "bar"), "a/Foo#bar");
        assert_eq!(static_member("a/Foo", "bar"), "a/Foo.bar");
        assert_eq!(nested_in_function("a/foo", "x"), "a/foo~x");
        assert_eq!(with_type_arguments("a/Box", "i32"), "a/Box<i32>");
        assert_eq!(with_type_arguments("a/Box", ""), "a/Box");
    }
}
