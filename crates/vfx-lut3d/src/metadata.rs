//! Immutable format metadata tree carried alongside a [`crate::Lut3D`].
//!
//! Never part of structural equality or the cache ID — see
//! [`crate::Lut3D::finalize`].

/// A named metadata element, with free-form children appended on
/// composition.
///
/// Mirrors the small named-element trees file-format readers typically
/// attach to a LUT (a name, an optional description, nested children);
/// the core doesn't parse any file format itself, but composition does
/// need to merge two such trees (see [`merge`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Element name, e.g. the file stem a LUT was parsed from.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Child elements, in the order they should be serialized.
    pub children: Vec<Metadata>,
}

impl Metadata {
    /// Creates a named, childless metadata node.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            children: Vec::new(),
        }
    }
}

/// Merges two metadata trees for a composed LUT3D: `"<a.name> + <b.name>"`,
/// children concatenated in order (`a`'s first, then `b`'s).
pub fn merge(a: &Metadata, b: &Metadata) -> Metadata {
    let name = match (a.name.is_empty(), b.name.is_empty()) {
        (true, true) => String::new(),
        (true, false) => b.name.clone(),
        (false, true) => a.name.clone(),
        (false, false) => format!("{} + {}", a.name, b.name),
    };
    let mut children = Vec::with_capacity(a.children.len() + b.children.len());
    children.extend(a.children.iter().cloned());
    children.extend(b.children.iter().cloned());
    Metadata {
        name,
        description: String::new(),
        children,
    }
}
