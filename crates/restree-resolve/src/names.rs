//! Namespaces and symbolic references.

use std::fmt;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

/// A dotted namespace in which node types are declared (e.g. `app.widgets`).
///
/// The empty namespace is the global root. Segments are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(CompactString);

impl Namespace {
    /// Create a namespace from a dotted path.
    ///
    /// Empty segments are dropped, so `"app."` and `"a..b"` become `"app"`
    /// and `"a.b"`. Use [`parse`](Self::parse) to reject them instead.
    pub fn new(path: impl Into<CompactString>) -> Self {
        let path = path.into();
        let segments: Vec<&str> = path.trim().split('.').filter(|s| !s.is_empty()).collect();
        Self(segments.join(".").into())
    }

    /// Parse a dotted path, rejecting empty segments the same way
    /// [`Reference::parse`] does. The empty string is the root.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Some(Self::root());
        }
        if path.split('.').any(str::is_empty) {
            return None;
        }
        Some(Self(path.into()))
    }

    /// The global root namespace.
    pub fn root() -> Self {
        Self::default()
    }

    /// Get the dotted path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the global root namespace.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Qualify a name with this namespace.
    pub fn qualify(&self, name: &str) -> CompactString {
        if self.is_root() {
            CompactString::from(name)
        } else {
            format_compact!("{}.{}", self.0, name)
        }
    }

    /// Get the enclosing namespace, or None for the root.
    pub fn parent(&self) -> Option<Namespace> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('.') {
            Some(pos) => Some(Self::new(&self.0[..pos])),
            None => Some(Self::root()),
        }
    }

    /// Walk up `levels` namespaces.
    pub fn ancestor(&self, levels: usize) -> Option<Namespace> {
        let mut current = self.clone();
        for _ in 0..levels {
            current = current.parent()?;
        }
        Some(current)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl TryFrom<String> for Namespace {
    type Error = String;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        Self::parse(&path).ok_or_else(|| format!("malformed namespace '{path}'"))
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0.into()
    }
}

impl From<&str> for Namespace {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// A parsed symbolic reference.
///
/// Leading dots mark a relative reference: one dot means the declaring
/// namespace, each further dot moves one namespace up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Number of leading dots.
    pub dots: usize,
    /// The dotted name after the leading dots.
    pub path: &'a str,
}

impl<'a> Reference<'a> {
    /// Parse a reference string. Returns None when no name remains.
    pub fn parse(reference: &'a str) -> Option<Self> {
        let reference = reference.trim();
        let path = reference.trim_start_matches('.');
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return None;
        }
        Some(Self {
            dots: reference.len() - path.len(),
            path,
        })
    }

    /// Check if the reference carries leading dots.
    pub fn is_explicitly_relative(&self) -> bool {
        self.dots > 0
    }

    /// Qualified name relative to `namespace`, if the dots stay in range.
    pub fn relative_to(&self, namespace: &Namespace) -> Option<CompactString> {
        let base = namespace.ancestor(self.dots.saturating_sub(1))?;
        Some(base.qualify(self.path))
    }

    /// Candidate qualified names in resolution order, without duplicates.
    pub fn candidates(&self, namespace: &Namespace) -> Vec<CompactString> {
        let mut out = Vec::with_capacity(2);
        if let Some(relative) = self.relative_to(namespace) {
            out.push(relative);
        }
        let global = CompactString::from(self.path);
        if !out.contains(&global) {
            out.push(global);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_qualify() {
        assert_eq!(Namespace::new("app").qualify("Child"), "app.Child");
        assert_eq!(Namespace::root().qualify("Child"), "Child");
    }

    #[test]
    fn test_namespace_parent() {
        let ns = Namespace::new("a.b.c");
        assert_eq!(ns.parent(), Some(Namespace::new("a.b")));
        assert_eq!(Namespace::new("a").parent(), Some(Namespace::root()));
        assert_eq!(Namespace::root().parent(), None);
        assert_eq!(ns.ancestor(3), Some(Namespace::root()));
        assert_eq!(ns.ancestor(4), None);
    }

    #[test]
    fn test_namespace_segments() {
        assert_eq!(Namespace::parse("app.views"), Some(Namespace::new("app.views")));
        assert_eq!(Namespace::parse(""), Some(Namespace::root()));
        assert_eq!(Namespace::parse("app."), None);
        assert_eq!(Namespace::parse("a..b"), None);
        assert_eq!(Namespace::parse(".app"), None);

        assert_eq!(Namespace::new("app.").as_str(), "app");
        assert_eq!(Namespace::new("a..b").as_str(), "a.b");
        assert!(Namespace::new(".").is_root());
        assert_eq!(Namespace::new("a..b").parent(), Some(Namespace::new("a")));
    }

    #[test]
    fn test_reference_parse() {
        let r = Reference::parse(".Child").unwrap();
        assert_eq!(r.dots, 1);
        assert_eq!(r.path, "Child");
        assert!(r.is_explicitly_relative());

        let r = Reference::parse("pkg.mod.Child").unwrap();
        assert_eq!(r.dots, 0);
        assert!(!r.is_explicitly_relative());

        assert!(Reference::parse("").is_none());
        assert!(Reference::parse("...").is_none());
        assert!(Reference::parse("a..b").is_none());
    }

    #[test]
    fn test_reference_candidates() {
        let ns = Namespace::new("app.views");

        let r = Reference::parse(".Child").unwrap();
        assert_eq!(r.candidates(&ns), vec!["app.views.Child", "Child"]);

        let r = Reference::parse("..Child").unwrap();
        assert_eq!(r.candidates(&ns), vec!["app.Child", "Child"]);

        let r = Reference::parse(".sub.Child").unwrap();
        assert_eq!(r.candidates(&ns), vec!["app.views.sub.Child", "sub.Child"]);

        let r = Reference::parse("Child").unwrap();
        assert_eq!(r.candidates(&Namespace::root()), vec!["Child"]);
    }

    #[test]
    fn test_reference_out_of_range() {
        let r = Reference::parse("...Child").unwrap();
        assert_eq!(r.candidates(&Namespace::new("app")), vec!["Child"]);
    }
}
