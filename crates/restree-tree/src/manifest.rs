//! Declaring node types from TOML.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use restree_core::{Attributes, NodeTypeId, TreeError, TreeResult};
use restree_resolve::Namespace;
use serde::{Deserialize, Serialize};

use crate::node_type::NodeType;
use crate::registry::Registry;

/// A set of node type declarations.
///
/// ```toml
/// root = "app.Root"
///
/// [[resource]]
/// name = "Root"
/// namespace = "app"
/// children = { child = ".Child" }
/// attributes = { title = "Home" }
///
/// [[resource]]
/// name = "Child"
/// namespace = "app"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Fully-qualified name of the root type.
    #[serde(default)]
    pub root: Option<String>,

    /// Declared resource types.
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceDecl>,
}

/// One declared resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDecl {
    /// Type name.
    pub name: String,

    /// Namespace used for relative child references.
    #[serde(default)]
    pub namespace: String,

    /// Static children by symbolic reference.
    #[serde(default)]
    pub children: IndexMap<String, String>,

    /// Constant attributes inherited by descendants.
    #[serde(default)]
    pub attributes: Attributes,
}

impl Manifest {
    /// Read a manifest from a file.
    pub fn from_path(path: impl AsRef<Path>) -> TreeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }
}

impl FromStr for Manifest {
    type Err = TreeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        toml::from_str(text).map_err(|e| TreeError::Manifest {
            message: e.to_string(),
        })
    }
}

impl ResourceDecl {
    fn to_node_type<C>(&self) -> TreeResult<NodeType<C>> {
        let namespace = Namespace::parse(&self.namespace).ok_or_else(|| TreeError::Manifest {
            message: format!("resource '{}' has malformed namespace '{}'", self.name, self.namespace),
        })?;
        let mut node_type = NodeType::new(self.name.as_str()).in_namespace(namespace);
        for (key, reference) in &self.children {
            node_type = node_type.with_child(key.as_str(), reference.as_str());
        }
        for (name, value) in &self.attributes {
            node_type = node_type.with_attribute(name.clone(), value.clone());
        }
        Ok(node_type)
    }
}

impl<C> Registry<C> {
    /// Declare every type in `manifest`.
    ///
    /// Children are only resolved later, so declarations may refer to each
    /// other in any order. Returns the handles in declaration order.
    pub fn load_manifest(&mut self, manifest: &Manifest) -> TreeResult<Vec<NodeTypeId>> {
        manifest
            .resources
            .iter()
            .map(|decl| self.declare(decl.to_node_type()?))
            .collect()
    }

    /// Handle of the manifest's root type.
    pub fn manifest_root(&self, manifest: &Manifest) -> TreeResult<NodeTypeId> {
        let root = manifest.root.as_deref().ok_or_else(|| TreeError::Manifest {
            message: "no root type declared".to_string(),
        })?;
        self.find(root).ok_or_else(|| TreeError::Manifest {
            message: format!("root type '{root}' is not declared"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restree_core::Value;

    const MANIFEST: &str = r#"
root = "app.Root"

[[resource]]
name = "Root"
namespace = "app"
children = { child = ".Child" }
attributes = { title = "Home", limit = 10 }

[[resource]]
name = "Child"
namespace = "app"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = MANIFEST.parse().unwrap();
        assert_eq!(manifest.root.as_deref(), Some("app.Root"));
        assert_eq!(manifest.resources.len(), 2);
        assert_eq!(manifest.resources[0].children["child"], ".Child");
        assert_eq!(manifest.resources[0].attributes["limit"], Value::from(10));
    }

    #[test]
    fn test_load_manifest_then_resolve() {
        let manifest: Manifest = MANIFEST.parse().unwrap();
        let mut registry: Registry<()> = Registry::new();
        let ids = registry.load_manifest(&manifest).unwrap();

        let root = registry.manifest_root(&manifest).unwrap();
        assert_eq!(root, ids[0]);
        assert!(!registry.is_resolved(root));
        assert_eq!(registry.resolve_pending().unwrap(), 1);
        assert!(registry.is_resolved(root));
    }

    #[test]
    fn test_malformed_namespace_rejected() {
        let manifest: Manifest = "[[resource]]\nname = \"Root\"\nnamespace = \"app.\"\n"
            .parse()
            .unwrap();
        let mut registry: Registry<()> = Registry::new();
        let err = registry.load_manifest(&manifest).unwrap_err();
        assert!(matches!(err, TreeError::Manifest { .. }));
        assert!(err.to_string().contains("app."));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_manifest() {
        let err = "[[resource]]\nnamespace = 3\n".parse::<Manifest>().unwrap_err();
        assert!(matches!(err, TreeError::Manifest { .. }));
    }
}
