//! Node type declarations.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use indexmap::IndexMap;
use restree_core::{Attributes, NodeTypeId, TreeResult, Value};
use restree_resolve::Namespace;

use crate::behavior::{Child, ChildSource, NodeView, Property};

/// An entry in a node type's static child table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildRef {
    /// A declared node type.
    Concrete(NodeTypeId),
    /// A name to be resolved once, before the type is first instantiated.
    Symbolic(CompactString),
}

impl ChildRef {
    /// Check if this entry still needs resolution.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }

    /// The concrete type, if resolved.
    pub fn as_concrete(&self) -> Option<NodeTypeId> {
        match self {
            Self::Concrete(id) => Some(*id),
            Self::Symbolic(_) => None,
        }
    }
}

impl From<NodeTypeId> for ChildRef {
    fn from(id: NodeTypeId) -> Self {
        Self::Concrete(id)
    }
}

impl From<&str> for ChildRef {
    fn from(reference: &str) -> Self {
        Self::Symbolic(reference.into())
    }
}

impl From<String> for ChildRef {
    fn from(reference: String) -> Self {
        Self::Symbolic(reference.into())
    }
}

/// A node type: its static children, declared attributes, computed
/// properties, and dynamic child hook.
///
/// Declared once through [`Registry::declare`](crate::Registry::declare).
/// The only change a type sees after that is the one-time substitution of
/// its symbolic children.
///
/// ```rust
/// use restree_tree::{Child, NodeType, Registry};
///
/// let mut registry: Registry<()> = Registry::new();
/// let leaf = registry.declare(NodeType::new("Leaf")).unwrap();
/// let root = registry
///     .declare(
///         NodeType::new("Root")
///             .with_child("leaf", leaf)
///             .with_attribute("title", "Home")
///             .with_dynamic_children(move |_node, key| {
///                 Ok(if key == "any" { Child::Type(leaf) } else { Child::Absent })
///             }),
///     )
///     .unwrap();
/// assert!(registry.is_resolved(root));
/// ```
pub struct NodeType<C> {
    name: CompactString,
    namespace: Namespace,
    children: IndexMap<CompactString, ChildRef>,
    attributes: Attributes,
    properties: IndexMap<CompactString, Arc<dyn Property<C>>>,
    child_source: Option<Arc<dyn ChildSource<C>>>,
    is_abstract: bool,
    requires_resolution: bool,
    resolved: bool,
}

impl<C> NodeType<C> {
    /// Start declaring a type in the root namespace.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::root(),
            children: IndexMap::new(),
            attributes: Attributes::new(),
            properties: IndexMap::new(),
            child_source: None,
            is_abstract: false,
            requires_resolution: false,
            resolved: false,
        }
    }

    pub(crate) fn abstract_base(name: impl Into<CompactString>) -> Self {
        let mut base = Self::new(name);
        base.is_abstract = true;
        base.resolved = true;
        base
    }

    /// Set the namespace symbolic children are resolved against.
    pub fn in_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add a static child, by handle or by symbolic name.
    pub fn with_child(mut self, key: impl Into<CompactString>, child: impl Into<ChildRef>) -> Self {
        self.children.insert(key.into(), child.into());
        self
    }

    /// Declare a constant attribute inherited by descendants.
    pub fn with_attribute(mut self, name: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Declare a computed attribute.
    pub fn with_property<F>(mut self, name: impl Into<CompactString>, property: F) -> Self
    where
        F: Fn(&NodeView<'_, C>) -> TreeResult<Value> + Send + Sync + 'static,
        C: 'static,
    {
        self.properties.insert(name.into(), Arc::new(property));
        self
    }

    /// Install a closure as the dynamic child hook.
    pub fn with_dynamic_children<F>(self, hook: F) -> Self
    where
        F: Fn(&NodeView<'_, C>, &str) -> TreeResult<Child<C>> + Send + Sync + 'static,
        C: 'static,
    {
        self.with_child_source(hook)
    }

    /// Install any [`ChildSource`] as the dynamic child hook.
    pub fn with_child_source(mut self, source: impl ChildSource<C> + 'static) -> Self {
        self.child_source = Some(Arc::new(source));
        self
    }

    /// Type name, unqualified.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace the type was declared in.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Fully-qualified name.
    pub fn qualified_name(&self) -> CompactString {
        self.namespace.qualify(&self.name)
    }

    /// Static child table.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ChildRef)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a static child by exact key.
    pub fn static_child(&self, key: &str) -> Option<&ChildRef> {
        self.children.get(key)
    }

    /// Declared constant attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Declared constant attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Declared computed attribute.
    pub fn property(&self, name: &str) -> Option<&dyn Property<C>> {
        self.properties.get(name).map(|p| p.as_ref())
    }

    /// Names of the computed attributes.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| k.as_str())
    }

    /// The dynamic child hook, if one is installed.
    pub fn child_source(&self) -> Option<&dyn ChildSource<C>> {
        self.child_source.as_deref()
    }

    /// Check if this is the abstract base type.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// True iff the static child table had a symbolic entry when declared.
    pub fn requires_resolution(&self) -> bool {
        self.requires_resolution
    }

    /// True once every child entry is concrete.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn has_symbolic_children(&self) -> bool {
        self.children.values().any(ChildRef::is_symbolic)
    }

    pub(crate) fn symbolic_children(&self) -> Vec<(CompactString, CompactString)> {
        self.children
            .iter()
            .filter_map(|(key, child)| match child {
                ChildRef::Symbolic(reference) => Some((key.clone(), reference.clone())),
                ChildRef::Concrete(_) => None,
            })
            .collect()
    }

    /// Compute the resolution flags at declaration time.
    pub(crate) fn seal(&mut self) {
        self.requires_resolution = self.has_symbolic_children();
        self.resolved = !self.requires_resolution;
    }

    /// Replace symbolic entries with concrete types and mark resolved.
    pub(crate) fn complete_resolution(&mut self, resolved: Vec<(CompactString, NodeTypeId)>) {
        for (key, target) in resolved {
            if let Some(slot) = self.children.get_mut(&key) {
                *slot = ChildRef::Concrete(target);
            }
        }
        self.resolved = true;
    }
}

impl<C> fmt::Debug for NodeType<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("children", &self.children)
            .field("attributes", &self.attributes)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("dynamic", &self.child_source.is_some())
            .field("resolved", &self.resolved)
            .finish()
    }
}
