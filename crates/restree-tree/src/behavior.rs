//! Dynamic child hooks, computed properties, and the node view they receive.

use restree_core::{Attributes, NodeId, NodeTypeId, TreeError, TreeResult, Value};

use crate::node::Node;
use crate::registry::Registry;
use crate::tree::ResourceTree;

/// Result of a dynamic child hook.
///
/// Each variant is one of the shapes a hook may hand back to
/// [`ResourceTree::lookup`].
pub enum Child<C> {
    /// No child for this key.
    Absent,
    /// Instantiate this type as the child.
    Type(NodeTypeId),
    /// Instantiate this type and set the given attributes on it.
    WithAttributes(NodeTypeId, Attributes),
    /// Attach this already-built, unattached node in place.
    Instance(Node<C>),
}

impl<C> Child<C> {
    /// Build a typed child carrying extra attributes.
    pub fn with<K, V>(type_id: NodeTypeId, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<compact_str::CompactString>,
        V: Into<Value>,
    {
        Self::WithAttributes(
            type_id,
            attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short description of the shape, for logging.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Type(_) => "type",
            Self::WithAttributes(..) => "type+attributes",
            Self::Instance(_) => "instance",
        }
    }
}

impl<C> From<NodeTypeId> for Child<C> {
    fn from(type_id: NodeTypeId) -> Self {
        Self::Type(type_id)
    }
}

impl<C> From<Node<C>> for Child<C> {
    fn from(node: Node<C>) -> Self {
        Self::Instance(node)
    }
}

impl<C> From<Option<NodeTypeId>> for Child<C> {
    fn from(type_id: Option<NodeTypeId>) -> Self {
        type_id.map_or(Self::Absent, Self::Type)
    }
}

/// Converts a dynamic value produced by a hook into a child.
///
/// `null` is absent, a type handle is a type, and a two-element array of a
/// type handle and an object is a type with attributes. Anything else is
/// rejected with [`TreeError::InvalidChild`] naming the value.
impl<C> TryFrom<Value> for Child<C> {
    type Error = TreeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Absent),
            Value::Type(id) => Ok(Self::Type(id)),
            Value::Array(items) => match <[Value; 2]>::try_from(items) {
                Ok([Value::Type(id), Value::Object(attributes)]) => {
                    Ok(Self::WithAttributes(id, attributes))
                }
                Ok(pair) => Err(TreeError::invalid_child(Value::Array(pair.into()))),
                Err(items) => Err(TreeError::invalid_child(Value::Array(items))),
            },
            other => Err(TreeError::invalid_child(other)),
        }
    }
}

/// Computes children that are not in a type's static child table.
pub trait ChildSource<C>: Send + Sync {
    /// Produce the child for `key` under `node`.
    ///
    /// Returning `Err(TreeError::not_found(key))` is equivalent to
    /// returning [`Child::Absent`].
    fn get_child(&self, node: &NodeView<'_, C>, key: &str) -> TreeResult<Child<C>>;
}

impl<C, F> ChildSource<C> for F
where
    F: Fn(&NodeView<'_, C>, &str) -> TreeResult<Child<C>> + Send + Sync,
{
    fn get_child(&self, node: &NodeView<'_, C>, key: &str) -> TreeResult<Child<C>> {
        self(node, key)
    }
}

/// A computed attribute declared on a node type.
pub trait Property<C>: Send + Sync {
    /// Evaluate against the node that declares the property.
    fn get(&self, node: &NodeView<'_, C>) -> TreeResult<Value>;
}

impl<C, F> Property<C> for F
where
    F: Fn(&NodeView<'_, C>) -> TreeResult<Value> + Send + Sync,
{
    fn get(&self, node: &NodeView<'_, C>) -> TreeResult<Value> {
        self(node)
    }
}

/// Read-only view of one node inside its tree.
pub struct NodeView<'a, C> {
    tree: &'a ResourceTree<C>,
    id: NodeId,
    node: &'a Node<C>,
}

impl<'a, C> NodeView<'a, C> {
    pub(crate) fn new(tree: &'a ResourceTree<C>, id: NodeId, node: &'a Node<C>) -> Self {
        Self { tree, id, node }
    }

    /// Id of the viewed node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The viewed node.
    pub fn node(&self) -> &'a Node<C> {
        self.node
    }

    /// The tree the node lives in.
    pub fn tree(&self) -> &'a ResourceTree<C> {
        self.tree
    }

    /// The registry the node's type was declared in.
    pub fn registry(&self) -> &'a Registry<C> {
        self.tree.registry()
    }

    /// Path segment this node was reached by.
    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    /// Name of the node's concrete type.
    pub fn type_name(&self) -> &'a str {
        self.node.type_name()
    }

    /// Per-interaction context the node is attached to.
    pub fn context(&self) -> TreeResult<&'a C> {
        self.node.context().ok_or_else(|| TreeError::NotAttached {
            type_name: self.node.type_name().into(),
        })
    }

    /// View of the parent node, if any.
    pub fn parent(&self) -> Option<NodeView<'a, C>> {
        let parent = self.node.parent()?;
        self.tree.view(parent).ok()
    }

    /// Resolve an attribute through the ancestor chain.
    pub fn attribute(&self, name: &str) -> TreeResult<Value> {
        self.tree.resolve_attribute(self.id, name)
    }
}

impl<C> Clone for NodeView<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for NodeView<'_, C> {}
