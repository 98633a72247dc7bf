//! Resource tree arena and child lookup.

use std::sync::Arc;

use compact_str::CompactString;
use restree_core::{Attributes, NodeId, NodeTypeId, TreeConfig, TreeError, TreeResult};
use tracing::debug;

use crate::behavior::{Child, NodeView};
use crate::node::{Attachment, Node};
use crate::node_type::ChildRef;
use crate::registry::Registry;

/// The nodes produced while serving one interaction.
///
/// Nodes live in an arena and refer to their parent by [`NodeId`]. The
/// registry is shared with every other tree built from it.
pub struct ResourceTree<C> {
    registry: Arc<Registry<C>>,
    config: TreeConfig,
    nodes: Vec<Node<C>>,
}

impl<C> ResourceTree<C> {
    /// Create an empty tree over a resolved registry.
    pub fn new(registry: Arc<Registry<C>>) -> Self {
        Self::with_config(registry, TreeConfig::default())
    }

    /// Create an empty tree with custom configuration.
    pub fn with_config(registry: Arc<Registry<C>>, config: TreeConfig) -> Self {
        Self {
            registry,
            config,
            nodes: Vec::new(),
        }
    }

    /// The shared type registry.
    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    /// Tree configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> TreeResult<&Node<C>> {
        self.nodes.get(id.index()).ok_or(TreeError::UnknownNode { id })
    }

    /// Get a view of a node for hooks and properties.
    pub fn view(&self, id: NodeId) -> TreeResult<NodeView<'_, C>> {
        let node = self.node(id)?;
        Ok(NodeView::new(self, id, node))
    }

    /// Check if a node is attached. Unknown ids are not attached.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_ok_and(Node::is_attached)
    }

    fn insert(&mut self, node: Node<C>) -> TreeResult<NodeId> {
        self.owned(&node)?;
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    /// Construct an unbound instance of `type_id` inside the arena.
    pub fn create(&mut self, type_id: NodeTypeId, attributes: Attributes) -> TreeResult<NodeId> {
        let node = self.registry.instantiate_with(type_id, attributes)?;
        self.insert(node)
    }

    /// Construct the root: bound to `context`, empty name, no parent.
    pub fn create_root(&mut self, type_id: NodeTypeId, context: impl Into<Arc<C>>) -> TreeResult<NodeId> {
        self.create_bound(type_id, context, "", None, Attributes::new())
    }

    /// Construct an instance of `type_id` bound immediately.
    pub fn create_bound(
        &mut self,
        type_id: NodeTypeId,
        context: impl Into<Arc<C>>,
        name: &str,
        parent: Option<NodeId>,
        attributes: Attributes,
    ) -> TreeResult<NodeId> {
        let mut node = self.registry.instantiate_with(type_id, attributes)?;
        node.attach(self.attachment(context.into(), name, parent)?)?;
        self.insert(node)
    }

    /// Bind an unattached node to a context, name, and parent.
    ///
    /// Fails if the node is already attached or if `parent` is not an
    /// attached node of this tree.
    pub fn attach(
        &mut self,
        id: NodeId,
        context: impl Into<Arc<C>>,
        name: &str,
        parent: Option<NodeId>,
    ) -> TreeResult<()> {
        let node = self.node(id)?;
        self.owned(node)?;
        if node.is_attached() {
            return Err(TreeError::AlreadyAttached {
                type_name: node.type_name().into(),
            });
        }
        let attachment = self.attachment(context.into(), name, parent)?;
        self.nodes[id.index()].attach(attachment)
    }

    /// Find the child of `id` named `key`.
    ///
    /// The static child table is consulted first; only keys absent from it
    /// reach the type's dynamic child hook.
    pub fn lookup(&mut self, id: NodeId, key: &str) -> TreeResult<NodeId> {
        let (context, depth, type_id) = {
            let node = self.attached(id)?;
            let attachment = node.attachment().ok_or_else(|| TreeError::NotAttached {
                type_name: node.type_name().into(),
            })?;
            (Arc::clone(&attachment.context), attachment.depth, node.type_id())
        };

        let child_depth = depth + 1;
        if !self.config.allows_depth(child_depth) {
            debug!(key, depth = child_depth, "lookup below max depth");
            return Err(TreeError::not_found(key));
        }

        let registry = Arc::clone(&self.registry);
        let node_type = registry.get(type_id)?;

        let child = match node_type.static_child(key) {
            Some(ChildRef::Concrete(target)) => {
                debug!(owner = node_type.name(), key, "static child");
                registry.instantiate(*target)?
            }
            Some(ChildRef::Symbolic(_)) => {
                return Err(TreeError::Unresolved {
                    type_name: node_type.name().into(),
                });
            }
            None => {
                let child = match node_type.child_source() {
                    Some(source) => {
                        let view = self.view(id)?;
                        source.get_child(&view, key)?
                    }
                    None => Child::Absent,
                };
                debug!(owner = node_type.name(), key, shape = child.shape(), "dynamic child");
                match child {
                    Child::Absent => return Err(TreeError::not_found(key)),
                    Child::Type(target) => registry.instantiate(target)?,
                    Child::WithAttributes(target, attributes) => {
                        registry.instantiate_with(target, attributes)?
                    }
                    Child::Instance(node) => node,
                }
            }
        };

        self.adopt(child, context, key, id, child_depth)
    }

    /// Look up each `/`-separated segment of `path` in turn, starting at
    /// `start`. Empty segments are skipped.
    pub fn resolve_path(&mut self, start: NodeId, path: &str) -> TreeResult<NodeId> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(start, |node, segment| self.lookup(node, segment))
    }

    /// Iterate from `id` up to the root.
    pub fn lineage(&self, id: NodeId) -> Lineage<'_, C> {
        Lineage {
            tree: self,
            next: self.node(id).ok().map(|_| id),
        }
    }

    /// Names of the segments leading from the root to `id`.
    pub fn path_segments(&self, id: NodeId) -> TreeResult<Vec<&str>> {
        self.node(id)?;
        let mut segments: Vec<&str> = self
            .lineage(id)
            .filter_map(|node| self.nodes.get(node.index()))
            .filter(|node| node.parent().is_some())
            .map(Node::name)
            .collect();
        segments.reverse();
        Ok(segments)
    }

    /// Get a node, failing unless it is attached.
    pub(crate) fn attached(&self, id: NodeId) -> TreeResult<&Node<C>> {
        let node = self.node(id)?;
        if !node.is_attached() {
            return Err(TreeError::NotAttached {
                type_name: node.type_name().into(),
            });
        }
        Ok(node)
    }

    fn attachment(
        &self,
        context: Arc<C>,
        name: &str,
        parent: Option<NodeId>,
    ) -> TreeResult<Attachment<C>> {
        let depth = match parent {
            Some(parent) => self.attached(parent)?.depth() + 1,
            None => 0,
        };
        Ok(Attachment {
            context,
            name: CompactString::from(name),
            parent,
            depth,
        })
    }

    fn adopt(
        &mut self,
        mut node: Node<C>,
        context: Arc<C>,
        key: &str,
        parent: NodeId,
        depth: u32,
    ) -> TreeResult<NodeId> {
        self.owned(&node)?;
        node.attach(Attachment {
            context,
            name: CompactString::from(key),
            parent: Some(parent),
            depth,
        })?;
        self.insert(node)
    }

    /// Fail unless `node` was instantiated from this tree's registry.
    fn owned(&self, node: &Node<C>) -> TreeResult<()> {
        if node.registry_id() != self.registry.id() {
            return Err(TreeError::ForeignNode {
                type_name: node.type_name().into(),
            });
        }
        Ok(())
    }
}

impl<C> std::fmt::Debug for ResourceTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTree")
            .field("config", &self.config)
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// Iterator over a node and its ancestors.
pub struct Lineage<'a, C> {
    tree: &'a ResourceTree<C>,
    next: Option<NodeId>,
}

impl<C> Iterator for Lineage<'_, C> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).ok().and_then(Node::parent);
        Some(current)
    }
}
