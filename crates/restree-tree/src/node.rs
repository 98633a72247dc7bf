//! Resource node instances and their attachment lifecycle.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use restree_core::{Attributes, NodeId, NodeTypeId, TreeError, TreeResult, Value};

use crate::registry::RegistryId;

/// Where a node sits in a tree once attached.
pub(crate) struct Attachment<C> {
    pub(crate) context: Arc<C>,
    pub(crate) name: CompactString,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: u32,
}

impl<C> Clone for Attachment<C> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            name: self.name.clone(),
            parent: self.parent,
            depth: self.depth,
        }
    }
}

/// An instance of a node type.
///
/// A node starts out unattached and becomes attached exactly once, either
/// when a lookup produces it or through [`ResourceTree::attach`]. Nodes are
/// created by [`Registry::instantiate`], which refuses types whose symbolic
/// children are still unresolved.
///
/// [`ResourceTree::attach`]: crate::ResourceTree::attach
/// [`Registry::instantiate`]: crate::Registry::instantiate
pub struct Node<C> {
    registry: RegistryId,
    type_id: NodeTypeId,
    type_name: CompactString,
    attachment: Option<Attachment<C>>,
    attributes: Attributes,
}

impl<C> Node<C> {
    pub(crate) fn new(
        registry: RegistryId,
        type_id: NodeTypeId,
        type_name: CompactString,
        attributes: Attributes,
    ) -> Self {
        Self {
            registry,
            type_id,
            type_name,
            attachment: None,
            attributes,
        }
    }

    /// Registry whose [`NodeTypeId`]s this node refers to.
    pub fn registry_id(&self) -> RegistryId {
        self.registry
    }

    /// Type this node is an instance of.
    pub fn type_id(&self) -> NodeTypeId {
        self.type_id
    }

    /// Name of the concrete type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Check if the node has been attached.
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Per-interaction context, once attached.
    pub fn context(&self) -> Option<&C> {
        self.attachment.as_ref().map(|a| a.context.as_ref())
    }

    /// Shared handle to the context, once attached.
    pub fn context_handle(&self) -> Option<&Arc<C>> {
        self.attachment.as_ref().map(|a| &a.context)
    }

    /// Path segment this node was reached by (empty for the root or when
    /// unattached).
    pub fn name(&self) -> &str {
        self.attachment.as_ref().map_or("", |a| a.name.as_str())
    }

    /// Enclosing node, None for the root or when unattached.
    pub fn parent(&self) -> Option<NodeId> {
        self.attachment.as_ref().and_then(|a| a.parent)
    }

    /// Distance from the root (0 for the root or when unattached).
    pub fn depth(&self) -> u32 {
        self.attachment.as_ref().map_or(0, |a| a.depth)
    }

    /// Own attributes supplied at construction or by a dynamic hook.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get an own attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an own attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<CompactString>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder-style [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub(crate) fn attachment(&self) -> Option<&Attachment<C>> {
        self.attachment.as_ref()
    }

    /// One-way transition to the attached state.
    pub(crate) fn attach(&mut self, attachment: Attachment<C>) -> TreeResult<()> {
        if self.attachment.is_some() {
            return Err(TreeError::AlreadyAttached {
                type_name: self.type_name.clone(),
            });
        }
        self.attachment = Some(attachment);
        Ok(())
    }
}

impl<C> Clone for Node<C> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry,
            type_id: self.type_id,
            type_name: self.type_name.clone(),
            attachment: self.attachment.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<C> fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.type_name)
            .field("name", &self.name())
            .field("parent", &self.parent())
            .field("attached", &self.is_attached())
            .field("attributes", &self.attributes)
            .finish()
    }
}
