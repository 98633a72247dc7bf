//! Attribute lookup through the ancestor chain.
//!
//! A node's own attributes are checked first: values set on the instance,
//! then constants declared on its type, then its type's computed properties.
//! Anything not found locally is asked of the parent, which applies the same
//! rule, until the root is reached. Names carrying the configured private
//! prefix are never delegated.

use restree_core::{NodeId, TreeError, TreeResult, Value};
use tracing::trace;

use crate::tree::ResourceTree;

impl<C> ResourceTree<C> {
    /// Resolve `name` on `id`, delegating to ancestors when needed.
    ///
    /// Errors always name the type of `id`, not of the ancestor where the
    /// chain ended.
    pub fn resolve_attribute(&self, id: NodeId, name: &str) -> TreeResult<Value> {
        let origin = self.attached(id)?;
        self.resolve_attribute_from(id, name, origin.type_name())
    }

    /// Check if `name` resolves on `id`.
    ///
    /// Only a missing attribute yields `Ok(false)`; other failures, such as
    /// a property erroring, are returned.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> TreeResult<bool> {
        match self.resolve_attribute(id, name) {
            Ok(_) => Ok(true),
            Err(TreeError::AttributeNotFound { .. } | TreeError::PrivateAttribute { .. }) => {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Look `name` up on `id` alone, without delegating.
    pub fn own_attribute(&self, id: NodeId, name: &str) -> TreeResult<Option<Value>> {
        let node = self.node(id)?;
        if let Some(value) = node.attribute(name) {
            return Ok(Some(value.clone()));
        }

        let node_type = self.registry().get(node.type_id())?;
        if let Some(value) = node_type.attribute(name) {
            return Ok(Some(value.clone()));
        }
        match node_type.property(name) {
            Some(property) => property.get(&self.view(id)?).map(Some),
            None => Ok(None),
        }
    }

    fn resolve_attribute_from(&self, id: NodeId, name: &str, origin: &str) -> TreeResult<Value> {
        if let Some(value) = self.own_attribute(id, name)? {
            return Ok(value);
        }

        let node = self.node(id)?;
        if self.config().is_private(name) {
            return Err(TreeError::PrivateAttribute {
                type_name: node.type_name().into(),
                name: name.into(),
            });
        }

        match node.parent() {
            Some(parent) => {
                trace!(name, from = node.type_name(), "delegating attribute to parent");
                self.resolve_attribute_from(parent, name, origin)
            }
            None => Err(TreeError::AttributeNotFound {
                type_name: origin.into(),
                name: name.into(),
            }),
        }
    }
}
