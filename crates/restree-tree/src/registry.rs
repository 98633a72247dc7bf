//! Node type registry and one-time child resolution.
//!
//! Types are declared into a [`Registry`] at start-up. Types whose static
//! child tables name children symbolically stay unresolved until
//! [`Registry::resolve_children`] converts those names to handles; until then
//! they cannot be instantiated. Once every type is resolved the registry is
//! frozen behind an `Arc` and shared read-only by every tree.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;
use restree_core::{Attributes, NodeTypeId, TreeError, TreeResult};
use restree_resolve::{NameResolver, Namespace, SymbolTable};
use tracing::{debug, info, warn};

use crate::node::Node;
use crate::node_type::{ChildRef, NodeType};

/// Name of the abstract base type every registry starts with.
pub const BASE_TYPE_NAME: &str = "Resource";

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// Identity of a [`Registry`], stamped on every node it instantiates.
///
/// [`NodeTypeId`]s are only meaningful inside the registry that issued
/// them; trees use this to refuse nodes built elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryId(u64);

impl RegistryId {
    pub(crate) fn next() -> Self {
        Self(NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Registry of node types keyed by [`NodeTypeId`].
pub struct Registry<C> {
    id: RegistryId,
    types: Vec<NodeType<C>>,
    symbols: SymbolTable,
}

impl<C> Registry<C> {
    /// Create a registry holding only the abstract base type.
    pub fn new() -> Self {
        Self {
            id: RegistryId::next(),
            types: vec![NodeType::abstract_base(BASE_TYPE_NAME)],
            symbols: [(BASE_TYPE_NAME, NodeTypeId::BASE)].into_iter().collect(),
        }
    }

    /// Identity stamped on nodes from this registry.
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// Declare a node type and return its handle.
    ///
    /// Types without symbolic children are resolved immediately.
    pub fn declare(&mut self, mut node_type: NodeType<C>) -> TreeResult<NodeTypeId> {
        for (_, child) in node_type.children() {
            if let ChildRef::Concrete(id) = child {
                self.get(*id)?;
            }
        }

        let id = NodeTypeId::new(self.types.len() as u32);
        self.symbols.insert(node_type.qualified_name(), id)?;
        node_type.seal();

        debug!(
            name = %node_type.qualified_name(),
            id = id.0,
            resolved = node_type.is_resolved(),
            "declared resource type"
        );
        self.types.push(node_type);
        Ok(id)
    }

    /// Get a declared type.
    pub fn get(&self, id: NodeTypeId) -> TreeResult<&NodeType<C>> {
        self.types.get(id.index()).ok_or(TreeError::UnknownType { id })
    }

    /// Find a type by fully-qualified name.
    pub fn find(&self, qualified: &str) -> Option<NodeTypeId> {
        self.symbols.lookup(qualified)
    }

    /// Resolve a symbolic reference as if declared in `namespace`.
    pub fn resolve_name(&self, reference: &str, namespace: &Namespace) -> TreeResult<NodeTypeId> {
        self.symbols.resolve(reference, namespace)
    }

    /// The registry's own name table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Number of declared types, including the abstract base.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false; the abstract base type is always present.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over declared types.
    pub fn iter(&self) -> impl Iterator<Item = (NodeTypeId, &NodeType<C>)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (NodeTypeId::new(i as u32), ty))
    }

    /// True iff the type declared a symbolic child.
    pub fn requires_resolution(&self, id: NodeTypeId) -> bool {
        self.get(id).is_ok_and(NodeType::requires_resolution)
    }

    /// True once every child of the type is concrete.
    pub fn is_resolved(&self, id: NodeTypeId) -> bool {
        self.get(id).is_ok_and(NodeType::is_resolved)
    }

    /// Types still waiting for [`resolve_children`](Self::resolve_children).
    pub fn pending(&self) -> Vec<NodeTypeId> {
        self.iter()
            .filter(|(_, ty)| !ty.is_resolved())
            .map(|(id, _)| id)
            .collect()
    }

    /// Resolve the symbolic children of `id` through the registry's own
    /// name table. Repeat calls are a no-op.
    pub fn resolve_children(&mut self, id: NodeTypeId) -> TreeResult<()> {
        let Some(resolved) = self.plan_resolution(id, &self.symbols)? else {
            return Ok(());
        };
        self.apply_resolution(id, resolved)
    }

    /// Resolve the symbolic children of `id` through an external resolver.
    pub fn resolve_children_with<R>(&mut self, id: NodeTypeId, resolver: &R) -> TreeResult<()>
    where
        R: NameResolver + ?Sized,
    {
        let Some(resolved) = self.plan_resolution(id, resolver)? else {
            return Ok(());
        };
        self.apply_resolution(id, resolved)
    }

    /// Resolve every pending type. Returns how many were resolved.
    pub fn resolve_pending(&mut self) -> TreeResult<usize> {
        let pending = self.pending();
        for id in &pending {
            if let Err(err) = self.resolve_children(*id) {
                warn!(
                    type_id = id.0,
                    error = %err,
                    "failed to resolve resource children"
                );
                return Err(err);
            }
        }
        Ok(pending.len())
    }

    /// Create an unattached instance of `id`.
    pub fn instantiate(&self, id: NodeTypeId) -> TreeResult<Node<C>> {
        self.instantiate_with(id, Attributes::new())
    }

    /// Create an unattached instance of `id` carrying extra attributes.
    pub fn instantiate_with(&self, id: NodeTypeId, attributes: Attributes) -> TreeResult<Node<C>> {
        let ty = self.get(id)?;
        if ty.is_abstract() {
            return Err(TreeError::AbstractInstantiation {
                type_name: ty.name().into(),
            });
        }
        if !ty.is_resolved() {
            return Err(TreeError::Unresolved {
                type_name: ty.name().into(),
            });
        }
        Ok(Node::new(self.id, id, ty.name().into(), attributes))
    }

    /// Resolve every symbolic entry of `id` without touching the table.
    ///
    /// Returns None if the type is already resolved. Either every entry
    /// resolves or nothing is changed.
    fn plan_resolution<R>(
        &self,
        id: NodeTypeId,
        resolver: &R,
    ) -> TreeResult<Option<Vec<(CompactString, NodeTypeId)>>>
    where
        R: NameResolver + ?Sized,
    {
        let ty = self.get(id)?;
        if ty.is_abstract() {
            return Err(TreeError::AbstractResolution {
                type_name: ty.name().into(),
            });
        }
        if ty.is_resolved() {
            return Ok(None);
        }

        let snapshot = ty.symbolic_children();
        let mut resolved = Vec::with_capacity(snapshot.len());
        for (key, reference) in snapshot {
            let target = resolver.resolve(&reference, ty.namespace())?;
            self.get(target)?;
            debug!(
                owner = %ty.qualified_name(),
                key = %key,
                reference = %reference,
                target = target.0,
                "resolved child reference"
            );
            resolved.push((key, target));
        }
        Ok(Some(resolved))
    }

    fn apply_resolution(
        &mut self,
        id: NodeTypeId,
        resolved: Vec<(CompactString, NodeTypeId)>,
    ) -> TreeResult<()> {
        let ty = self
            .types
            .get_mut(id.index())
            .ok_or(TreeError::UnknownType { id })?;
        let count = resolved.len();
        ty.complete_resolution(resolved);
        info!(name = %ty.qualified_name(), children = count, "resolved resource children");
        Ok(())
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types)
            .finish()
    }
}
