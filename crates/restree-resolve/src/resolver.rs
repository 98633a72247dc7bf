//! Name to node type lookup.

use std::collections::HashMap;

use compact_str::CompactString;
use restree_core::{NodeTypeId, TreeError, TreeResult};

use crate::names::{Namespace, Reference};

/// A service that converts symbolic references into node type handles.
///
/// Implementors only provide [`lookup`](NameResolver::lookup) for
/// fully-qualified names; [`resolve`](NameResolver::resolve) applies the
/// relative-then-global resolution order on top of it.
pub trait NameResolver {
    /// Look up a fully-qualified name.
    fn lookup(&self, qualified: &str) -> Option<NodeTypeId>;

    /// Resolve `reference` as declared inside `namespace`.
    fn resolve(&self, reference: &str, namespace: &Namespace) -> TreeResult<NodeTypeId> {
        let unresolved = || TreeError::NameResolution {
            reference: reference.into(),
            namespace: namespace.as_str().into(),
        };
        let parsed = Reference::parse(reference).ok_or_else(unresolved)?;

        for candidate in parsed.candidates(namespace) {
            if let Some(id) = self.lookup(&candidate) {
                tracing::trace!(reference, %candidate, "resolved symbolic reference");
                return Ok(id);
            }
        }
        Err(unresolved())
    }
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> Option<NodeTypeId>,
{
    fn lookup(&self, qualified: &str) -> Option<NodeTypeId> {
        self(qualified)
    }
}

/// Table of fully-qualified type names.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: HashMap<CompactString, NodeTypeId>,
}

impl SymbolTable {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a qualified name. Fails if the name is already taken.
    pub fn insert(&mut self, qualified: impl Into<CompactString>, id: NodeTypeId) -> TreeResult<()> {
        let qualified = qualified.into();
        if self.names.contains_key(&qualified) {
            return Err(TreeError::DuplicateType { name: qualified });
        }
        self.names.insert(qualified, id);
        Ok(())
    }

    /// Check if a qualified name is registered.
    pub fn contains(&self, qualified: &str) -> bool {
        self.names.contains_key(qualified)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over registered names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeTypeId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Collects `(name, id)` pairs. A repeated name keeps the last id.
impl<N: Into<CompactString>> FromIterator<(N, NodeTypeId)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (N, NodeTypeId)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }
}

impl NameResolver for SymbolTable {
    fn lookup(&self, qualified: &str) -> Option<NodeTypeId> {
        self.names.get(qualified).copied()
    }
}
