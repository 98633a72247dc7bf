//! Symbolic reference resolution for restree.
//!
//! Node types may name their children by string instead of by handle. This
//! crate turns such a reference into a concrete [`NodeTypeId`], relative to
//! the namespace the owning type was declared in. It knows nothing about the
//! resource tree itself; it is a plain name to type lookup service.
//!
//! # Resolution order
//!
//! A reference is first interpreted relative to the declaring namespace and
//! then as a fully-qualified global name:
//!
//! ```rust
//! use restree_resolve::{NameResolver, Namespace, SymbolTable};
//! use restree_core::NodeTypeId;
//!
//! let mut symbols = SymbolTable::new();
//! symbols.insert("app.Child", NodeTypeId::new(1)).unwrap();
//! symbols.insert("Shared", NodeTypeId::new(2)).unwrap();
//!
//! let ns = Namespace::new("app");
//! assert_eq!(symbols.resolve(".Child", &ns).unwrap(), NodeTypeId::new(1));
//! assert_eq!(symbols.resolve("Shared", &ns).unwrap(), NodeTypeId::new(2));
//! ```

mod names;
mod resolver;

pub use names::{Namespace, Reference};
pub use resolver::{NameResolver, SymbolTable};

// Re-export core types for convenience
pub use restree_core::{NodeTypeId, TreeError, TreeResult};
