//! Resource trees for traversal-based routing.
//!
//! A [`ResourceTree`] maps a sequence of path segments to typed nodes. Each
//! node type, declared once in a [`Registry`], may have:
//!
//! - a **static child table** mapping keys to types, either by handle or by
//!   symbolic name resolved once at start-up;
//! - a **dynamic child hook** computing children from external state;
//! - **attributes** that descendants inherit unless they override them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use restree_tree::{Child, NodeType, Registry, ResourceTree, TreeError, Value};
//!
//! let mut registry: Registry<()> = Registry::new();
//! let widget = registry
//!     .declare(NodeType::new("Widget").in_namespace("app"))
//!     .unwrap();
//! registry
//!     .declare(
//!         NodeType::new("WidgetContainer")
//!             .in_namespace("app")
//!             .with_dynamic_children(move |_node, key| {
//!                 let id: i64 = key.parse().map_err(|_| TreeError::not_found(key))?;
//!                 Ok(Child::with(widget, [("widget_id", id)]))
//!             }),
//!     )
//!     .unwrap();
//! let root = registry
//!     .declare(
//!         NodeType::new("Root")
//!             .in_namespace("app")
//!             .with_child("widget", ".WidgetContainer"),
//!     )
//!     .unwrap();
//!
//! // Discovery: resolve symbolic children once, then share the registry.
//! registry.resolve_pending().unwrap();
//! let registry = Arc::new(registry);
//!
//! let mut tree = ResourceTree::new(registry);
//! let root = tree.create_root(root, ()).unwrap();
//! let node = tree.resolve_path(root, "widget/5").unwrap();
//! assert_eq!(tree.resolve_attribute(node, "widget_id").unwrap(), Value::from(5));
//! ```

mod attributes;
mod behavior;
mod manifest;
mod node;
mod node_type;
mod registry;
mod tree;

pub use behavior::{Child, ChildSource, NodeView, Property};
pub use manifest::{Manifest, ResourceDecl};
pub use node::Node;
pub use node_type::{ChildRef, NodeType};
pub use registry::{BASE_TYPE_NAME, Registry, RegistryId};
pub use tree::{Lineage, ResourceTree};

// Re-export core types for convenience
pub use restree_core::{
    Attributes, ErrorKind, NodeId, NodeTypeId, TreeConfig, TreeError, TreeResult, Value,
};
pub use restree_resolve::{NameResolver, Namespace, SymbolTable};
