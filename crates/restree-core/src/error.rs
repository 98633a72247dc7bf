//! Error types for resource tree operations.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{NodeId, NodeTypeId};

/// Result type for resource tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors that can occur while declaring, resolving, or traversing a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A node was attached a second time.
    #[error("Resource '{type_name}' is already attached")]
    AlreadyAttached { type_name: CompactString },

    /// An operation that needs an attached node was given an unattached one.
    #[error("Resource '{type_name}' is not attached; lookups require an attached resource")]
    NotAttached { type_name: CompactString },

    /// A node type was instantiated before its symbolic children were resolved.
    #[error("Cannot instantiate '{type_name}': symbolic children have not been resolved")]
    Unresolved { type_name: CompactString },

    /// Child resolution was requested on the abstract base type.
    #[error("Cannot resolve children of the abstract base resource '{type_name}'")]
    AbstractResolution { type_name: CompactString },

    /// The abstract base type was instantiated directly.
    #[error("Cannot instantiate the abstract base resource '{type_name}'")]
    AbstractInstantiation { type_name: CompactString },

    /// A node instantiated from one registry was handed to a tree over another.
    #[error("Resource '{type_name}' was instantiated from a different registry")]
    ForeignNode { type_name: CompactString },

    /// Node id does not belong to this tree.
    #[error("Unknown node #{}", id.0)]
    UnknownNode { id: NodeId },

    /// Node type id does not belong to this registry.
    #[error("Unknown resource type #{}", id.0)]
    UnknownType { id: NodeTypeId },

    /// A type with the same qualified name was already declared.
    #[error("Resource type '{name}' is already declared")]
    DuplicateType { name: CompactString },

    /// No child exists for the requested key.
    #[error("No child resource named '{key}'")]
    NotFound { key: CompactString },

    /// A symbolic child reference could not be converted to a type.
    #[error("Could not resolve '{reference}' relative to '{namespace}' or as a global name")]
    NameResolution {
        reference: CompactString,
        namespace: CompactString,
    },

    /// A dynamic child hook returned a value outside the allowed shapes.
    #[error("get_child returned an invalid child: {value}")]
    InvalidChild { value: String },

    /// The attribute chain was exhausted.
    #[error("'{type_name}' resource has no attribute '{name}'")]
    AttributeNotFound {
        type_name: CompactString,
        name: CompactString,
    },

    /// A private attribute was missing locally; such names are never delegated.
    #[error(
        "'{type_name}' resource has no attribute '{name}' (private attributes are not proxied to parent resources)"
    )]
    PrivateAttribute {
        type_name: CompactString,
        name: CompactString,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Manifest could not be parsed or applied.
    #[error("Invalid manifest: {message}")]
    Manifest { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Category of a [`TreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ErrorKind {
    /// Attachment or resolution ordering was violated.
    IllegalState,
    /// A path segment does not name a child.
    NotFound,
    /// A symbolic reference could not be resolved.
    NameResolution,
    /// A dynamic child hook broke its contract.
    InvalidChild,
    /// The attribute chain was exhausted.
    AttributeNotFound,
    /// The abstract base type was used as a concrete type.
    TypeError,
    /// Configuration or manifest input was rejected.
    Config,
    /// Reading input failed.
    Io,
}

impl TreeError {
    /// Create a not-found error for a child key.
    ///
    /// Dynamic child hooks return this to stop a lookup explicitly.
    pub fn not_found(key: impl Into<CompactString>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid-child error naming the offending value.
    pub fn invalid_child(value: impl std::fmt::Display) -> Self {
        Self::InvalidChild {
            value: value.to_string(),
        }
    }

    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyAttached { .. }
            | Self::NotAttached { .. }
            | Self::Unresolved { .. }
            | Self::AbstractResolution { .. }
            | Self::ForeignNode { .. }
            | Self::UnknownNode { .. }
            | Self::UnknownType { .. }
            | Self::DuplicateType { .. } => ErrorKind::IllegalState,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NameResolution { .. } => ErrorKind::NameResolution,
            Self::InvalidChild { .. } => ErrorKind::InvalidChild,
            Self::AttributeNotFound { .. } | Self::PrivateAttribute { .. } => {
                ErrorKind::AttributeNotFound
            }
            Self::AbstractInstantiation { .. } => ErrorKind::TypeError,
            Self::InvalidConfig { .. } | Self::Manifest { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if this error means "no such path".
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
