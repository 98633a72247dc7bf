//! Core types for restree.
//!
//! This crate provides the fundamental data structures shared by the
//! resolver and the resource tree: identifiers, dynamic attribute values,
//! the error taxonomy, and tree configuration.

mod config;
mod error;
mod id;
mod value;

pub use config::{TreeConfig, TreeConfigBuilder};
pub use error::{ErrorKind, TreeError, TreeResult};
pub use id::{NodeId, NodeTypeId};
pub use value::{Attributes, Value};
