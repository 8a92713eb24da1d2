//! Contract violations reported by node operations.

use thiserror::Error;

use crate::{Attribute, Flag, NodeType};

/// Errors returned when a node operation is used outside of its contract.
///
/// These are programmer errors: the caller is expected to check the node
/// type before calling. Conversions which simply do not apply to a type
/// return `Ok(false)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The node, or a node of the subtree, is locked
    #[error("trying to modify a locked node ({0})")]
    Locked(NodeType),

    /// The operation is not available on this type of node
    #[error("{operation} is not available on a node of type {node_type}")]
    IncompatibleNodeType {
        /// Name of the rejected operation
        operation: &'static str,
        /// Type of the node at the time of the call
        node_type: NodeType,
    },

    /// A parent/child pairing is not allowed
    #[error("a {child} node cannot be a child of a {parent} node")]
    InvalidChild {
        /// Type of the prospective parent
        parent: NodeType,
        /// Type of the prospective child
        child: NodeType,
    },

    /// The flag is not defined for this type of node
    #[error("flag {flag} is not defined on a node of type {node_type}")]
    IncompatibleFlag {
        /// The rejected flag
        flag: Flag,
        /// Type of the node at the time of the call
        node_type: NodeType,
    },

    /// The attribute is not defined for this type of node
    #[error("attribute {attribute} is not defined on a node of type {node_type}")]
    IncompatibleAttribute {
        /// The rejected attribute
        attribute: Attribute,
        /// Type of the node at the time of the call
        node_type: NodeType,
    },

    /// A numeric value flagged as uninitialized was given to a setter
    #[error("cannot assign an uninitialized {0} value")]
    InvalidData(&'static str),

    /// An index was outside of the valid range
    #[error("index {index} is out of range (size {size})")]
    IndexOutOfRange {
        /// The rejected index
        index: i64,
        /// Number of items available
        size: usize,
    },

    /// The node has no parent
    #[error("a {0} node without a parent has no offset")]
    NoParent(NodeType),

    /// The value does not match any node type
    #[error("{0} is not a valid node type")]
    InvalidNodeType(i32),

    /// A label with the same name already exists in that function
    #[error("label \"{0}\" is already defined")]
    DuplicateLabel(String),

    /// Inconsistent use of the node internals
    #[error("internal error: {0}")]
    InternalError(&'static str),
}
