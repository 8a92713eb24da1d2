//! Error types for JSON values

use node::NodeError;
use thiserror::Error;

use crate::JsonType;

/// Misuse of a [`crate::JsonValue`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonError {
    /// Accessor called on a value of another type
    #[error("a JSON {expected} value was expected, found {found}")]
    TypeMismatch {
        /// Type required by the accessor
        expected: JsonType,
        /// Type of the value
        found: JsonType,
    },

    /// `set_item()` index past the end of the array
    #[error("index {index} is out of range for a JSON array of {len} items")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of items in the array
        len: usize,
    },

    /// An array or object contains itself
    #[error("JSON value includes itself, cyclical structures cannot be converted")]
    CyclicalStructure,

    /// A token node could not be read
    #[error(transparent)]
    Node(#[from] NodeError),
}
