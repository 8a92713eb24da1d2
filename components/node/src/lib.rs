//! The node tree shared by the lexer, the parser and the JSON reader.
//!
//! A [`Node`] is a type tagged tree element. The same structure is used
//! for tokens, for the parser tree and for the compiled tree: the type can
//! change in place with the `to_*` conversions, following JavaScript
//! coercion rules.
//!
//! # Overview
//!
//! - [`Node`] / [`NodePtr`] - The tree element and its shared handle
//! - [`NodeType`] - Type tag of a node
//! - [`Flag`] / [`Attribute`] - Per type flags and declaration attributes
//! - [`NodeLock`] - Scoped guard preventing modifications
//! - [`compare`] - Comparison of literals for constant folding
//! - [`NodeError`] - Contract violations reported by the node operations
//!
//! # Examples
//!
//! ```
//! use node::{Node, NodeType};
//!
//! let number = Node::new(NodeType::String);
//! number.set_string("42.5").unwrap();
//! assert!(number.to_number().unwrap());
//! assert_eq!(number.get_type(), NodeType::Float64);
//! assert_eq!(number.get_float64().unwrap().get(), 42.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod attributes;
mod compare;
mod convert;
mod display;
mod error;
mod flags;
mod lock;
mod node;
mod node_type;
mod operator;
mod tree;

pub use attributes::{Attribute, AttributeSet};
pub use compare::{compare, CompareMode};
pub use display::NodeDisplay;
pub use error::NodeError;
pub use flags::{Flag, FlagSet};
pub use lock::NodeLock;
pub use node::{Node, NodePtr};
pub use node_type::NodeType;
pub use operator::{operator_to_string, string_to_operator};
