//! Lexer and parser turning source text into node trees
//!
//! The lexer returns tokens as [`node::Node`]s and the parser assembles
//! them into a tree whose root is a PROGRAM node. Errors are reported
//! through a [`core_types::MessageSink`]; parsing always continues to the
//! end of the input.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes source text, one node per token
//! - [`Parser`] - Recursive descent parser producing PROGRAM trees
//!
//! # Examples
//!
//! ```
//! use core_types::{MessageCollector, Options};
//! use node::NodeType;
//! use parser::Parser;
//!
//! let mut sink = MessageCollector::new();
//! let program = Parser::new("if (a) b(); else c();", Options::default()).parse(&mut sink);
//!
//! let statement = program.get_child(0).unwrap().get_child(0).unwrap();
//! assert_eq!(statement.get_type(), NodeType::If);
//! assert_eq!(statement.get_children_size(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod lexer;
mod parser;

pub use lexer::Lexer;
pub use parser::Parser;
