//! Integration test suite for the as2js front-end
//!
//! This crate provides integration tests that verify the components work
//! together across component boundaries.

use core_types::{Message, MessageCollector, Options};
use node::NodePtr;
use parser::Parser;

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use json;
    pub use node;
    pub use parser;
}

/// Parse `source`, returning the PROGRAM node and every message emitted.
pub fn parse_program(source: &str, options: Options) -> (NodePtr, Vec<Message>) {
    let mut sink = MessageCollector::new();
    let program = Parser::new(source, options).parse(&mut sink);
    (program, sink.take())
}

/// Tree dump with the node addresses removed, so it can be compared.
pub fn dump(node: &NodePtr) -> String {
    node.display()
        .to_string()
        .lines()
        .map(|line| line.split_once(": ").map_or(line, |(_, rest)| rest))
        .collect::<Vec<_>>()
        .join("\n")
}
