//! Text dump of a node tree, one line per node.
//!
//! ```text
//! 0x55d0c8a0e2a0: 02.  1102: PROGRAM (:1:)
//! 0x55d0c8a0e330: 03-   1043: DIRECTIVE_LIST: (:1:)
//! ```
//!
//! Each line shows the node address, the depth, a marker (`.` for the
//! root, `-` for children, `=` for variables and `:` for labels), the type,
//! the payload, the flags, the attributes (in index order), the links and
//! the position. Links are labelled by name, such as ` Instance: 0x...`.

use std::fmt::{self, Write};

use core_types::number_to_string;

use crate::{Flag, Node, NodeType};

/// Helper returned by [`Node::display`].
pub struct NodeDisplay<'a> {
    node: &'a Node,
}

impl Node {
    /// Dump this node and its whole subtree.
    ///
    /// The dump is meant for debugging and tests; node addresses change
    /// from one run to the next.
    pub fn display(&self) -> NodeDisplay<'_> {
        NodeDisplay { node: self }
    }

    fn display_line(&self, f: &mut fmt::Formatter<'_>, indent: usize, marker: char) -> fmt::Result {
        write!(
            f,
            "{:p}: {:02}{}{:indent$}",
            self as *const Node,
            indent,
            marker,
            "",
            indent = indent
        )?;
        self.display_data(f)?;

        let attributes = self.get_attributes();
        if !attributes.is_empty() {
            f.write_str(" attrs:")?;
            for attribute in attributes.iter() {
                write!(f, " {}", attribute)?;
            }
        }

        for (name, link) in [
            ("Instance", self.get_instance()),
            ("Type Node", self.get_type_node()),
            ("Attribute Node", self.get_attribute_node()),
            ("Goto Exit", self.get_goto_exit()),
            ("Goto Enter", self.get_goto_enter()),
        ] {
            if let Some(target) = link {
                write!(f, " {}: {:p}", name, &*target as *const Node)?;
            }
        }

        write!(f, " ({})", self.position.borrow())?;
        if self.lock.get() > 0 {
            write!(f, " Locked: {}", self.lock.get())?;
        }
        f.write_char('\n')?;

        for child in self.children.borrow().iter() {
            child.display_line(f, indent + 1, '-')?;
        }
        for variable in self.variables.borrow().iter() {
            variable.display_line(f, indent + 1, '=')?;
        }
        for label in self.labels.borrow().values() {
            label.display_line(f, indent + 1, ':')?;
        }
        Ok(())
    }

    fn display_data(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node_type = self.get_type();
        write!(f, "{:04}: {}", node_type.value(), node_type.type_name())?;
        if let Some(c) = node_type.operator_char() {
            write!(f, " = '{}'", c)?;
        }

        match node_type {
            NodeType::Int64 => {
                let value = self.int_payload().get();
                return write!(f, ": {}, 0x{:016x}", value, value);
            }
            NodeType::Float64 => {
                return write!(f, ": {}", number_to_string(self.float_payload().get()));
            }
            t if t.has_string_payload() => display_str(f, &self.string_payload())?,
            t if Flag::ALL.iter().any(|flag| flag.is_defined_on(t)) => f.write_char(':')?,
            _ => {}
        }

        for flag in self.get_flags().iter() {
            write!(f, " {}", flag.short_name())?;
        }
        Ok(())
    }
}

fn display_str(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str(": '")?;
    for c in text.chars() {
        let code = c as u32;
        match code {
            0..=0x1f => write!(f, "^{}", char::from(b'@' + code as u8))?,
            0x27 => f.write_str("\\'")?,
            0x20..=0x7e => f.write_char(c)?,
            0x7f..=0xff => write!(f, "\\x{:x}", code)?,
            0x100..=0xffff => write!(f, "\\u{:04x}", code)?,
            _ => write!(f, "\\U{:08x}", code)?,
        }
    }
    f.write_char('\'')
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.display_line(f, 2, '.')
    }
}
