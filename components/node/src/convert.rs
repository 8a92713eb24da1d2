//! In place conversions of a node to another type.
//!
//! The numeric, boolean and string conversions follow the JavaScript
//! coercion rules. A conversion which does not apply to the current type
//! returns `Ok(false)` and leaves the node as is; any conversion on a
//! locked node returns [`NodeError::Locked`].

use core_types::{number_to_string, string_prefix_to_int64, string_to_number, Float64, Int64};
use tracing::trace;

use crate::node::Payload;
use crate::{Node, NodeError, NodeType};

impl Node {
    /// Type `to_boolean()` would give this node, without converting it.
    ///
    /// Returns TRUE, FALSE or UNDEFINED when the value cannot be
    /// determined at compile time.
    pub fn to_boolean_type_only(&self) -> NodeType {
        match self.get_type() {
            NodeType::True => NodeType::True,
            NodeType::False | NodeType::Null => NodeType::False,
            NodeType::Int64 => {
                if self.int_payload().get() != 0 {
                    NodeType::True
                } else {
                    NodeType::False
                }
            }
            NodeType::Float64 => {
                let value = self.float_payload().get();
                if value != 0.0 && !value.is_nan() {
                    NodeType::True
                } else {
                    NodeType::False
                }
            }
            NodeType::String => {
                if self.string_payload().is_empty() {
                    NodeType::False
                } else {
                    NodeType::True
                }
            }
            _ => NodeType::Undefined,
        }
    }

    /// Convert to TRUE or FALSE.
    ///
    /// UNDEFINED and the types which are not literals are left unchanged
    /// and the function returns `Ok(false)`.
    pub fn to_boolean(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        match self.to_boolean_type_only() {
            NodeType::Undefined => {
                trace!(node_type = %self.get_type(), "to_boolean() not applicable");
                Ok(false)
            }
            result => {
                self.change_type(result, Payload::None);
                Ok(true)
            }
        }
    }

    /// Convert to INT64.
    ///
    /// Strings are read up to the first character which cannot be part
    /// of a number; a string which does not start with a number becomes 0.
    pub fn to_int64(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        let value = match self.get_type() {
            NodeType::Int64 => return Ok(true),
            NodeType::Float64 => self.float_payload().get() as i64,
            NodeType::True => 1,
            NodeType::False | NodeType::Null => 0,
            NodeType::String => string_prefix_to_int64(&self.string_payload()),
            _ => return Ok(false),
        };
        self.change_type(NodeType::Int64, Payload::Int64(Int64::new(value)));
        Ok(true)
    }

    /// Convert to FLOAT64.
    ///
    /// Strings always become 0.0; use [`Node::to_number`] to parse them.
    pub fn to_float64(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        let value = match self.get_type() {
            NodeType::Float64 => return Ok(true),
            NodeType::Int64 => self.int_payload().get() as f64,
            NodeType::True => 1.0,
            NodeType::False | NodeType::Null | NodeType::String => 0.0,
            NodeType::Undefined => f64::NAN,
            _ => return Ok(false),
        };
        self.change_type(NodeType::Float64, Payload::Float64(Float64::new(value)));
        Ok(true)
    }

    /// Convert to INT64 or FLOAT64, like the unary `+` operator would.
    ///
    /// Booleans and null become INT64, undefined and strings become FLOAT64
    /// (NaN when the string is not a valid number).
    pub fn to_number(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        match self.get_type() {
            NodeType::Int64 | NodeType::Float64 => {}
            NodeType::True => self.change_type(NodeType::Int64, Payload::Int64(Int64::new(1))),
            NodeType::False | NodeType::Null => {
                self.change_type(NodeType::Int64, Payload::Int64(Int64::new(0)))
            }
            NodeType::Undefined => {
                self.change_type(NodeType::Float64, Payload::Float64(Float64::new(f64::NAN)))
            }
            NodeType::String => {
                let value = string_to_number(&self.string_payload());
                self.change_type(NodeType::Float64, Payload::Float64(Float64::new(value)));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Convert to STRING.
    ///
    /// An IDENTIFIER becomes a string with the same name.
    pub fn to_string(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        let text = match self.get_type() {
            NodeType::String => return Ok(true),
            NodeType::Identifier => self.string_payload(),
            NodeType::True => "true".to_string(),
            NodeType::False => "false".to_string(),
            NodeType::Null => "null".to_string(),
            NodeType::Undefined => "undefined".to_string(),
            NodeType::Int64 => self.int_payload().get().to_string(),
            NodeType::Float64 => number_to_string(self.float_payload().get()),
            _ => return Ok(false),
        };
        self.change_type(NodeType::String, Payload::String(text));
        Ok(true)
    }

    /// Mark the node as UNKNOWN so [`Node::clean_tree`] removes it.
    pub fn to_unknown(&self) -> Result<(), NodeError> {
        self.modifying()?;
        self.change_type(NodeType::Unknown, Payload::None);
        Ok(())
    }

    /// Transform an ASSIGNMENT or a MEMBER into a CALL (i.e. a setter or
    /// a getter call).
    pub fn to_call(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        match self.get_type() {
            NodeType::Assignment | NodeType::Member => {
                self.change_type(NodeType::Call, Payload::None);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Transform a CALL into an AS (i.e. `String(x)` into `x as String`).
    pub fn to_as(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        if self.get_type() != NodeType::Call {
            return Ok(false);
        }
        self.change_type(NodeType::As, Payload::None);
        Ok(true)
    }

    /// Transform an IDENTIFIER into a LABEL, keeping its name.
    pub fn to_label(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        if self.get_type() != NodeType::Identifier {
            return Ok(false);
        }
        let name = self.string_payload();
        self.change_type(NodeType::Label, Payload::String(name));
        Ok(true)
    }

    /// Transform an IDENTIFIER into a VIDENTIFIER, keeping its name.
    ///
    /// PRIVATE, PROTECTED and PUBLIC are accepted too and become a
    /// VIDENTIFIER named after the keyword.
    pub fn to_videntifier(&self) -> Result<(), NodeError> {
        self.modifying()?;
        let name = match self.get_type() {
            NodeType::Identifier => self.string_payload(),
            NodeType::Private => "private".to_string(),
            NodeType::Protected => "protected".to_string(),
            NodeType::Public => "public".to_string(),
            _ => return Err(self.incompatible("to_videntifier()")),
        };
        self.change_type(NodeType::Videntifier, Payload::String(name));
        Ok(())
    }

    /// Transform PRIVATE, PROTECTED or PUBLIC into an IDENTIFIER named
    /// after the keyword; an IDENTIFIER is left as is.
    pub fn to_identifier(&self) -> Result<bool, NodeError> {
        self.modifying()?;
        let name = match self.get_type() {
            NodeType::Identifier => return Ok(true),
            NodeType::Private => "private",
            NodeType::Protected => "protected",
            NodeType::Public => "public",
            _ => return Ok(false),
        };
        self.change_type(NodeType::Identifier, Payload::String(name.to_string()));
        Ok(true)
    }

    /// Transform a VARIABLE into a VAR_ATTRIBUTES, keeping its name.
    pub fn to_var_attributes(&self) -> Result<(), NodeError> {
        self.modifying()?;
        if self.get_type() != NodeType::Variable {
            return Err(self.incompatible("to_var_attributes()"));
        }
        self.node_type.set(NodeType::VarAttributes);
        Ok(())
    }
}
