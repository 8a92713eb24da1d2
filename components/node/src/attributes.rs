//! Declaration attributes (`public`, `static`, `inline`, ...).
//!
//! Attributes are defined on nearly every node type. Some of them are
//! mutually exclusive: trying to set one while a conflicting attribute is
//! already set leaves the node unchanged.

use std::fmt;

use tracing::warn;

use crate::{Node, NodeError, NodeType};

macro_rules! attributes {
    ($($variant:ident => $name:literal,)*) => {
        /// Attributes a node can carry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Attribute {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl Attribute {
            /// Every attribute, in index order.
            pub const ALL: &'static [Attribute] = &[$(Attribute::$variant,)*];

            /// Uppercase name of the attribute.
            pub fn name(self) -> &'static str {
                match self {
                    $(Attribute::$variant => $name,)*
                }
            }
        }
    };
}

attributes! {
    Public => "PUBLIC",
    Private => "PRIVATE",
    Protected => "PROTECTED",
    Internal => "INTERNAL",
    Transient => "TRANSIENT",
    Volatile => "VOLATILE",
    Static => "STATIC",
    Abstract => "ABSTRACT",
    Virtual => "VIRTUAL",
    Array => "ARRAY",
    Inline => "INLINE",
    RequireElse => "REQUIRE_ELSE",
    EnsureThen => "ENSURE_THEN",
    Native => "NATIVE",
    Deprecated => "DEPRECATED",
    Unsafe => "UNSAFE",
    Constructor => "CONSTRUCTOR",
    Final => "FINAL",
    Enumerable => "ENUMERABLE",
    True => "TRUE",
    False => "FALSE",
    Unused => "UNUSED",
    Dynamic => "DYNAMIC",
    Foreach => "FOREACH",
    Nobreak => "NOBREAK",
    Autobreak => "AUTOBREAK",
    Type => "TYPE",
    Defined => "DEFINED",
}

impl Attribute {
    /// Attributes which cannot be set together with this one, and the
    /// name of their group.
    pub fn conflicts(self) -> (&'static [Attribute], &'static str) {
        use Attribute::*;

        const VISIBILITY: &str = "public, private, and protected";
        const FUNCTION_TYPE: &str = "abstract, constructor, inline, native, static, and virtual";
        const SWITCH_TYPE: &str = "foreach, nobreak, and autobreak";
        const CONDITIONAL: &str = "true and false";

        match self {
            Public => (&[Private, Protected], VISIBILITY),
            Private => (&[Public, Protected], VISIBILITY),
            Protected => (&[Public, Private], VISIBILITY),

            Abstract => (&[Static, Constructor, Virtual, Native, Inline], FUNCTION_TYPE),
            Constructor => (&[Static, Virtual, Inline, Abstract], FUNCTION_TYPE),
            Inline => (&[Abstract, Constructor, Native, Virtual], FUNCTION_TYPE),
            Native => (&[Abstract, Inline], FUNCTION_TYPE),
            Static => (&[Abstract, Constructor, Virtual], FUNCTION_TYPE),
            Virtual => (&[Static, Constructor, Abstract, Inline], FUNCTION_TYPE),

            Foreach => (&[Nobreak, Autobreak], SWITCH_TYPE),
            Nobreak => (&[Foreach, Autobreak], SWITCH_TYPE),
            Autobreak => (&[Foreach, Nobreak], SWITCH_TYPE),

            True => (&[False], CONDITIONAL),
            False => (&[True], CONDITIONAL),

            _ => (&[], ""),
        }
    }

    /// Whether the attribute can be used on nodes of type `node_type`.
    pub fn is_defined_on(self, node_type: NodeType) -> bool {
        match self {
            Attribute::Defined => true,
            _ if node_type == NodeType::Program => false,
            Attribute::Type => is_typeable(node_type),
            _ => true,
        }
    }

    fn bit(self) -> u64 {
        1 << (self as u32)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expressions and literals, the nodes which can be given a type.
fn is_typeable(node_type: NodeType) -> bool {
    node_type.is_assignment()
        || matches!(
            node_type,
            NodeType::Add
                | NodeType::Array
                | NodeType::ArrayLiteral
                | NodeType::As
                | NodeType::BitwiseAnd
                | NodeType::BitwiseNot
                | NodeType::BitwiseOr
                | NodeType::BitwiseXor
                | NodeType::Call
                | NodeType::Conditional
                | NodeType::Decrement
                | NodeType::Delete
                | NodeType::Divide
                | NodeType::Equal
                | NodeType::False
                | NodeType::Float64
                | NodeType::Function
                | NodeType::Greater
                | NodeType::GreaterEqual
                | NodeType::Identifier
                | NodeType::In
                | NodeType::Increment
                | NodeType::Instanceof
                | NodeType::Int64
                | NodeType::Is
                | NodeType::Less
                | NodeType::LessEqual
                | NodeType::List
                | NodeType::LogicalAnd
                | NodeType::LogicalNot
                | NodeType::LogicalOr
                | NodeType::LogicalXor
                | NodeType::Match
                | NodeType::Maximum
                | NodeType::Member
                | NodeType::Minimum
                | NodeType::Modulo
                | NodeType::Multiply
                | NodeType::Name
                | NodeType::New
                | NodeType::NotEqual
                | NodeType::Null
                | NodeType::ObjectLiteral
                | NodeType::PostDecrement
                | NodeType::PostIncrement
                | NodeType::Power
                | NodeType::Private
                | NodeType::Public
                | NodeType::Range
                | NodeType::RotateLeft
                | NodeType::RotateRight
                | NodeType::Scope
                | NodeType::ShiftLeft
                | NodeType::ShiftRight
                | NodeType::ShiftRightUnsigned
                | NodeType::StrictlyEqual
                | NodeType::StrictlyNotEqual
                | NodeType::String
                | NodeType::Subtract
                | NodeType::Super
                | NodeType::This
                | NodeType::True
                | NodeType::Typeof
                | NodeType::Undefined
                | NodeType::Videntifier
                | NodeType::Void
        )
}

/// A set of attributes, used to compare all the attributes of a node at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeSet(u64);

impl AttributeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `attribute`.
    pub fn set(&mut self, attribute: Attribute, value: bool) {
        if value {
            self.0 |= attribute.bit();
        } else {
            self.0 &= !attribute.bit();
        }
    }

    /// Whether `attribute` is in the set.
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.0 & attribute.bit() != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The attributes of the set, in index order.
    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        Attribute::ALL
            .iter()
            .copied()
            .filter(|attribute| self.contains(*attribute))
    }
}

impl Node {
    fn verify_attribute(&self, attribute: Attribute) -> Result<(), NodeError> {
        if attribute.is_defined_on(self.get_type()) {
            Ok(())
        } else {
            Err(NodeError::IncompatibleAttribute {
                attribute,
                node_type: self.get_type(),
            })
        }
    }

    /// Current value of `attribute`.
    pub fn get_attribute(&self, attribute: Attribute) -> Result<bool, NodeError> {
        self.verify_attribute(attribute)?;
        Ok(self.get_attributes().contains(attribute))
    }

    /// Change the value of `attribute`.
    ///
    /// Setting an attribute while a mutually exclusive one is already set
    /// is ignored (a warning is logged).
    pub fn set_attribute(&self, attribute: Attribute, value: bool) -> Result<(), NodeError> {
        self.verify_attribute(attribute)?;
        let mut set = self.get_attributes();
        if value {
            let (conflicts, group) = attribute.conflicts();
            if conflicts.iter().any(|other| set.contains(*other)) {
                warn!(
                    %attribute,
                    position = %self.position.borrow(),
                    "attributes {} are mutually exclusive, only one of them can be used",
                    group
                );
                return Ok(());
            }
        }
        set.set(attribute, value);
        self.attributes.set(set.0);
        Ok(())
    }

    /// Apply [`Node::set_attribute`] to this node and all its descendants.
    pub fn set_attribute_tree(&self, attribute: Attribute, value: bool) -> Result<(), NodeError> {
        self.set_attribute(attribute, value)?;
        for child in self.children.borrow().iter() {
            child.set_attribute_tree(attribute, value)?;
        }
        Ok(())
    }

    /// All the attributes currently set.
    pub fn get_attributes(&self) -> AttributeSet {
        AttributeSet(self.attributes.get())
    }

    /// Whether the attributes of this node are exactly `attributes`.
    pub fn compare_all_attributes(&self, attributes: &AttributeSet) -> bool {
        self.attributes.get() == attributes.0
    }
}
