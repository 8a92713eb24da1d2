//! The node structure, its payload and auxiliary state.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use core_types::{Float64, Int64, Position};
use tracing::trace;

use crate::{NodeError, NodeType};

/// Shared handle to a node.
///
/// Children, variables, labels and the attribute node are owned through
/// these handles; the parent and the other links are [`Weak`].
pub type NodePtr = Rc<Node>;

/// Value carried by a node; which variant is populated depends only on
/// the node type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    None,
    Int64(Int64),
    Float64(Float64),
    String(String),
}

impl Payload {
    pub(crate) fn for_type(node_type: NodeType) -> Payload {
        match node_type {
            NodeType::Int64 => Payload::Int64(Int64::default()),
            NodeType::Float64 => Payload::Float64(Float64::default()),
            t if t.has_string_payload() => Payload::String(String::new()),
            _ => Payload::None,
        }
    }
}

/// Weak links a node can hold. The attribute node is owned, so it is
/// kept apart in `attribute_node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    Instance = 0,
    Type = 1,
    GotoExit = 2,
    GotoEnter = 3,
}

/// One element of a program tree.
///
/// A node is at the same time a token returned by the lexer, a node of the
/// parser tree and a node of the compiled tree. The type can change in
/// place (see the `to_*` conversions) and the payload follows the type.
///
/// Nodes are created through [`Node::new`] and manipulated through
/// [`NodePtr`] handles. All the state uses interior mutability so a tree
/// can be edited through shared handles.
///
/// # Examples
///
/// ```
/// use node::{Node, NodeType};
///
/// let list = Node::new(NodeType::DirectiveList);
/// let number = Node::new(NodeType::Int64);
/// number.set_int64(42.into()).unwrap();
/// list.append_child(&number).unwrap();
///
/// assert_eq!(list.get_children_size(), 1);
/// assert!(std::rc::Rc::ptr_eq(&number.get_parent().unwrap(), &list));
/// ```
pub struct Node {
    pub(crate) node_type: Cell<NodeType>,
    pub(crate) payload: RefCell<Payload>,
    pub(crate) position: RefCell<Position>,
    pub(crate) flags: Cell<u64>,
    pub(crate) attributes: Cell<u64>,
    pub(crate) switch_operator: Cell<NodeType>,
    pub(crate) lock: Cell<u32>,

    pub(crate) param_depth: RefCell<Vec<i64>>,
    pub(crate) param_index: RefCell<Vec<usize>>,

    pub(crate) parent: RefCell<Weak<Node>>,
    pub(crate) offset: Cell<usize>,
    pub(crate) children: RefCell<Vec<NodePtr>>,

    pub(crate) links: [RefCell<Weak<Node>>; 4],
    pub(crate) attribute_node: RefCell<Option<NodePtr>>,
    pub(crate) variables: RefCell<Vec<NodePtr>>,
    pub(crate) labels: RefCell<BTreeMap<String, NodePtr>>,
}

impl Node {
    /// Create a node of the given type.
    pub fn new(node_type: NodeType) -> NodePtr {
        Self::with_position(node_type, Position::default())
    }

    /// Create a node of the given type at the given position.
    pub fn with_position(node_type: NodeType, position: Position) -> NodePtr {
        Rc::new(Node {
            node_type: Cell::new(node_type),
            payload: RefCell::new(Payload::for_type(node_type)),
            position: RefCell::new(position),
            flags: Cell::new(0),
            attributes: Cell::new(0),
            switch_operator: Cell::new(NodeType::Unknown),
            lock: Cell::new(0),
            param_depth: RefCell::new(Vec::new()),
            param_index: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            offset: Cell::new(0),
            children: RefCell::new(Vec::new()),
            links: Default::default(),
            attribute_node: RefCell::new(None),
            variables: RefCell::new(Vec::new()),
            labels: RefCell::new(BTreeMap::new()),
        })
    }

    /// Create a node from the numeric value of its type.
    pub fn from_raw(value: i32) -> Result<NodePtr, NodeError> {
        Ok(Self::new(NodeType::from_raw(value)?))
    }

    /// Create a node of type `node_type` at the same position as this one.
    ///
    /// Used by the optimizer to replace a subtree with its result.
    pub fn create_replacement(&self, node_type: NodeType) -> NodePtr {
        Self::with_position(node_type, self.get_position())
    }

    /// Copy a literal node, without its tree links.
    ///
    /// Only INT64, FLOAT64, STRING, TRUE, FALSE, NULL and UNDEFINED nodes
    /// can be cloned.
    pub fn clone_basic_node(&self) -> Result<NodePtr, NodeError> {
        let node_type = self.get_type();
        if !node_type.is_literal() {
            return Err(self.incompatible("clone_basic_node()"));
        }
        let copy = Self::with_position(node_type, self.get_position());
        *copy.payload.borrow_mut() = self.payload.borrow().clone();
        copy.flags.set(self.flags.get());
        copy.attributes.set(self.attributes.get());
        Ok(copy)
    }

    /// Current type of the node.
    pub fn get_type(&self) -> NodeType {
        self.node_type.get()
    }

    /// Uppercase name of the current type.
    pub fn get_type_name(&self) -> &'static str {
        self.get_type().type_name()
    }

    pub(crate) fn incompatible(&self, operation: &'static str) -> NodeError {
        NodeError::IncompatibleNodeType {
            operation,
            node_type: self.get_type(),
        }
    }

    /// Change the type and reset the payload to match it.
    pub(crate) fn change_type(&self, node_type: NodeType, payload: Payload) {
        trace!(from = %self.get_type(), to = %node_type, "node type changed");
        self.node_type.set(node_type);
        *self.payload.borrow_mut() = payload;
    }

    /// Whether the node is INT64 or FLOAT64.
    pub fn is_number(&self) -> bool {
        self.get_type().is_number()
    }

    /// Whether the node would become NaN once converted to a number.
    pub fn is_nan(&self) -> bool {
        match self.get_type() {
            NodeType::Float64 => self.float_payload().is_nan(),
            NodeType::Undefined => true,
            NodeType::String => core_types::string_to_number(&self.string_payload()).is_nan(),
            _ => false,
        }
    }

    /// Whether the node is an INT64.
    pub fn is_int64(&self) -> bool {
        self.get_type() == NodeType::Int64
    }

    /// Whether the node is a FLOAT64.
    pub fn is_float64(&self) -> bool {
        self.get_type() == NodeType::Float64
    }

    /// Whether the node is TRUE or FALSE.
    pub fn is_boolean(&self) -> bool {
        self.get_type().is_boolean()
    }

    /// Whether the node is TRUE.
    pub fn is_true(&self) -> bool {
        self.get_type() == NodeType::True
    }

    /// Whether the node is FALSE.
    pub fn is_false(&self) -> bool {
        self.get_type() == NodeType::False
    }

    /// Whether the node is NULL.
    pub fn is_null(&self) -> bool {
        self.get_type() == NodeType::Null
    }

    /// Whether the node is UNDEFINED.
    pub fn is_undefined(&self) -> bool {
        self.get_type() == NodeType::Undefined
    }

    /// Whether the node is a STRING.
    pub fn is_string(&self) -> bool {
        self.get_type() == NodeType::String
    }

    /// Whether the node is an IDENTIFIER or a VIDENTIFIER.
    pub fn is_identifier(&self) -> bool {
        matches!(self.get_type(), NodeType::Identifier | NodeType::Videntifier)
    }

    /// Whether the node is a literal (number, string, boolean, null or undefined).
    pub fn is_literal(&self) -> bool {
        self.get_type().is_literal()
    }

    /// Whether evaluating this node may have an effect other than
    /// computing a value.
    pub fn has_side_effects(&self) -> bool {
        self.get_type().has_side_effects()
            || self
                .children
                .borrow()
                .iter()
                .any(|child| child.has_side_effects())
    }

    // payload

    pub(crate) fn int_payload(&self) -> Int64 {
        match &*self.payload.borrow() {
            Payload::Int64(i) => *i,
            _ => Int64::default(),
        }
    }

    pub(crate) fn float_payload(&self) -> Float64 {
        match &*self.payload.borrow() {
            Payload::Float64(f) => *f,
            _ => Float64::default(),
        }
    }

    pub(crate) fn string_payload(&self) -> String {
        match &*self.payload.borrow() {
            Payload::String(s) => s.clone(),
            _ => String::new(),
        }
    }

    /// Value of an INT64 node.
    pub fn get_int64(&self) -> Result<Int64, NodeError> {
        match &*self.payload.borrow() {
            Payload::Int64(i) => Ok(*i),
            _ => Err(self.incompatible("get_int64()")),
        }
    }

    /// Change the value of an INT64 node.
    pub fn set_int64(&self, value: Int64) -> Result<(), NodeError> {
        if self.get_type() != NodeType::Int64 {
            return Err(self.incompatible("set_int64()"));
        }
        if !value.is_valid() {
            return Err(NodeError::InvalidData("INT64"));
        }
        *self.payload.borrow_mut() = Payload::Int64(value);
        Ok(())
    }

    /// Value of a FLOAT64 node.
    pub fn get_float64(&self) -> Result<Float64, NodeError> {
        match &*self.payload.borrow() {
            Payload::Float64(f) => Ok(*f),
            _ => Err(self.incompatible("get_float64()")),
        }
    }

    /// Change the value of a FLOAT64 node.
    pub fn set_float64(&self, value: Float64) -> Result<(), NodeError> {
        if self.get_type() != NodeType::Float64 {
            return Err(self.incompatible("set_float64()"));
        }
        if !value.is_valid() {
            return Err(NodeError::InvalidData("FLOAT64"));
        }
        *self.payload.borrow_mut() = Payload::Float64(value);
        Ok(())
    }

    /// String of a node carrying a string (STRING, IDENTIFIER, FUNCTION, ...).
    pub fn get_string(&self) -> Result<String, NodeError> {
        match &*self.payload.borrow() {
            Payload::String(s) => Ok(s.clone()),
            _ => Err(self.incompatible("get_string()")),
        }
    }

    /// Change the string of a node carrying a string.
    pub fn set_string(&self, value: impl Into<String>) -> Result<(), NodeError> {
        if !self.get_type().has_string_payload() {
            return Err(self.incompatible("set_string()"));
        }
        *self.payload.borrow_mut() = Payload::String(value.into());
        Ok(())
    }

    /// Value of a TRUE or FALSE node.
    pub fn get_boolean(&self) -> Result<bool, NodeError> {
        match self.get_type() {
            NodeType::True => Ok(true),
            NodeType::False => Ok(false),
            _ => Err(self.incompatible("get_boolean()")),
        }
    }

    /// Switch a TRUE or FALSE node to the other boolean type.
    pub fn set_boolean(&self, value: bool) -> Result<(), NodeError> {
        if !self.is_boolean() {
            return Err(self.incompatible("set_boolean()"));
        }
        let node_type = if value {
            NodeType::True
        } else {
            NodeType::False
        };
        self.change_type(node_type, Payload::None);
        Ok(())
    }

    // position

    /// Copy of the position of the node.
    pub fn get_position(&self) -> Position {
        self.position.borrow().clone()
    }

    /// Change the position of the node.
    pub fn set_position(&self, position: Position) {
        *self.position.borrow_mut() = position;
    }

    // switch operator

    /// Comparison operator of a SWITCH node (UNKNOWN by default).
    pub fn get_switch_operator(&self) -> Result<NodeType, NodeError> {
        if self.get_type() != NodeType::Switch {
            return Err(self.incompatible("get_switch_operator()"));
        }
        Ok(self.switch_operator.get())
    }

    /// Change the comparison operator of a SWITCH node.
    pub fn set_switch_operator(&self, operator: NodeType) -> Result<(), NodeError> {
        if self.get_type() != NodeType::Switch {
            return Err(self.incompatible("set_switch_operator()"));
        }
        if !operator.is_switch_operator() {
            return Err(NodeError::InternalError(
                "set_switch_operator() called with an operator which is not supported",
            ));
        }
        self.switch_operator.set(operator);
        Ok(())
    }

    // parameter matching

    /// Allocate the depth and index arrays of a PARAM_MATCH node.
    ///
    /// Can only be called once and `size` must not be zero.
    pub fn set_param_size(&self, size: usize) -> Result<(), NodeError> {
        if self.get_type() != NodeType::ParamMatch {
            return Err(self.incompatible("set_param_size()"));
        }
        if !self.param_depth.borrow().is_empty() {
            return Err(NodeError::InternalError("set_param_size() called twice"));
        }
        if size == 0 {
            return Err(NodeError::InternalError(
                "set_param_size() was called with a size of zero",
            ));
        }
        *self.param_depth.borrow_mut() = vec![0; size];
        *self.param_index.borrow_mut() = vec![0; size];
        Ok(())
    }

    /// Number of parameters of a PARAM_MATCH node (0 until allocated).
    pub fn get_param_size(&self) -> usize {
        self.param_depth.borrow().len()
    }

    fn check_param_index(&self, index: usize) -> Result<(), NodeError> {
        let size = self.get_param_size();
        if index >= size {
            return Err(NodeError::IndexOutOfRange {
                index: index as i64,
                size,
            });
        }
        Ok(())
    }

    /// Depth of the type match of parameter `index`.
    pub fn get_param_depth(&self, index: usize) -> Result<i64, NodeError> {
        self.check_param_index(index)?;
        Ok(self.param_depth.borrow()[index])
    }

    /// Save the depth of the type match of parameter `index`.
    pub fn set_param_depth(&self, index: usize, depth: i64) -> Result<(), NodeError> {
        self.check_param_index(index)?;
        self.param_depth.borrow_mut()[index] = depth;
        Ok(())
    }

    /// Which argument parameter `index` is matched with.
    pub fn get_param_index(&self, index: usize) -> Result<usize, NodeError> {
        self.check_param_index(index)?;
        Ok(self.param_index.borrow()[index])
    }

    /// Match parameter `index` with argument `position`; both must be
    /// smaller than the parameter size.
    pub fn set_param_index(&self, index: usize, position: usize) -> Result<(), NodeError> {
        self.check_param_index(index)?;
        self.check_param_index(position)?;
        self.param_index.borrow_mut()[index] = position;
        Ok(())
    }

    // links

    fn set_link(&self, link: Link, node: Option<&NodePtr>) -> Result<(), NodeError> {
        self.modifying()?;
        *self.links[link as usize].borrow_mut() = node.map(Rc::downgrade).unwrap_or_default();
        Ok(())
    }

    fn get_link(&self, link: Link) -> Option<NodePtr> {
        self.links[link as usize].borrow().upgrade()
    }

    /// Link to the definition this node is an instance of.
    pub fn set_instance(&self, node: Option<&NodePtr>) -> Result<(), NodeError> {
        self.set_link(Link::Instance, node)
    }

    /// The instance, if it is still alive.
    pub fn get_instance(&self) -> Option<NodePtr> {
        self.get_link(Link::Instance)
    }

    /// Link to the node defining the type of this node.
    pub fn set_type_node(&self, node: Option<&NodePtr>) -> Result<(), NodeError> {
        self.set_link(Link::Type, node)
    }

    /// The type node, if it is still alive.
    pub fn get_type_node(&self) -> Option<NodePtr> {
        self.get_link(Link::Type)
    }

    /// Link to the frame a GOTO enters.
    pub fn set_goto_enter(&self, node: Option<&NodePtr>) -> Result<(), NodeError> {
        self.set_link(Link::GotoEnter, node)
    }

    /// The frame a GOTO enters, if it is still alive.
    pub fn get_goto_enter(&self) -> Option<NodePtr> {
        self.get_link(Link::GotoEnter)
    }

    /// Link to the frame a GOTO exits.
    pub fn set_goto_exit(&self, node: Option<&NodePtr>) -> Result<(), NodeError> {
        self.set_link(Link::GotoExit, node)
    }

    /// The frame a GOTO exits, if it is still alive.
    pub fn get_goto_exit(&self) -> Option<NodePtr> {
        self.get_link(Link::GotoExit)
    }

    /// Attach an ATTRIBUTES node; this link owns the node.
    pub fn set_attribute_node(&self, node: Option<NodePtr>) -> Result<(), NodeError> {
        self.modifying()?;
        if let Some(attributes) = &node {
            if attributes.get_type() != NodeType::Attributes {
                return Err(attributes.incompatible("set_attribute_node()"));
            }
        }
        *self.attribute_node.borrow_mut() = node;
        Ok(())
    }

    /// The ATTRIBUTES node, if any.
    pub fn get_attribute_node(&self) -> Option<NodePtr> {
        self.attribute_node.borrow().clone()
    }

    // variables

    /// Add a VARIABLE to the list of variables defined in this scope.
    pub fn add_variable(&self, variable: NodePtr) -> Result<(), NodeError> {
        if variable.get_type() != NodeType::Variable {
            return Err(variable.incompatible("add_variable()"));
        }
        self.variables.borrow_mut().push(variable);
        Ok(())
    }

    /// Number of variables added with [`Node::add_variable`].
    pub fn get_variable_size(&self) -> usize {
        self.variables.borrow().len()
    }

    /// Variable at `index`.
    pub fn get_variable(&self, index: usize) -> Result<NodePtr, NodeError> {
        let variables = self.variables.borrow();
        variables
            .get(index)
            .cloned()
            .ok_or(NodeError::IndexOutOfRange {
                index: index as i64,
                size: variables.len(),
            })
    }

    // labels

    /// Add a LABEL to a FUNCTION; label names are unique per function.
    pub fn add_label(&self, label: NodePtr) -> Result<(), NodeError> {
        if label.get_type() != NodeType::Label || self.get_type() != NodeType::Function {
            return Err(self.incompatible("add_label()"));
        }
        let name = label.string_payload();
        let mut labels = self.labels.borrow_mut();
        if labels.contains_key(&name) {
            return Err(NodeError::DuplicateLabel(name));
        }
        labels.insert(name, label);
        Ok(())
    }

    /// Search a label by name.
    pub fn find_label(&self, name: &str) -> Option<NodePtr> {
        self.labels.borrow().get(name).cloned()
    }

    // locking

    /// Fail with [`NodeError::Locked`] if the node is locked.
    pub(crate) fn modifying(&self) -> Result<(), NodeError> {
        if self.is_locked() {
            return Err(NodeError::Locked(self.get_type()));
        }
        Ok(())
    }

    /// Whether the node is currently locked.
    pub fn is_locked(&self) -> bool {
        self.lock.get() > 0
    }

    /// Prevent modifications of the node; calls can be nested.
    pub fn lock(&self) {
        self.lock.set(self.lock.get() + 1);
    }

    /// Release one [`Node::lock`].
    pub fn unlock(&self) -> Result<(), NodeError> {
        let count = self.lock.get();
        if count == 0 {
            return Err(NodeError::InternalError(
                "unlock() called more times than lock()",
            ));
        }
        self.lock.set(count - 1);
        Ok(())
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.lock.get() > 0 && !std::thread::panicking() {
            panic!(
                "a {} node was destroyed while still locked",
                self.node_type.get()
            );
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.get_type())
            .field("payload", &*self.payload.borrow())
            .field("position", &*self.position.borrow())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}
