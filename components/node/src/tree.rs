//! Tree manipulation: parent, children and cleanup.
//!
//! A child is owned by its parent's children vector and keeps a weak
//! reference back to the parent. Each child also caches its offset in
//! that vector, which is renumbered whenever the vector changes.

use std::rc::Rc;

use tracing::debug;

use crate::{Node, NodeError, NodePtr, NodeType};

/// Whether a node of type `node_type` is allowed to have children.
fn can_have_children(node_type: NodeType) -> bool {
    !matches!(
        node_type,
        NodeType::Abstract
            | NodeType::Auto
            | NodeType::Boolean
            | NodeType::Break
            | NodeType::Byte
            | NodeType::Char
            | NodeType::CloseCurvlyBracket
            | NodeType::CloseParenthesis
            | NodeType::CloseSquareBracket
            | NodeType::Colon
            | NodeType::Comma
            | NodeType::Const
            | NodeType::Continue
            | NodeType::Default
            | NodeType::Double
            | NodeType::Else
            | NodeType::Empty
            | NodeType::Eof
            | NodeType::False
            | NodeType::Final
            | NodeType::Float
            | NodeType::Float64
            | NodeType::Goto
            | NodeType::Identifier
            | NodeType::Inline
            | NodeType::Int64
            | NodeType::Long
            | NodeType::Native
            | NodeType::Null
            | NodeType::OpenCurvlyBracket
            | NodeType::OpenParenthesis
            | NodeType::OpenSquareBracket
            | NodeType::Private
            | NodeType::Protected
            | NodeType::Public
            | NodeType::RegularExpression
            | NodeType::Rest
            | NodeType::Semicolon
            | NodeType::Short
            | NodeType::Static
            | NodeType::String
            | NodeType::This
            | NodeType::Transient
            | NodeType::True
            | NodeType::Undefined
            | NodeType::Videntifier
            | NodeType::Void
            | NodeType::Volatile
    )
}

/// Whether a node of type `node_type` can be inserted in a tree at all.
fn can_be_child(node_type: NodeType) -> bool {
    !matches!(
        node_type,
        NodeType::CloseCurvlyBracket
            | NodeType::CloseParenthesis
            | NodeType::CloseSquareBracket
            | NodeType::Colon
            | NodeType::Comma
            | NodeType::Else
            | NodeType::Eof
            | NodeType::OpenCurvlyBracket
            | NodeType::OpenParenthesis
            | NodeType::OpenSquareBracket
            | NodeType::Root
            | NodeType::Semicolon
    )
}

fn check_pairing(parent: NodeType, child: NodeType) -> Result<(), NodeError> {
    if can_have_children(parent) && can_be_child(child) {
        Ok(())
    } else {
        Err(NodeError::InvalidChild { parent, child })
    }
}

impl Node {
    /// The parent of this node, if any.
    pub fn get_parent(&self) -> Option<NodePtr> {
        self.parent.borrow().upgrade()
    }

    /// Number of children.
    pub fn get_children_size(&self) -> usize {
        self.children.borrow().len()
    }

    /// Child at `index`.
    pub fn get_child(&self, index: usize) -> Result<NodePtr, NodeError> {
        let children = self.children.borrow();
        children
            .get(index)
            .cloned()
            .ok_or(NodeError::IndexOutOfRange {
                index: index as i64,
                size: children.len(),
            })
    }

    /// Position of this node in its parent's list of children.
    pub fn get_offset(&self) -> Result<usize, NodeError> {
        if self.get_parent().is_none() {
            return Err(NodeError::NoParent(self.get_type()));
        }
        Ok(self.offset.get())
    }

    /// First child of type `node_type`.
    pub fn find_first_child(&self, node_type: NodeType) -> Option<NodePtr> {
        self.children
            .borrow()
            .iter()
            .find(|child| child.get_type() == node_type)
            .cloned()
    }

    /// Next child of type `node_type` after `sibling`.
    ///
    /// With `None`, or a node which is not a child of this node, the
    /// search starts at the first child.
    pub fn find_next_child(&self, sibling: Option<&NodePtr>, node_type: NodeType) -> Option<NodePtr> {
        let children = self.children.borrow();
        let start = sibling
            .and_then(|s| children.iter().position(|child| Rc::ptr_eq(child, s)))
            .map_or(0, |index| index + 1);
        children[start..]
            .iter()
            .find(|child| child.get_type() == node_type)
            .cloned()
    }

    fn renumber_children(&self, from: usize) {
        for (index, child) in self.children.borrow().iter().enumerate().skip(from) {
            child.offset.set(index);
        }
    }

    /// Move this node under `parent` at `index` (or at the end), after
    /// removing it from its current parent. `None` only detaches it.
    ///
    /// Nothing changes when an error is returned.
    pub fn set_parent(
        self: &Rc<Self>,
        parent: Option<&NodePtr>,
        index: Option<usize>,
    ) -> Result<(), NodeError> {
        let current = self.get_parent();

        if let Some(new_parent) = parent {
            if let Some(old_parent) = &current {
                if index.is_none() && Rc::ptr_eq(old_parent, new_parent) {
                    return Ok(());
                }
            }

            check_pairing(new_parent.get_type(), self.get_type())?;
            new_parent.modifying()?;

            let mut ancestor = Some(new_parent.clone());
            while let Some(node) = ancestor {
                if Rc::ptr_eq(&node, self) {
                    return Err(NodeError::InternalError(
                        "a node cannot become a child of one of its descendants",
                    ));
                }
                ancestor = node.get_parent();
            }

            if let Some(index) = index {
                let mut size = new_parent.get_children_size();
                if current.as_ref().is_some_and(|old| Rc::ptr_eq(old, new_parent)) {
                    size -= 1;
                }
                if index > size {
                    return Err(NodeError::IndexOutOfRange {
                        index: index as i64,
                        size,
                    });
                }
            }
        }

        if let Some(old_parent) = &current {
            old_parent.modifying()?;
            let offset = self.offset.get();
            old_parent.children.borrow_mut().remove(offset);
            old_parent.renumber_children(offset);
            *self.parent.borrow_mut() = Default::default();
        }

        if let Some(new_parent) = parent {
            let at = {
                let mut children = new_parent.children.borrow_mut();
                let at = index.unwrap_or(children.len());
                children.insert(at, self.clone());
                at
            };
            *self.parent.borrow_mut() = Rc::downgrade(new_parent);
            new_parent.renumber_children(at);
        }

        Ok(())
    }

    /// Add `child` at the end of the list of children.
    pub fn append_child(self: &Rc<Self>, child: &NodePtr) -> Result<(), NodeError> {
        child.set_parent(Some(self), None)
    }

    /// Insert `child` before the child at `index`; -1 appends.
    pub fn insert_child(self: &Rc<Self>, index: i64, child: &NodePtr) -> Result<(), NodeError> {
        if index == -1 {
            return self.append_child(child);
        }
        let size = self.get_children_size();
        if index < 0 || index as usize > size {
            return Err(NodeError::IndexOutOfRange { index, size });
        }
        child.set_parent(Some(self), Some(index as usize))
    }

    /// Replace the child at `index` with `child`.
    ///
    /// Replacing a child with itself does nothing.
    pub fn set_child(self: &Rc<Self>, index: usize, child: &NodePtr) -> Result<(), NodeError> {
        let current = self.get_child(index)?;
        if Rc::ptr_eq(&current, child) {
            return Ok(());
        }
        check_pairing(self.get_type(), child.get_type())?;
        self.modifying()?;
        if let Some(old_parent) = child.get_parent() {
            old_parent.modifying()?;
        }
        if Rc::ptr_eq(child, self) || child.is_ancestor_of(self) {
            return Err(NodeError::InternalError(
                "a node cannot become a child of one of its descendants",
            ));
        }

        let mut target = index;
        if let Some(old_parent) = child.get_parent() {
            if Rc::ptr_eq(&old_parent, self) && child.offset.get() < index {
                target -= 1;
            }
        }

        self.delete_child(index)?;
        child.set_parent(Some(self), Some(target))
    }

    /// Remove the child at `index`; the child keeps living as long as
    /// another handle references it.
    pub fn delete_child(&self, index: usize) -> Result<(), NodeError> {
        let child = self.get_child(index)?;
        self.modifying()?;
        self.children.borrow_mut().remove(index);
        *child.parent.borrow_mut() = Default::default();
        self.renumber_children(index);
        Ok(())
    }

    /// Put `node` in place of this node in its parent.
    pub fn replace_with(self: &Rc<Self>, node: &NodePtr) -> Result<(), NodeError> {
        let parent = self
            .get_parent()
            .ok_or(NodeError::NoParent(self.get_type()))?;
        parent.set_child(self.offset.get(), node)
    }

    fn is_ancestor_of(&self, node: &Node) -> bool {
        let mut ancestor = node.get_parent();
        while let Some(current) = ancestor {
            if std::ptr::eq(Rc::as_ptr(&current), self) {
                return true;
            }
            ancestor = current.get_parent();
        }
        false
    }

    fn find_locked(&self) -> Option<NodeType> {
        if self.is_locked() {
            return Some(self.get_type());
        }
        self.children
            .borrow()
            .iter()
            .find_map(|child| child.find_locked())
    }

    /// Remove all the UNKNOWN nodes found in this tree.
    ///
    /// Nodes are marked UNKNOWN by [`Node::to_unknown`] when an optimization
    /// made them useless. The tree is left untouched if any of its nodes
    /// is locked.
    pub fn clean_tree(&self) -> Result<(), NodeError> {
        if let Some(node_type) = self.find_locked() {
            return Err(NodeError::Locked(node_type));
        }
        self.remove_unknown_children();
        Ok(())
    }

    fn remove_unknown_children(&self) {
        let mut index = self.get_children_size();
        while index > 0 {
            index -= 1;
            let child = self.children.borrow()[index].clone();
            if child.get_type() == NodeType::Unknown {
                debug!(offset = index, parent = %self.get_type(), "removing unknown node");
                self.children.borrow_mut().remove(index);
                *child.parent.borrow_mut() = Default::default();
            } else {
                child.remove_unknown_children();
            }
        }
        self.renumber_children(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_twenty_children() {
        let list = Node::new(NodeType::DirectiveList);
        let mut inserted = Vec::new();
        for _ in 0..20 {
            let child = Node::new(NodeType::DirectiveList);
            list.append_child(&child).unwrap();
            inserted.push(child);
        }
        assert_eq!(list.get_children_size(), 20);
        for (index, child) in inserted.iter().enumerate() {
            assert_eq!(child.get_offset().unwrap(), index);
            assert!(Rc::ptr_eq(&list.get_child(index).unwrap(), child));
            assert!(Rc::ptr_eq(&child.get_parent().unwrap(), &list));
        }
        assert!(list.get_child(20).is_err());
    }

    #[test]
    fn test_offset_without_parent() {
        let node = Node::new(NodeType::Add);
        assert_eq!(node.get_offset(), Err(NodeError::NoParent(NodeType::Add)));
    }

    #[test]
    fn test_insert_child_positions() {
        let list = Node::new(NodeType::List);
        let a = Node::new(NodeType::Int64);
        let b = Node::new(NodeType::Int64);
        let c = Node::new(NodeType::Int64);
        list.insert_child(-1, &a).unwrap();
        list.insert_child(0, &b).unwrap();
        list.insert_child(1, &c).unwrap();
        assert!(Rc::ptr_eq(&list.get_child(0).unwrap(), &b));
        assert!(Rc::ptr_eq(&list.get_child(1).unwrap(), &c));
        assert!(Rc::ptr_eq(&list.get_child(2).unwrap(), &a));
        assert_eq!(a.get_offset().unwrap(), 2);

        let d = Node::new(NodeType::Int64);
        assert!(list.insert_child(4, &d).is_err());
        assert!(list.insert_child(-2, &d).is_err());
        assert!(d.get_parent().is_none());
    }

    #[test]
    fn test_invalid_pairings_leave_tree_unchanged() {
        let literal = Node::new(NodeType::Int64);
        assert!(literal.append_child(&Node::new(NodeType::Add)).is_err());

        let list = Node::new(NodeType::DirectiveList);
        for t in [NodeType::Comma, NodeType::Root, NodeType::Eof, NodeType::Else] {
            let child = Node::new(t);
            assert!(matches!(
                list.append_child(&child),
                Err(NodeError::InvalidChild { .. })
            ));
            assert!(child.get_parent().is_none());
        }
        assert_eq!(list.get_children_size(), 0);
    }

    #[test]
    fn test_set_parent_moves_node() {
        let first = Node::new(NodeType::DirectiveList);
        let second = Node::new(NodeType::DirectiveList);
        let child = Node::new(NodeType::Identifier);
        let other = Node::new(NodeType::Identifier);
        first.append_child(&other).unwrap();
        first.append_child(&child).unwrap();

        child.set_parent(Some(&second), None).unwrap();
        assert_eq!(first.get_children_size(), 1);
        assert_eq!(second.get_children_size(), 1);
        assert!(Rc::ptr_eq(&child.get_parent().unwrap(), &second));

        child.set_parent(None, None).unwrap();
        assert!(child.get_parent().is_none());
        assert_eq!(second.get_children_size(), 0);
    }

    #[test]
    fn test_no_cycles() {
        let top = Node::new(NodeType::DirectiveList);
        let middle = Node::new(NodeType::DirectiveList);
        top.append_child(&middle).unwrap();
        assert!(middle.append_child(&top).is_err());
        assert!(top.append_child(&top).is_err());
    }

    #[test]
    fn test_set_child_and_delete_child() {
        let call = Node::new(NodeType::Call);
        let a = Node::new(NodeType::Identifier);
        let b = Node::new(NodeType::List);
        call.append_child(&a).unwrap();
        call.append_child(&b).unwrap();

        call.set_child(0, &a).unwrap();
        assert_eq!(call.get_children_size(), 2);

        let c = Node::new(NodeType::Member);
        call.set_child(0, &c).unwrap();
        assert!(a.get_parent().is_none());
        assert!(Rc::ptr_eq(&call.get_child(0).unwrap(), &c));
        assert_eq!(b.get_offset().unwrap(), 1);
        assert!(call.set_child(2, &a).is_err());

        call.delete_child(0).unwrap();
        assert!(c.get_parent().is_none());
        assert_eq!(b.get_offset().unwrap(), 0);
        assert!(call.delete_child(1).is_err());
    }

    #[test]
    fn test_replace_with() {
        let add = Node::new(NodeType::Add);
        let left = Node::new(NodeType::Int64);
        let right = Node::new(NodeType::Int64);
        add.append_child(&left).unwrap();
        add.append_child(&right).unwrap();

        let result = Node::new(NodeType::Float64);
        right.replace_with(&result).unwrap();
        assert!(Rc::ptr_eq(&add.get_child(1).unwrap(), &result));
        assert!(right.get_parent().is_none());
        assert!(matches!(
            right.replace_with(&left),
            Err(NodeError::NoParent(_))
        ));
    }

    #[test]
    fn test_find_children() {
        let list = Node::new(NodeType::DirectiveList);
        let var1 = Node::new(NodeType::Var);
        let func = Node::new(NodeType::Function);
        let var2 = Node::new(NodeType::Var);
        for child in [&var1, &func, &var2] {
            list.append_child(child).unwrap();
        }
        assert!(Rc::ptr_eq(&list.find_first_child(NodeType::Var).unwrap(), &var1));
        let next = list.find_next_child(Some(&var1), NodeType::Var).unwrap();
        assert!(Rc::ptr_eq(&next, &var2));
        assert!(list.find_next_child(Some(&var2), NodeType::Var).is_none());
        assert!(list.find_first_child(NodeType::Class).is_none());
    }

    #[test]
    fn test_locked_parent_rejects_changes() {
        let list = Node::new(NodeType::DirectiveList);
        let child = Node::new(NodeType::Var);
        list.append_child(&child).unwrap();
        list.lock();
        assert!(matches!(
            list.append_child(&Node::new(NodeType::Var)),
            Err(NodeError::Locked(_))
        ));
        assert!(list.delete_child(0).is_err());
        assert!(child.set_parent(None, None).is_err());
        list.unlock().unwrap();
        list.delete_child(0).unwrap();
    }

    #[test]
    fn test_clean_tree() {
        let root = Node::new(NodeType::Root);
        let list = Node::new(NodeType::DirectiveList);
        root.append_child(&list).unwrap();
        let keep = Node::new(NodeType::Var);
        let dead = Node::new(NodeType::Var);
        let nested = Node::new(NodeType::Variable);
        list.append_child(&dead).unwrap();
        list.append_child(&keep).unwrap();
        keep.append_child(&nested).unwrap();

        dead.to_unknown().unwrap();
        nested.to_unknown().unwrap();

        keep.lock();
        assert_eq!(root.clean_tree(), Err(NodeError::Locked(NodeType::Var)));
        assert_eq!(list.get_children_size(), 2);
        keep.unlock().unwrap();

        root.clean_tree().unwrap();
        assert_eq!(list.get_children_size(), 1);
        assert_eq!(keep.get_offset().unwrap(), 0);
        assert_eq!(keep.get_children_size(), 0);
        assert!(dead.get_parent().is_none());
    }
}
