//! Unit tests walking trees the way a compiler pass does

use node::{Attribute, Node, NodeError, NodeLock, NodePtr, NodeType};

fn identifier(name: &str) -> NodePtr {
    let node = Node::new(NodeType::Identifier);
    node.set_string(name).unwrap();
    node
}

/// DIRECTIVE_LIST { VAR { VARIABLE a }, EMPTY, VAR { VARIABLE b } }
fn sample_tree() -> NodePtr {
    let list = Node::new(NodeType::DirectiveList);
    for name in ["a", "b"] {
        let var = Node::new(NodeType::Var);
        let variable = Node::new(NodeType::Variable);
        variable.set_string(name).unwrap();
        var.append_child(&variable).unwrap();
        list.append_child(&var).unwrap();
        if name == "a" {
            list.append_child(&Node::new(NodeType::Empty)).unwrap();
        }
    }
    list
}

#[test]
fn test_locked_parent_while_visiting_children() {
    let list = sample_tree();
    let _lock = NodeLock::new(Some(&list));
    for index in 0..list.get_children_size() {
        let child = list.get_child(index).unwrap();
        // children stay editable
        child.set_attribute(Attribute::Unused, true).unwrap();
    }
    assert_eq!(list.to_string(), Err(NodeError::Locked(NodeType::DirectiveList)));
    assert!(list.delete_child(0).is_err());
    assert_eq!(list.get_children_size(), 3);
}

#[test]
fn test_mark_then_clean() {
    let list = sample_tree();
    {
        let _lock = NodeLock::new(Some(&list));
        let empty = list.find_first_child(NodeType::Empty).unwrap();
        empty.to_unknown().unwrap();
        assert_eq!(list.clean_tree(), Err(NodeError::Locked(NodeType::DirectiveList)));
    }
    list.clean_tree().unwrap();
    assert_eq!(list.get_children_size(), 2);
    for index in 0..2 {
        let var = list.get_child(index).unwrap();
        assert_eq!(var.get_type(), NodeType::Var);
        assert_eq!(var.get_offset().unwrap(), index);
    }
}

#[test]
fn test_locked_grandchild_blocks_clean_tree() {
    let list = sample_tree();
    let variable = list.get_child(0).unwrap().get_child(0).unwrap();
    variable.lock();
    assert!(matches!(list.clean_tree(), Err(NodeError::Locked(_))));
    variable.unlock().unwrap();
    list.clean_tree().unwrap();
}

#[test]
fn test_find_every_var() {
    let list = sample_tree();
    let mut names = Vec::new();
    let mut current = list.find_first_child(NodeType::Var);
    while let Some(var) = current {
        names.push(var.get_child(0).unwrap().get_string().unwrap());
        current = list.find_next_child(Some(&var), NodeType::Var);
    }
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn test_replace_identifier_with_call() {
    let member = Node::new(NodeType::Member);
    let object = identifier("console");
    let field = identifier("log");
    member.append_child(&object).unwrap();
    member.append_child(&field).unwrap();

    let list = Node::new(NodeType::DirectiveList);
    list.append_child(&member).unwrap();

    assert!(member.to_call().unwrap());
    assert_eq!(member.get_type(), NodeType::Call);

    let replacement = member.create_replacement(NodeType::Undefined);
    member.replace_with(&replacement).unwrap();
    assert!(member.get_parent().is_none());
    assert!(std::rc::Rc::ptr_eq(&list.get_child(0).unwrap(), &replacement));
}
