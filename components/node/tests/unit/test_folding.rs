//! Unit tests for constant folding helpers

use core_types::CompareResult;
use node::{compare, operator_to_string, string_to_operator, CompareMode, Node, NodeType};

#[test]
fn test_fold_string_to_number_and_back() {
    for (text, expected) in [
        ("", "0"),
        ("0", "0"),
        ("42", "42"),
        ("-3.25", "-3.25"),
        ("1e21", "1e+21"),
        ("Infinity", "Infinity"),
        ("-Infinity", "-Infinity"),
        ("abc", "NaN"),
    ] {
        let node = Node::new(NodeType::String);
        node.set_string(text).unwrap();
        assert!(node.to_number().unwrap());
        assert!(node.to_string().unwrap());
        assert_eq!(node.get_string().unwrap(), expected, "input {:?}", text);
    }
}

#[test]
fn test_fold_condition() {
    for (node_type, expected) in [
        (NodeType::True, NodeType::True),
        (NodeType::Null, NodeType::False),
        (NodeType::Undefined, NodeType::Undefined),
        (NodeType::Identifier, NodeType::Undefined),
    ] {
        let node = Node::new(node_type);
        assert_eq!(node.to_boolean_type_only(), expected);
        assert_eq!(node.get_type(), node_type);
    }
}

#[test]
fn test_fold_equality() {
    let lhs = Node::new(NodeType::Int64);
    lhs.set_int64(10.into()).unwrap();
    let rhs = Node::new(NodeType::String);
    rhs.set_string("10").unwrap();

    assert_eq!(compare(&lhs, &rhs, CompareMode::Loose), CompareResult::Equal);
    assert_eq!(compare(&lhs, &rhs, CompareMode::Strict), CompareResult::Unordered);
}

#[test]
fn test_operator_names() {
    assert_eq!(operator_to_string(NodeType::ShiftRightUnsigned), Some(">>>"));
    assert_eq!(string_to_operator("**="), NodeType::AssignmentPower);
    assert_eq!(string_to_operator("<>"), NodeType::NotEqual);
}
