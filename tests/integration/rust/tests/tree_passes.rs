//! Parser to Node Pass Integration Tests
//!
//! Runs small compiler passes (constant folding, cleanup, locking) over
//! trees produced by the parser.

use core_types::{CompareResult, Options};
use integration_tests::parse_program;
use node::{compare, CompareMode, NodeError, NodeLock, NodePtr, NodeType};

/// Fold additions of two integers, bottom up.
fn fold_additions(node: &NodePtr) {
    for index in 0..node.get_children_size() {
        fold_additions(&node.get_child(index).unwrap());
    }
    if node.get_type() != NodeType::Add || node.get_children_size() != 2 {
        return;
    }
    let lhs = node.get_child(0).unwrap();
    let rhs = node.get_child(1).unwrap();
    if lhs.is_int64() && rhs.is_int64() {
        let sum = lhs.get_int64().unwrap().get() + rhs.get_int64().unwrap().get();
        let result = node.create_replacement(NodeType::Int64);
        result.set_int64(sum.into()).unwrap();
        node.replace_with(&result).unwrap();
    }
}

/// Test: folding replaces the operator with its result
#[test]
fn test_constant_folding() {
    let (program, messages) = parse_program("x = 1 + 2 + 3;", Options::default());
    assert!(messages.is_empty());
    fold_additions(&program);

    let assignment = program.get_child(0).unwrap().get_child(0).unwrap();
    let value = assignment.get_child(1).unwrap();
    assert_eq!(value.get_type(), NodeType::Int64);
    assert_eq!(value.get_int64().unwrap().get(), 6);
    assert_eq!(value.get_offset().unwrap(), 1);
}

/// Test: comparisons of parsed literals
#[test]
fn test_compare_parsed_literals() {
    let (program, _) = parse_program("'10' == 10.0;", Options::default());
    let equal = program.get_child(0).unwrap().get_child(0).unwrap();
    let lhs = equal.get_child(0).unwrap();
    let rhs = equal.get_child(1).unwrap();
    assert_eq!(compare(&lhs, &rhs, CompareMode::Loose), CompareResult::Equal);
    assert_eq!(compare(&lhs, &rhs, CompareMode::Strict), CompareResult::Unordered);
}

/// Test: coercion of a parsed string literal
#[test]
fn test_coerce_parsed_string() {
    let (program, _) = parse_program("x = '42.5';", Options::default());
    let string = program
        .get_child(0)
        .unwrap()
        .get_child(0)
        .unwrap()
        .get_child(1)
        .unwrap();
    assert!(string.to_number().unwrap());
    assert_eq!(string.get_type(), NodeType::Float64);
    assert_eq!(string.get_float64().unwrap().get(), 42.5);
}

/// Test: unknown nodes are removed by clean_tree
#[test]
fn test_clean_tree_after_marking() {
    let (program, _) = parse_program("a; b; c;", Options::default());
    let list = program.get_child(0).unwrap();
    list.get_child(1).unwrap().to_unknown().unwrap();

    program.clean_tree().unwrap();
    assert_eq!(list.get_children_size(), 2);
    assert_eq!(list.get_child(1).unwrap().get_string().unwrap(), "c");
    assert_eq!(list.get_child(1).unwrap().get_offset().unwrap(), 1);
}

/// Test: a locked directive list rejects changes until released
#[test]
fn test_lock_protects_a_parsed_list() {
    let (program, _) = parse_program("a; b;", Options::default());
    let list = program.get_child(0).unwrap();
    let first = list.get_child(0).unwrap();
    {
        let _lock = NodeLock::new(Some(&list));
        assert_eq!(list.delete_child(0), Err(NodeError::Locked(NodeType::DirectiveList)));
        assert!(program.clean_tree().is_err());
        assert!(first.to_unknown().is_ok());
    }
    program.clean_tree().unwrap();
    assert_eq!(list.get_children_size(), 1);
}
