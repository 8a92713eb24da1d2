//! Parser to Node Integration Tests
//!
//! Parses complete programs and checks the resulting trees through the
//! node API and the tree dump.

use core_types::{ErrCode, MessageLevel, Options};
use integration_tests::{dump, parse_program};
use node::NodeType;

/// Test: an empty program has no children
#[test]
fn test_empty_program() {
    let (program, messages) = parse_program("", Options::default());
    assert!(messages.is_empty());
    assert_eq!(dump(&program), "02.  1102: PROGRAM (:1:)");
}

/// Test: semicolons only give one empty directive list
#[test]
fn test_semicolons_only() {
    let (program, messages) = parse_program(";;;;", Options::default());
    assert!(messages.is_empty());
    assert_eq!(
        dump(&program),
        "02.  1102: PROGRAM (:1:)\n\
         03-   1043: DIRECTIVE_LIST: (:1:)"
    );
}

/// Test: "else" alone is reported and dropped
#[test]
fn test_else_alone() {
    let (program, messages) = parse_program("else", Options::default());
    assert_eq!(program.get_children_size(), 1);
    let list = program.get_child(0).unwrap();
    assert_eq!(list.get_type(), NodeType::DirectiveList);
    assert_eq!(list.get_children_size(), 0);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, MessageLevel::Error);
    assert_eq!(messages[0].code, ErrCode::InvalidKeyword);
    assert_eq!(messages[0].position.line(), 1);
    assert_eq!(
        messages[0].text,
        "'else' not expected without an 'if' keyword."
    );
}

/// Test: a closing bracket without an opening one
#[test]
fn test_stray_closing_bracket() {
    let (_, messages) = parse_program("}", Options::default());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, ErrCode::CurvlyBracketsExpected);
}

/// Test: a package with an empty body
#[test]
fn test_empty_package() {
    let (program, messages) = parse_program("package name { }", Options::default());
    assert!(messages.is_empty());
    assert_eq!(
        dump(&program),
        "02.  1102: PROGRAM (:1:)\n\
         03-   1043: DIRECTIVE_LIST: (:1:)\n\
         04-    1094: PACKAGE: 'name' (:1:)\n\
         05-     1043: DIRECTIVE_LIST: (:1:)"
    );
}

/// Test: every node knows its parent and offset
#[test]
fn test_parent_links_of_a_parsed_tree() {
    let (program, _) = parse_program(
        "function f(a) { if (a) return 1; else return 2; }",
        Options::default(),
    );

    fn check(node: &node::NodePtr) {
        for index in 0..node.get_children_size() {
            let child = node.get_child(index).unwrap();
            let parent = child.get_parent().unwrap();
            assert!(std::rc::Rc::ptr_eq(&parent, node));
            assert_eq!(child.get_offset().unwrap(), index);
            check(&child);
        }
    }
    check(&program);
}

/// Test: positions follow the lines of the source
#[test]
fn test_positions_in_the_dump() {
    let (program, _) = parse_program("var a;\n\nvar b;", Options::default());
    let list = program.get_child(0).unwrap();
    assert_eq!(list.get_child(0).unwrap().get_position().line(), 1);
    assert_eq!(list.get_child(1).unwrap().get_position().line(), 3);
    assert!(dump(&program).contains("1139: VARIABLE: 'b' (:3:)"));
}
