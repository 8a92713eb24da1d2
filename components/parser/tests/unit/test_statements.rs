//! Shapes of the trees built for complete programs.

use core_types::{MessageCollector, Options};
use node::{Flag, NodePtr, NodeType};
use parser::Parser;

fn parse(source: &str) -> NodePtr {
    let mut sink = MessageCollector::new();
    let program = Parser::new(source, Options::default()).parse(&mut sink);
    assert!(sink.messages().is_empty(), "{:?}", sink.messages());
    program
}

fn types(node: &NodePtr) -> Vec<NodeType> {
    (0..node.get_children_size())
        .map(|i| node.get_child(i).unwrap().get_type())
        .collect()
}

#[test]
fn test_package_with_empty_body() {
    let program = parse("package name { }");
    assert_eq!(types(&program), [NodeType::DirectiveList]);
    let package = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(package.get_type(), NodeType::Package);
    assert_eq!(package.get_string().unwrap(), "name");
    assert_eq!(types(&package), [NodeType::DirectiveList]);
    assert_eq!(package.get_child(0).unwrap().get_children_size(), 0);
}

#[test]
fn test_nested_functions() {
    let program = parse(
        "function outer(n) {\n\
             function inner(m: Number): Number { return m * 2; }\n\
             return inner(n) + 1;\n\
         }",
    );
    let outer = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(outer.get_string().unwrap(), "outer");
    let body = outer.get_child(1).unwrap();
    assert_eq!(types(&body), [NodeType::Function, NodeType::Return]);

    let inner = body.get_child(0).unwrap();
    assert_eq!(inner.get_position().line(), 2);
    let returned = body.get_child(1).unwrap().get_child(0).unwrap();
    assert_eq!(returned.get_type(), NodeType::Add);
    assert_eq!(returned.get_child(0).unwrap().get_type(), NodeType::Call);
}

#[test]
fn test_parameter_modifiers() {
    let program = parse("function f(const in a, out b, named unchecked c) {}");
    let function = program.get_child(0).unwrap().get_child(0).unwrap();
    assert!(function.get_flag(Flag::FunctionFlagOut).unwrap());

    let parameters = function.get_child(0).unwrap();
    let a = parameters.get_child(0).unwrap();
    assert!(a.get_flag(Flag::ParamFlagConst).unwrap());
    assert!(a.get_flag(Flag::ParamFlagIn).unwrap());
    let b = parameters.get_child(1).unwrap();
    assert!(b.get_flag(Flag::ParamFlagOut).unwrap());
    let c = parameters.get_child(2).unwrap();
    assert!(c.get_flag(Flag::ParamFlagNamed).unwrap());
    assert!(c.get_flag(Flag::ParamFlagUnchecked).unwrap());
    assert_eq!(c.get_string().unwrap(), "c");
}

#[test]
fn test_unprototyped_parameters() {
    let program = parse("function f(unprototyped) {}");
    let function = program.get_child(0).unwrap().get_child(0).unwrap();
    let param = function.get_child(0).unwrap().get_child(0).unwrap();
    assert!(param.get_flag(Flag::ParamFlagUnprototyped).unwrap());
}

#[test]
fn test_else_if_chain() {
    let program = parse("if (a) x(); else if (b) y(); else z();");
    let first = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(first.get_children_size(), 3);
    let else_part = first.get_child(2).unwrap();
    assert_eq!(types(&else_part), [NodeType::If]);
    assert_eq!(else_part.get_child(0).unwrap().get_children_size(), 3);
}

#[test]
fn test_expression_list_and_assignments() {
    let program = parse("a += 1, b = c = 2;");
    let list = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(types(&list), [NodeType::AssignmentAdd, NodeType::Assignment]);
    let chained = list.get_child(1).unwrap();
    assert_eq!(chained.get_child(1).unwrap().get_type(), NodeType::Assignment);
}

#[test]
fn test_comparison_precedence() {
    let program = parse("a < b == c && d | e;");
    let and = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(and.get_type(), NodeType::LogicalAnd);
    assert_eq!(and.get_child(0).unwrap().get_type(), NodeType::Equal);
    assert_eq!(and.get_child(1).unwrap().get_type(), NodeType::BitwiseOr);
    let equal = and.get_child(0).unwrap();
    assert_eq!(equal.get_child(0).unwrap().get_type(), NodeType::Less);
}

#[test]
fn test_regular_expression_literal() {
    let program = parse("r = `^a+$`;");
    let assignment = program.get_child(0).unwrap().get_child(0).unwrap();
    let regex = assignment.get_child(1).unwrap();
    assert_eq!(regex.get_type(), NodeType::RegularExpression);
    assert_eq!(regex.get_string().unwrap(), "^a+$");
}

#[test]
fn test_scope_and_member() {
    let program = parse("ns::value.field;");
    let member = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(member.get_type(), NodeType::Member);
    assert_eq!(member.get_child(0).unwrap().get_type(), NodeType::Scope);
}

#[test]
fn test_labels_in_blocks() {
    let program = parse("{ outer: while (true) { break outer; } }");
    let block = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(block.get_type(), NodeType::DirectiveList);
    assert_eq!(types(&block), [NodeType::Label, NodeType::While]);
}
