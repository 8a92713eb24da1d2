//! Error reporting and recovery.

use core_types::{ErrCode, Message, MessageCollector, MessageLevel, Options};
use node::{NodePtr, NodeType};
use parser::Parser;

fn parse(source: &str) -> (NodePtr, Vec<Message>) {
    let mut sink = MessageCollector::new();
    let program = Parser::new(source, Options::default()).parse(&mut sink);
    (program, sink.take())
}

fn codes(messages: &[Message]) -> Vec<ErrCode> {
    messages.iter().map(|message| message.code).collect()
}

#[test]
fn test_errors_do_not_stop_the_parser() {
    let (program, messages) = parse("else;\nvar ;\nok();");
    assert_eq!(
        codes(&messages),
        [ErrCode::InvalidKeyword, ErrCode::InvalidVariable]
    );
    assert_eq!(messages[1].position.line(), 2);
    let list = program.get_child(0).unwrap();
    let last = list.get_child(list.get_children_size() - 1).unwrap();
    assert_eq!(last.get_type(), NodeType::Call);
}

#[test]
fn test_every_message_is_an_error() {
    let (_, messages) = parse("} ) ]");
    assert!(!messages.is_empty());
    assert!(messages
        .iter()
        .all(|message| message.level == MessageLevel::Error));
}

#[test]
fn test_unterminated_string_in_directive() {
    let (program, messages) = parse("a = 'open");
    assert_eq!(messages[0].code, ErrCode::UnterminatedString);
    assert_eq!(program.get_type(), NodeType::Program);
}

#[test]
fn test_catch_without_try() {
    let (program, messages) = parse("catch (e) { }");
    assert_eq!(codes(&messages), [ErrCode::InvalidTry]);
    let list = program.get_child(0).unwrap();
    assert_eq!(list.get_child(0).unwrap().get_type(), NodeType::Catch);
}

#[test]
fn test_default_parameter_after_rest() {
    let (_, messages) = parse("function f(...a = 1) {}");
    assert_eq!(codes(&messages), [ErrCode::InvalidParameters]);
}

#[test]
fn test_for_each_requires_in() {
    let (_, messages) = parse("for each (i = 0; i < 3; i++) ;");
    assert_eq!(codes(&messages), [ErrCode::ParenthesisExpected]);
}

#[test]
fn test_case_without_colon() {
    let (_, messages) = parse("switch (a) { case 1 x(); default }");
    assert_eq!(
        codes(&messages),
        [ErrCode::CaseLabel, ErrCode::DefaultLabel]
    );
}
