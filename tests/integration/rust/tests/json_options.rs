//! JSON Integration Tests
//!
//! Reads option files with the JSON reader and uses them to drive the
//! parser.

use core_types::{ErrCode, MessageCollector, Options};
use integration_tests::parse_program;
use json::{JsonReader, JsonType};

fn read_options(text: &str) -> Options {
    let mut sink = MessageCollector::new();
    let value = JsonReader::with_filename("options.json")
        .parse(text, &mut sink)
        .unwrap();
    assert!(sink.messages().is_empty());
    serde_json::from_value(value.to_serde().unwrap()).unwrap()
}

/// Test: options read through the JSON reader match Options::from_json
#[test]
fn test_options_from_reader() {
    let text = r#"{"allow_with": true, "extended_operators": true}"#;
    let options = read_options(text);
    assert_eq!(options, Options::from_json(text).unwrap());
    assert!(options.allow_with);
    assert!(!options.strict);
}

/// Test: options change what the parser accepts
#[test]
fn test_options_drive_the_parser() {
    let source = "with (o) x = a ** 2;";
    let (_, messages) = parse_program(source, Options::default());
    assert!(messages.iter().any(|m| m.code == ErrCode::NotAllowed));

    let options = read_options(r#"{"allow_with": true, "extended_operators": true}"#);
    let (program, messages) = parse_program(source, options);
    assert!(messages.is_empty(), "{:?}", messages);
    let with = program.get_child(0).unwrap().get_child(0).unwrap();
    assert_eq!(with.get_type(), node::NodeType::With);
}

/// Test: diagnostics carry the file name given to the reader
#[test]
fn test_reader_messages_name_the_file() {
    let mut sink = MessageCollector::new();
    let value = JsonReader::with_filename("broken.json").parse("{\"a\": }", &mut sink);
    assert!(value.is_none());
    let messages = sink.take();
    assert_eq!(messages[0].code, ErrCode::UnexpectedToken);
    assert_eq!(messages[0].position.filename(), "broken.json");
    assert_eq!(messages[1].code, ErrCode::CannotCompile);
}

/// Test: a document survives reading, writing and reading again
#[test]
fn test_document_round_trip() {
    let text = r#"{"name":"demo","parts":[{"id":1},{"id":2.5}],"valid":true}"#;
    let mut sink = MessageCollector::new();
    let value = JsonReader::new().parse(text, &mut sink).unwrap();
    assert_eq!(value.get_type(), JsonType::Object);
    let written = value.to_string().unwrap();
    assert_eq!(written, text);
    let again = JsonReader::new().parse(&written, &mut sink).unwrap();
    assert_eq!(again.to_serde().unwrap(), value.to_serde().unwrap());
}
