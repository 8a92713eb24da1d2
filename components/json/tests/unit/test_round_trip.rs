//! Reading, editing and writing JSON documents.

use core_types::{Float64, MessageCollector, Position};
use json::{JsonObject, JsonReader, JsonType, JsonValue};

fn read(text: &str) -> JsonValue {
    let mut sink = MessageCollector::new();
    let value = JsonReader::new().parse(text, &mut sink);
    assert!(sink.messages().is_empty(), "{:?}", sink.messages());
    value.unwrap()
}

#[test]
fn test_written_text_reads_back_identically() {
    let text = r#"{"a":[1,2.5,"three",null,true,false],"b":{"c":-7,"d":""},"e":[]}"#;
    let value = read(text);
    assert_eq!(value.to_string().unwrap(), text);
    assert_eq!(read(&value.to_string().unwrap()).to_string().unwrap(), text);
}

#[test]
fn test_escaped_strings_survive() {
    let value = JsonValue::string(Position::default(), "tab\there \"quoted\" back\\slash");
    let text = value.to_string().unwrap();
    assert_eq!(read(&text).get_string().unwrap(), value.get_string().unwrap());
}

#[test]
fn test_edit_a_loaded_document() {
    let document = read(r#"{"list": [1, 2]}"#);
    let list = document.get_object().unwrap()["list"].clone();
    list.set_item(2, JsonValue::float64(Position::default(), Float64::new(0.25)))
        .unwrap();

    let extra = JsonValue::object(Position::default(), JsonObject::new());
    document.set_member("extra", extra).unwrap();
    assert_eq!(
        document.to_string().unwrap(),
        r#"{"extra":{},"list":[1,2,0.25]}"#
    );
}

#[test]
fn test_serde_agrees_with_the_reader() {
    let text = r#"{"name": "as2js", "sizes": [1, 2, 3], "ratio": 0.75, "flag": false}"#;
    let ours = read(text).to_serde().unwrap();
    let theirs: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(ours, theirs);

    let back = JsonValue::from_serde(&theirs);
    assert_eq!(back.get_type(), JsonType::Object);
    assert_eq!(back.to_string().unwrap(), read(text).to_string().unwrap());
}
