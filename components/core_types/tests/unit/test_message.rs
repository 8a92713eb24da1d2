//! Unit tests for the message channel

use core_types::{ErrCode, Message, MessageCollector, MessageLevel, MessageSink, Messenger, Position};

struct CountingSink {
    calls: usize,
}

impl MessageSink for CountingSink {
    fn output(&mut self, _message: &Message) {
        self.calls += 1;
    }
}

#[test]
fn test_custom_sink_receives_messages() {
    let mut sink = CountingSink { calls: 0 };
    {
        let mut messenger = Messenger::new(&mut sink);
        messenger.emit(Message::error(ErrCode::UnexpectedToken, Position::default(), "a"));
        messenger.emit(Message::warning(ErrCode::UnexpectedToken, Position::default(), "b"));
    }
    assert_eq!(sink.calls, 2);
}

#[test]
fn test_errors_pass_with_level_off() {
    let mut collector = MessageCollector::new();
    {
        let mut messenger = Messenger::new(&mut collector);
        messenger.set_level(MessageLevel::Off);
        messenger.emit(Message::warning(ErrCode::None, Position::default(), "dropped"));
        messenger.emit(Message::error(ErrCode::None, Position::default(), "kept"));
        assert_eq!(messenger.warning_count(), 0);
        assert_eq!(messenger.error_count(), 1);
    }
    assert_eq!(collector.messages().len(), 1);
    assert_eq!(collector.messages()[0].text, "kept");
}

#[test]
fn test_message_keeps_position() {
    let mut pos = Position::new("file.js");
    pos.set_function("unknown-func");
    pos.new_line();

    let mut collector = MessageCollector::new();
    {
        let mut messenger = Messenger::new(&mut collector);
        messenger.emit(Message::error(ErrCode::InvalidKeyword, pos.clone(), "bad"));
    }
    let messages = collector.take();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].position, pos);
    assert_eq!(messages[0].position.line(), 2);
    assert_eq!(messages[0].code, ErrCode::InvalidKeyword);
    assert!(collector.messages().is_empty());
}
