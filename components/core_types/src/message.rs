//! Diagnostic messages reported by the lexer, the parser and the JSON reader.
//!
//! The tree nodes never report user errors themselves. Producers build a
//! [`Message`] and hand it to a [`Messenger`], which filters it by level,
//! keeps the warning/error counters and forwards it to a [`MessageSink`].

use std::fmt;

use crate::Position;

/// Severity of a message; lower values are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MessageLevel {
    /// Never emitted
    Off = 0,
    /// Unrecoverable error
    Fatal = 1,
    /// Error; the output will not be usable
    Error = 2,
    /// Probable mistake
    Warning = 3,
    /// Informational
    Info = 4,
    /// Debug output
    Debug = 5,
    /// Very verbose debug output
    Trace = 6,
}

impl MessageLevel {
    /// Word used when rendering a message.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageLevel::Off => "off",
            MessageLevel::Fatal => "fatal",
            MessageLevel::Error => "error",
            MessageLevel::Warning => "warning",
            MessageLevel::Info => "info",
            MessageLevel::Debug => "debug",
            MessageLevel::Trace => "trace",
        }
    }
}

macro_rules! err_codes {
    ($($variant:ident => $name:literal,)*) => {
        /// Code identifying the kind of a diagnostic.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrCode {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl ErrCode {
            /// Uppercase name of the code, i.e. `INVALID_KEYWORD`.
            pub fn name(self) -> &'static str {
                match self {
                    $(ErrCode::$variant => $name,)*
                }
            }

            /// Find a code by its uppercase name.
            pub fn from_name(name: &str) -> Option<ErrCode> {
                match name {
                    $($name => Some(ErrCode::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

err_codes! {
    None => "NONE",
    CannotCompile => "CANNOT_COMPILE",
    CaseLabel => "CASE_LABEL",
    ColonExpected => "COLON_EXPECTED",
    CommaExpected => "COMMA_EXPECTED",
    CurvlyBracketsExpected => "CURVLY_BRACKETS_EXPECTED",
    DefaultLabel => "DEFAULT_LABEL",
    InternalError => "INTERNAL_ERROR",
    InvalidAttributes => "INVALID_ATTRIBUTES",
    InvalidCatch => "INVALID_CATCH",
    InvalidDo => "INVALID_DO",
    InvalidExpression => "INVALID_EXPRESSION",
    InvalidFunction => "INVALID_FUNCTION",
    InvalidGoto => "INVALID_GOTO",
    InvalidKeyword => "INVALID_KEYWORD",
    InvalidLabel => "INVALID_LABEL",
    InvalidNumber => "INVALID_NUMBER",
    InvalidOperator => "INVALID_OPERATOR",
    InvalidPackageName => "INVALID_PACKAGE_NAME",
    InvalidParameters => "INVALID_PARAMETERS",
    InvalidTry => "INVALID_TRY",
    InvalidUnicodeEscapeSequence => "INVALID_UNICODE_ESCAPE_SEQUENCE",
    InvalidVariable => "INVALID_VARIABLE",
    NotAllowed => "NOT_ALLOWED",
    ObjectMemberDefinedTwice => "OBJECT_MEMBER_DEFINED_TWICE",
    ParenthesisExpected => "PARENTHESIS_EXPECTED",
    SemicolonExpected => "SEMICOLON_EXPECTED",
    SquareBracketsExpected => "SQUARE_BRACKETS_EXPECTED",
    StringExpected => "STRING_EXPECTED",
    UnexpectedEof => "UNEXPECTED_EOF",
    UnexpectedPunctuation => "UNEXPECTED_PUNCTUATION",
    UnexpectedToken => "UNEXPECTED_TOKEN",
    UnknownEscapeSequence => "UNKNOWN_ESCAPE_SEQUENCE",
    UnterminatedString => "UNTERMINATED_STRING",
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity
    pub level: MessageLevel,
    /// Kind of problem
    pub code: ErrCode,
    /// Where the problem was found
    pub position: Position,
    /// Human readable description
    pub text: String,
}

impl Message {
    /// Create a message.
    pub fn new(
        level: MessageLevel,
        code: ErrCode,
        position: Position,
        text: impl Into<String>,
    ) -> Self {
        Message {
            level,
            code,
            position,
            text: text.into(),
        }
    }

    /// Shorthand for an error level message.
    pub fn error(code: ErrCode, position: Position, text: impl Into<String>) -> Self {
        Message::new(MessageLevel::Error, code, position, text)
    }

    /// Shorthand for a warning level message.
    pub fn warning(code: ErrCode, position: Position, text: impl Into<String>) -> Self {
        Message::new(MessageLevel::Warning, code, position, text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.level.as_str(), self.position, self.text)
    }
}

/// Receiver of the messages that pass the level filter.
pub trait MessageSink {
    /// Handle one message.
    fn output(&mut self, message: &Message);
}

/// A sink that keeps every message it receives.
#[derive(Debug, Default, Clone)]
pub struct MessageCollector {
    messages: Vec<Message>,
}

impl MessageCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The messages received so far, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Remove and return all the messages.
    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

impl MessageSink for MessageCollector {
    fn output(&mut self, message: &Message) {
        self.messages.push(message.clone());
    }
}

/// Filters messages by level and counts warnings and errors.
///
/// Errors and fatal errors always go through, whatever the configured
/// level; empty messages and messages at level `Off` are dropped.
///
/// # Examples
///
/// ```
/// use core_types::{ErrCode, Message, MessageCollector, MessageLevel, Messenger, Position};
///
/// let mut collector = MessageCollector::new();
/// let mut messenger = Messenger::new(&mut collector);
/// messenger.emit(Message::error(ErrCode::InvalidKeyword, Position::default(), "oops"));
/// messenger.emit(Message::new(MessageLevel::Debug, ErrCode::None, Position::default(), "hidden"));
/// assert_eq!(messenger.error_count(), 1);
/// drop(messenger);
/// assert_eq!(collector.messages().len(), 1);
/// ```
pub struct Messenger<'a> {
    sink: &'a mut dyn MessageSink,
    level: MessageLevel,
    warning_count: usize,
    error_count: usize,
}

impl<'a> Messenger<'a> {
    /// Create a messenger forwarding to `sink` at the `Info` level.
    pub fn new(sink: &'a mut dyn MessageSink) -> Self {
        Messenger {
            sink,
            level: MessageLevel::Info,
            warning_count: 0,
            error_count: 0,
        }
    }

    /// Change the most verbose level forwarded to the sink.
    pub fn set_level(&mut self, level: MessageLevel) {
        self.level = level;
    }

    /// The configured level.
    pub fn level(&self) -> MessageLevel {
        self.level
    }

    /// Whether a message at `level` would reach the sink.
    pub fn accepts(&self, level: MessageLevel) -> bool {
        level != MessageLevel::Off && level <= self.level.max(MessageLevel::Error)
    }

    /// Send a message through the filter.
    pub fn emit(&mut self, message: Message) {
        if message.text.is_empty() || !self.accepts(message.level) {
            return;
        }
        match message.level {
            MessageLevel::Fatal | MessageLevel::Error => self.error_count += 1,
            MessageLevel::Warning => self.warning_count += 1,
            _ => {}
        }
        self.sink.output(&message);
    }

    /// Number of warnings forwarded so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Number of errors (fatal included) forwarded so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

impl fmt::Debug for Messenger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messenger")
            .field("level", &self.level)
            .field("warning_count", &self.warning_count)
            .field("error_count", &self.error_count)
            .finish()
    }
}
