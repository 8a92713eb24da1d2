//! JSON reader built on the lexer.

use core_types::{ErrCode, Message, MessageLevel, MessageSink, Messenger, Options, Position};
use node::{NodePtr, NodeType};
use parser::Lexer;
use tracing::{debug, instrument, warn};

use crate::{JsonError, JsonObject, JsonValue};

/// Reads JSON text into a [`JsonValue`] tree.
///
/// # Examples
///
/// ```
/// use core_types::MessageCollector;
/// use json::{JsonReader, JsonType};
///
/// let mut sink = MessageCollector::new();
/// let value = JsonReader::new().parse(r#"{"a": [1, -2.5, "x"]}"#, &mut sink).unwrap();
/// assert_eq!(value.get_type(), JsonType::Object);
/// assert_eq!(value.to_string().unwrap(), r#"{"a":[1,-2.5,"x"]}"#);
/// ```
#[derive(Debug, Default, Clone)]
pub struct JsonReader {
    filename: String,
}

impl JsonReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in the positions of the values and in the messages.
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// Read one JSON value from `text`.
    ///
    /// Returns `None` when the input cannot be interpreted; the reasons
    /// were sent to `sink`. Tokens after the value are ignored.
    #[instrument(level = "debug", skip_all, fields(filename = %self.filename))]
    pub fn parse(&self, text: &str, sink: &mut dyn MessageSink) -> Option<JsonValue> {
        let mut lexer = Lexer::new(text, Options::json());
        lexer.set_filename(self.filename.as_str());
        let mut reader = Reader {
            lexer,
            messenger: Messenger::new(sink),
        };

        let value = match reader.value() {
            Ok(value) => value,
            Err(err) => {
                let message = Message::new(
                    MessageLevel::Fatal,
                    ErrCode::InternalError,
                    reader.lexer.get_position().clone(),
                    err.to_string(),
                );
                reader.messenger.emit(message);
                None
            }
        };
        if value.is_none() {
            let message = Message::new(
                MessageLevel::Fatal,
                ErrCode::CannotCompile,
                Position::new(self.filename.as_str()),
                format!("could not interpret this JSON input \"{}\".", self.filename),
            );
            reader.messenger.emit(message);
        }
        debug!(errors = reader.messenger.error_count(), "JSON input read");
        value
    }
}

struct Reader<'m> {
    lexer: Lexer,
    messenger: Messenger<'m>,
}

impl Reader<'_> {
    fn next(&mut self) -> NodePtr {
        self.lexer.next_token(&mut self.messenger)
    }

    fn error(&mut self, code: ErrCode, position: Position, text: impl Into<String>) {
        self.messenger.emit(Message::error(code, position, text));
    }

    fn value(&mut self) -> Result<Option<JsonValue>, JsonError> {
        let token = self.next();
        self.value_from(token)
    }

    /// The value starting with `token`.
    fn value_from(&mut self, token: NodePtr) -> Result<Option<JsonValue>, JsonError> {
        let position = token.get_position();
        Ok(Some(match token.get_type() {
            NodeType::Null => JsonValue::null(position),
            NodeType::True => JsonValue::boolean(position, true),
            NodeType::False => JsonValue::boolean(position, false),
            NodeType::Int64 => JsonValue::int64(position, token.get_int64()?),
            NodeType::Float64 => JsonValue::float64(position, token.get_float64()?),
            NodeType::String => JsonValue::string(position, token.get_string()?),
            NodeType::Subtract => {
                let number = self.next();
                match number.get_type() {
                    NodeType::Int64 => {
                        let value = number.get_int64()?.get().wrapping_neg();
                        JsonValue::int64(position, value.into())
                    }
                    NodeType::Float64 => {
                        let value = -number.get_float64()?.get();
                        JsonValue::float64(position, value.into())
                    }
                    _ => return Ok(self.unexpected(&number)),
                }
            }
            NodeType::OpenSquareBracket => return self.array(position),
            NodeType::OpenCurvlyBracket => return self.object(position),
            NodeType::Eof => {
                self.error(
                    ErrCode::UnexpectedEof,
                    position,
                    "the end of the JSON input was reached while reading a value.",
                );
                return Ok(None);
            }
            _ => return Ok(self.unexpected(&token)),
        }))
    }

    fn unexpected(&mut self, token: &NodePtr) -> Option<JsonValue> {
        self.error(
            ErrCode::UnexpectedToken,
            token.get_position(),
            format!(
                "unexpected token ({}) found in a JSON input stream.",
                token.get_type_name()
            ),
        );
        None
    }

    fn array(&mut self, position: Position) -> Result<Option<JsonValue>, JsonError> {
        let mut items = Vec::new();
        let mut token = self.next();
        if token.get_type() != NodeType::CloseSquareBracket {
            loop {
                let Some(item) = self.value_from(token)? else {
                    return Ok(None);
                };
                items.push(item);

                token = self.next();
                match token.get_type() {
                    NodeType::Comma => token = self.next(),
                    NodeType::CloseSquareBracket => break,
                    NodeType::Eof => {
                        self.error(
                            ErrCode::SquareBracketsExpected,
                            token.get_position(),
                            "expected a ']' to close the JSON array.",
                        );
                        return Ok(None);
                    }
                    _ => {
                        self.error(
                            ErrCode::CommaExpected,
                            token.get_position(),
                            "expected a comma (,) to separate the JSON array items.",
                        );
                        return Ok(None);
                    }
                }
            }
        }
        Ok(Some(JsonValue::array(position, items)))
    }

    fn object(&mut self, position: Position) -> Result<Option<JsonValue>, JsonError> {
        let mut members = JsonObject::new();
        let mut token = self.next();
        if token.get_type() != NodeType::CloseCurvlyBracket {
            loop {
                if token.get_type() != NodeType::String {
                    self.error(
                        ErrCode::StringExpected,
                        token.get_position(),
                        "expected a string as the JSON object member name.",
                    );
                    return Ok(None);
                }
                let name = token.get_string()?;
                let name_position = token.get_position();
                if name.is_empty() {
                    self.messenger.emit(Message::warning(
                        ErrCode::StringExpected,
                        name_position.clone(),
                        "the JSON object member name is an empty string.",
                    ));
                }

                token = self.next();
                if token.get_type() != NodeType::Colon {
                    self.error(
                        ErrCode::ColonExpected,
                        token.get_position(),
                        "expected a colon (:) as the JSON object member name and member value separator.",
                    );
                    return Ok(None);
                }

                let Some(member) = self.value()? else {
                    return Ok(None);
                };
                if members.contains_key(&name) {
                    warn!(name = %name, "duplicate JSON object member ignored");
                    self.error(
                        ErrCode::ObjectMemberDefinedTwice,
                        name_position,
                        format!(
                            "the same object member \"{}\" was defined twice, which is not allowed in JSON.",
                            name
                        ),
                    );
                } else {
                    members.insert(name, member);
                }

                token = self.next();
                match token.get_type() {
                    NodeType::Comma => token = self.next(),
                    NodeType::CloseCurvlyBracket => break,
                    NodeType::Eof => {
                        self.error(
                            ErrCode::CurvlyBracketsExpected,
                            token.get_position(),
                            "expected a '}' to close the JSON object.",
                        );
                        return Ok(None);
                    }
                    _ => {
                        self.error(
                            ErrCode::CommaExpected,
                            token.get_position(),
                            "expected a comma (,) to separate the JSON object members.",
                        );
                        return Ok(None);
                    }
                }
            }
        }
        Ok(Some(JsonValue::object(position, members)))
    }
}
