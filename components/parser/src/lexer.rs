//! Lexer - turns source text into token nodes
//!
//! Every token is a [`Node`] carrying the position of its first character.
//! Punctuators use the node type of the operator they represent, keywords
//! use their own node type and literals carry their value.

use core_types::{ErrCode, Float64, Int64, Message, MessageLevel, Messenger, Options, Position};
use node::{Node, NodeError, NodePtr, NodeType};
use tracing::trace;

/// Punctuators, longest first. The flag marks the extended operators.
const PUNCTUATORS: &[(&str, NodeType, bool)] = &[
    (">>>=", NodeType::AssignmentShiftRightUnsigned, false),
    ("...", NodeType::Rest, false),
    ("===", NodeType::StrictlyEqual, false),
    ("!==", NodeType::StrictlyNotEqual, false),
    (">>>", NodeType::ShiftRightUnsigned, false),
    ("<<=", NodeType::AssignmentShiftLeft, false),
    (">>=", NodeType::AssignmentShiftRight, false),
    ("&&=", NodeType::AssignmentLogicalAnd, false),
    ("||=", NodeType::AssignmentLogicalOr, false),
    ("^^=", NodeType::AssignmentLogicalXor, false),
    ("**=", NodeType::AssignmentPower, true),
    ("<?=", NodeType::AssignmentMinimum, true),
    (">?=", NodeType::AssignmentMaximum, true),
    ("<%=", NodeType::AssignmentRotateLeft, true),
    (">%=", NodeType::AssignmentRotateRight, true),
    ("<=>", NodeType::Compare, true),
    ("==", NodeType::Equal, false),
    ("!=", NodeType::NotEqual, false),
    ("<=", NodeType::LessEqual, false),
    (">=", NodeType::GreaterEqual, false),
    ("<<", NodeType::ShiftLeft, false),
    (">>", NodeType::ShiftRight, false),
    ("&&", NodeType::LogicalAnd, false),
    ("||", NodeType::LogicalOr, false),
    ("^^", NodeType::LogicalXor, false),
    ("++", NodeType::Increment, false),
    ("--", NodeType::Decrement, false),
    ("+=", NodeType::AssignmentAdd, false),
    ("-=", NodeType::AssignmentSubtract, false),
    ("*=", NodeType::AssignmentMultiply, false),
    ("/=", NodeType::AssignmentDivide, false),
    ("%=", NodeType::AssignmentModulo, false),
    ("&=", NodeType::AssignmentBitwiseAnd, false),
    ("|=", NodeType::AssignmentBitwiseOr, false),
    ("^=", NodeType::AssignmentBitwiseXor, false),
    ("=>", NodeType::Arrow, false),
    ("::", NodeType::Scope, false),
    ("..", NodeType::Range, false),
    ("**", NodeType::Power, true),
    ("<>", NodeType::NotEqual, true),
    (":=", NodeType::Assignment, true),
    ("<?", NodeType::Minimum, true),
    (">?", NodeType::Maximum, true),
    ("<%", NodeType::RotateLeft, true),
    (">%", NodeType::RotateRight, true),
    ("~=", NodeType::Match, true),
    ("!~", NodeType::NotMatch, true),
    ("~~", NodeType::SmartMatch, true),
    ("!", NodeType::LogicalNot, false),
    ("%", NodeType::Modulo, false),
    ("&", NodeType::BitwiseAnd, false),
    ("(", NodeType::OpenParenthesis, false),
    (")", NodeType::CloseParenthesis, false),
    ("*", NodeType::Multiply, false),
    ("+", NodeType::Add, false),
    (",", NodeType::Comma, false),
    ("-", NodeType::Subtract, false),
    (".", NodeType::Member, false),
    ("/", NodeType::Divide, false),
    (":", NodeType::Colon, false),
    (";", NodeType::Semicolon, false),
    ("<", NodeType::Less, false),
    ("=", NodeType::Assignment, false),
    (">", NodeType::Greater, false),
    ("?", NodeType::Conditional, false),
    ("[", NodeType::OpenSquareBracket, false),
    ("]", NodeType::CloseSquareBracket, false),
    ("^", NodeType::BitwiseXor, false),
    ("{", NodeType::OpenCurvlyBracket, false),
    ("|", NodeType::BitwiseOr, false),
    ("}", NodeType::CloseCurvlyBracket, false),
    ("~", NodeType::BitwiseNot, false),
];

/// Keyword spelled `name`, if any.
fn keyword(name: &str) -> Option<NodeType> {
    let node_type = match name {
        "abstract" => NodeType::Abstract,
        "as" => NodeType::As,
        "boolean" => NodeType::Boolean,
        "break" => NodeType::Break,
        "byte" => NodeType::Byte,
        "case" => NodeType::Case,
        "catch" => NodeType::Catch,
        "char" => NodeType::Char,
        "class" => NodeType::Class,
        "const" => NodeType::Const,
        "continue" => NodeType::Continue,
        "debugger" => NodeType::Debugger,
        "default" => NodeType::Default,
        "delete" => NodeType::Delete,
        "do" => NodeType::Do,
        "double" => NodeType::Double,
        "else" => NodeType::Else,
        "ensure" => NodeType::Ensure,
        "enum" => NodeType::Enum,
        "export" => NodeType::Export,
        "extends" => NodeType::Extends,
        "false" => NodeType::False,
        "final" => NodeType::Final,
        "finally" => NodeType::Finally,
        "float" => NodeType::Float,
        "for" => NodeType::For,
        "function" => NodeType::Function,
        "goto" => NodeType::Goto,
        "if" => NodeType::If,
        "implements" => NodeType::Implements,
        "import" => NodeType::Import,
        "in" => NodeType::In,
        "inline" => NodeType::Inline,
        "instanceof" => NodeType::Instanceof,
        "interface" => NodeType::Interface,
        "invariant" => NodeType::Invariant,
        "is" => NodeType::Is,
        "long" => NodeType::Long,
        "namespace" => NodeType::Namespace,
        "native" => NodeType::Native,
        "new" => NodeType::New,
        "null" => NodeType::Null,
        "package" => NodeType::Package,
        "private" => NodeType::Private,
        "protected" => NodeType::Protected,
        "public" => NodeType::Public,
        "require" => NodeType::Require,
        "return" => NodeType::Return,
        "short" => NodeType::Short,
        "static" => NodeType::Static,
        "super" => NodeType::Super,
        "switch" => NodeType::Switch,
        "synchronized" => NodeType::Synchronized,
        "then" => NodeType::Then,
        "this" => NodeType::This,
        "throw" => NodeType::Throw,
        "throws" => NodeType::Throws,
        "transient" => NodeType::Transient,
        "true" => NodeType::True,
        "try" => NodeType::Try,
        "typeof" => NodeType::Typeof,
        "undefined" => NodeType::Undefined,
        "use" => NodeType::Use,
        "var" => NodeType::Var,
        "void" => NodeType::Void,
        "volatile" => NodeType::Volatile,
        "while" => NodeType::While,
        "with" => NodeType::With,
        "yield" => NodeType::Yield,
        _ => return None,
    };
    Some(node_type)
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || (!c.is_ascii() && c.is_alphanumeric())
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Lexer over one input.
///
/// # Examples
///
/// ```
/// use core_types::{MessageCollector, Messenger, Options};
/// use node::NodeType;
/// use parser::Lexer;
///
/// let mut sink = MessageCollector::new();
/// let mut messenger = Messenger::new(&mut sink);
/// let mut lexer = Lexer::new("a += 3", Options::default());
///
/// assert_eq!(lexer.next_token(&mut messenger).get_type(), NodeType::Identifier);
/// assert_eq!(lexer.next_token(&mut messenger).get_type(), NodeType::AssignmentAdd);
/// assert_eq!(lexer.next_token(&mut messenger).get_int64().unwrap().get(), 3);
/// assert_eq!(lexer.next_token(&mut messenger).get_type(), NodeType::Eof);
/// ```
pub struct Lexer {
    chars: Vec<char>,
    offset: usize,
    position: Position,
    token_position: Position,
    options: Options,
}

impl Lexer {
    /// Create a lexer reading `source`.
    pub fn new(source: &str, options: Options) -> Self {
        Self {
            chars: source.chars().collect(),
            offset: 0,
            position: Position::default(),
            token_position: Position::default(),
            options,
        }
    }

    /// Name of the input, used in positions and by `__FILE__`.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.position.set_filename(filename);
    }

    /// Current reading position.
    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Options this lexer was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Read the next token; EOF once the input is exhausted.
    ///
    /// Problems found in the input are reported through `messenger` and
    /// the lexer carries on with the next character.
    pub fn next_token(&mut self, messenger: &mut Messenger<'_>) -> NodePtr {
        let token = match self.read_token(messenger) {
            Ok(token) => token,
            Err(err) => {
                messenger.emit(Message::new(
                    MessageLevel::Fatal,
                    ErrCode::InternalError,
                    self.token_position.clone(),
                    err.to_string(),
                ));
                self.new_token(NodeType::Eof)
            }
        };
        if self.options.debug_lexer {
            trace!(token = token.get_type_name(), position = %self.token_position, "lexer");
        }
        token
    }

    fn read_token(&mut self, messenger: &mut Messenger<'_>) -> Result<NodePtr, NodeError> {
        loop {
            self.skip_blanks(messenger);
            self.token_position = self.position.clone();

            let c = match self.peek(0) {
                Some(c) => c,
                None => return Ok(self.new_token(NodeType::Eof)),
            };

            if c.is_ascii_digit() || (c == '.' && self.peek(1).map_or(false, |d| d.is_ascii_digit())) {
                return Ok(self.read_number(messenger));
            }
            if is_identifier_start(c) {
                return self.read_identifier();
            }
            match c {
                '"' | '\'' => {
                    self.advance();
                    let text = self.read_string(c, messenger);
                    return self.string_token(NodeType::String, text);
                }
                '`' => {
                    self.advance();
                    let text = self.read_regular_expression(messenger);
                    return self.string_token(NodeType::RegularExpression, text);
                }
                _ => {}
            }

            if let Some(node_type) = self.read_punctuator() {
                return Ok(self.new_token(node_type));
            }

            self.advance();
            self.error(
                messenger,
                ErrCode::UnexpectedPunctuation,
                format!("unexpected punctuation '{}'.", c.escape_default()),
            );
        }
    }

    fn new_token(&self, node_type: NodeType) -> NodePtr {
        Node::with_position(node_type, self.token_position.clone())
    }

    fn string_token(&self, node_type: NodeType, text: String) -> Result<NodePtr, NodeError> {
        let token = self.new_token(node_type);
        token.set_string(text)?;
        Ok(token)
    }

    fn error(&self, messenger: &mut Messenger<'_>, code: ErrCode, text: String) {
        messenger.emit(Message::error(code, self.token_position.clone(), text));
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.offset + ahead).copied()
    }

    /// Consume one character, counting lines and pages.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.offset += 1;
        match c {
            '\r' => {
                if self.peek(0) == Some('\n') {
                    self.offset += 1;
                }
                self.position.new_line();
            }
            '\n' | '\u{2028}' | '\u{2029}' => self.position.new_line(),
            '\u{000C}' => self.position.new_page(),
            _ => {}
        }
        Some(c)
    }

    fn skip_blanks(&mut self, messenger: &mut Messenger<'_>) {
        while let Some(c) = self.peek(0) {
            if c.is_whitespace() || c == '\u{FEFF}' {
                self.advance();
            } else if c == '/' && self.peek(1) == Some('/') {
                while self.peek(0).map_or(false, |c| !is_line_terminator(c)) {
                    self.advance();
                }
            } else if c == '/' && self.peek(1) == Some('*') {
                self.token_position = self.position.clone();
                self.offset += 2;
                loop {
                    match self.advance() {
                        Some('*') if self.peek(0) == Some('/') => {
                            self.offset += 1;
                            break;
                        }
                        Some(_) => {}
                        None => {
                            self.error(
                                messenger,
                                ErrCode::UnexpectedEof,
                                "unterminated multi-line comment.".to_string(),
                            );
                            break;
                        }
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_punctuator(&mut self) -> Option<NodeType> {
        let extended = self.options.extended_operators;
        let (text, node_type, _) = PUNCTUATORS.iter().find(|(text, _, is_extended)| {
            (extended || !is_extended)
                && text
                    .chars()
                    .enumerate()
                    .all(|(i, c)| self.peek(i) == Some(c))
        })?;
        self.offset += text.chars().count();
        Some(*node_type)
    }

    fn read_identifier(&mut self) -> Result<NodePtr, NodeError> {
        let mut name = String::new();
        while let Some(c) = self.peek(0).filter(|c| is_identifier_continue(*c)) {
            name.push(c);
            self.offset += 1;
        }

        match name.as_str() {
            "__FILE__" => {
                let filename = self.position.filename().to_string();
                return self.string_token(NodeType::String, filename);
            }
            "__LINE__" => {
                let token = self.new_token(NodeType::Int64);
                token.set_int64(Int64::new(i64::from(self.token_position.line())))?;
                return Ok(token);
            }
            "Infinity" | "NaN" => {
                let token = self.new_token(NodeType::Float64);
                let mut value = Float64::default();
                if name == "NaN" {
                    value.set_nan();
                } else {
                    value.set_infinity();
                }
                token.set_float64(value)?;
                return Ok(token);
            }
            "goto" if !self.options.extended_statements => {}
            _ => {
                if let Some(node_type) = keyword(&name) {
                    return Ok(self.new_token(node_type));
                }
            }
        }
        self.string_token(NodeType::Identifier, name)
    }

    fn read_digits(&mut self, radix: u32, text: &mut String) {
        while let Some(c) = self.peek(0).filter(|c| c.is_digit(radix)) {
            text.push(c);
            self.offset += 1;
        }
    }

    fn read_number(&mut self, messenger: &mut Messenger<'_>) -> NodePtr {
        let prefix = match (self.peek(0), self.peek(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('b' | 'B')) if self.options.binary => Some(2),
            (Some('0'), Some('0'..='7')) if self.options.octal_enabled() => Some(8),
            _ => None,
        };

        let token = if let Some(radix) = prefix {
            self.offset += if radix == 8 { 1 } else { 2 };
            let mut digits = String::new();
            self.read_digits(radix, &mut digits);
            let token = self.new_token(NodeType::Int64);
            match u64::from_str_radix(&digits, radix) {
                Ok(value) => {
                    // 64 bit patterns such as 0xFFFFFFFFFFFFFFFF are kept as is
                    let _ = token.set_int64(Int64::new(value as i64));
                }
                Err(_) => self.error(
                    messenger,
                    ErrCode::InvalidNumber,
                    "invalid number, expected at least one digit after the base prefix.".to_string(),
                ),
            }
            token
        } else {
            self.read_decimal_number()
        };

        if self.peek(0).map_or(false, is_identifier_continue) {
            self.error(
                messenger,
                ErrCode::InvalidNumber,
                "unexpected letter after a number.".to_string(),
            );
            while self.peek(0).map_or(false, is_identifier_continue) {
                self.offset += 1;
            }
        }
        token
    }

    fn read_decimal_number(&mut self) -> NodePtr {
        let mut text = String::new();
        let mut is_float = false;
        self.read_digits(10, &mut text);

        // `1..5` is a range, not a float
        if self.peek(0) == Some('.') && self.peek(1) != Some('.') {
            is_float = true;
            text.push('.');
            self.offset += 1;
            self.read_digits(10, &mut text);
        }

        if matches!(self.peek(0), Some('e' | 'E')) {
            let sign = matches!(self.peek(1), Some('+' | '-'));
            let digit = self.peek(if sign { 2 } else { 1 });
            if digit.map_or(false, |d| d.is_ascii_digit()) {
                is_float = true;
                text.push('e');
                self.offset += 1;
                if sign {
                    text.extend(self.peek(0));
                    self.offset += 1;
                }
                self.read_digits(10, &mut text);
            }
        }

        if !is_float {
            if let Ok(value) = text.parse::<i64>() {
                let token = self.new_token(NodeType::Int64);
                let _ = token.set_int64(Int64::new(value));
                return token;
            }
        }
        let token = self.new_token(NodeType::Float64);
        let _ = token.set_float64(Float64::new(text.parse::<f64>().unwrap_or(f64::NAN)));
        token
    }

    fn read_hex(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let digit = self.peek(0)?.to_digit(16)?;
            value = value * 16 + digit;
            self.offset += 1;
        }
        Some(value)
    }

    fn read_unicode_escape(&mut self) -> Option<char> {
        if self.peek(0) == Some('{') {
            self.offset += 1;
            let mut value: u32 = 0;
            let mut count = 0;
            while let Some(digit) = self.peek(0).and_then(|c| c.to_digit(16)) {
                value = value.checked_mul(16)?.checked_add(digit)?;
                count += 1;
                self.offset += 1;
            }
            if count == 0 || self.peek(0) != Some('}') {
                return None;
            }
            self.offset += 1;
            char::from_u32(value)
        } else {
            char::from_u32(self.read_hex(4)?)
        }
    }

    fn read_escape(&mut self, messenger: &mut Messenger<'_>, text: &mut String) {
        let c = match self.advance() {
            Some(c) => c,
            None => return,
        };
        let unescaped = match c {
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{000B}',
            '0' if !self.peek(0).map_or(false, |d| d.is_ascii_digit()) => '\0',
            '\\' | '\'' | '"' => c,
            'e' if self.options.extended_escapes_enabled() => '\u{001B}',
            // line continuation
            _ if is_line_terminator(c) => return,
            'x' => match self.read_hex(2).and_then(char::from_u32) {
                Some(c) => c,
                None => {
                    self.error(
                        messenger,
                        ErrCode::InvalidUnicodeEscapeSequence,
                        "invalid \\x escape sequence, expected two hexadecimal digits.".to_string(),
                    );
                    return;
                }
            },
            'u' => match self.read_unicode_escape() {
                Some(c) => c,
                None => {
                    self.error(
                        messenger,
                        ErrCode::InvalidUnicodeEscapeSequence,
                        "invalid \\u escape sequence.".to_string(),
                    );
                    return;
                }
            },
            _ => {
                self.error(
                    messenger,
                    ErrCode::UnknownEscapeSequence,
                    format!("unknown escape letter '{}'.", c.escape_default()),
                );
                c
            }
        };
        text.push(unescaped);
    }

    fn read_string(&mut self, quote: char, messenger: &mut Messenger<'_>) -> String {
        let mut text = String::new();
        loop {
            match self.peek(0) {
                Some(c) if c == quote => {
                    self.offset += 1;
                    return text;
                }
                Some('\\') => {
                    self.offset += 1;
                    self.read_escape(messenger, &mut text);
                }
                Some(c) if !is_line_terminator(c) => {
                    text.push(c);
                    self.offset += 1;
                }
                _ => {
                    self.error(
                        messenger,
                        ErrCode::UnterminatedString,
                        "the last string was not closed before the end of the input or line was reached."
                            .to_string(),
                    );
                    return text;
                }
            }
        }
    }

    fn read_regular_expression(&mut self, messenger: &mut Messenger<'_>) -> String {
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('`') => return text,
                Some(c) => text.push(c),
                None => {
                    self.error(
                        messenger,
                        ErrCode::UnterminatedString,
                        "the last regular expression was not closed before the end of the input was reached."
                            .to_string(),
                    );
                    return text;
                }
            }
        }
    }
}
