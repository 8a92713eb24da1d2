//! Recursive descent parser building PROGRAM trees

use core_types::{ErrCode, Message, MessageLevel, MessageSink, Messenger, Options};
use node::{operator_to_string, string_to_operator, Flag, Node, NodeError, NodePtr, NodeType};
use tracing::{debug, instrument};

use crate::lexer::Lexer;

type ParseResult = Result<NodePtr, NodeError>;

/// Parser of one input.
///
/// Syntax errors never stop the parser: they are reported to the
/// [`MessageSink`] given to [`Parser::parse`] and the offending token is
/// skipped. The returned tree is therefore always a PROGRAM node.
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    /// Create a parser reading `source`.
    pub fn new(source: &str, options: Options) -> Self {
        Self {
            lexer: Lexer::new(source, options),
        }
    }

    /// Name of the input, used in the positions of the nodes and messages.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.lexer.set_filename(filename);
    }

    /// Parse the whole input.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{MessageCollector, Options};
    /// use node::NodeType;
    /// use parser::Parser;
    ///
    /// let mut sink = MessageCollector::new();
    /// let program = Parser::new("var a = 3;", Options::default()).parse(&mut sink);
    ///
    /// let list = program.get_child(0).unwrap();
    /// assert_eq!(list.get_type(), NodeType::DirectiveList);
    /// assert_eq!(list.get_child(0).unwrap().get_type(), NodeType::Var);
    /// assert!(sink.messages().is_empty());
    /// ```
    #[instrument(level = "debug", skip_all, fields(filename = %self.lexer.get_position().filename()))]
    pub fn parse(&mut self, sink: &mut dyn MessageSink) -> NodePtr {
        let mut run = Run::new(&mut self.lexer, Messenger::new(sink));
        let program = match run.program() {
            Ok(program) => program,
            Err(err) => {
                let position = run.token.get_position();
                run.messenger.emit(Message::new(
                    MessageLevel::Fatal,
                    ErrCode::InternalError,
                    position.clone(),
                    err.to_string(),
                ));
                Node::with_position(NodeType::Program, position)
            }
        };
        debug!(
            errors = run.messenger.error_count(),
            warnings = run.messenger.warning_count(),
            "program parsed"
        );
        program
    }
}

/// State of one call to [`Parser::parse`].
struct Run<'l, 'm> {
    lexer: &'l mut Lexer,
    messenger: Messenger<'m>,
    token: NodePtr,
    pending: Vec<NodePtr>,
    /// Set while reading the first part of a `for`, where `in` ends the expression
    no_in: bool,
}

const ATTRIBUTE_KEYWORDS: &[NodeType] = &[
    NodeType::Abstract,
    NodeType::Final,
    NodeType::Inline,
    NodeType::Native,
    NodeType::Private,
    NodeType::Protected,
    NodeType::Public,
    NodeType::Static,
    NodeType::Transient,
    NodeType::Volatile,
];

impl<'l, 'm> Run<'l, 'm> {
    fn new(lexer: &'l mut Lexer, mut messenger: Messenger<'m>) -> Self {
        let token = lexer.next_token(&mut messenger);
        Self {
            lexer,
            messenger,
            token,
            pending: Vec::new(),
            no_in: false,
        }
    }

    // tokens

    fn next(&mut self) {
        self.token = match self.pending.pop() {
            Some(token) => token,
            None => self.lexer.next_token(&mut self.messenger),
        };
    }

    /// Type of the token following the current one.
    fn peek(&mut self) -> NodeType {
        if self.pending.is_empty() {
            let token = self.lexer.next_token(&mut self.messenger);
            self.pending.push(token);
        }
        self.pending
            .last()
            .map_or(NodeType::Eof, |token| token.get_type())
    }

    /// Return the current token and move to the next one.
    fn take(&mut self) -> NodePtr {
        let token = self.token.clone();
        self.next();
        token
    }

    fn check(&self, node_type: NodeType) -> bool {
        self.token.get_type() == node_type
    }

    fn check_identifier(&self, name: &str) -> bool {
        self.check(NodeType::Identifier) && self.token.get_string().map_or(false, |s| s == name)
    }

    fn new_node(&self, node_type: NodeType) -> NodePtr {
        Node::with_position(node_type, self.token.get_position())
    }

    fn error(&mut self, code: ErrCode, text: impl Into<String>) {
        let message = Message::error(code, self.token.get_position(), text);
        self.messenger.emit(message);
    }

    fn skip(&mut self) {
        debug!(token = self.token.get_type_name(), "skipping token");
        self.next();
    }

    /// Consume the expected token, or report an error and leave the
    /// current token alone.
    fn expect(&mut self, node_type: NodeType, code: ErrCode, text: &str) -> bool {
        if self.check(node_type) {
            self.next();
            true
        } else {
            self.error(code, text);
            false
        }
    }

    fn at_directive_end(&self) -> bool {
        matches!(
            self.token.get_type(),
            NodeType::Semicolon | NodeType::CloseCurvlyBracket | NodeType::Eof
        )
    }

    /// `;` after a directive; it may be omitted before `}` and at the end.
    fn semicolon(&mut self) {
        match self.token.get_type() {
            NodeType::Semicolon => self.next(),
            NodeType::CloseCurvlyBracket | NodeType::Eof => {}
            _ => {
                self.error(ErrCode::SemicolonExpected, "';' was expected after a directive.");
                self.skip();
            }
        }
    }

    // directives

    fn program(&mut self) -> ParseResult {
        let program = self.new_node(NodeType::Program);
        while !self.check(NodeType::Eof) {
            let list = self.directive_list()?;
            program.append_child(&list)?;
            if self.check(NodeType::CloseCurvlyBracket) {
                self.error(
                    ErrCode::CurvlyBracketsExpected,
                    "'}' not expected without a '{'.",
                );
                self.skip();
            }
        }
        Ok(program)
    }

    /// Directives up to the next `}` or the end of the input.
    fn directive_list(&mut self) -> ParseResult {
        let list = self.new_node(NodeType::DirectiveList);
        while !matches!(
            self.token.get_type(),
            NodeType::Eof | NodeType::CloseCurvlyBracket
        ) {
            if self.check(NodeType::Semicolon) {
                self.next();
                continue;
            }
            let Some(directive) = self.directive()? else {
                continue;
            };
            if matches!(directive.get_type(), NodeType::Catch | NodeType::Finally) {
                let follows_try = list
                    .get_children_size()
                    .checked_sub(1)
                    .and_then(|last| list.get_child(last).ok())
                    .map_or(false, |previous| {
                        matches!(previous.get_type(), NodeType::Try | NodeType::Catch)
                    });
                if !follows_try {
                    let message = Message::error(
                        ErrCode::InvalidTry,
                        directive.get_position(),
                        format!(
                            "'{}' is only permitted right after a 'try' block or another 'catch'.",
                            directive.get_type_name().to_lowercase()
                        ),
                    );
                    self.messenger.emit(message);
                }
            }
            list.append_child(&directive)?;
        }
        Ok(list)
    }

    /// Rest of a `{ ... }` block, the `{` being already consumed.
    fn block(&mut self) -> ParseResult {
        let list = self.directive_list()?;
        self.expect(
            NodeType::CloseCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            "'}' expected to close a block.",
        );
        Ok(list)
    }

    /// Body of a statement such as `if` or `while`, always a DIRECTIVE_LIST.
    fn sub_directive(&mut self) -> ParseResult {
        if self.check(NodeType::OpenCurvlyBracket) {
            self.next();
            return self.block();
        }
        let list = self.new_node(NodeType::DirectiveList);
        match self.token.get_type() {
            NodeType::Semicolon => self.next(),
            NodeType::Else | NodeType::Eof | NodeType::CloseCurvlyBracket => {}
            _ => {
                if let Some(directive) = self.directive()? {
                    list.append_child(&directive)?;
                }
            }
        }
        Ok(list)
    }

    fn attributes(&mut self) -> Result<Option<NodePtr>, NodeError> {
        if !ATTRIBUTE_KEYWORDS.contains(&self.token.get_type()) {
            return Ok(None);
        }
        let attributes = self.new_node(NodeType::Attributes);
        while ATTRIBUTE_KEYWORDS.contains(&self.token.get_type()) {
            let attribute = self.take();
            attributes.append_child(&attribute)?;
        }
        Ok(Some(attributes))
    }

    fn directive(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let attributes = self.attributes()?;
        if attributes.is_some() && self.at_directive_end() {
            self.error(
                ErrCode::InvalidAttributes,
                "attributes must be followed by a directive.",
            );
            return Ok(None);
        }

        let directive = match self.token.get_type() {
            NodeType::OpenCurvlyBracket => {
                self.next();
                Some(self.block()?)
            }
            NodeType::Var | NodeType::Const => Some(self.var_directive()?),
            NodeType::Function => {
                let function = self.function(false)?;
                Some(function)
            }
            NodeType::Package => Some(self.package()?),
            NodeType::Namespace => Some(self.namespace()?),
            NodeType::If => self.if_directive()?,
            NodeType::While | NodeType::With => self.with_while()?,
            NodeType::Do => self.do_directive()?,
            NodeType::For => self.for_directive()?,
            NodeType::Switch => self.switch_directive()?,
            NodeType::Case => Some(self.case_directive()?),
            NodeType::Default => Some(self.default_directive()),
            NodeType::Try | NodeType::Finally => self.try_finally()?,
            NodeType::Catch => self.catch_directive()?,
            NodeType::Return => Some(self.return_directive()?),
            NodeType::Break | NodeType::Continue => Some(self.break_continue()?),
            NodeType::Throw => {
                let node = self.take();
                let expression = self.expression()?;
                node.append_child(&expression)?;
                self.semicolon();
                Some(node)
            }
            NodeType::Goto => Some(self.goto_directive()?),
            NodeType::Use => Some(self.use_directive()?),
            NodeType::Debugger => {
                let node = self.take();
                self.semicolon();
                Some(node)
            }
            NodeType::Identifier if self.peek() == NodeType::Colon => {
                let label = self.take();
                label.to_label()?;
                self.next();
                Some(label)
            }
            NodeType::Else => {
                self.error(
                    ErrCode::InvalidKeyword,
                    "'else' not expected without an 'if' keyword.",
                );
                self.skip();
                None
            }
            NodeType::Class
            | NodeType::Enum
            | NodeType::Export
            | NodeType::Extends
            | NodeType::Implements
            | NodeType::Import
            | NodeType::Interface
            | NodeType::Invariant
            | NodeType::Ensure
            | NodeType::Require
            | NodeType::Synchronized
            | NodeType::Then
            | NodeType::Throws
            | NodeType::Yield => {
                let keyword = self.token.get_type_name().to_lowercase();
                self.error(
                    ErrCode::InvalidKeyword,
                    format!("'{}' is not a valid directive keyword here.", keyword),
                );
                self.skip();
                None
            }
            _ => {
                let expression = self.expression()?;
                self.semicolon();
                Some(expression).filter(|e| e.get_type() != NodeType::Unknown)
            }
        };

        if let Some(attributes) = attributes {
            match &directive {
                Some(directive) => directive.set_attribute_node(Some(attributes))?,
                None => self.error(
                    ErrCode::InvalidAttributes,
                    "attributes must be followed by a directive.",
                ),
            }
        }
        Ok(directive)
    }

    fn var_directive(&mut self) -> ParseResult {
        let constant = self.check(NodeType::Const);
        let keyword = self.take();
        if constant && self.check(NodeType::Var) {
            self.next();
        }
        let var = self.variables(constant, keyword)?;
        self.semicolon();
        Ok(var)
    }

    /// The list of variables of a `var`, the keyword being consumed.
    fn variables(&mut self, constant: bool, keyword: NodePtr) -> ParseResult {
        let var = Node::with_position(NodeType::Var, keyword.get_position());
        loop {
            if !self.check(NodeType::Identifier) {
                self.error(
                    ErrCode::InvalidVariable,
                    format!(
                        "expected a variable name, not token {}.",
                        self.token.get_type_name()
                    ),
                );
                break;
            }
            let variable = self.new_node(NodeType::Variable);
            variable.set_string(self.token.get_string()?)?;
            self.next();
            if constant {
                variable.set_flag(Flag::VariableFlagConst, true)?;
            }

            if self.check(NodeType::Colon) {
                self.next();
                let type_expression = self.conditional()?;
                variable.append_child(&type_expression)?;
            }
            if self.check(NodeType::Assignment) {
                let set = self.new_node(NodeType::Set);
                self.next();
                let initializer = self.assignment()?;
                set.append_child(&initializer)?;
                variable.append_child(&set)?;
            }
            var.append_child(&variable)?;

            if !self.check(NodeType::Comma) {
                break;
            }
            self.next();
        }
        Ok(var)
    }

    fn function(&mut self, expression: bool) -> ParseResult {
        let node = self.take();
        match self.token.get_type() {
            NodeType::Identifier => {
                let name = self.token.get_string()?;
                let etter = match name.as_str() {
                    "get" => Some(("->", Flag::FunctionFlagGetter)),
                    "set" => Some(("<-", Flag::FunctionFlagSetter)),
                    _ => None,
                };
                self.next();
                match etter {
                    Some((prefix, flag))
                        if matches!(
                            self.token.get_type(),
                            NodeType::Identifier | NodeType::String
                        ) =>
                    {
                        let accessed = self.token.get_string()?;
                        if self.check(NodeType::String)
                            && string_to_operator(&accessed) != NodeType::Unknown
                        {
                            self.error(
                                ErrCode::InvalidFunction,
                                "operator override cannot be marked as a getter nor a setter function.",
                            );
                        }
                        node.set_flag(flag, true)?;
                        node.set_string(format!("{}{}", prefix, accessed))?;
                        self.next();
                        if expression {
                            self.error(
                                ErrCode::InvalidFunction,
                                "expression functions cannot be getter nor setter functions.",
                            );
                        }
                    }
                    _ => {
                        node.set_string(name)?;
                        if self.check(NodeType::Identifier) {
                            self.error(
                                ErrCode::InvalidFunction,
                                "only one name is expected for a function (misspelled get or set?).",
                            );
                            self.skip();
                        }
                    }
                }
            }
            NodeType::String => {
                let name = self.token.get_string()?;
                if string_to_operator(&name) != NodeType::Unknown {
                    node.set_flag(Flag::FunctionFlagOperator, true)?;
                }
                node.set_string(name)?;
                self.next();
            }
            operator if operator_to_string(operator).is_some() => {
                if let Some(name) = operator_to_string(operator) {
                    node.set_string(name)?;
                }
                node.set_flag(Flag::FunctionFlagOperator, true)?;
                self.next();
            }
            _ => {
                if !expression {
                    self.error(
                        ErrCode::InvalidFunction,
                        "function declarations are required to be named.",
                    );
                }
            }
        }

        if self.check(NodeType::OpenParenthesis) {
            self.next();
            if !self.check(NodeType::CloseParenthesis) {
                match self.parameter_list()? {
                    Some((parameters, has_out)) => {
                        if has_out {
                            node.set_flag(Flag::FunctionFlagOut, true)?;
                        }
                        node.append_child(&parameters)?;
                    }
                    None => node.set_flag(Flag::FunctionFlagNoparams, true)?,
                }
            }
            self.expect(
                NodeType::CloseParenthesis,
                ErrCode::ParenthesisExpected,
                "')' expected to close the 'function' parameters.",
            );
        }

        if self.check(NodeType::Colon) {
            self.next();
            if self.check(NodeType::Void) || self.check_identifier("Void") {
                node.set_flag(Flag::FunctionFlagVoid, true)?;
                self.next();
            } else if self.check_identifier("Never") {
                node.set_flag(Flag::FunctionFlagNever, true)?;
                self.next();
            } else {
                let return_type = self.conditional()?;
                node.append_child(&return_type)?;
            }
        }

        // no body at all declares an abstract function
        if self.check(NodeType::OpenCurvlyBracket) {
            self.next();
            if !self.check(NodeType::CloseCurvlyBracket) {
                let body = self.directive_list()?;
                node.append_child(&body)?;
            }
            self.expect(
                NodeType::CloseCurvlyBracket,
                ErrCode::CurvlyBracketsExpected,
                "'}' expected to close the 'function' block.",
            );
        }
        Ok(node)
    }

    /// Parameters up to the closing parenthesis (not consumed).
    ///
    /// `None` for `(void)`; the flag tells whether an `out` parameter was found.
    fn parameter_list(&mut self) -> Result<Option<(NodePtr, bool)>, NodeError> {
        if self.check(NodeType::Void) || self.check_identifier("Void") {
            self.next();
            return Ok(None);
        }

        let parameters = self.new_node(NodeType::Parameters);
        if self.check_identifier("unprototyped") {
            let param = self.new_node(NodeType::Param);
            param.set_flag(Flag::ParamFlagUnprototyped, true)?;
            parameters.append_child(&param)?;
            self.next();
            return Ok(Some((parameters, false)));
        }

        let mut has_out = false;
        loop {
            let param = self.new_node(NodeType::Param);
            loop {
                let flag = match self.token.get_type() {
                    NodeType::Rest => Some(Flag::ParamFlagRest),
                    NodeType::Const => Some(Flag::ParamFlagConst),
                    NodeType::In => Some(Flag::ParamFlagIn),
                    NodeType::Var => None,
                    _ if self.check_identifier("out") => Some(Flag::ParamFlagOut),
                    _ if self.check_identifier("named") => Some(Flag::ParamFlagNamed),
                    _ if self.check_identifier("unchecked") => Some(Flag::ParamFlagUnchecked),
                    _ => break,
                };
                if let Some(flag) = flag {
                    param.set_flag(flag, true)?;
                    if flag == Flag::ParamFlagOut {
                        has_out = true;
                    }
                }
                self.next();
            }

            let rest = param.get_flag(Flag::ParamFlagRest)?;
            if param.get_flag(Flag::ParamFlagOut)? {
                if rest {
                    self.error(
                        ErrCode::InvalidParameters,
                        "you cannot use the function parameter attribute 'out' with '...'.",
                    );
                }
                if param.get_flag(Flag::ParamFlagConst)? {
                    self.error(
                        ErrCode::InvalidParameters,
                        "you cannot use the function attributes 'out' and 'const' together.",
                    );
                }
            }

            let mut valid = true;
            if self.check(NodeType::Identifier) {
                param.set_string(self.token.get_string()?)?;
                self.next();
                if self.check(NodeType::Colon) {
                    self.next();
                    let param_type = self.conditional()?;
                    param.append_child(&param_type)?;
                }
                if self.check(NodeType::Assignment) {
                    if rest {
                        self.error(
                            ErrCode::InvalidParameters,
                            "you cannot assign a default value to '...'.",
                        );
                    }
                    let set = self.new_node(NodeType::Set);
                    self.next();
                    let initializer = self.conditional()?;
                    set.append_child(&initializer)?;
                    if !rest {
                        param.append_child(&set)?;
                    }
                }
                parameters.append_child(&param)?;
            } else if rest {
                parameters.append_child(&param)?;
            } else {
                valid = false;
                self.error(
                    ErrCode::InvalidParameters,
                    format!(
                        "expected an identifier as the parameter name (not token {}).",
                        self.token.get_type_name()
                    ),
                );
            }

            match self.token.get_type() {
                NodeType::CloseParenthesis => break,
                NodeType::Comma => {
                    if rest {
                        self.error(
                            ErrCode::InvalidParameters,
                            "no other parameters expected after '...'.",
                        );
                    }
                    self.next();
                }
                NodeType::Eof
                | NodeType::Semicolon
                | NodeType::OpenCurvlyBracket
                | NodeType::CloseCurvlyBracket => break,
                _ => {
                    if valid {
                        self.error(
                            ErrCode::InvalidParameters,
                            "',' or ')' expected after a parameter.",
                        );
                    }
                    self.skip();
                }
            }
        }
        Ok(Some((parameters, has_out)))
    }

    /// `package a.b.c { ... }`; the name is optional.
    fn package(&mut self) -> ParseResult {
        let node = self.take();
        let mut name = String::new();
        if self.check(NodeType::String) {
            name = self.token.get_string()?;
            self.next();
        } else {
            while self.check(NodeType::Identifier) {
                name.push_str(&self.token.get_string()?);
                self.next();
                if !self.check(NodeType::Member) {
                    break;
                }
                name.push('.');
                self.next();
            }
            if name.ends_with('.') {
                self.error(
                    ErrCode::InvalidPackageName,
                    "a package name cannot end with a period.",
                );
                name.pop();
            }
        }
        node.set_string(name)?;

        if self.expect(
            NodeType::OpenCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            "'{' expected after the package name.",
        ) {
            let body = self.block()?;
            node.append_child(&body)?;
        }
        Ok(node)
    }

    fn namespace(&mut self) -> ParseResult {
        let node = self.take();
        if self.check(NodeType::Identifier) {
            node.set_string(self.token.get_string()?)?;
            self.next();
        }
        if self.expect(
            NodeType::OpenCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            "'{' expected after the namespace name.",
        ) {
            let body = self.block()?;
            node.append_child(&body)?;
        }
        Ok(node)
    }

    /// `(expression)` following a statement keyword.
    fn parenthesized(&mut self, node: &NodePtr, keyword: &str) -> Result<bool, NodeError> {
        if !self.check(NodeType::OpenParenthesis) {
            self.error(
                ErrCode::ParenthesisExpected,
                format!("'(' expected after the '{}' keyword.", keyword),
            );
            return Ok(false);
        }
        self.next();
        let expression = self.expression()?;
        node.append_child(&expression)?;
        self.expect(
            NodeType::CloseParenthesis,
            ErrCode::ParenthesisExpected,
            &format!("')' expected to end the '{}' expression.", keyword),
        );
        Ok(true)
    }

    fn if_directive(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let node = self.take();
        if !self.parenthesized(&node, "if")? {
            return Ok(None);
        }
        let then_part = self.sub_directive()?;
        node.append_child(&then_part)?;
        if self.check(NodeType::Else) {
            self.next();
            let else_part = self.sub_directive()?;
            node.append_child(&else_part)?;
        }
        Ok(Some(node))
    }

    fn with_while(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let with = self.check(NodeType::With);
        if with && !self.lexer.options().allow_with {
            self.error(
                ErrCode::NotAllowed,
                "'with' is not allowed; set the allow_with option to accept it.",
            );
        }
        let node = self.take();
        if !self.parenthesized(&node, if with { "with" } else { "while" })? {
            return Ok(None);
        }
        let body = self.sub_directive()?;
        node.append_child(&body)?;
        Ok(Some(node))
    }

    fn do_directive(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let node = self.take();
        let body = self.sub_directive()?;
        node.append_child(&body)?;
        if !self.check(NodeType::While) {
            self.error(
                ErrCode::InvalidDo,
                "'while' expected after the block of a 'do' keyword.",
            );
            return Ok(Some(node));
        }
        self.next();
        self.parenthesized(&node, "while")?;
        self.semicolon();
        Ok(Some(node))
    }

    fn for_directive(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let node = self.take();
        let each = self.check_identifier("each");
        if each {
            self.next();
        }
        if !self.check(NodeType::OpenParenthesis) {
            self.error(
                ErrCode::ParenthesisExpected,
                "'(' expected following the 'for' directive.",
            );
            return Ok(None);
        }
        self.next();

        let no_in = std::mem::replace(&mut self.no_in, true);
        let init = match self.token.get_type() {
            NodeType::Var | NodeType::Const => {
                let constant = self.check(NodeType::Const);
                let keyword = self.take();
                if constant {
                    node.set_flag(Flag::ForFlagConst, true)?;
                    if self.check(NodeType::Var) {
                        self.next();
                    }
                }
                self.variables(constant, keyword)
            }
            NodeType::Semicolon => Ok(self.new_node(NodeType::Empty)),
            _ => self.expression(),
        };
        self.no_in = no_in;
        node.append_child(&init?)?;

        if self.check(NodeType::In) {
            self.next();
            node.set_flag(Flag::ForFlagIn, true)?;
            let enumerated = self.expression()?;
            node.append_child(&enumerated)?;
        } else if self.check(NodeType::Semicolon) {
            self.next();
            let condition = if self.check(NodeType::Semicolon) {
                self.new_node(NodeType::Empty)
            } else {
                self.expression()?
            };
            node.append_child(&condition)?;
            if self.expect(
                NodeType::Semicolon,
                ErrCode::SemicolonExpected,
                "';' expected between the last two 'for' expressions.",
            ) {
                let step = if self.check(NodeType::CloseParenthesis) {
                    self.new_node(NodeType::Empty)
                } else {
                    self.expression()?
                };
                node.append_child(&step)?;
            }
        } else {
            self.error(
                ErrCode::SemicolonExpected,
                "';' or 'in' expected between the 'for' expressions.",
            );
        }

        self.expect(
            NodeType::CloseParenthesis,
            ErrCode::ParenthesisExpected,
            "')' expected to close the 'for' expressions.",
        );

        if each {
            if node.get_flag(Flag::ForFlagIn)? {
                node.set_flag(Flag::ForFlagForeach, true)?;
            } else {
                self.error(
                    ErrCode::ParenthesisExpected,
                    "'for each()' only available with an enumeration for.",
                );
            }
        }

        let body = self.sub_directive()?;
        node.append_child(&body)?;
        Ok(Some(node))
    }

    fn switch_directive(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let node = self.take();
        if !self.parenthesized(&node, "switch")? {
            return Ok(None);
        }

        if self.check(NodeType::With) {
            self.next();
            let has_open = self.check(NodeType::OpenParenthesis);
            if has_open {
                self.next();
            }
            let operator = self.token.get_type();
            if operator != NodeType::Unknown && operator.is_switch_operator() {
                node.set_switch_operator(operator)?;
                self.next();
            } else {
                self.error(
                    ErrCode::ParenthesisExpected,
                    "unsupported operator for a 'switch() with()' expression.",
                );
            }
            if self.check(NodeType::CloseParenthesis) {
                self.next();
                if !has_open {
                    self.error(
                        ErrCode::ParenthesisExpected,
                        "'(' was expected to start the 'switch() with()' expression.",
                    );
                }
            } else if has_open {
                self.error(
                    ErrCode::ParenthesisExpected,
                    "')' expected to end the 'switch() with()' expression.",
                );
            }
        }

        if !self.expect(
            NodeType::OpenCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            "'{' expected after the 'switch' expression.",
        ) {
            return Ok(Some(node));
        }
        let body = self.block()?;
        if body.find_first_child(NodeType::Default).is_some() {
            node.set_flag(Flag::SwitchFlagDefault, true)?;
        }
        node.append_child(&body)?;
        Ok(Some(node))
    }

    fn case_directive(&mut self) -> ParseResult {
        let node = self.take();
        let expression = self.expression()?;
        node.append_child(&expression)?;

        // case 1 ... 9:
        if self.lexer.options().extended_statements
            && matches!(self.token.get_type(), NodeType::Rest | NodeType::Range)
        {
            self.next();
            let upper = self.expression()?;
            node.append_child(&upper)?;
        }

        self.expect(
            NodeType::Colon,
            ErrCode::CaseLabel,
            "case expression expected to be followed by ':'.",
        );
        Ok(node)
    }

    fn default_directive(&mut self) -> NodePtr {
        let node = self.take();
        self.expect(
            NodeType::Colon,
            ErrCode::DefaultLabel,
            "default label expected to be followed by ':'.",
        );
        node
    }

    /// `try { ... }` or `finally { ... }`.
    fn try_finally(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let keyword = self.token.get_type_name().to_lowercase();
        let node = self.take();
        if !self.expect(
            NodeType::OpenCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            &format!("'{{' expected after the '{}' keyword.", keyword),
        ) {
            return Ok(None);
        }
        let body = self.block()?;
        node.append_child(&body)?;
        Ok(Some(node))
    }

    fn catch_directive(&mut self) -> Result<Option<NodePtr>, NodeError> {
        let node = self.take();
        if !self.check(NodeType::OpenParenthesis) {
            self.error(
                ErrCode::ParenthesisExpected,
                "'(' expected after the 'catch' keyword.",
            );
            return Ok(None);
        }
        self.next();

        let parameters = match self.parameter_list()? {
            Some((parameters, _)) => parameters,
            None => self.new_node(NodeType::Parameters),
        };
        if parameters.get_children_size() == 1 {
            let param = parameters.get_child(0)?;
            param.set_flag(Flag::ParamFlagCatch, true)?;
            match param.find_first_child(NodeType::Set) {
                Some(_) => self.error(
                    ErrCode::InvalidCatch,
                    "'catch' parameters do not support initializers.",
                ),
                None => {
                    if param.get_children_size() > 0 {
                        node.set_flag(Flag::CatchFlagTyped, true)?;
                    }
                }
            }
        } else {
            self.error(
                ErrCode::InvalidCatch,
                "the 'catch' keyword expects exactly one parameter.",
            );
        }
        node.append_child(&parameters)?;

        if !self.expect(
            NodeType::CloseParenthesis,
            ErrCode::ParenthesisExpected,
            "')' expected to end the 'catch' parameter list.",
        ) {
            return Ok(Some(node));
        }
        if self.expect(
            NodeType::OpenCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            "'{' expected after the 'catch' parameter.",
        ) {
            let body = self.block()?;
            node.append_child(&body)?;
        }
        Ok(Some(node))
    }

    fn return_directive(&mut self) -> ParseResult {
        let node = self.take();
        if !self.at_directive_end() {
            let expression = self.expression()?;
            node.append_child(&expression)?;
        }
        self.semicolon();
        Ok(node)
    }

    fn break_continue(&mut self) -> ParseResult {
        let node = self.take();
        if self.check(NodeType::Identifier) {
            node.set_string(self.token.get_string()?)?;
            self.next();
        } else if self.check(NodeType::Default) {
            // same as no label
            self.next();
        }
        if !self.at_directive_end() {
            self.error(
                ErrCode::InvalidLabel,
                "'break' and 'continue' can be followed by one label only.",
            );
            self.skip();
        }
        self.semicolon();
        Ok(node)
    }

    fn goto_directive(&mut self) -> ParseResult {
        let node = self.take();
        if self.check(NodeType::Identifier) {
            node.set_string(self.token.get_string()?)?;
            self.next();
        } else {
            self.error(ErrCode::InvalidGoto, "'goto' expects a label as parameter.");
        }
        self.semicolon();
        Ok(node)
    }

    /// `use namespace name;` or `use expression;`.
    fn use_directive(&mut self) -> ParseResult {
        let node = self.take();
        if self.check(NodeType::Namespace) {
            let namespace = self.take();
            let name = self.expression()?;
            namespace.append_child(&name)?;
            node.append_child(&namespace)?;
        } else {
            let expression = self.expression()?;
            node.append_child(&expression)?;
        }
        self.semicolon();
        Ok(node)
    }

    // expressions

    /// Comma separated expressions; a single one is returned as is.
    fn expression(&mut self) -> ParseResult {
        let first = self.assignment()?;
        if !self.check(NodeType::Comma) {
            return Ok(first);
        }
        let list = Node::with_position(NodeType::List, first.get_position());
        list.append_child(&first)?;
        while self.check(NodeType::Comma) {
            self.next();
            let item = self.assignment()?;
            list.append_child(&item)?;
        }
        Ok(list)
    }

    fn assignment(&mut self) -> ParseResult {
        let lhs = self.conditional()?;
        if !self.token.get_type().is_assignment() {
            return Ok(lhs);
        }
        let operator = self.take();
        let rhs = self.assignment()?;
        operator.append_child(&lhs)?;
        operator.append_child(&rhs)?;
        Ok(operator)
    }

    fn conditional(&mut self) -> ParseResult {
        let condition = self.logical_or()?;
        if !self.check(NodeType::Conditional) {
            return Ok(condition);
        }
        let node = self.take();
        node.append_child(&condition)?;
        let then_part = self.assignment()?;
        node.append_child(&then_part)?;
        if self.expect(
            NodeType::Colon,
            ErrCode::ColonExpected,
            "':' expected in a conditional expression.",
        ) {
            let else_part = self.assignment()?;
            node.append_child(&else_part)?;
        }
        Ok(node)
    }

    /// One left associative level of binary operators.
    fn binary(&mut self, operators: &[NodeType], operand: fn(&mut Self) -> ParseResult) -> ParseResult {
        let mut lhs = operand(self)?;
        loop {
            let node_type = self.token.get_type();
            if !operators.contains(&node_type) || (self.no_in && node_type == NodeType::In) {
                return Ok(lhs);
            }
            let operator = self.take();
            let rhs = operand(self)?;
            operator.append_child(&lhs)?;
            operator.append_child(&rhs)?;
            lhs = operator;
        }
    }

    fn logical_or(&mut self) -> ParseResult {
        self.binary(&[NodeType::LogicalOr], Self::logical_xor)
    }

    fn logical_xor(&mut self) -> ParseResult {
        self.binary(&[NodeType::LogicalXor], Self::logical_and)
    }

    fn logical_and(&mut self) -> ParseResult {
        self.binary(&[NodeType::LogicalAnd], Self::bitwise_or)
    }

    fn bitwise_or(&mut self) -> ParseResult {
        self.binary(&[NodeType::BitwiseOr], Self::bitwise_xor)
    }

    fn bitwise_xor(&mut self) -> ParseResult {
        self.binary(&[NodeType::BitwiseXor], Self::bitwise_and)
    }

    fn bitwise_and(&mut self) -> ParseResult {
        self.binary(&[NodeType::BitwiseAnd], Self::equality)
    }

    fn equality(&mut self) -> ParseResult {
        self.binary(
            &[
                NodeType::Equal,
                NodeType::NotEqual,
                NodeType::StrictlyEqual,
                NodeType::StrictlyNotEqual,
                NodeType::Match,
                NodeType::NotMatch,
                NodeType::SmartMatch,
            ],
            Self::relational,
        )
    }

    fn relational(&mut self) -> ParseResult {
        self.binary(
            &[
                NodeType::Less,
                NodeType::LessEqual,
                NodeType::Greater,
                NodeType::GreaterEqual,
                NodeType::Compare,
                NodeType::In,
                NodeType::Instanceof,
                NodeType::Is,
                NodeType::As,
            ],
            Self::min_max,
        )
    }

    fn min_max(&mut self) -> ParseResult {
        self.binary(&[NodeType::Minimum, NodeType::Maximum], Self::shift)
    }

    fn shift(&mut self) -> ParseResult {
        self.binary(
            &[
                NodeType::ShiftLeft,
                NodeType::ShiftRight,
                NodeType::ShiftRightUnsigned,
                NodeType::RotateLeft,
                NodeType::RotateRight,
            ],
            Self::additive,
        )
    }

    fn additive(&mut self) -> ParseResult {
        self.binary(&[NodeType::Add, NodeType::Subtract], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> ParseResult {
        self.binary(
            &[NodeType::Multiply, NodeType::Divide, NodeType::Modulo],
            Self::power,
        )
    }

    /// `**` is right associative.
    fn power(&mut self) -> ParseResult {
        let lhs = self.unary()?;
        if !self.check(NodeType::Power) {
            return Ok(lhs);
        }
        let operator = self.take();
        let rhs = self.power()?;
        operator.append_child(&lhs)?;
        operator.append_child(&rhs)?;
        Ok(operator)
    }

    fn unary(&mut self) -> ParseResult {
        match self.token.get_type() {
            NodeType::LogicalNot
            | NodeType::BitwiseNot
            | NodeType::Add
            | NodeType::Subtract
            | NodeType::Increment
            | NodeType::Decrement
            | NodeType::Delete
            | NodeType::Typeof
            | NodeType::Void => {
                let operator = self.take();
                let operand = self.unary()?;
                operator.append_child(&operand)?;
                Ok(operator)
            }
            NodeType::New => {
                let node = self.take();
                let target = self.postfix()?;
                node.append_child(&target)?;
                Ok(node)
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> ParseResult {
        let mut node = self.primary()?;
        loop {
            node = match self.token.get_type() {
                NodeType::Member | NodeType::Scope => {
                    let operator = self.take();
                    let field = self.primary()?;
                    operator.append_child(&node)?;
                    operator.append_child(&field)?;
                    operator
                }
                NodeType::OpenSquareBracket => {
                    let array = self.new_node(NodeType::Array);
                    self.next();
                    array.append_child(&node)?;
                    if !self.check(NodeType::CloseSquareBracket) {
                        let index = self.expression()?;
                        array.append_child(&index)?;
                    }
                    self.expect(
                        NodeType::CloseSquareBracket,
                        ErrCode::SquareBracketsExpected,
                        "']' expected to end the list of element references or declarations.",
                    );
                    array
                }
                NodeType::OpenParenthesis => {
                    let call = self.new_node(NodeType::Call);
                    let arguments = self.new_node(NodeType::List);
                    self.next();
                    if !self.check(NodeType::CloseParenthesis) {
                        loop {
                            let argument = self.assignment()?;
                            arguments.append_child(&argument)?;
                            if !self.check(NodeType::Comma) {
                                break;
                            }
                            self.next();
                        }
                    }
                    self.expect(
                        NodeType::CloseParenthesis,
                        ErrCode::ParenthesisExpected,
                        "')' expected to end the list of arguments.",
                    );
                    call.append_child(&node)?;
                    call.append_child(&arguments)?;
                    call
                }
                NodeType::Increment | NodeType::Decrement => {
                    let post = if self.check(NodeType::Increment) {
                        NodeType::PostIncrement
                    } else {
                        NodeType::PostDecrement
                    };
                    let operator = self.new_node(post);
                    self.next();
                    operator.append_child(&node)?;
                    operator
                }
                _ => return Ok(node),
            };
        }
    }

    fn primary(&mut self) -> ParseResult {
        match self.token.get_type() {
            NodeType::Int64
            | NodeType::Float64
            | NodeType::String
            | NodeType::True
            | NodeType::False
            | NodeType::Null
            | NodeType::Undefined
            | NodeType::This
            | NodeType::Super
            | NodeType::RegularExpression
            | NodeType::Identifier => Ok(self.take()),
            NodeType::OpenParenthesis => {
                self.next();
                let no_in = std::mem::replace(&mut self.no_in, false);
                let expression = self.expression();
                self.no_in = no_in;
                let expression = expression?;
                self.expect(
                    NodeType::CloseParenthesis,
                    ErrCode::ParenthesisExpected,
                    "')' expected to match the '('.",
                );
                Ok(expression)
            }
            NodeType::OpenSquareBracket => self.array_literal(),
            NodeType::OpenCurvlyBracket => self.object_literal(),
            NodeType::Function => self.function(true),
            _ => {
                let unknown = self.new_node(NodeType::Unknown);
                self.error(
                    ErrCode::UnexpectedToken,
                    format!(
                        "unexpected token ({}) found in an expression.",
                        self.token.get_type_name()
                    ),
                );
                if !matches!(
                    self.token.get_type(),
                    NodeType::Semicolon
                        | NodeType::CloseCurvlyBracket
                        | NodeType::CloseParenthesis
                        | NodeType::CloseSquareBracket
                        | NodeType::Comma
                        | NodeType::Eof
                ) {
                    self.skip();
                }
                Ok(unknown)
            }
        }
    }

    /// `[a, , b]`; holes are EMPTY nodes.
    fn array_literal(&mut self) -> ParseResult {
        let array = self.new_node(NodeType::ArrayLiteral);
        self.next();
        loop {
            match self.token.get_type() {
                NodeType::CloseSquareBracket => break,
                NodeType::Comma => {
                    let hole = self.new_node(NodeType::Empty);
                    array.append_child(&hole)?;
                    self.next();
                }
                _ => {
                    let item = self.assignment()?;
                    array.append_child(&item)?;
                    if !self.check(NodeType::Comma) {
                        break;
                    }
                    self.next();
                }
            }
        }
        self.expect(
            NodeType::CloseSquareBracket,
            ErrCode::SquareBracketsExpected,
            "']' expected to end the array literal.",
        );
        Ok(array)
    }

    /// `{name: value, ...}`; names and values alternate in the children.
    fn object_literal(&mut self) -> ParseResult {
        let object = self.new_node(NodeType::ObjectLiteral);
        self.next();
        while !self.check(NodeType::CloseCurvlyBracket) {
            if !matches!(
                self.token.get_type(),
                NodeType::Identifier | NodeType::String | NodeType::Int64 | NodeType::Float64
            ) {
                self.error(
                    ErrCode::InvalidExpression,
                    "the name of an object literal member must be an identifier, a string or a number.",
                );
                break;
            }
            let name = self.take();
            if !self.expect(
                NodeType::Colon,
                ErrCode::ColonExpected,
                "':' expected after the name of an object literal member.",
            ) {
                break;
            }
            let value = self.assignment()?;
            object.append_child(&name)?;
            object.append_child(&value)?;
            if !self.check(NodeType::Comma) {
                break;
            }
            self.next();
        }
        self.expect(
            NodeType::CloseCurvlyBracket,
            ErrCode::CurvlyBracketsExpected,
            "'}' expected to close the object literal.",
        );
        Ok(object)
    }
}
