//! The node type catalog.
//!
//! Single character tokens use their character code as their numeric value,
//! every other type is numbered from 1001 in alphabetical order. `EOF` is
//! the only negative value.

use std::convert::TryFrom;
use std::fmt;

use crate::NodeError;

macro_rules! node_types {
    ($($variant:ident = $value:expr => $name:literal,)*) => {
        /// Type tag of a [`Node`](crate::Node).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        pub enum NodeType {
            $(
                #[allow(missing_docs)]
                $variant = $value,
            )*
        }

        impl NodeType {
            /// Every node type, in declaration order.
            pub const ALL: &'static [NodeType] = &[$(NodeType::$variant,)*];

            /// Uppercase name of the type, i.e. `DIRECTIVE_LIST`.
            pub fn type_name(self) -> &'static str {
                match self {
                    $(NodeType::$variant => $name,)*
                }
            }
        }
    };
}

node_types! {
    Eof = -1 => "EOF",
    Unknown = 0 => "UNKNOWN",
    LogicalNot = '!' as i32 => "LOGICAL_NOT",
    Modulo = '%' as i32 => "MODULO",
    BitwiseAnd = '&' as i32 => "BITWISE_AND",
    OpenParenthesis = '(' as i32 => "OPEN_PARENTHESIS",
    CloseParenthesis = ')' as i32 => "CLOSE_PARENTHESIS",
    Multiply = '*' as i32 => "MULTIPLY",
    Add = '+' as i32 => "ADD",
    Comma = ',' as i32 => "COMMA",
    Subtract = '-' as i32 => "SUBTRACT",
    Member = '.' as i32 => "MEMBER",
    Divide = '/' as i32 => "DIVIDE",
    Colon = ':' as i32 => "COLON",
    Semicolon = ';' as i32 => "SEMICOLON",
    Less = '<' as i32 => "LESS",
    Assignment = '=' as i32 => "ASSIGNMENT",
    Greater = '>' as i32 => "GREATER",
    Conditional = '?' as i32 => "CONDITIONAL",
    OpenSquareBracket = '[' as i32 => "OPEN_SQUARE_BRACKET",
    CloseSquareBracket = ']' as i32 => "CLOSE_SQUARE_BRACKET",
    BitwiseXor = '^' as i32 => "BITWISE_XOR",
    OpenCurvlyBracket = '{' as i32 => "OPEN_CURVLY_BRACKET",
    BitwiseOr = '|' as i32 => "BITWISE_OR",
    CloseCurvlyBracket = '}' as i32 => "CLOSE_CURVLY_BRACKET",
    BitwiseNot = '~' as i32 => "BITWISE_NOT",
    Abstract = 1001 => "ABSTRACT",
    AlmostEqual = 1002 => "ALMOST_EQUAL",
    Array = 1003 => "ARRAY",
    ArrayLiteral = 1004 => "ARRAY_LITERAL",
    Arrow = 1005 => "ARROW",
    As = 1006 => "AS",
    AssignmentAdd = 1007 => "ASSIGNMENT_ADD",
    AssignmentBitwiseAnd = 1008 => "ASSIGNMENT_BITWISE_AND",
    AssignmentBitwiseOr = 1009 => "ASSIGNMENT_BITWISE_OR",
    AssignmentBitwiseXor = 1010 => "ASSIGNMENT_BITWISE_XOR",
    AssignmentDivide = 1011 => "ASSIGNMENT_DIVIDE",
    AssignmentLogicalAnd = 1012 => "ASSIGNMENT_LOGICAL_AND",
    AssignmentLogicalOr = 1013 => "ASSIGNMENT_LOGICAL_OR",
    AssignmentLogicalXor = 1014 => "ASSIGNMENT_LOGICAL_XOR",
    AssignmentMaximum = 1015 => "ASSIGNMENT_MAXIMUM",
    AssignmentMinimum = 1016 => "ASSIGNMENT_MINIMUM",
    AssignmentModulo = 1017 => "ASSIGNMENT_MODULO",
    AssignmentMultiply = 1018 => "ASSIGNMENT_MULTIPLY",
    AssignmentPower = 1019 => "ASSIGNMENT_POWER",
    AssignmentRotateLeft = 1020 => "ASSIGNMENT_ROTATE_LEFT",
    AssignmentRotateRight = 1021 => "ASSIGNMENT_ROTATE_RIGHT",
    AssignmentShiftLeft = 1022 => "ASSIGNMENT_SHIFT_LEFT",
    AssignmentShiftRight = 1023 => "ASSIGNMENT_SHIFT_RIGHT",
    AssignmentShiftRightUnsigned = 1024 => "ASSIGNMENT_SHIFT_RIGHT_UNSIGNED",
    AssignmentSubtract = 1025 => "ASSIGNMENT_SUBTRACT",
    Attributes = 1026 => "ATTRIBUTES",
    Auto = 1027 => "AUTO",
    Boolean = 1028 => "BOOLEAN",
    Break = 1029 => "BREAK",
    Byte = 1030 => "BYTE",
    Call = 1031 => "CALL",
    Case = 1032 => "CASE",
    Catch = 1033 => "CATCH",
    Char = 1034 => "CHAR",
    Class = 1035 => "CLASS",
    Compare = 1036 => "COMPARE",
    Const = 1037 => "CONST",
    Continue = 1038 => "CONTINUE",
    Debugger = 1039 => "DEBUGGER",
    Decrement = 1040 => "DECREMENT",
    Default = 1041 => "DEFAULT",
    Delete = 1042 => "DELETE",
    DirectiveList = 1043 => "DIRECTIVE_LIST",
    Do = 1044 => "DO",
    Double = 1045 => "DOUBLE",
    Else = 1046 => "ELSE",
    Empty = 1047 => "EMPTY",
    Ensure = 1048 => "ENSURE",
    Enum = 1049 => "ENUM",
    Equal = 1050 => "EQUAL",
    Exclude = 1051 => "EXCLUDE",
    Export = 1052 => "EXPORT",
    Extends = 1053 => "EXTENDS",
    False = 1054 => "FALSE",
    Final = 1055 => "FINAL",
    Finally = 1056 => "FINALLY",
    Float = 1057 => "FLOAT",
    Float64 = 1058 => "FLOAT64",
    For = 1059 => "FOR",
    Function = 1060 => "FUNCTION",
    Goto = 1061 => "GOTO",
    GreaterEqual = 1062 => "GREATER_EQUAL",
    Identifier = 1063 => "IDENTIFIER",
    If = 1064 => "IF",
    Implements = 1065 => "IMPLEMENTS",
    Import = 1066 => "IMPORT",
    In = 1067 => "IN",
    Include = 1068 => "INCLUDE",
    Increment = 1069 => "INCREMENT",
    Inline = 1070 => "INLINE",
    Instanceof = 1071 => "INSTANCEOF",
    Int64 = 1072 => "INT64",
    Interface = 1073 => "INTERFACE",
    Invariant = 1074 => "INVARIANT",
    Is = 1075 => "IS",
    Label = 1076 => "LABEL",
    LessEqual = 1077 => "LESS_EQUAL",
    List = 1078 => "LIST",
    LogicalAnd = 1079 => "LOGICAL_AND",
    LogicalOr = 1080 => "LOGICAL_OR",
    LogicalXor = 1081 => "LOGICAL_XOR",
    Long = 1082 => "LONG",
    Match = 1083 => "MATCH",
    Maximum = 1084 => "MAXIMUM",
    Minimum = 1085 => "MINIMUM",
    Name = 1086 => "NAME",
    Namespace = 1087 => "NAMESPACE",
    Native = 1088 => "NATIVE",
    New = 1089 => "NEW",
    NotEqual = 1090 => "NOT_EQUAL",
    NotMatch = 1091 => "NOT_MATCH",
    Null = 1092 => "NULL",
    ObjectLiteral = 1093 => "OBJECT_LITERAL",
    Package = 1094 => "PACKAGE",
    Param = 1095 => "PARAM",
    Parameters = 1096 => "PARAMETERS",
    ParamMatch = 1097 => "PARAM_MATCH",
    PostDecrement = 1098 => "POST_DECREMENT",
    PostIncrement = 1099 => "POST_INCREMENT",
    Power = 1100 => "POWER",
    Private = 1101 => "PRIVATE",
    Program = 1102 => "PROGRAM",
    Protected = 1103 => "PROTECTED",
    Public = 1104 => "PUBLIC",
    Range = 1105 => "RANGE",
    RegularExpression = 1106 => "REGULAR_EXPRESSION",
    Require = 1107 => "REQUIRE",
    Rest = 1108 => "REST",
    Return = 1109 => "RETURN",
    Root = 1110 => "ROOT",
    RotateLeft = 1111 => "ROTATE_LEFT",
    RotateRight = 1112 => "ROTATE_RIGHT",
    Scope = 1113 => "SCOPE",
    Set = 1114 => "SET",
    ShiftLeft = 1115 => "SHIFT_LEFT",
    ShiftRight = 1116 => "SHIFT_RIGHT",
    ShiftRightUnsigned = 1117 => "SHIFT_RIGHT_UNSIGNED",
    Short = 1118 => "SHORT",
    SmartMatch = 1119 => "SMART_MATCH",
    Static = 1120 => "STATIC",
    StrictlyEqual = 1121 => "STRICTLY_EQUAL",
    StrictlyNotEqual = 1122 => "STRICTLY_NOT_EQUAL",
    String = 1123 => "STRING",
    Super = 1124 => "SUPER",
    Switch = 1125 => "SWITCH",
    Synchronized = 1126 => "SYNCHRONIZED",
    Then = 1127 => "THEN",
    This = 1128 => "THIS",
    Throw = 1129 => "THROW",
    Throws = 1130 => "THROWS",
    Transient = 1131 => "TRANSIENT",
    True = 1132 => "TRUE",
    Try = 1133 => "TRY",
    Type = 1134 => "TYPE",
    Typeof = 1135 => "TYPEOF",
    Undefined = 1136 => "UNDEFINED",
    Use = 1137 => "USE",
    Var = 1138 => "VAR",
    Variable = 1139 => "VARIABLE",
    VarAttributes = 1140 => "VAR_ATTRIBUTES",
    Videntifier = 1141 => "VIDENTIFIER",
    Void = 1142 => "VOID",
    Volatile = 1143 => "VOLATILE",
    While = 1144 => "WHILE",
    With = 1145 => "WITH",
    Yield = 1146 => "YIELD",
}

impl NodeType {
    /// The last valid type.
    pub const LAST: NodeType = NodeType::Yield;

    /// Numeric value of the type.
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Convert a numeric value back into a type.
    ///
    /// Values between the single character types, between the characters
    /// and 1001, and past [`NodeType::LAST`] are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use node::NodeType;
    ///
    /// assert_eq!(NodeType::from_raw('+' as i32).unwrap(), NodeType::Add);
    /// assert_eq!(NodeType::from_raw(-1).unwrap(), NodeType::Eof);
    /// assert!(NodeType::from_raw('a' as i32).is_err());
    /// assert!(NodeType::from_raw(NodeType::LAST.value() + 1).is_err());
    /// ```
    pub fn from_raw(value: i32) -> Result<NodeType, NodeError> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.value() == value)
            .ok_or(NodeError::InvalidNodeType(value))
    }

    /// The character of single character types (i.e. `'+'` for ADD).
    pub fn operator_char(self) -> Option<char> {
        let value = self.value();
        if value > ' ' as i32 && value < 0x7F {
            char::from_u32(value as u32)
        } else {
            None
        }
    }

    /// INT64 or FLOAT64.
    pub fn is_number(self) -> bool {
        matches!(self, NodeType::Int64 | NodeType::Float64)
    }

    /// TRUE or FALSE.
    pub fn is_boolean(self) -> bool {
        matches!(self, NodeType::True | NodeType::False)
    }

    /// One of the types a constant expression can be made of.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeType::Int64
                | NodeType::Float64
                | NodeType::String
                | NodeType::True
                | NodeType::False
                | NodeType::Null
                | NodeType::Undefined
        )
    }

    /// Types carrying a string payload.
    pub fn has_string_payload(self) -> bool {
        matches!(
            self,
            NodeType::Break
                | NodeType::Class
                | NodeType::Continue
                | NodeType::Enum
                | NodeType::Function
                | NodeType::Goto
                | NodeType::Identifier
                | NodeType::Import
                | NodeType::Interface
                | NodeType::Label
                | NodeType::Namespace
                | NodeType::Package
                | NodeType::Param
                | NodeType::RegularExpression
                | NodeType::String
                | NodeType::Variable
                | NodeType::VarAttributes
                | NodeType::Videntifier
        )
    }

    /// Assignment operators, `=` included.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            NodeType::Assignment
                | NodeType::AssignmentAdd
                | NodeType::AssignmentBitwiseAnd
                | NodeType::AssignmentBitwiseOr
                | NodeType::AssignmentBitwiseXor
                | NodeType::AssignmentDivide
                | NodeType::AssignmentLogicalAnd
                | NodeType::AssignmentLogicalOr
                | NodeType::AssignmentLogicalXor
                | NodeType::AssignmentMaximum
                | NodeType::AssignmentMinimum
                | NodeType::AssignmentModulo
                | NodeType::AssignmentMultiply
                | NodeType::AssignmentPower
                | NodeType::AssignmentRotateLeft
                | NodeType::AssignmentRotateRight
                | NodeType::AssignmentShiftLeft
                | NodeType::AssignmentShiftRight
                | NodeType::AssignmentShiftRightUnsigned
                | NodeType::AssignmentSubtract
        )
    }

    /// Operators which modify their operand or have an unknown effect.
    pub fn has_side_effects(self) -> bool {
        self.is_assignment()
            || matches!(
                self,
                NodeType::Call
                    | NodeType::Decrement
                    | NodeType::Delete
                    | NodeType::Increment
                    | NodeType::New
                    | NodeType::PostDecrement
                    | NodeType::PostIncrement
            )
    }

    /// Values accepted by a SWITCH node as its comparison operator.
    pub fn is_switch_operator(self) -> bool {
        matches!(
            self,
            NodeType::Unknown
                | NodeType::Default
                | NodeType::AlmostEqual
                | NodeType::As
                | NodeType::Compare
                | NodeType::Equal
                | NodeType::Greater
                | NodeType::GreaterEqual
                | NodeType::In
                | NodeType::Instanceof
                | NodeType::Is
                | NodeType::Less
                | NodeType::LessEqual
                | NodeType::Match
                | NodeType::NotEqual
                | NodeType::NotMatch
                | NodeType::SmartMatch
                | NodeType::StrictlyEqual
                | NodeType::StrictlyNotEqual
        )
    }
}

impl TryFrom<i32> for NodeType {
    type Error = NodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        NodeType::from_raw(value)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
