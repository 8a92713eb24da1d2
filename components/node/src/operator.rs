//! Operator spelling.

use crate::NodeType;

const OPERATORS: &[(NodeType, &str)] = &[
    (NodeType::LogicalNot, "!"),
    (NodeType::Modulo, "%"),
    (NodeType::BitwiseAnd, "&"),
    (NodeType::Multiply, "*"),
    (NodeType::Add, "+"),
    (NodeType::Subtract, "-"),
    (NodeType::Divide, "/"),
    (NodeType::Less, "<"),
    (NodeType::Assignment, "="),
    (NodeType::Greater, ">"),
    (NodeType::BitwiseXor, "^"),
    (NodeType::BitwiseOr, "|"),
    (NodeType::BitwiseNot, "~"),
    (NodeType::AssignmentAdd, "+="),
    (NodeType::AssignmentBitwiseAnd, "&="),
    (NodeType::AssignmentBitwiseOr, "|="),
    (NodeType::AssignmentBitwiseXor, "^="),
    (NodeType::AssignmentDivide, "/="),
    (NodeType::AssignmentLogicalAnd, "&&="),
    (NodeType::AssignmentLogicalOr, "||="),
    (NodeType::AssignmentLogicalXor, "^^="),
    (NodeType::AssignmentMaximum, ">?="),
    (NodeType::AssignmentMinimum, "<?="),
    (NodeType::AssignmentModulo, "%="),
    (NodeType::AssignmentMultiply, "*="),
    (NodeType::AssignmentPower, "**="),
    (NodeType::AssignmentRotateLeft, "<%="),
    (NodeType::AssignmentRotateRight, ">%="),
    (NodeType::AssignmentShiftLeft, "<<="),
    (NodeType::AssignmentShiftRight, ">>="),
    (NodeType::AssignmentShiftRightUnsigned, ">>>="),
    (NodeType::AssignmentSubtract, "-="),
    (NodeType::Call, "()"),
    (NodeType::Compare, "<=>"),
    (NodeType::Decrement, "--x"),
    (NodeType::Equal, "=="),
    (NodeType::GreaterEqual, ">="),
    (NodeType::Increment, "++x"),
    (NodeType::LessEqual, "<="),
    (NodeType::LogicalAnd, "&&"),
    (NodeType::LogicalOr, "||"),
    (NodeType::LogicalXor, "^^"),
    (NodeType::Match, "~="),
    (NodeType::Maximum, ">?"),
    (NodeType::Minimum, "<?"),
    (NodeType::NotEqual, "!="),
    (NodeType::NotMatch, "!~"),
    (NodeType::PostDecrement, "x--"),
    (NodeType::PostIncrement, "x++"),
    (NodeType::Power, "**"),
    (NodeType::RotateLeft, "<%"),
    (NodeType::RotateRight, ">%"),
    (NodeType::ShiftLeft, "<<"),
    (NodeType::ShiftRight, ">>"),
    (NodeType::ShiftRightUnsigned, ">>>"),
    (NodeType::SmartMatch, "~~"),
    (NodeType::StrictlyEqual, "==="),
    (NodeType::StrictlyNotEqual, "!=="),
];

/// Source spelling of an operator, `None` if `operator` is not one.
///
/// Increments and decrements are written `++x`, `x++`, `--x` and `x--`
/// so the prefix and postfix forms can be told apart.
pub fn operator_to_string(operator: NodeType) -> Option<&'static str> {
    OPERATORS
        .iter()
        .find(|(node_type, _)| *node_type == operator)
        .map(|(_, text)| *text)
}

/// Operator spelled `text`, [`NodeType::Unknown`] if there is none.
///
/// `<>` and `:=` are accepted as aliases of `!=` and `=`.
pub fn string_to_operator(text: &str) -> NodeType {
    if let Some((node_type, _)) = OPERATORS.iter().find(|(_, spelling)| *spelling == text) {
        return *node_type;
    }
    match text {
        "<>" => NodeType::NotEqual,
        ":=" => NodeType::Assignment,
        _ => NodeType::Unknown,
    }
}
