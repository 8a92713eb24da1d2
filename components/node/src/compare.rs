//! Comparison of literal nodes, used to fold constant expressions.

use core_types::{string_to_number, CompareResult, Float64};

use crate::{Node, NodeType};

/// How [`compare`] treats operands of different types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Different types are unordered (`===`)
    Strict,
    /// Operands are converted to numbers first (`==`)
    Loose,
    /// Like `Loose` but floats within a small relative error are equal (`~~`)
    Smart,
}

/// Compare two literal nodes.
///
/// Returns [`CompareResult::Error`] when either node is not a literal.
/// `false` is smaller than `true`. In [`CompareMode::Strict`] literals of
/// different types are [`CompareResult::Unordered`]; otherwise both sides
/// are converted to a number, except that `null` and `undefined` are equal
/// to each other.
///
/// # Examples
///
/// ```
/// use core_types::CompareResult;
/// use node::{compare, CompareMode, Node, NodeType};
///
/// let null = Node::new(NodeType::Null);
/// let undefined = Node::new(NodeType::Undefined);
/// assert_eq!(compare(&null, &undefined, CompareMode::Strict), CompareResult::Unordered);
/// assert_eq!(compare(&null, &undefined, CompareMode::Loose), CompareResult::Equal);
/// ```
pub fn compare(lhs: &Node, rhs: &Node, mode: CompareMode) -> CompareResult {
    if !lhs.is_literal() || !rhs.is_literal() {
        return CompareResult::Error;
    }

    let (lt, rt) = (lhs.get_type(), rhs.get_type());
    if lhs.is_boolean() && rhs.is_boolean() {
        return lhs.is_true().cmp(&rhs.is_true()).into();
    }

    if lt == rt {
        return match lt {
            NodeType::Float64 => compare_floats(lhs.float_payload(), rhs.float_payload(), mode),
            NodeType::Int64 => lhs.int_payload().compare(&rhs.int_payload()),
            NodeType::String => lhs.string_payload().cmp(&rhs.string_payload()).into(),
            _ => CompareResult::Equal,
        };
    }

    if mode == CompareMode::Strict {
        return CompareResult::Unordered;
    }

    if matches!(
        (lt, rt),
        (NodeType::Null, NodeType::Undefined) | (NodeType::Undefined, NodeType::Null)
    ) {
        return CompareResult::Equal;
    }

    compare_floats(literal_number(lhs), literal_number(rhs), mode)
}

fn compare_floats(lhs: Float64, rhs: Float64, mode: CompareMode) -> CompareResult {
    if mode == CompareMode::Smart && lhs.nearly_equal(&rhs) {
        return CompareResult::Equal;
    }
    lhs.compare(&rhs)
}

/// Numeric value of a literal; `undefined` is NaN.
fn literal_number(node: &Node) -> Float64 {
    match node.get_type() {
        NodeType::Int64 => Float64::new(node.int_payload().get() as f64),
        NodeType::Float64 => node.float_payload(),
        NodeType::True => Float64::new(1.0),
        NodeType::String => Float64::new(string_to_number(&node.string_payload())),
        NodeType::Null | NodeType::False => Float64::new(0.0),
        _ => Float64::new(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodePtr;

    fn float(value: f64) -> NodePtr {
        let node = Node::new(NodeType::Float64);
        node.set_float64(value.into()).unwrap();
        node
    }

    fn int(value: i64) -> NodePtr {
        let node = Node::new(NodeType::Int64);
        node.set_int64(value.into()).unwrap();
        node
    }

    fn string(value: &str) -> NodePtr {
        let node = Node::new(NodeType::String);
        node.set_string(value).unwrap();
        node
    }

    const MODES: [CompareMode; 3] = [CompareMode::Strict, CompareMode::Loose, CompareMode::Smart];

    #[test]
    fn test_non_literals_are_errors() {
        let add = Node::new(NodeType::Add);
        let t = Node::new(NodeType::True);
        for mode in MODES {
            assert_eq!(compare(&add, &t, mode), CompareResult::Error);
            assert_eq!(compare(&t, &add, mode), CompareResult::Error);
        }
    }

    #[test]
    fn test_booleans() {
        let t = Node::new(NodeType::True);
        let f = Node::new(NodeType::False);
        for mode in MODES {
            assert_eq!(compare(&t, &f, mode), CompareResult::Greater);
            assert_eq!(compare(&f, &t, mode), CompareResult::Less);
            assert_eq!(compare(&t, &t, mode), CompareResult::Equal);
            assert_eq!(compare(&f, &f, mode), CompareResult::Equal);
        }
    }

    #[test]
    fn test_same_types() {
        for mode in MODES {
            assert_eq!(compare(&int(3), &int(7), mode), CompareResult::Less);
            assert_eq!(compare(&int(-3), &int(-7), mode), CompareResult::Greater);
            assert_eq!(compare(&string("abc"), &string("abd"), mode), CompareResult::Less);
            assert_eq!(compare(&string("x"), &string("x"), mode), CompareResult::Equal);
            assert_eq!(compare(&float(1.5), &float(1.5), mode), CompareResult::Equal);
            assert_eq!(
                compare(&float(f64::NAN), &float(1.0), mode),
                CompareResult::Unordered
            );
            assert_eq!(
                compare(&float(f64::NAN), &float(f64::NAN), mode),
                CompareResult::Unordered
            );
            let null = Node::new(NodeType::Null);
            assert_eq!(compare(&null, &Node::new(NodeType::Null), mode), CompareResult::Equal);
            let undefined = Node::new(NodeType::Undefined);
            assert_eq!(
                compare(&undefined, &Node::new(NodeType::Undefined), mode),
                CompareResult::Equal
            );
        }
    }

    #[test]
    fn test_float_against_numeric_string() {
        let f = float(3.3);
        let s = string("3.300001");
        assert_eq!(compare(&f, &s, CompareMode::Strict), CompareResult::Unordered);
        assert_eq!(compare(&f, &s, CompareMode::Loose), CompareResult::Less);
        assert_eq!(compare(&f, &s, CompareMode::Smart), CompareResult::Equal);
    }

    #[test]
    fn test_smart_floats() {
        assert_eq!(
            compare(&float(3.3), &float(3.300001), CompareMode::Smart),
            CompareResult::Equal
        );
        assert_eq!(
            compare(&float(3.3), &float(3.300001), CompareMode::Loose),
            CompareResult::Less
        );
    }

    #[test]
    fn test_null_and_undefined() {
        let null = Node::new(NodeType::Null);
        let undefined = Node::new(NodeType::Undefined);
        assert_eq!(compare(&null, &undefined, CompareMode::Strict), CompareResult::Unordered);
        assert_eq!(compare(&null, &undefined, CompareMode::Loose), CompareResult::Equal);
        assert_eq!(compare(&undefined, &null, CompareMode::Smart), CompareResult::Equal);
    }

    #[test]
    fn test_loose_conversions() {
        let t = Node::new(NodeType::True);
        let null = Node::new(NodeType::Null);
        let undefined = Node::new(NodeType::Undefined);

        assert_eq!(compare(&t, &int(1), CompareMode::Loose), CompareResult::Equal);
        assert_eq!(compare(&t, &int(1), CompareMode::Strict), CompareResult::Unordered);
        assert_eq!(compare(&null, &int(0), CompareMode::Loose), CompareResult::Equal);
        assert_eq!(compare(&int(2), &float(2.5), CompareMode::Loose), CompareResult::Less);
        assert_eq!(compare(&int(2), &float(2.0), CompareMode::Strict), CompareResult::Unordered);
        assert_eq!(compare(&string("10"), &int(9), CompareMode::Loose), CompareResult::Greater);
        assert_eq!(compare(&string("ten"), &int(9), CompareMode::Loose), CompareResult::Unordered);
        assert_eq!(compare(&undefined, &int(0), CompareMode::Loose), CompareResult::Unordered);
        assert_eq!(compare(&undefined, &t, CompareMode::Smart), CompareResult::Unordered);
    }
}
