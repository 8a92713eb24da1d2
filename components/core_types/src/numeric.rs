//! Boxed numeric values and their JavaScript text conversions.
//!
//! [`Int64`] and [`Float64`] carry a validity flag next to the value. A
//! wrapper created with `invalid()` represents an uninitialized number; it
//! compares as [`CompareResult::Error`] and nodes refuse to store it.

use std::cmp::Ordering;

/// Result of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareResult {
    /// Left hand side is smaller
    Less,
    /// Both sides are equal
    Equal,
    /// Left hand side is larger
    Greater,
    /// The values cannot be ordered (i.e. NaN was involved)
    Unordered,
    /// The values cannot be compared at all
    Error,
}

impl CompareResult {
    /// Whether this is `Less`, `Equal` or `Greater`.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            CompareResult::Less | CompareResult::Equal | CompareResult::Greater
        )
    }
}

impl From<Ordering> for CompareResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => CompareResult::Less,
            Ordering::Equal => CompareResult::Equal,
            Ordering::Greater => CompareResult::Greater,
        }
    }
}

/// A 64 bit signed integer with a validity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int64 {
    value: i64,
    valid: bool,
}

impl Default for Int64 {
    fn default() -> Self {
        Int64::new(0)
    }
}

impl From<i64> for Int64 {
    fn from(value: i64) -> Self {
        Int64::new(value)
    }
}

impl Int64 {
    /// Create a valid integer.
    pub fn new(value: i64) -> Self {
        Int64 { value, valid: true }
    }

    /// Create an uninitialized integer.
    pub fn invalid() -> Self {
        Int64 {
            value: 0,
            valid: false,
        }
    }

    /// Whether the value was initialized.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The raw value.
    pub fn get(&self) -> i64 {
        self.value
    }

    /// Replace the value, which also marks the wrapper as valid.
    pub fn set(&mut self, value: i64) {
        self.value = value;
        self.valid = true;
    }

    /// Compare two integers; `Error` if either one is invalid.
    pub fn compare(&self, rhs: &Int64) -> CompareResult {
        if !self.valid || !rhs.valid {
            return CompareResult::Error;
        }
        self.value.cmp(&rhs.value).into()
    }
}

/// A 64 bit IEEE-754 float with a validity flag.
///
/// # Examples
///
/// ```
/// use core_types::{CompareResult, Float64};
///
/// let a = Float64::new(3.3);
/// let b = Float64::new(3.300001);
/// assert_eq!(a.compare(&b), CompareResult::Less);
/// assert!(a.nearly_equal(&b));
/// assert_eq!(Float64::new(f64::NAN).compare(&a), CompareResult::Unordered);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float64 {
    value: f64,
    valid: bool,
}

impl Default for Float64 {
    fn default() -> Self {
        Float64::new(0.0)
    }
}

impl From<f64> for Float64 {
    fn from(value: f64) -> Self {
        Float64::new(value)
    }
}

impl Float64 {
    /// Precision used by [`Float64::nearly_equal`].
    pub const EPSILON: f64 = 0.00001;

    /// Create a valid float.
    pub fn new(value: f64) -> Self {
        Float64 { value, valid: true }
    }

    /// Create an uninitialized float.
    pub fn invalid() -> Self {
        Float64 {
            value: 0.0,
            valid: false,
        }
    }

    /// Whether the value was initialized.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The raw value.
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Replace the value, which also marks the wrapper as valid.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.valid = true;
    }

    /// Set the value to NaN.
    pub fn set_nan(&mut self) {
        self.set(f64::NAN);
    }

    /// Set the value to +Infinity.
    pub fn set_infinity(&mut self) {
        self.set(f64::INFINITY);
    }

    /// Whether the value is NaN.
    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    /// Whether the value is +Infinity or -Infinity.
    pub fn is_infinity(&self) -> bool {
        self.value.is_infinite()
    }

    /// Whether the value is +Infinity.
    pub fn is_positive_infinity(&self) -> bool {
        self.value == f64::INFINITY
    }

    /// Whether the value is -Infinity.
    pub fn is_negative_infinity(&self) -> bool {
        self.value == f64::NEG_INFINITY
    }

    /// -1 for -Infinity, 1 for +Infinity, 0 otherwise.
    pub fn classified_infinity(&self) -> i32 {
        if self.is_negative_infinity() {
            -1
        } else if self.is_positive_infinity() {
            1
        } else {
            0
        }
    }

    /// Compare two floats; `Unordered` when either one is NaN.
    pub fn compare(&self, rhs: &Float64) -> CompareResult {
        if !self.valid || !rhs.valid {
            return CompareResult::Error;
        }
        match self.value.partial_cmp(&rhs.value) {
            Some(ordering) => ordering.into(),
            None => CompareResult::Unordered,
        }
    }

    /// Relative comparison with [`Float64::EPSILON`] precision.
    pub fn nearly_equal(&self, rhs: &Float64) -> bool {
        nearly_equal(self.value, rhs.value, Self::EPSILON)
    }
}

/// Relative float comparison.
///
/// Values very close to zero are compared against `epsilon` scaled by the
/// smallest normal double since a relative error makes no sense there.
pub fn nearly_equal(lhs: f64, rhs: f64, epsilon: f64) -> bool {
    if lhs == rhs {
        return true;
    }

    let diff = (lhs - rhs).abs();
    if lhs == 0.0 || rhs == 0.0 || diff < f64::MIN_POSITIVE {
        return diff < epsilon * f64::MIN_POSITIVE;
    }

    diff / (lhs.abs() + rhs.abs()) < epsilon
}

/// Format a float the way JavaScript's `Number.prototype.toString()` does.
///
/// Uses the shortest representation that round-trips.
///
/// # Examples
///
/// ```
/// use core_types::number_to_string;
///
/// assert_eq!(number_to_string(1.0), "1");
/// assert_eq!(number_to_string(-0.5), "-0.5");
/// assert_eq!(number_to_string(1e21), "1e+21");
/// assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
/// ```
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value < 0.0 {
        return format!("-{}", number_to_string(-value));
    }

    let mut buffer = ryu::Buffer::new();
    let (digits, point) = decimal_digits(buffer.format_finite(value));
    let k = digits.len() as i32;
    let n = point;

    if k <= n && n <= 21 {
        let mut out = digits;
        out.extend(std::iter::repeat('0').take((n - k) as usize));
        out
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let exponent = n - 1;
        let sign = if exponent < 0 { '-' } else { '+' };
        if k == 1 {
            format!("{}e{}{}", digits, sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", &digits[..1], &digits[1..], sign, exponent.abs())
        }
    }
}

/// Split a ryu formatted number in its significant digits and the
/// position of the decimal point relative to the first digit.
fn decimal_digits(text: &str) -> (String, i32) {
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut point = integer.len() as i32;
    let all: String = integer.chars().chain(fraction.chars()).collect();
    let trimmed = all.trim_start_matches('0');
    point -= (all.len() - trimmed.len()) as i32;
    let digits = trimmed.trim_end_matches('0').to_string();

    (digits, point + exponent)
}

/// Convert a string to a number following JavaScript's `Number(string)`.
///
/// Surrounding whitespace is ignored, an empty string is 0, `0x` prefixes
/// read hexadecimal digits and anything that is not a number yields NaN.
pub fn string_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    if unsigned.len() > 2 && (unsigned.starts_with("0x") || unsigned.starts_with("0X")) {
        // signed hexadecimal is not a number in JavaScript
        if text.len() != unsigned.len() {
            return f64::NAN;
        }
        return unsigned[2..]
            .chars()
            .try_fold(0.0_f64, |acc, c| c.to_digit(16).map(|d| acc * 16.0 + d as f64))
            .unwrap_or(f64::NAN);
    }

    if numeric_prefix_len(text) != text.len() {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Read the longest decimal number at the start of `text` and return it
/// truncated toward zero; 0 when `text` does not start with a number.
pub fn string_prefix_to_int64(text: &str) -> i64 {
    let text = text.trim_start();
    let len = numeric_prefix_len(text);
    if len == 0 {
        return 0;
    }
    text[..len].parse::<f64>().map(|v| v as i64).unwrap_or(0)
}

/// Length of the longest prefix matching
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let integer_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - integer_start;

    if pos < bytes.len() && bytes[pos] == b'.' {
        let fraction_start = pos + 1;
        let mut end = fraction_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if digits > 0 || end > fraction_start {
            digits += end - fraction_start;
            pos = end;
        }
    }

    if digits == 0 {
        return 0;
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let exponent_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exponent_start {
            pos = end;
        }
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int64_default_is_valid_zero() {
        let i = Int64::default();
        assert!(i.is_valid());
        assert_eq!(i.get(), 0);
    }

    #[test]
    fn test_int64_compare() {
        let a = Int64::new(-5);
        let b = Int64::new(12);
        assert_eq!(a.compare(&b), CompareResult::Less);
        assert_eq!(b.compare(&a), CompareResult::Greater);
        assert_eq!(a.compare(&a), CompareResult::Equal);
        assert_eq!(a.compare(&Int64::invalid()), CompareResult::Error);
    }

    #[test]
    fn test_int64_set_validates() {
        let mut i = Int64::invalid();
        assert!(!i.is_valid());
        i.set(77);
        assert!(i.is_valid());
        assert_eq!(i.get(), 77);
    }

    #[test]
    fn test_float64_special_values() {
        let mut f = Float64::default();
        assert!(!f.is_nan());
        assert_eq!(f.classified_infinity(), 0);

        f.set_nan();
        assert!(f.is_nan());
        assert!(!f.is_infinity());

        f.set_infinity();
        assert!(f.is_infinity());
        assert!(f.is_positive_infinity());
        assert!(!f.is_negative_infinity());
        assert_eq!(f.classified_infinity(), 1);

        f.set(f64::NEG_INFINITY);
        assert!(f.is_negative_infinity());
        assert_eq!(f.classified_infinity(), -1);
    }

    #[test]
    fn test_float64_compare_nan_is_unordered() {
        let nan = Float64::new(f64::NAN);
        let one = Float64::new(1.0);
        assert_eq!(nan.compare(&one), CompareResult::Unordered);
        assert_eq!(one.compare(&nan), CompareResult::Unordered);
        assert_eq!(nan.compare(&nan), CompareResult::Unordered);
        assert_eq!(one.compare(&Float64::invalid()), CompareResult::Error);
    }

    #[test]
    fn test_nearly_equal() {
        assert!(nearly_equal(3.3, 3.300001, Float64::EPSILON));
        assert!(!nearly_equal(3.3, 3.4, Float64::EPSILON));
        assert!(nearly_equal(0.0, 0.0, Float64::EPSILON));
        assert!(!nearly_equal(0.0, 1e-300, Float64::EPSILON));
        assert!(nearly_equal(-7.0, -7.00000001, Float64::EPSILON));
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(0.0), "0");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(123.0), "123");
        assert_eq!(number_to_string(3.14159), "3.14159");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(0.0000001), "1e-7");
        assert_eq!(number_to_string(1.5e-10), "1.5e-10");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(1.25e25), "1.25e+25");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(-12.5), "-12.5");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("   "), 0.0);
        assert_eq!(string_to_number("42"), 42.0);
        assert_eq!(string_to_number(" -3.5e2 "), -350.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("5."), 5.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("-0x10").is_nan());
        assert!(string_to_number("12abc").is_nan());
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("nan").is_nan());
        assert!(string_to_number(".").is_nan());
    }

    #[test]
    fn test_string_prefix_to_int64() {
        assert_eq!(string_prefix_to_int64("123"), 123);
        assert_eq!(string_prefix_to_int64("  -45.9xyz"), -45);
        assert_eq!(string_prefix_to_int64("1.5e3"), 1500);
        assert_eq!(string_prefix_to_int64("7e"), 7);
        assert_eq!(string_prefix_to_int64("abc"), 0);
        assert_eq!(string_prefix_to_int64(""), 0);
    }
}
