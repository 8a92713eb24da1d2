//! Unit tests for the numeric wrappers and the number/string conversions

use core_types::{number_to_string, string_to_number, CompareResult, Float64, Int64};

#[cfg(test)]
mod float64_tests {
    use super::*;

    #[test]
    fn test_float64_invalid_compares_as_error() {
        let invalid = Float64::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.compare(&Float64::new(1.0)), CompareResult::Error);
    }

    #[test]
    fn test_float64_ordering() {
        let values = [-1.0e300, -3.5, -0.0, 1.0e-300, 2.0, 7.25e10];
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                let expected = if i < j {
                    CompareResult::Less
                } else if i > j {
                    CompareResult::Greater
                } else {
                    CompareResult::Equal
                };
                assert_eq!(Float64::new(*a).compare(&Float64::new(*b)), expected);
            }
        }
    }

    #[test]
    fn test_float64_nearly_equal_is_symmetric() {
        let pairs = [(1.0, 1.000001), (100.0, 100.0001), (-5.0, -5.00002)];
        for (a, b) in pairs {
            let fa = Float64::new(a);
            let fb = Float64::new(b);
            assert_eq!(fa.nearly_equal(&fb), fb.nearly_equal(&fa));
        }
        assert!(Float64::new(1.0).nearly_equal(&Float64::new(1.000001)));
        assert!(!Float64::new(-5.0).nearly_equal(&Float64::new(-5.001)));
    }
}

#[cfg(test)]
mod int64_tests {
    use super::*;

    #[test]
    fn test_int64_from_i64() {
        let i: Int64 = 99.into();
        assert!(i.is_valid());
        assert_eq!(i.get(), 99);
    }

    #[test]
    fn test_int64_extremes() {
        let min = Int64::new(i64::MIN);
        let max = Int64::new(i64::MAX);
        assert_eq!(min.compare(&max), CompareResult::Less);
        assert_eq!(max.compare(&min), CompareResult::Greater);
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_integers_print_without_fraction() {
        for i in [-1_000_000_i64, -1, 0, 1, 42, 9_007_199_254_740_992] {
            assert_eq!(number_to_string(i as f64), i.to_string());
        }
    }

    #[test]
    fn test_string_number_string() {
        for text in ["0", "1", "-17", "0.5", "123.456", "1e-7", "1.5e+300", "Infinity"] {
            assert_eq!(number_to_string(string_to_number(text)), text);
        }
        assert_eq!(number_to_string(string_to_number("garbage")), "NaN");
    }
}
