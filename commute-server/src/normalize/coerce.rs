//! Numeric coercion.
//!
//! Upstream payloads send numbers as numbers, as strings ("42.5",
//! "500 naira"), or as range objects (`{"min": 100, "max": 150}`).
//! Coercion reduces all of these to one finite `f64` and never fails:
//! anything it cannot read becomes `0`.

use serde_json::Value;

/// Which bound of a range object wins when reducing it to one number.
///
/// Range objects may carry any of `min`, `max`, `value`, `amount` and
/// `total`. The first of the mode's keys that holds a readable number wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// `max, value, amount, total, min`. Used for every canonical field.
    #[default]
    Conservative,

    /// `min, value, amount, total, max`: the "fares from" figure.
    Optimistic,
}

impl CoercionMode {
    /// Range keys in priority order.
    pub fn range_keys(self) -> [&'static str; 5] {
        match self {
            CoercionMode::Conservative => ["max", "value", "amount", "total", "min"],
            CoercionMode::Optimistic => ["min", "value", "amount", "total", "max"],
        }
    }
}

/// Coerce a possibly-absent value to a number, preferring the upper bound of
/// ranges.
///
/// ```
/// use commute_server::normalize::coerce_number;
/// use serde_json::json;
///
/// assert_eq!(coerce_number(Some(&json!({"min": 100, "max": 150}))), 150.0);
/// assert_eq!(coerce_number(Some(&json!({"value": 80}))), 80.0);
/// assert_eq!(coerce_number(Some(&json!("42.5"))), 42.5);
/// assert_eq!(coerce_number(Some(&json!(null))), 0.0);
/// assert_eq!(coerce_number(None), 0.0);
/// ```
pub fn coerce_number(value: Option<&Value>) -> f64 {
    coerce_number_with(value, CoercionMode::Conservative)
}

/// Coerce a possibly-absent value to a number using `mode` for ranges.
pub fn coerce_number_with(value: Option<&Value>, mode: CoercionMode) -> f64 {
    match value {
        Some(Value::Object(range)) => mode
            .range_keys()
            .iter()
            .find_map(|key| range.get(*key).and_then(scalar))
            .unwrap_or(0.0),
        Some(other) => scalar(other).unwrap_or(0.0),
        None => 0.0,
    }
}

/// Read a number or numeric string. Non-finite results are rejected.
pub(crate) fn scalar(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_leading_float(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Parse the longest numeric prefix of `s`, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent, so `"500 naira"` reads as `500` and `"abc"` as
/// nothing.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        let frac_digits = frac_end - (end + 1);
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_are_zero() {
        assert_eq!(coerce_number(None), 0.0);
        assert_eq!(coerce_number(Some(&json!(null))), 0.0);
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_number(Some(&json!(7))), 7.0);
        assert_eq!(coerce_number(Some(&json!(-3.25))), -3.25);
    }

    #[test]
    fn strings_parse_leading_number() {
        assert_eq!(coerce_number(Some(&json!("42.5"))), 42.5);
        assert_eq!(coerce_number(Some(&json!("  300"))), 300.0);
        assert_eq!(coerce_number(Some(&json!("500 naira"))), 500.0);
        assert_eq!(coerce_number(Some(&json!(".5"))), 0.5);
        assert_eq!(coerce_number(Some(&json!("5."))), 5.0);
        assert_eq!(coerce_number(Some(&json!("1.5e2km"))), 150.0);
        assert_eq!(coerce_number(Some(&json!("2e"))), 2.0);
        assert_eq!(coerce_number(Some(&json!("-12"))), -12.0);
    }

    #[test]
    fn unparseable_strings_are_zero() {
        assert_eq!(coerce_number(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(""))), 0.0);
        assert_eq!(coerce_number(Some(&json!("."))), 0.0);
        assert_eq!(coerce_number(Some(&json!("-"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("₦500"))), 0.0);
    }

    #[test]
    fn non_finite_strings_are_zero() {
        assert_eq!(coerce_number(Some(&json!("1e999"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("inf"))), 0.0);
    }

    #[test]
    fn other_types_are_zero() {
        assert_eq!(coerce_number(Some(&json!(true))), 0.0);
        assert_eq!(coerce_number(Some(&json!([5]))), 0.0);
        assert_eq!(coerce_number(Some(&json!({}))), 0.0);
    }

    #[test]
    fn conservative_range_precedence() {
        assert_eq!(coerce_number(Some(&json!({"min": 100, "max": 150}))), 150.0);
        assert_eq!(coerce_number(Some(&json!({"value": 80}))), 80.0);
        assert_eq!(coerce_number(Some(&json!({"amount": "60", "min": 10}))), 60.0);
        assert_eq!(coerce_number(Some(&json!({"total": 45}))), 45.0);
        assert_eq!(coerce_number(Some(&json!({"min": 20}))), 20.0);
    }

    #[test]
    fn unreadable_range_keys_are_skipped() {
        assert_eq!(coerce_number(Some(&json!({"max": "n/a", "value": 3}))), 3.0);
        assert_eq!(coerce_number(Some(&json!({"max": null, "min": 9}))), 9.0);
        assert_eq!(coerce_number(Some(&json!({"max": {"value": 1}}))), 0.0);
    }

    #[test]
    fn optimistic_range_precedence() {
        let range = json!({"min": 100, "max": 150});
        assert_eq!(
            coerce_number_with(Some(&range), CoercionMode::Optimistic),
            100.0
        );
        assert_eq!(
            coerce_number_with(Some(&json!({"max": 150})), CoercionMode::Optimistic),
            150.0
        );
    }

    #[test]
    fn modes_agree_on_scalars() {
        for value in [json!(12), json!("12"), json!({"value": 12})] {
            assert_eq!(
                coerce_number_with(Some(&value), CoercionMode::Conservative),
                coerce_number_with(Some(&value), CoercionMode::Optimistic)
            );
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::normalize::strategies::arb_json;
    use proptest::prelude::*;

    proptest! {
        /// Coercion is total and always finite.
        #[test]
        fn always_finite(value in arb_json()) {
            prop_assert!(coerce_number(Some(&value)).is_finite());
            prop_assert!(coerce_number_with(Some(&value), CoercionMode::Optimistic).is_finite());
        }

        /// Finite numbers are returned unchanged.
        #[test]
        fn finite_numbers_are_fixed_points(n in -1.0e12f64..1.0e12) {
            prop_assert_eq!(coerce_number(Some(&json_number(n))), n);
        }

        /// Formatted numbers parse back to themselves.
        #[test]
        fn numeric_strings_parse(n in -1.0e9f64..1.0e9) {
            let s = Value::String(n.to_string());
            prop_assert_eq!(coerce_number(Some(&s)), n);
        }

        /// Conservative never picks a smaller bound than optimistic.
        #[test]
        fn conservative_at_least_optimistic(a in 0.0f64..1.0e6, b in 0.0f64..1.0e6) {
            let (lo, hi) = (a.min(b), a.max(b));
            let range = serde_json::json!({"min": lo, "max": hi});
            prop_assert!(
                coerce_number_with(Some(&range), CoercionMode::Conservative)
                    >= coerce_number_with(Some(&range), CoercionMode::Optimistic)
            );
        }
    }

    fn json_number(n: f64) -> Value {
        Value::from(n)
    }
}
