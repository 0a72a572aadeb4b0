//! Display formatting for computed values.
//!
//! Results are rendered the way a browser prints a JavaScript number,
//! then shortened when the plain text would overflow the display:
//!
//! - non-finite values become the [`ERROR_SENTINEL`],
//! - texts up to 12 characters are shown as-is,
//! - very small or very large magnitudes switch to 6-digit exponential
//!   notation (`1.224647e-16`, `1.234568e+15`),
//! - everything else is rounded to 10 significant digits.

/// Sentinel shown in place of a value after a terminal arithmetic error
pub const ERROR_SENTINEL: &str = "Error";

/// Longest plain rendering shown without shortening
const MAX_PLAIN_LEN: usize = 12;

/// Below this magnitude long values switch to exponential notation
const SMALL_MAGNITUDE: f64 = 1e-6;

/// Above this magnitude long values switch to exponential notation
const LARGE_MAGNITUDE: f64 = 999_999_999_999.0;

/// Significant digits kept when a long value is rounded
const ROUNDED_PRECISION: usize = 10;

/// Fraction digits in the exponential form
const EXPONENT_FRACTION_DIGITS: usize = 6;

/// Formats a computed value for the display
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_SENTINEL.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let text = number_to_string(value);
    if text.len() <= MAX_PLAIN_LEN {
        return text;
    }

    let magnitude = value.abs();
    if magnitude < SMALL_MAGNITUDE || magnitude > LARGE_MAGNITUDE {
        to_exponential(value, EXPONENT_FRACTION_DIGITS)
    } else {
        number_to_string(to_precision(value, ROUNDED_PRECISION))
    }
}

/// Parses operand text into a finite number
#[must_use]
pub fn parse_operand(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Renders a number with the ECMAScript `Number#toString` rules:
/// shortest round-trip digits, plain decimal for decimal exponents in
/// `[-7, 21)`, exponential with an explicit exponent sign otherwise.
#[must_use]
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, point) = shortest_digits(value.abs());
    let len = digits.len() as i32;

    let body = if len <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - len) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let exponent = point - 1;
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{first}.{rest}")
        };
        let exp_sign = if exponent >= 0 { '+' } else { '-' };
        format!("{mantissa}e{exp_sign}{}", exponent.abs())
    };

    format!("{sign}{body}")
}

/// Shortest round-trip digit string and the decimal point position
/// (the value is `0.DIGITS × 10^point`).
fn shortest_digits(magnitude: f64) -> (String, i32) {
    let scientific = format!("{magnitude:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent + 1)
}

/// Exponential notation with a fixed number of fraction digits and a
/// signed exponent, e.g. `1.234568e+15`.
fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let text = format!("{:.*e}", fraction_digits, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => {
            format!("{mantissa}e{exponent}")
        }
        Some((mantissa, exponent)) => format!("{mantissa}e+{exponent}"),
        None => text,
    }
}

/// Rounds to `precision` significant digits.
fn to_precision(value: f64, precision: usize) -> f64 {
    let text = format!("{:.*e}", precision.saturating_sub(1), value);
    text.parse().unwrap_or(value)
}
