//! Lenient text-to-number and text-to-time parsing used by the typed getters.
//!
//! These helpers only ever return `None` on failure. Callers turn that into
//! the target type's zero value.

use chrono::{DateTime, FixedOffset};

/// Parses an integer, detecting the base from its prefix.
///
/// * `0x`/`0X` hexadecimal
/// * `0o`/`0O`, or a bare leading `0`, octal
/// * `0b`/`0B` binary
/// * anything else decimal
///
/// An optional `+`/`-` sign may precede the prefix. Underscores are accepted
/// between digits or directly after the prefix (`0x_ff`, `0_1`), but only when
/// the base came from a prefix.
#[must_use]
pub fn parse_int(input: &str) -> Option<i128> {
    let (negative, unsigned) = match input.as_bytes().first()? {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    let (radix, digits, prefixed) = split_radix(unsigned);

    if digits.is_empty() {
        return None;
    }

    let digits = if digits.contains('_') {
        if !prefixed || !underscores_ok(digits) {
            return None;
        }
        digits.replace('_', "")
    } else {
        digits.to_string()
    };

    // from_str_radix accepts its own sign, which must not follow ours
    if digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i128::from_str_radix(&digits, radix).ok()?;

    Some(if negative { -magnitude } else { magnitude })
}

fn split_radix(input: &str) -> (u32, &str, bool) {
    let bytes = input.as_bytes();

    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &input[2..], true),
            b'o' | b'O' => return (8, &input[2..], true),
            b'b' | b'B' => return (2, &input[2..], true),
            _ => return (8, &input[1..], true),
        }
    }

    (10, input, false)
}

fn underscores_ok(digits: &str) -> bool {
    !digits.ends_with('_') && !digits.contains("__")
}

/// Parses an integer that must fit in `T`.
#[must_use]
pub fn parse_int_as<T: TryFrom<i128>>(input: &str) -> Option<T> {
    parse_int(input).and_then(|x| T::try_from(x).ok())
}

/// Parses an `f64`.
///
/// Results that overflow to infinity are rejected unless the input spelled
/// out an infinity itself.
#[must_use]
pub fn parse_f64(input: &str) -> Option<f64> {
    input
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite() || spells_infinity(input))
}

/// Parses an `f32`, rounding directly from the text.
#[must_use]
pub fn parse_f32(input: &str) -> Option<f32> {
    input
        .parse::<f32>()
        .ok()
        .filter(|x| x.is_finite() || spells_infinity(input))
}

/// Parses an RFC 3339 timestamp, keeping its offset.
///
/// The date and time must be separated by an uppercase `T`.
#[must_use]
pub fn parse_rfc3339(input: &str) -> Option<DateTime<FixedOffset>> {
    if input.as_bytes().get(10) != Some(&b'T') {
        return None;
    }

    DateTime::parse_from_rfc3339(input).ok()
}

fn spells_infinity(input: &str) -> bool {
    input.to_ascii_lowercase().contains("inf")
}
