//! Duration strings used for validity offsets.
//!
//! Offsets are written as a signed sequence of decimal numbers, each with an
//! optional fraction and a unit suffix, e.g. `"24h"`, `"1h30m"`, `"1.5h"` or
//! `"-90s"`. Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
//! A bare `"0"` is accepted without a unit.

use chrono::Duration;

use crate::error::{Error, Result};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Fraction digits beyond this carry no weight at nanosecond resolution.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parses a duration string such as `"87600h"` into a [`Duration`].
///
/// # Errors
///
/// Returns [`Error::InvalidDuration`] if the string is empty, has a number
/// without a unit, uses an unknown unit, or overflows.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = |reason: &str| Error::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = input;
    let negative = if let Some(stripped) = rest.strip_prefix('-') {
        rest = stripped;
        true
    } else {
        rest = rest.strip_prefix('+').unwrap_or(rest);
        false
    };

    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_fraction) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a number"));
        }

        let unit_len = after_fraction
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_fraction.len());
        let (unit, tail) = after_fraction.split_at(unit_len);
        if unit.is_empty() {
            return Err(invalid("missing unit"));
        }
        let scale = unit_nanos(unit).ok_or_else(|| invalid(&format!("unknown unit '{unit}'")))?;

        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("number out of range"))?
        };
        let mut value = whole_value
            .checked_mul(scale)
            .ok_or_else(|| invalid("duration out of range"))?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = digits.parse().map_err(|_| invalid("invalid fraction"))?;
            let denominator = 10u128.pow(digits.len() as u32);
            value = value
                .checked_add(numerator * scale / denominator)
                .ok_or_else(|| invalid("duration out of range"))?;
        }

        total = total
            .checked_add(value)
            .ok_or_else(|| invalid("duration out of range"))?;
        if total > i64::MAX as u128 {
            return Err(invalid("duration out of range"));
        }
        rest = tail;
    }

    let nanos = total as i64;
    Ok(Duration::nanoseconds(if negative { -nanos } else { nanos }))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("24h", Duration::hours(24) ; "day in hours")]
    #[test_case("87600h", Duration::hours(87_600) ; "ten years")]
    #[test_case("1h30m", Duration::minutes(90) ; "compound")]
    #[test_case("1.5h", Duration::minutes(90) ; "fractional hours")]
    #[test_case("-90s", Duration::seconds(-90) ; "negative")]
    #[test_case("+15m", Duration::minutes(15) ; "explicit plus")]
    #[test_case("0", Duration::zero() ; "bare zero")]
    #[test_case("250ms", Duration::milliseconds(250) ; "milliseconds")]
    #[test_case("10us", Duration::microseconds(10) ; "microseconds")]
    #[test_case("7ns", Duration::nanoseconds(7) ; "nanoseconds")]
    #[test_case(".5s", Duration::milliseconds(500) ; "leading dot")]
    fn parses_valid_durations(input: &str, expected: Duration) {
        assert_eq!(parse_duration(input).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("-" ; "sign only")]
    #[test_case("24" ; "missing unit")]
    #[test_case("ten years" ; "words")]
    #[test_case("5d" ; "days are not a unit")]
    #[test_case("1h30" ; "trailing number")]
    #[test_case("." ; "dot only")]
    #[test_case("99999999999999999999h" ; "overflow")]
    fn rejects_invalid_durations(input: &str) {
        let err = parse_duration(input).unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { .. }));
    }

    proptest! {
        #[test]
        fn whole_hours_round_trip(hours in 0i64..1_000_000) {
            let parsed = parse_duration(&format!("{hours}h")).unwrap();
            prop_assert_eq!(parsed, Duration::hours(hours));
        }

        #[test]
        fn arbitrary_input_never_panics(input in "\\PC{0,16}") {
            let _ = parse_duration(&input);
        }
    }
}
