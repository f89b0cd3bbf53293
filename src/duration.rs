//! Parsing of Go-style duration strings such as `2h30m`, `45m` or `1.5h`.
//!
//! Grammar: an optional sign followed by one or more `<decimal><unit>` pairs,
//! where the unit is one of `ns`, `us`, `µs`, `μs`, `ms`, `s`, `m`, `h`. The
//! bare string `0` is also accepted. Values are held as signed nanoseconds and
//! must fit in an `i64`.

use thiserror::Error;

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

/// Largest magnitude accepted, so that a negated value still fits in `i64`.
const MAX_MAGNITUDE: u128 = 1 << 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("missing unit")]
    MissingUnit,
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),
    #[error("duration out of range")]
    Overflow,
}

/// A parsed duration, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSpent {
    nanos: i64,
}

impl TimeSpent {
    pub fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// Whole minutes, rounding halves away from zero (`90.5` becomes `91`).
    pub fn minutes_rounded(&self) -> i64 {
        let minute = MINUTE as i64;
        let whole = self.nanos / minute;
        let rest = self.nanos % minute;
        (whole as f64 + rest as f64 / minute as f64).round() as i64
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Split off the leading run of ASCII digits.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s.split_at(end)
}

pub fn parse_duration(input: &str) -> Result<TimeSpent, DurationError> {
    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(TimeSpent::from_nanos(0));
    }
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let (int_digits, rest) = split_digits(s);
        s = rest;

        let mut frac_digits = "";
        if let Some(rest) = s.strip_prefix('.') {
            let (digits, rest) = split_digits(rest);
            frac_digits = digits;
            s = rest;
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(DurationError::ExpectedNumber);
        }

        let unit_end = s
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        if unit_end == 0 {
            return Err(DurationError::MissingUnit);
        }
        let (unit_str, rest) = s.split_at(unit_end);
        s = rest;
        let unit = unit_nanos(unit_str).ok_or_else(|| DurationError::UnknownUnit(unit_str.to_string()))?;

        let whole = parse_whole(int_digits)?;
        let mut value = whole.checked_mul(unit).ok_or(DurationError::Overflow)?;
        value += fraction_nanos(frac_digits, unit);

        total = total.checked_add(value).ok_or(DurationError::Overflow)?;
        if total > MAX_MAGNITUDE {
            return Err(DurationError::Overflow);
        }
    }

    if negative {
        // MAX_MAGNITUDE negates to exactly i64::MIN.
        let nanos = if total == MAX_MAGNITUDE {
            i64::MIN
        } else {
            -(total as i64)
        };
        return Ok(TimeSpent::from_nanos(nanos));
    }
    if total > i64::MAX as u128 {
        return Err(DurationError::Overflow);
    }
    Ok(TimeSpent::from_nanos(total as i64))
}

fn parse_whole(digits: &str) -> Result<u128, DurationError> {
    if digits.is_empty() {
        return Ok(0);
    }
    let value: u128 = digits.parse().map_err(|_| DurationError::Overflow)?;
    if value > MAX_MAGNITUDE {
        return Err(DurationError::Overflow);
    }
    Ok(value)
}

/// Nanoseconds contributed by the fractional digits of one component,
/// truncated toward zero. Digits past the twentieth are ignored.
fn fraction_nanos(digits: &str, unit: u128) -> u128 {
    let mut numerator: u128 = 0;
    let mut scale: u128 = 1;
    for c in digits.chars().take(20) {
        numerator = numerator * 10 + u128::from(c as u8 - b'0');
        scale *= 10;
    }
    numerator * unit / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(s: &str) -> i64 {
        parse_duration(s).unwrap().minutes_rounded()
    }

    #[test]
    fn parses_compound_durations() {
        assert_eq!(minutes("45m"), 45);
        assert_eq!(minutes("1h30m"), 90);
        assert_eq!(minutes("2h45m"), 165);
        assert_eq!(minutes("1.5h"), 90);
        assert_eq!(minutes("90s"), 2);
    }

    #[test]
    fn rounds_half_minutes_up() {
        assert_eq!(minutes("1h30m30s"), 91);
        assert_eq!(minutes("29s"), 0);
        assert_eq!(minutes("30s"), 1);
        assert_eq!(minutes("1m29.999s"), 1);
    }

    #[test]
    fn accepts_small_units_and_sign() {
        assert_eq!(parse_duration("1500ms").unwrap().as_nanos(), 1_500_000_000);
        assert_eq!(parse_duration("3µs").unwrap().as_nanos(), 3_000);
        assert_eq!(parse_duration("3us").unwrap().as_nanos(), 3_000);
        assert_eq!(parse_duration("+5ns").unwrap().as_nanos(), 5);
        assert_eq!(parse_duration("-2m").unwrap().as_nanos(), -120_000_000_000);
        assert_eq!(parse_duration("0").unwrap().as_nanos(), 0);
        assert_eq!(parse_duration(".5s").unwrap().as_nanos(), 500_000_000);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(parse_duration("-"), Err(DurationError::Empty));
        assert_eq!(parse_duration("45"), Err(DurationError::MissingUnit));
        assert_eq!(parse_duration("h"), Err(DurationError::ExpectedNumber));
        assert_eq!(parse_duration("."), Err(DurationError::ExpectedNumber));
        assert_eq!(
            parse_duration("2 hours"),
            Err(DurationError::UnknownUnit(" hours".to_string()))
        );
        assert_eq!(
            parse_duration("3d"),
            Err(DurationError::UnknownUnit("d".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(parse_duration("9999999999999h"), Err(DurationError::Overflow));
        assert_eq!(
            parse_duration("99999999999999999999999999999999999999999s"),
            Err(DurationError::Overflow)
        );
    }
}
