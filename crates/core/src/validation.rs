//! Input validation utilities.
//!
//! Every persisted value is text. These helpers are the only place that text is interpreted
//! as a number, a date or a time, both when a record is submitted and when a consumer (such as
//! billing) reads a stored value back.

use crate::schema::{FieldKind, FieldSpec};
use crate::{HospitalError, HospitalResult};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Checks that `value` is a non-negative whole number made of ASCII digits only.
///
/// Signs, decimal points and surrounding text are rejected, so `"-3"`, `"+3"` and `"12.5"` all
/// fail. Leading zeros are accepted. There is no upper bound.
pub fn check_whole_number(value: &str, field: &str) -> HospitalResult<()> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HospitalError::InvalidNumber(field.to_string()));
    }
    Ok(())
}

/// Parses a whole number that is used in arithmetic.
///
/// Same grammar as [`check_whole_number`], bounded by `u64`.
pub fn parse_whole_number(value: &str, field: &str) -> HospitalResult<u64> {
    check_whole_number(value, field)?;
    value
        .parse::<u64>()
        .map_err(|_| HospitalError::InvalidNumber(field.to_string()))
}

/// Parses a real number such as `19.99`, `-4`, `.5` or `1e3`.
///
/// Digit separators (`_`) are not part of the grammar. Values outside `Decimal`'s range or
/// beyond its 28 fractional digits are rejected.
pub fn parse_decimal(value: &str, field: &str) -> HospitalResult<Decimal> {
    let invalid = || HospitalError::InvalidNumber(field.to_string());
    if value.is_empty() || value.contains('_') {
        return Err(invalid());
    }

    if value.contains(['e', 'E']) {
        return Decimal::from_scientific(value).map_err(|_| invalid());
    }
    Decimal::from_str(value).map_err(|_| invalid())
}

fn two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        }
        _ => None,
    }
}

/// Parses a calendar date in strict `YYYY-MM-DD` form.
///
/// The day is checked against the month and year, so `2024-02-29` is accepted while
/// `2023-02-29` and `2024-02-30` are not.
pub fn parse_date(value: &str) -> HospitalResult<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(HospitalError::InvalidDate);
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) {
        return Err(HospitalError::InvalidDate);
    }

    let year = value[..4]
        .parse::<i32>()
        .map_err(|_| HospitalError::InvalidDate)?;
    if year == 0 {
        return Err(HospitalError::InvalidDate);
    }
    let month = two_digits(&bytes[5..7]).ok_or(HospitalError::InvalidDate)?;
    let day = two_digits(&bytes[8..10]).ok_or(HospitalError::InvalidDate)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(HospitalError::InvalidDate)
}

/// Parses a 24-hour clock time in strict `HH:MM` form (`00:00` to `23:59`).
pub fn parse_time(value: &str) -> HospitalResult<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(HospitalError::InvalidTime);
    }

    let hour = two_digits(&bytes[..2]).ok_or(HospitalError::InvalidTime)?;
    let minute = two_digits(&bytes[3..]).ok_or(HospitalError::InvalidTime)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(HospitalError::InvalidTime)
}

/// Checks `value` (already trimmed and non-blank) against the rule of `field`.
pub fn validate_field(field: &FieldSpec, value: &str) -> HospitalResult<()> {
    match field.kind {
        FieldKind::Text => Ok(()),
        FieldKind::Integer => check_whole_number(value, field.name),
        FieldKind::Decimal => parse_decimal(value, field.name).map(drop),
        FieldKind::Date => parse_date(value).map(drop),
        FieldKind::Time => parse_time(value).map(drop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionKey;
    use crate::schema::EntitySchema;

    #[test]
    fn test_whole_number_accepts_digits() {
        assert_eq!(parse_whole_number("0", "age").unwrap(), 0);
        assert_eq!(parse_whole_number("42", "age").unwrap(), 42);
        assert_eq!(parse_whole_number("007", "age").unwrap(), 7);
    }

    #[test]
    fn test_whole_number_rejects_non_digits() {
        for input in ["12.5", "-3", "+3", "abc", "", "1 2"] {
            let err = parse_whole_number(input, "quantity").unwrap_err();
            assert!(
                matches!(err, HospitalError::InvalidNumber(ref f) if f == "quantity"),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_integer_field_has_no_upper_bound() {
        let age = EntitySchema::of(CollectionKey::Patients)
            .field("age")
            .expect("patients have an age field");
        assert!(validate_field(age, "99999999999999999999999").is_ok());
        assert!(matches!(
            validate_field(age, "-1"),
            Err(HospitalError::InvalidNumber(ref f)) if f == "age"
        ));
    }

    #[test]
    fn test_quantity_beyond_u64_is_rejected() {
        assert!(matches!(
            parse_whole_number("99999999999999999999999", "quantity"),
            Err(HospitalError::InvalidNumber(ref f)) if f == "quantity"
        ));
    }

    #[test]
    fn test_decimal_accepts_real_numbers() {
        assert_eq!(parse_decimal("19.99", "price").unwrap(), Decimal::new(1999, 2));
        assert_eq!(parse_decimal("-4", "price").unwrap(), Decimal::new(-4, 0));
        assert_eq!(parse_decimal("1e3", "price").unwrap(), Decimal::new(1000, 0));
    }

    #[test]
    fn test_decimal_rejects_words() {
        for input in ["nine", "", "1.2.3", "NaN", "1__0", "1_000", "_1"] {
            assert!(
                matches!(parse_decimal(input, "price"), Err(HospitalError::InvalidNumber(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decimal_rejects_values_outside_range() {
        for input in ["1e30", "1e-30", "100000000000000000000000000000"] {
            assert!(
                matches!(parse_decimal(input, "price"), Err(HospitalError::InvalidNumber(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_date_checks_calendar() {
        assert!(parse_date("2024-02-29").is_ok(), "2024 is a leap year");
        assert!(matches!(parse_date("2023-02-29"), Err(HospitalError::InvalidDate)));
        assert!(matches!(parse_date("2024-02-30"), Err(HospitalError::InvalidDate)));
        assert!(matches!(parse_date("2024-13-01"), Err(HospitalError::InvalidDate)));
    }

    #[test]
    fn test_date_requires_strict_shape() {
        for input in ["2024-2-3", "24-02-03", "2024/02/03", "2024-02-03T", "+024-02-03", "0000-01-01"] {
            assert!(
                matches!(parse_date(input), Err(HospitalError::InvalidDate)),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_time_bounds() {
        assert!(parse_time("00:00").is_ok());
        assert!(parse_time("23:59").is_ok());
        for input in ["24:00", "9:5", "09:60", "0930", "09:30:00"] {
            assert!(
                matches!(parse_time(input), Err(HospitalError::InvalidTime)),
                "{input:?} should be rejected"
            );
        }
    }
}
