//! Decodes the 6-byte ASCII date encoding into a canonical Unix
//! timestamp. Pure calendar arithmetic over the proleptic Gregorian
//! calendar; the helpers are the same functions the decode path runs, so
//! the two cannot drift apart.

use verimint_types::{PackedDate, VerimintError, VerimintResult, SECONDS_PER_DAY};

pub fn is_leap_year(year: u64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in `month` of `year`; callers pass `month` in [1, 12].
pub fn days_in_month(year: u64, month: u64) -> u64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Days elapsed since 1970-01-01 for a calendar date.
pub fn days_from_1970(year: u64, month: u64, day: u64) -> VerimintResult<u64> {
    if year < 1970 {
        return Err(VerimintError::DateBeforeEpoch);
    }

    let mut days: u64 = 0;
    for y in 1970..year {
        days += if is_leap_year(y) { 366 } else { 365 };
    }
    for m in 1..month {
        days += days_in_month(year, m);
    }
    Ok(days + day - 1)
}

/// Decodes `YYMMDD` ASCII digits into a Unix timestamp.
///
/// The `"000000"` sentinel decodes to 0 without further validation.
/// Month and day are validated against the calendar; anything outside
/// the ASCII digit range is `InvalidDateEncoding`.
pub fn decode_date(packed: PackedDate) -> VerimintResult<u64> {
    let mut digits = [0u64; 6];
    for (digit, byte) in digits.iter_mut().zip(packed.as_bytes()) {
        if !byte.is_ascii_digit() {
            return Err(VerimintError::InvalidDateEncoding);
        }
        *digit = (byte - b'0') as u64;
    }

    // Two-digit years follow the machine-readable-zone convention:
    // 70..=99 are 19xx, 00..=69 are 20xx.
    let yy = digits[0] * 10 + digits[1];
    let year = if yy >= 70 { 1900 + yy } else { 2000 + yy };
    let month = digits[2] * 10 + digits[3];
    let day = digits[4] * 10 + digits[5];

    // "000000" is the reserved unset sentinel.
    if month == 0 && day == 0 {
        return Ok(0);
    }

    if month < 1 || month > 12 {
        return Err(VerimintError::InvalidDateEncoding);
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(VerimintError::InvalidDateEncoding);
    }

    Ok(days_from_1970(year, month, day)? * SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2020));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2021));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn test_days_from_1970() {
        assert_eq!(days_from_1970(1970, 1, 1).unwrap(), 0);
        assert_eq!(days_from_1970(1970, 1, 2).unwrap(), 1);
        assert_eq!(days_from_1970(2000, 1, 1).unwrap(), 10957);
        assert_eq!(days_from_1970(2020, 3, 1).unwrap(), 18322);
        assert_eq!(
            days_from_1970(1969, 12, 31),
            Err(VerimintError::DateBeforeEpoch)
        );
    }

    #[test]
    fn test_decode_zero_sentinel() {
        assert_eq!(decode_date(PackedDate::zero()).unwrap(), 0);
    }

    #[test]
    fn test_decode_known_dates() {
        let d = PackedDate::from_str_encoded("230101").unwrap();
        assert_eq!(decode_date(d).unwrap(), 1672531200);

        let d = PackedDate::from_str_encoded("750101").unwrap();
        assert_eq!(decode_date(d).unwrap(), 157766400);
    }

    #[test]
    fn test_decode_rejects_non_digit_bytes() {
        let d = PackedDate::from_bytes(*b"/00000");
        assert_eq!(decode_date(d), Err(VerimintError::InvalidDateEncoding));

        let d = PackedDate::from_bytes([b'2', b'4', 0xFF, b'2', b'0', b'9']);
        assert_eq!(decode_date(d), Err(VerimintError::InvalidDateEncoding));
    }

    #[test]
    fn test_decode_rejects_invalid_calendar_dates() {
        for s in ["241309", "240031", "240232", "230229", "240001", "240100"] {
            let d = PackedDate::from_str_encoded(s).unwrap();
            assert_eq!(decode_date(d), Err(VerimintError::InvalidDateEncoding), "{}", s);
        }
    }

    #[test]
    fn test_decode_is_idempotent() {
        let d = PackedDate::from_str_encoded("241209").unwrap();
        assert_eq!(decode_date(d).unwrap(), decode_date(d).unwrap());
    }

    proptest! {
        #[test]
        fn prop_valid_dates_decode_to_midnight(yy in 0u64..100, month in 1u64..=12, day_seed in 0u64..31) {
            let year = if yy >= 70 { 1900 + yy } else { 2000 + yy };
            let day = 1 + day_seed % days_in_month(year, month);
            let s = format!("{:02}{:02}{:02}", yy, month, day);
            let packed = PackedDate::from_str_encoded(&s).unwrap();

            let ts = decode_date(packed).unwrap();
            prop_assert_eq!(ts % SECONDS_PER_DAY, 0);
            prop_assert_eq!(ts / SECONDS_PER_DAY, days_from_1970(year, month, day).unwrap());
        }

        #[test]
        fn prop_helper_leap_rule_matches_definition(year in 1970u64..2400) {
            prop_assert_eq!(
                is_leap_year(year),
                year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
            );
        }
    }
}
