//! Proleptic Gregorian calendar over the game's day counter.
//!
//! Savegames store dates as a day count where day 0 is 1 January of year 0.
//! Year 0 is a leap year.

use std::fmt;

/// Days from 1 January year 0 to 1 January 1920, the base year of
/// savegames older than version 31.
pub const DAYS_TILL_ORIGINAL_BASE_YEAR: i32 = 701_265;

/// The base year of savegames older than version 31.
pub const ORIGINAL_BASE_YEAR: i32 = 1920;

const DAYS_IN_YEAR: i32 = 365;
const DAYS_IN_4_YEARS: i32 = DAYS_IN_YEAR * 4 + 1;
const DAYS_IN_CENTURY: i32 = DAYS_IN_YEAR * 100 + 24;
const DAYS_IN_400_YEARS: i32 = DAYS_IN_YEAR * 400 + 97;

/// A calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    /// 1-12.
    pub month: u8,
    /// 1-31.
    pub day: u8,
}

/// Whether `year` has a 29 February.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) { 366 } else { DAYS_IN_YEAR }
}

fn days_in_month(year: i32, month: u8) -> i32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl Date {
    /// Convert a day count (day 0 = 1 January year 0) to a date.
    ///
    /// Negative counts land before year 0.
    pub fn from_days(days: i32) -> Self {
        let mut year = 400 * days.div_euclid(DAYS_IN_400_YEARS);
        let mut rem = days.rem_euclid(DAYS_IN_400_YEARS);

        // The first century of a 400-year cycle has one more leap day than
        // the other three.
        if rem >= DAYS_IN_CENTURY + 1 {
            year += 100;
            rem -= DAYS_IN_CENTURY + 1;
            year += 100 * (rem / DAYS_IN_CENTURY);
            rem %= DAYS_IN_CENTURY;
        }
        // The first four years of those other centuries have no leap day.
        if !is_leap_year(year) && rem >= DAYS_IN_YEAR * 4 {
            year += 4;
            rem -= DAYS_IN_YEAR * 4;
        }
        year += 4 * (rem / DAYS_IN_4_YEARS);
        rem %= DAYS_IN_4_YEARS;
        while rem >= days_in_year(year) {
            rem -= days_in_year(year);
            year += 1;
        }

        let mut month = 1;
        while rem >= days_in_month(year, month) {
            rem -= days_in_month(year, month);
            month += 1;
        }
        Date {
            year,
            month,
            day: rem as u8 + 1,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, Date { year: 0, month: 1, day: 1 })]
    #[case(59, Date { year: 0, month: 2, day: 29 })]
    #[case(60, Date { year: 0, month: 3, day: 1 })]
    #[case(365, Date { year: 0, month: 12, day: 31 })]
    #[case(366, Date { year: 1, month: 1, day: 1 })]
    #[case(DAYS_TILL_ORIGINAL_BASE_YEAR, Date { year: 1920, month: 1, day: 1 })]
    #[case(730_120, Date { year: 1999, month: 1, day: 1 })]
    #[case(730_179, Date { year: 1999, month: 3, day: 1 })]
    #[case(730_544, Date { year: 2000, month: 2, day: 29 })]
    #[case(730_850, Date { year: 2000, month: 12, day: 31 })]
    #[case(694_019, Date { year: 1900, month: 2, day: 28 })]
    #[case(694_020, Date { year: 1900, month: 3, day: 1 })]
    #[case(767_010, Date { year: 2100, month: 1, day: 1 })]
    fn converts_day_counts(#[case] days: i32, #[case] expected: Date) {
        assert_eq!(Date::from_days(days), expected);
    }

    #[test]
    fn consecutive_days_advance_by_one() {
        let mut prev = Date::from_days(DAYS_TILL_ORIGINAL_BASE_YEAR - 1);
        for days in DAYS_TILL_ORIGINAL_BASE_YEAR..DAYS_TILL_ORIGINAL_BASE_YEAR + 400 * 366 {
            let next = Date::from_days(days);
            assert!(next > prev, "{next} after {prev}");
            if next.day != 1 {
                assert_eq!((next.year, next.month, next.day - 1), (prev.year, prev.month, prev.day));
            }
            prev = next;
        }
    }

    #[test]
    fn leap_rule() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1996));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn displays_iso() {
        assert_eq!(Date::from_days(730_544).to_string(), "2000-02-29");
    }
}
