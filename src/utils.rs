/// Common calendar and parsing helpers.
use chrono::{Datelike, NaiveDate};

/// Case-insensitive lookup of a mnemonic in a table of names.
///
/// Returns the index of the name within the table, so the caller decides how
/// indexes map to field values (weekdays are 0-based, months are 1-based).
pub(crate) fn parse_name_value(input: &str, names: &[&str]) -> Option<u16> {
    names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(input))
        .map(|index| index as u16)
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the month.
///
/// # Panics
///
/// Panics if month is out of 1-12 range.
pub(crate) fn days_in_month(year: i32, month: u16) -> u16 {
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
        _ => panic!("invalid month value: {month}"),
    }
}

/// Day of the week of a particular date, as 0 (Sunday) to 6 (Saturday).
///
/// # Panics
///
/// Panics if the date is invalid.
pub(crate) fn day_of_week(year: i32, month: u16, day: u16) -> u16 {
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .map(|date| date.weekday().num_days_from_sunday() as u16)
        .unwrap_or_else(|| panic!("invalid date: {year:04}-{month:02}-{day:02}"))
}

/// Shifts a (year, month) pair by a signed number of months.
pub(crate) fn add_months(year: i32, month: u16, delta: i32) -> (i32, u16) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u16)
}
