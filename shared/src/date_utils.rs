//! Date formatting and day-count helpers used across the admin screen.
//!
//! Everything here is pure: the current date is always passed in by the
//! caller so the helpers behave the same on the host and in the browser.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

pub const ITALIAN_MONTHS: [&str; 12] = [
    "Gennaio", "Febbraio", "Marzo", "Aprile", "Maggio", "Giugno",
    "Luglio", "Agosto", "Settembre", "Ottobre", "Novembre", "Dicembre",
];

pub const ITALIAN_MONTHS_SHORT: [&str; 12] = [
    "Gen", "Feb", "Mar", "Apr", "Mag", "Giu", "Lug", "Ago", "Set", "Ott", "Nov", "Dic",
];

/// Sunday first, matching `num_days_from_sunday`
pub const ITALIAN_WEEKDAYS_SHORT: [&str; 7] = ["Dom", "Lun", "Mar", "Mer", "Gio", "Ven", "Sab"];

/// Unit of a leave quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUnit {
    Days,
    Hours,
}

/// Parse `YYYY-MM-DD`, also accepting a trailing time part (`2025-01-22T08:00:00`)
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `2025-01-22` → `22/01/25`. Empty input gives an empty string, unparsable input is returned as is.
pub fn format_date_ddmmyy(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    match parse_iso_date(value) {
        Some(date) => date.format("%d/%m/%y").to_string(),
        None => value.to_string(),
    }
}

/// `22/01/2025`
pub fn format_date_ddmmyyyy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Short Italian label such as `Gio 18 Dic`
pub fn format_date_italian(date: NaiveDate) -> String {
    let weekday = ITALIAN_WEEKDAYS_SHORT[date.weekday().num_days_from_sunday() as usize];
    let month = ITALIAN_MONTHS_SHORT[date.month0() as usize];
    format!("{} {} {}", weekday, date.day(), month)
}

/// Full Italian month name for a 0-based month index
pub fn month_name(month0: u32) -> &'static str {
    ITALIAN_MONTHS.get(month0 as usize).copied().unwrap_or("")
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a month (1-based month)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => if is_leap_year(year) { 29 } else { 28 },
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Weekday of the 1st of the month (0 = Sunday, 1 = Monday, ...)
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Inclusive number of days between two dates, order-insensitive
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

/// Snap a quantity for display. Hours go to the nearest half hour
/// (fraction < 0.25 down, < 0.75 to .5, otherwise up); days round to an integer.
pub fn normalize_quantity(value: f64, unit: QuantityUnit) -> f64 {
    match unit {
        QuantityUnit::Days => value.round(),
        QuantityUnit::Hours => {
            let whole = value.floor();
            let fraction = value - whole;
            if fraction < 0.25 {
                whole
            } else if fraction < 0.75 {
                whole + 0.5
            } else {
                whole + 1.0
            }
        }
    }
}

/// Render a normalized quantity without a trailing `.0`
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// 00:00:00.000 of the given day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of the given day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_milli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_ddmmyy() {
        assert_eq!(format_date_ddmmyy("2025-01-22"), "22/01/25");
        assert_eq!(format_date_ddmmyy("2025-01-22T10:30:00"), "22/01/25");
        assert_eq!(format_date_ddmmyy(""), "");
        assert_eq!(format_date_ddmmyy("not a date"), "not a date");
    }

    #[test]
    fn test_format_date_italian() {
        assert_eq!(format_date_italian(date(2025, 12, 18)), "Gio 18 Dic");
        assert_eq!(format_date_italian(date(2026, 1, 4)), "Dom 4 Gen");
    }

    #[test]
    fn test_format_date_ddmmyyyy() {
        assert_eq!(format_date_ddmmyyyy(date(2025, 3, 7)), "07/03/2025");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), "Gennaio");
        assert_eq!(month_name(11), "Dicembre");
        assert_eq!(month_name(12), "");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_first_weekday_of_month() {
        // 1 Jan 2025 was a Wednesday
        assert_eq!(first_weekday_of_month(2025, 1), 3);
        // 1 Jun 2025 was a Sunday
        assert_eq!(first_weekday_of_month(2025, 6), 0);
    }

    #[test]
    fn test_days_between_inclusive() {
        assert_eq!(days_between_inclusive(date(2025, 1, 1), date(2025, 1, 1)), 1);
        assert_eq!(days_between_inclusive(date(2025, 1, 1), date(2025, 1, 5)), 5);
        assert_eq!(days_between_inclusive(date(2025, 1, 5), date(2025, 1, 1)), 5);
        assert_eq!(days_between_inclusive(date(2024, 12, 30), date(2025, 1, 2)), 4);
    }

    #[test]
    fn test_normalize_hours() {
        assert_eq!(normalize_quantity(2.2, QuantityUnit::Hours), 2.0);
        assert_eq!(normalize_quantity(2.25, QuantityUnit::Hours), 2.5);
        assert_eq!(normalize_quantity(2.5, QuantityUnit::Hours), 2.5);
        assert_eq!(normalize_quantity(2.7, QuantityUnit::Hours), 2.5);
        assert_eq!(normalize_quantity(2.77, QuantityUnit::Hours), 3.0);
        assert_eq!(normalize_quantity(2.75, QuantityUnit::Hours), 3.0);
        assert_eq!(normalize_quantity(4.0, QuantityUnit::Hours), 4.0);
    }

    #[test]
    fn test_normalize_days() {
        assert_eq!(normalize_quantity(2.4, QuantityUnit::Days), 2.0);
        assert_eq!(normalize_quantity(2.5, QuantityUnit::Days), 3.0);
        assert_eq!(normalize_quantity(0.0, QuantityUnit::Days), 0.0);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.5");
    }

    #[test]
    fn test_day_boundaries() {
        let day = date(2025, 5, 10);
        assert_eq!(start_of_day(day).to_string(), "2025-05-10 00:00:00");
        assert_eq!(end_of_day(day).to_string(), "2025-05-10 23:59:59.999");
    }
}
