//! Calendar grid generation for the period side panel.
//!
//! Builds one block per month with leading blank cells, per-day sick-leave
//! counts and period highlight marks. Also holds the year picker window.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::date_utils::{days_in_month, first_weekday_of_month, format_date_italian, month_name};
use crate::error::LeaveAdminError;
use crate::period::{PeriodHighlight, PeriodMark, SelectedPeriod};
use crate::LeaveRequest;

/// A single day cell of a month block
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_sunday: bool,
    pub is_today: bool,
    /// Distinct sick-leave requests with a certificate on this day
    pub sick_count: usize,
    pub period_mark: PeriodMark,
    /// The request open in the detail card has a certificate on this day
    pub is_selected_request: bool,
}

impl CalendarDay {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// `2 in Malattia`, none when nobody is sick that day
    pub fn badge_label(&self) -> Option<String> {
        (self.sick_count > 0).then(|| format!("{} in Malattia", self.sick_count))
    }

    pub fn tooltip(&self) -> String {
        format_date_italian(self.date)
    }

    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["calendar-day"];
        if self.is_sunday {
            classes.push("sunday");
        }
        if self.is_today {
            classes.push("today");
        }
        if self.sick_count > 0 {
            classes.push("has-requests");
        }
        if self.is_selected_request {
            classes.push("selected-request");
        }
        classes.extend_from_slice(self.period_mark.css_classes());
        classes
    }
}

/// One month block of the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    /// 0 = January
    pub month0: u32,
    /// `Gennaio 2025`
    pub label: String,
    /// Blank cells before day 1 (Sunday = 0)
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
    pub is_current: bool,
}

impl CalendarMonth {
    /// DOM id used as scroll target
    pub fn anchor_id(&self) -> String {
        month_anchor_id(self.year, self.month0)
    }
}

pub fn month_anchor_id(year: i32, month0: u32) -> String {
    format!("month-{}-{}", year, month0)
}

/// Inclusive range of displayed years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn single(year: i32) -> Self {
        Self { from: year, to: year }
    }

    pub fn new(a: i32, b: i32) -> Self {
        Self { from: a.min(b), to: a.max(b) }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.from..=self.to
    }

    /// `2025` or `2024 - 2025`
    pub fn label(&self) -> String {
        if self.from == self.to {
            self.from.to_string()
        } else {
            format!("{} - {}", self.from, self.to)
        }
    }
}

/// Calendar service that builds month blocks relative to a fixed "today"
#[derive(Debug, Clone)]
pub struct CalendarService {
    today: NaiveDate,
}

impl CalendarService {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Years to render: a period crossing a year boundary wins over the picker
    pub fn display_years(displayed: YearRange, period: Option<&SelectedPeriod>) -> YearRange {
        match period {
            Some(period) if period.spans_years() => {
                YearRange::new(period.start_date().year(), period.end_date().year())
            }
            _ => displayed,
        }
    }

    /// All month blocks of the given years, chronologically
    pub fn generate_calendar(
        &self,
        years: YearRange,
        requests: &[LeaveRequest],
        highlight: &PeriodHighlight,
        selected_request: Option<&LeaveRequest>,
    ) -> Vec<CalendarMonth> {
        let selected_days: HashSet<NaiveDate> = selected_request
            .map(|request| request.certificate_dates().collect())
            .unwrap_or_default();

        let months: Vec<CalendarMonth> = years
            .years()
            .flat_map(|year| (0..12).map(move |month0| (year, month0)))
            .map(|(year, month0)| self.build_month(year, month0, requests, highlight, &selected_days))
            .collect();

        log::debug!(
            "Generated {} month blocks for {}",
            months.len(),
            years.label()
        );
        months
    }

    /// A single month block
    pub fn generate_month(
        &self,
        year: i32,
        month0: u32,
        requests: &[LeaveRequest],
        highlight: &PeriodHighlight,
        selected_request: Option<&LeaveRequest>,
    ) -> CalendarMonth {
        let selected_days: HashSet<NaiveDate> = selected_request
            .map(|request| request.certificate_dates().collect())
            .unwrap_or_default();
        self.build_month(year, month0, requests, highlight, &selected_days)
    }

    fn build_month(
        &self,
        year: i32,
        month0: u32,
        requests: &[LeaveRequest],
        highlight: &PeriodHighlight,
        selected_days: &HashSet<NaiveDate>,
    ) -> CalendarMonth {
        let month = month0 + 1;
        let total_days = days_in_month(year, month);
        let counts = sick_counts_by_day(requests, year, month0);

        let days = (1..=total_days)
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| CalendarDay {
                date,
                is_sunday: date.weekday().num_days_from_sunday() == 0,
                is_today: date == self.today,
                sick_count: counts.get(&date.day()).copied().unwrap_or(0),
                period_mark: highlight.mark(date),
                is_selected_request: selected_days.contains(&date),
            })
            .collect();

        CalendarMonth {
            year,
            month0,
            label: format!("{} {}", month_name(month0), year),
            leading_blanks: first_weekday_of_month(year, month),
            days,
            is_current: self.today.year() == year && self.today.month0() == month0,
        }
    }
}

/// Day of month → number of distinct sick-leave requests with a certificate that day
pub fn sick_counts_by_day(requests: &[LeaveRequest], year: i32, month0: u32) -> HashMap<u32, usize> {
    let mut ids_by_day: HashMap<u32, HashSet<i64>> = HashMap::new();
    for request in requests.iter().filter(|request| request.is_sick_leave()) {
        for date in request.certificate_dates() {
            if date.year() == year && date.month0() == month0 {
                ids_by_day.entry(date.day()).or_default().insert(request.id);
            }
        }
    }
    ids_by_day
        .into_iter()
        .map(|(day, ids)| (day, ids.len()))
        .collect()
}

/// Sliding window of year buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPicker {
    pub window_start: i32,
    pub min_year: i32,
    pub max_year: i32,
    pub window_size: i32,
}

impl YearPicker {
    /// Window that contains `year`, aligned on `min_year`
    pub fn around(year: i32, min_year: i32, max_year: i32, window_size: i32) -> Self {
        let window_size = window_size.max(1);
        let year = year.clamp(min_year, max_year);
        let offset = (year - min_year) / window_size * window_size;
        Self {
            window_start: min_year + offset,
            min_year,
            max_year,
            window_size,
        }
    }

    pub fn years(&self) -> Vec<i32> {
        (self.window_start..self.window_start + self.window_size)
            .filter(|year| *year <= self.max_year)
            .collect()
    }

    pub fn can_go_back(&self) -> bool {
        self.window_start > self.min_year
    }

    pub fn can_go_forward(&self) -> bool {
        self.window_start + self.window_size <= self.max_year
    }

    pub fn previous(&self) -> Self {
        if !self.can_go_back() {
            return *self;
        }
        Self {
            window_start: (self.window_start - self.window_size).max(self.min_year),
            ..*self
        }
    }

    pub fn next(&self) -> Self {
        if !self.can_go_forward() {
            return *self;
        }
        Self {
            window_start: self.window_start + self.window_size,
            ..*self
        }
    }
}

/// Parse `2025` or `2024 - 2026` from the picker input.
///
/// Years are clamped into `min_year..=max_year` and the range is ordered.
pub fn parse_year_input(input: &str, min_year: i32, max_year: i32) -> Result<YearRange, LeaveAdminError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LeaveAdminError::InvalidYearRange("inserisci un anno".to_string()));
    }

    let parts: Vec<&str> = trimmed.split(['-', '–']).map(str::trim).collect();
    let parse = |part: &str| -> Result<i32, LeaveAdminError> {
        if part.is_empty() || part.len() > 4 || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(LeaveAdminError::InvalidYearRange(format!(
                "\"{}\" non è un anno valido",
                trimmed
            )));
        }
        part.parse::<i32>()
            .map(|year| year.clamp(min_year, max_year))
            .map_err(|err| LeaveAdminError::InvalidYearRange(err.to_string()))
    };

    match parts.as_slice() {
        [single] => Ok(YearRange::single(parse(*single)?)),
        [first, second] => Ok(YearRange::new(parse(*first)?, parse(*second)?)),
        _ => Err(LeaveAdminError::InvalidYearRange(format!(
            "formato atteso AAAA oppure AAAA - AAAA, ricevuto \"{}\"",
            trimmed
        ))),
    }
}
