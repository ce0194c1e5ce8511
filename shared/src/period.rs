//! Period selection: the three-click calendar cycle and the preset ranges.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

use crate::date_utils::{days_in_month, end_of_day, format_date_ddmmyyyy, start_of_day, to_iso_date};

/// An applied period, normalized to whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SelectedPeriod {
    /// Build a period from two days in any order
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        let (first, last) = if b < a { (b, a) } else { (a, b) };
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn spans_years(&self) -> bool {
        self.start_date().year() != self.end_date().year()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start_date() && day <= self.end_date()
    }

    /// Overlap with an item range; an open-ended item counts when it starts inside the period
    pub fn overlaps(&self, item_start: NaiveDate, item_end: Option<NaiveDate>) -> bool {
        match item_end {
            Some(item_end) => item_start <= self.end_date() && item_end >= self.start_date(),
            None => self.contains(item_start),
        }
    }

    /// `01/01/2025 al 31/01/2025`
    pub fn chip_label(&self) -> String {
        format!(
            "{} al {}",
            format_date_ddmmyyyy(self.start_date()),
            format_date_ddmmyyyy(self.end_date())
        )
    }

    /// Query parameters `(data_inizio, data_fine)`
    pub fn query_bounds(&self) -> (String, String) {
        (to_iso_date(self.start_date()), to_iso_date(self.end_date()))
    }
}

/// Days painted on the calendar for the current selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodHighlight {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Highlight classes for one day cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodMark {
    None,
    Start,
    End,
    StartEnd,
    Range,
}

impl PeriodMark {
    pub fn css_classes(&self) -> &'static [&'static str] {
        match self {
            PeriodMark::None => &[],
            PeriodMark::Start => &["period-start"],
            PeriodMark::End => &["period-end"],
            PeriodMark::StartEnd => &["period-start", "period-end"],
            PeriodMark::Range => &["period-range"],
        }
    }
}

impl PeriodHighlight {
    pub fn mark(&self, day: NaiveDate) -> PeriodMark {
        match (self.start, self.end) {
            (Some(start), None) if day == start => PeriodMark::Start,
            (Some(start), Some(end)) => {
                let is_start = day == start;
                let is_end = day == end;
                match (is_start, is_end) {
                    (true, true) => PeriodMark::StartEnd,
                    (true, false) => PeriodMark::Start,
                    (false, true) => PeriodMark::End,
                    _ if day > start && day < end => PeriodMark::Range,
                    _ => PeriodMark::None,
                }
            }
            _ => PeriodMark::None,
        }
    }
}

/// Position in the start / end / reset click cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeriodSelector {
    #[default]
    Empty,
    StartSet { start: NaiveDate },
    RangeSet { start: NaiveDate, end: NaiveDate },
}

/// What a day click asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodTransition {
    /// First click: the period becomes that single day, nothing is fetched yet
    Started(SelectedPeriod),
    /// Second click: apply the period and fetch
    Applied(SelectedPeriod),
    /// Click on a completed range: clear the period and show the clicked day
    Restarted(NaiveDate),
}

impl PeriodSelector {
    pub fn click(&mut self, day: NaiveDate) -> PeriodTransition {
        match *self {
            PeriodSelector::Empty => {
                *self = PeriodSelector::StartSet { start: day };
                PeriodTransition::Started(SelectedPeriod::single_day(day))
            }
            PeriodSelector::StartSet { start } => {
                let period = SelectedPeriod::new(start, day);
                *self = PeriodSelector::RangeSet {
                    start: period.start_date(),
                    end: period.end_date(),
                };
                PeriodTransition::Applied(period)
            }
            PeriodSelector::RangeSet { .. } => {
                *self = PeriodSelector::StartSet { start: day };
                PeriodTransition::Restarted(day)
            }
        }
    }

    /// Jump straight to a completed range (presets, default selection)
    pub fn set_range(&mut self, period: &SelectedPeriod) {
        *self = PeriodSelector::RangeSet {
            start: period.start_date(),
            end: period.end_date(),
        };
    }

    pub fn clear(&mut self) {
        *self = PeriodSelector::Empty;
    }

    pub fn highlight(&self) -> PeriodHighlight {
        match *self {
            PeriodSelector::Empty => PeriodHighlight::default(),
            PeriodSelector::StartSet { start } => PeriodHighlight { start: Some(start), end: None },
            PeriodSelector::RangeSet { start, end } => PeriodHighlight {
                start: Some(start),
                end: Some(end),
            },
        }
    }
}

/// Quick period buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodPreset {
    LastMonth,
    LastSixMonths,
    LastYear,
    NextWeek,
    Next15Days,
    NextMonth,
}

impl PeriodPreset {
    pub const ALL: [PeriodPreset; 6] = [
        PeriodPreset::LastMonth,
        PeriodPreset::LastSixMonths,
        PeriodPreset::LastYear,
        PeriodPreset::NextWeek,
        PeriodPreset::Next15Days,
        PeriodPreset::NextMonth,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PeriodPreset::LastMonth => "last-month",
            PeriodPreset::LastSixMonths => "last-six-month",
            PeriodPreset::LastYear => "last-year",
            PeriodPreset::NextWeek => "next-week",
            PeriodPreset::Next15Days => "next-15-days",
            PeriodPreset::NextMonth => "next-month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PeriodPreset::LastMonth => "Mese scorso",
            PeriodPreset::LastSixMonths => "Ultimi 6 mesi",
            PeriodPreset::LastYear => "Anno scorso",
            PeriodPreset::NextWeek => "Prossima settimana",
            PeriodPreset::Next15Days => "Prossimi 15 giorni",
            PeriodPreset::NextMonth => "Prossimo mese",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }

    /// Range of the preset relative to `today`
    pub fn range(&self, today: NaiveDate) -> SelectedPeriod {
        match self {
            PeriodPreset::LastMonth => {
                let (year, month) = shift_month(today.year(), today.month(), -1);
                month_period(year, month).unwrap_or(SelectedPeriod::single_day(today))
            }
            PeriodPreset::LastSixMonths => {
                let start = today.checked_sub_months(Months::new(6)).unwrap_or(today);
                SelectedPeriod::new(start, today)
            }
            PeriodPreset::LastYear => {
                let year = today.year() - 1;
                match (NaiveDate::from_ymd_opt(year, 1, 1), NaiveDate::from_ymd_opt(year, 12, 31)) {
                    (Some(first), Some(last)) => SelectedPeriod::new(first, last),
                    _ => SelectedPeriod::single_day(today),
                }
            }
            PeriodPreset::NextWeek => {
                let weekday = i64::from(today.weekday().num_days_from_sunday());
                let until_monday = match (8 - weekday) % 7 {
                    0 => 7,
                    days => days,
                };
                let monday = today + Duration::days(until_monday);
                SelectedPeriod::new(monday, monday + Duration::days(6))
            }
            PeriodPreset::Next15Days => SelectedPeriod::new(today, today + Duration::days(14)),
            PeriodPreset::NextMonth => {
                let (year, month) = shift_month(today.year(), today.month(), 1);
                month_period(year, month).unwrap_or(SelectedPeriod::single_day(today))
            }
        }
    }
}

fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// 1st to last day of a month (1-based)
fn month_period(year: i32, month: u32) -> Option<SelectedPeriod> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
    Some(SelectedPeriod::new(first, last))
}
