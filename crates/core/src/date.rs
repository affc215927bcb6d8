// SPDX-License-Identifier: MIT

//!
//! The window of selectable dates
//!

use crate::ErrorKind;
use chrono::{Datelike, Days, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can arise when building a [`DateWindow`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The window size is not allowed (must be >= 1)
    #[error("Window size `{0}` is not allowed (must be at least 1)")]
    InvalidSize(i64),

    /// The window would start or end outside the representable calendar
    #[error("A {size} day window offset by {offset} days from {today} leaves the calendar")]
    CalendarOverflow {
        today: NaiveDate,
        offset: i64,
        size: usize,
    },
}

impl WindowError {
    /// Both variants are configuration mistakes
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

/// Provides "today" to the window builder
///
/// Nothing in this crate reads the system clock directly, the caller chooses.
pub trait Clock {
    /// The current local calendar date
    fn today(&self) -> NaiveDate;
}

/// The local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The number of dates in a [`DateWindow`] (always at least 1)
#[rustfmt::skip]
#[derive(derive_more::Display, Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WindowSize(usize);

impl WindowSize {
    pub fn value(&self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for WindowSize {
    type Error = WindowError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value >= 1 {
            Ok(WindowSize(value as usize))
        } else {
            Err(WindowError::InvalidSize(value))
        }
    }
}

impl<'de> Deserialize<'de> for WindowSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        WindowSize::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// How the human readable label of a [`DateOption`] is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// e.g. `6月1日（土）`
    #[default]
    Japanese,

    /// e.g. `Sat 1 Jun`
    English,
}

impl LabelStyle {
    /// Render the label for a date
    pub fn display(&self, date: NaiveDate) -> String {
        match self {
            LabelStyle::Japanese => format!(
                "{}月{}日（{}）",
                date.month(),
                date.day(),
                japanese_weekday(date.weekday())
            ),
            LabelStyle::English => date.format("%a %-d %b").to_string(),
        }
    }
}

/// Single kanji weekday name
fn japanese_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// One selectable date
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateOption {
    /// Label shown to the user
    display: String,

    /// Canonical form handed downstream (`yy/mm/dd`)
    value: String,

    /// The date used for ordering
    calendar_date: NaiveDate,
}

impl DateOption {
    /// Create the option for a date
    pub fn new(calendar_date: NaiveDate, style: LabelStyle) -> Self {
        Self {
            display: style.display(calendar_date),
            value: calendar_date.format("%y/%m/%d").to_string(),
            calendar_date,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn calendar_date(&self) -> NaiveDate {
        self.calendar_date
    }
}

/// Consecutive days in ascending order, generated once at startup.
///
/// Index order is chronological order, so comparing two indices is the same as
/// comparing the two dates.
#[derive(derive_more::IntoIterator, derive_more::Index, Clone, Debug, PartialEq, Eq)]
#[into_iterator(ref)]
pub struct DateWindow(Vec<DateOption>);

impl DateWindow {
    /// `window_size` days starting today, with Japanese labels
    pub fn initialize(clock: &impl Clock, window_size: i64) -> Result<Self, WindowError> {
        Self::initialize_with(clock, window_size, 0, LabelStyle::default())
    }

    /// `window_size` days starting `start_offset` days after today
    pub fn initialize_with(
        clock: &impl Clock,
        window_size: i64,
        start_offset: i64,
        style: LabelStyle,
    ) -> Result<Self, WindowError> {
        let size = WindowSize::try_from(window_size)?;
        let today = clock.today();
        let overflow = || WindowError::CalendarOverflow {
            today,
            offset: start_offset,
            size: size.value(),
        };

        // Make sure both ends of the window exist before building anything
        let first = Duration::try_days(start_offset)
            .and_then(|offset| today.checked_add_signed(offset))
            .ok_or_else(overflow)?;
        i64::try_from(size.value() - 1)
            .ok()
            .and_then(Duration::try_days)
            .and_then(|span| first.checked_add_signed(span))
            .ok_or_else(overflow)?;

        let options = (0..size.value() as u64)
            .map(|offset| {
                first
                    .checked_add_days(Days::new(offset))
                    .map(|date| DateOption::new(date, style))
                    .ok_or_else(overflow)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DateWindow(options))
    }

    /// All options, oldest first
    pub fn options(&self) -> &[DateOption] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a window built by [`DateWindow::initialize`]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DateOption> {
        self.0.get(index)
    }

    /// Index of the latest date
    pub fn last_index(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// The display labels, in order
    pub fn display_labels(&self) -> Vec<&str> {
        self.0.iter().map(DateOption::display).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn june_first() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn window_size() {
        assert!(WindowSize::try_from(0).is_err());
        assert!(WindowSize::try_from(-3).is_err());
        assert_eq!(WindowSize::try_from(7).unwrap().value(), 7);
        assert!(serde_json::from_str::<WindowSize>("0").is_err());
        assert_eq!(serde_json::from_str::<WindowSize>("5").unwrap().value(), 5);
    }

    #[test]
    fn initialize() {
        let window = DateWindow::initialize(&june_first(), 7).unwrap();
        assert_eq!(window.len(), 7);
        assert_eq!(window[0].calendar_date(), june_first().0);
        assert_eq!(window[0].value(), "24/06/01");
        assert_eq!(window[0].display(), "6月1日（土）");
        assert_eq!(window[6].value(), "24/06/07");
        assert_eq!(window[6].display(), "6月7日（金）");
        let mut count = 0;
        for option in &window {
            assert_eq!(option.value().len(), 8);
            count += 1;
        }
        assert_eq!(count, 7);
        for pair in window.options().windows(2) {
            assert!(pair[0].calendar_date() < pair[1].calendar_date());
            assert_eq!(pair[1].calendar_date() - pair[0].calendar_date(), Duration::days(1));
        }
    }

    #[test]
    fn initialize_rejects_non_positive_sizes() {
        for size in [0, -1, i64::MIN] {
            let error = DateWindow::initialize(&june_first(), size).unwrap_err();
            assert_eq!(error, WindowError::InvalidSize(size));
            assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
        }
    }

    #[test]
    fn initialize_for_every_small_size() {
        for size in 1..=40 {
            let window = DateWindow::initialize(&june_first(), size).unwrap();
            assert_eq!(window.len(), size as usize);
            assert_eq!(window[0].calendar_date(), june_first().0);
            assert!(!window.is_empty());
        }
    }

    #[test]
    fn initialize_across_month_and_year_ends() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        let window = DateWindow::initialize(&clock, 4).unwrap();
        let values: Vec<&str> = window.options().iter().map(DateOption::value).collect();
        assert_eq!(values, ["24/12/30", "24/12/31", "25/01/01", "25/01/02"]);
        assert_eq!(window[2].display(), "1月1日（水）");
    }

    #[test]
    fn initialize_with_offset_and_style() {
        let window =
            DateWindow::initialize_with(&june_first(), 3, 2, LabelStyle::English).unwrap();
        assert_eq!(window[0].value(), "24/06/03");
        assert_eq!(window.display_labels(), ["Mon 3 Jun", "Tue 4 Jun", "Wed 5 Jun"]);
    }

    #[test]
    fn initialize_past_the_calendar() {
        let clock = FixedClock(NaiveDate::MAX);
        assert!(matches!(
            DateWindow::initialize(&clock, 2),
            Err(WindowError::CalendarOverflow { .. })
        ));
        assert_eq!(DateWindow::initialize(&clock, 1).unwrap().len(), 1);
    }
}
