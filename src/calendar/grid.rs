use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarDay {
    /// Padding before the first day of the month.
    Empty,
    Day { date: NaiveDate },
}

impl CalendarDay {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarDay::Empty => None,
            CalendarDay::Day { date } => Some(*date),
        }
    }
}

/// Leading padding (Sunday = 0) followed by every day of the month. There is
/// no trailing padding. Years chrono cannot represent yield an empty grid.
pub fn build_month_grid(year: i32, month: Month) -> Vec<CalendarDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1) else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(first);

    let mut grid = Vec::with_capacity(leading + days);
    grid.extend(std::iter::repeat(CalendarDay::Empty).take(leading));
    grid.extend(
        first
            .iter_days()
            .take(days)
            .map(|date| CalendarDay::Day { date }),
    );
    grid
}

fn days_in_month(first: NaiveDate) -> usize {
    first
        .iter_days()
        .take_while(|date| date.month() == first.month())
        .count()
}

/// The month a calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MonthRepr", try_from = "MonthRepr")]
pub struct MonthCursor {
    year: i32,
    month: Month,
}

#[derive(Serialize, Deserialize)]
struct MonthRepr {
    year: i32,
    month: u32,
}

impl From<MonthCursor> for MonthRepr {
    fn from(cursor: MonthCursor) -> Self {
        Self {
            year: cursor.year,
            month: cursor.month.number_from_month(),
        }
    }
}

impl TryFrom<MonthRepr> for MonthCursor {
    type Error = String;

    fn try_from(repr: MonthRepr) -> Result<Self, Self::Error> {
        let month = u8::try_from(repr.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| format!("month must be 1..=12, got {}", repr.month))?;
        Ok(Self::new(repr.year, month))
    }
}

impl MonthCursor {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn containing(date: NaiveDate) -> Self {
        let month = u8::try_from(date.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .unwrap_or(Month::January);
        Self::new(date.year(), month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.pred()),
        }
    }

    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self::new(self.year + 1, Month::January),
            month => Self::new(self.year, month.succ()),
        }
    }

    pub fn grid(&self) -> Vec<CalendarDay> {
        build_month_grid(self.year, self.month)
    }

    /// "February 2024".
    pub fn title(&self) -> String {
        format!("{} {}", self.month.name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Month, NaiveDate};

    use super::{build_month_grid, CalendarDay, MonthCursor};

    #[test]
    fn february_2024_has_29_days_after_four_blanks() {
        let grid = build_month_grid(2024, Month::February);

        let leading = grid
            .iter()
            .take_while(|day| **day == CalendarDay::Empty)
            .count();
        // Feb 1, 2024 was a Thursday.
        assert_eq!(leading, 4);
        assert_eq!(grid.len(), 4 + 29);
        assert_eq!(
            grid.last().and_then(CalendarDay::date),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn month_starting_on_sunday_has_no_padding() {
        // September 1, 2024 was a Sunday.
        let grid = build_month_grid(2024, Month::September);
        assert_eq!(grid.len(), 30);
        assert_eq!(grid[0].date(), NaiveDate::from_ymd_opt(2024, 9, 1));
    }

    #[test]
    fn non_leap_february_and_december() {
        let feb = build_month_grid(2023, Month::February);
        assert_eq!(feb.iter().filter(|d| d.date().is_some()).count(), 28);

        let dec = build_month_grid(2024, Month::December);
        assert_eq!(dec.iter().filter(|d| d.date().is_some()).count(), 31);
    }

    #[test]
    fn navigation_wraps_year_boundaries() {
        assert_eq!(
            MonthCursor::new(2024, Month::January).previous(),
            MonthCursor::new(2023, Month::December)
        );
        assert_eq!(
            MonthCursor::new(2024, Month::December).next(),
            MonthCursor::new(2025, Month::January)
        );
        assert_eq!(
            MonthCursor::new(2024, Month::May).next(),
            MonthCursor::new(2024, Month::June)
        );
    }

    #[test]
    fn cursor_serializes_with_month_number() {
        let cursor = MonthCursor::new(2024, Month::February);
        let value = serde_json::to_value(cursor).unwrap();
        assert_eq!(value, serde_json::json!({ "year": 2024, "month": 2 }));

        let back: MonthCursor = serde_json::from_value(value).unwrap();
        assert_eq!(back, cursor);
        assert_eq!(back.title(), "February 2024");

        assert!(serde_json::from_value::<MonthCursor>(serde_json::json!({
            "year": 2024,
            "month": 13
        }))
        .is_err());
    }
}
