use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::filter::DriverSelector;
use crate::calendar::grid::MonthCursor;

pub const ESCAPE_KEY: &str = "Escape";

/// What a pointer press landed on. A press on a trip chip is consumed by the
/// chip and never reaches the day cell underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ClickTarget {
    Day { date: NaiveDate },
    Trip { trip_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarAction {
    PreviousMonth,
    NextMonth,
    Today { date: NaiveDate },
    SelectDate { date: NaiveDate },
    OpenTrip { trip_id: Uuid },
    CloseDetail,
    KeyPressed { key: String },
    SetDriver { driver: DriverSelector },
    Click { click: ClickTarget },
}

impl From<ClickTarget> for CalendarAction {
    fn from(click: ClickTarget) -> Self {
        match click {
            ClickTarget::Day { date } => CalendarAction::SelectDate { date },
            ClickTarget::Trip { trip_id } => CalendarAction::OpenTrip { trip_id },
        }
    }
}

/// View-local calendar state. Every change goes through [`CalendarState::apply`],
/// which hands back a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarState {
    pub cursor: MonthCursor,
    pub selected_date: NaiveDate,
    pub driver: DriverSelector,
    pub selected_trip: Option<Uuid>,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            cursor: MonthCursor::containing(today),
            selected_date: today,
            driver: DriverSelector::All,
            selected_trip: None,
        }
    }

    pub fn detail_open(&self) -> bool {
        self.selected_trip.is_some()
    }

    pub fn apply(self, action: CalendarAction) -> Self {
        match action {
            CalendarAction::PreviousMonth => Self {
                cursor: self.cursor.previous(),
                ..self
            },
            CalendarAction::NextMonth => Self {
                cursor: self.cursor.next(),
                ..self
            },
            CalendarAction::Today { date } => Self {
                cursor: MonthCursor::containing(date),
                selected_date: date,
                ..self
            },
            CalendarAction::SelectDate { date } => Self {
                selected_date: date,
                ..self
            },
            CalendarAction::OpenTrip { trip_id } => Self {
                selected_trip: Some(trip_id),
                ..self
            },
            CalendarAction::CloseDetail => Self {
                selected_trip: None,
                ..self
            },
            CalendarAction::KeyPressed { key } if key == ESCAPE_KEY => Self {
                selected_trip: None,
                ..self
            },
            CalendarAction::KeyPressed { .. } => self,
            CalendarAction::SetDriver { driver } => Self { driver, ..self },
            CalendarAction::Click { click } => self.apply(click.into()),
        }
    }
}
