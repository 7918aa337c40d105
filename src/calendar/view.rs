use std::fmt::Display;

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::bucket::{bucket_by_date_in, DateBuckets};
use crate::calendar::detail::TripDetail;
use crate::calendar::filter::{filter_by_driver, DriverSelector};
use crate::calendar::grid::{CalendarDay, MonthCursor, WEEKDAY_NAMES};
use crate::calendar::state::CalendarState;
use crate::models::driver::Driver;
use crate::models::non_blank;
use crate::models::trip::{Trip, TripCategory};

pub const MAX_TRIPS_PER_CELL: usize = 3;
const DEFAULT_CLIENT_LABEL: &str = "Client";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripChip {
    pub id: Uuid,
    pub time: String,
    pub client: String,
    pub driver_name: Option<String>,
    pub status: String,
    pub category: TripCategory,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayCell {
    Empty,
    Day {
        date: NaiveDate,
        day_of_month: u32,
        is_today: bool,
        is_selected: bool,
        trips: Vec<TripChip>,
        /// Trips beyond the visible chips.
        overflow: usize,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarPage {
    pub title: String,
    pub cursor: MonthCursor,
    pub weekday_names: [&'static str; 7],
    pub selected_date: NaiveDate,
    pub selected_driver: DriverSelector,
    pub driver_options: Vec<DriverOption>,
    pub cells: Vec<DayCell>,
    pub detail: Option<TripDetail>,
}

/// Builds the month view for `state` out of the current records.
pub fn render_calendar<Tz>(
    trips: &[Trip],
    drivers: &[Driver],
    state: &CalendarState,
    today: NaiveDate,
    tz: &Tz,
) -> CalendarPage
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let visible = filter_by_driver(trips, state.driver);
    let buckets = bucket_by_date_in(&visible, tz);

    let cells = state
        .cursor
        .grid()
        .into_iter()
        .map(|day| day_cell(day, &buckets, state.selected_date, today, tz))
        .collect();

    let detail = state.selected_trip.and_then(|id| {
        trips
            .iter()
            .find(|trip| trip.id == id)
            .map(|trip| TripDetail::from_trip(trip, tz))
    });

    CalendarPage {
        title: state.cursor.title(),
        cursor: state.cursor,
        weekday_names: WEEKDAY_NAMES,
        selected_date: state.selected_date,
        selected_driver: state.driver,
        driver_options: driver_options(drivers),
        cells,
        detail,
    }
}

fn day_cell<Tz>(
    day: CalendarDay,
    buckets: &DateBuckets<'_>,
    selected: NaiveDate,
    today: NaiveDate,
    tz: &Tz,
) -> DayCell
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let CalendarDay::Day { date } = day else {
        return DayCell::Empty;
    };

    let day_trips = buckets.get(&date).map(Vec::as_slice).unwrap_or_default();

    DayCell::Day {
        date,
        day_of_month: date.day(),
        is_today: date == today,
        is_selected: date == selected,
        trips: day_trips
            .iter()
            .take(MAX_TRIPS_PER_CELL)
            .map(|trip| trip_chip(trip, tz))
            .collect(),
        overflow: day_trips.len().saturating_sub(MAX_TRIPS_PER_CELL),
    }
}

fn trip_chip<Tz>(trip: &Trip, tz: &Tz) -> TripChip
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TripChip {
        id: trip.id,
        time: trip
            .pickup_at()
            .map(|at| at.with_timezone(tz).format("%H:%M").to_string())
            .unwrap_or_default(),
        client: non_blank(&trip.client_name)
            .unwrap_or(DEFAULT_CLIENT_LABEL)
            .to_string(),
        driver_name: non_blank(&trip.driver_name).map(str::to_string),
        status: trip.status.as_str().to_string(),
        category: trip.status.category(),
    }
}

pub fn driver_options(drivers: &[Driver]) -> Vec<DriverOption> {
    let mut options = Vec::with_capacity(drivers.len() + 2);
    options.push(DriverOption {
        value: DriverSelector::All.to_string(),
        label: "All Drivers".to_string(),
    });
    options.extend(drivers.iter().map(|driver| DriverOption {
        value: driver.id.to_string(),
        label: driver.display_name(),
    }));
    options.push(DriverOption {
        value: DriverSelector::Unassigned.to_string(),
        label: "Unassigned Trips".to_string(),
    });
    options
}
