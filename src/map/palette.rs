use crate::models::driver::DriverStatus;
use crate::models::trip::TripStatus;

const GREEN: &str = "#34D399";
const AMBER: &str = "#F59E0B";
const GRAY: &str = "#9CA3AF";
const BLUE: &str = "#3B82F6";
const RED: &str = "#EF4444";

pub const DROPOFF_COLOR: &str = GRAY;

pub fn driver_color(status: &DriverStatus) -> &'static str {
    match status {
        DriverStatus::Available => GREEN,
        DriverStatus::OnTrip => AMBER,
        DriverStatus::Offline | DriverStatus::Other(_) => GRAY,
    }
}

pub fn trip_color(status: &TripStatus) -> &'static str {
    match status {
        TripStatus::InProgress => AMBER,
        TripStatus::Completed => GREEN,
        TripStatus::Cancelled => RED,
        _ => BLUE,
    }
}
