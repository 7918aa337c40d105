pub mod bucket;
pub mod detail;
pub mod filter;
pub mod grid;
pub mod state;
pub mod view;

pub use bucket::{bucket_by_date, bucket_by_date_in, DateBuckets};
pub use filter::{filter_by_driver, DriverSelector};
pub use grid::{build_month_grid, CalendarDay, MonthCursor};
pub use state::{CalendarAction, CalendarState, ClickTarget};
pub use view::{render_calendar, CalendarPage};
