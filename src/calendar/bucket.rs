use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use tracing::debug;

use crate::models::trip::Trip;

/// Trips keyed by pickup date. Keys display as ISO dates (`2024-02-01`).
pub type DateBuckets<'a> = BTreeMap<NaiveDate, Vec<&'a Trip>>;

/// Groups trips by the UTC date of their pickup time.
pub fn bucket_by_date(trips: &[Trip]) -> DateBuckets<'_> {
    bucket_by_date_in(trips, &Utc)
}

/// Groups trips by the date their pickup time falls on in `tz`.
///
/// Input order is kept inside each bucket. Trips without a readable pickup
/// time are left out rather than failing the pass.
pub fn bucket_by_date_in<'a, Tz: TimeZone>(trips: &'a [Trip], tz: &Tz) -> DateBuckets<'a> {
    let mut buckets: DateBuckets<'a> = BTreeMap::new();

    for trip in trips {
        let Some(pickup_at) = trip.pickup_at() else {
            debug!(trip_id = %trip.id, pickup_time = ?trip.pickup_time, "skipping trip without usable pickup time");
            continue;
        };

        let date = pickup_at.with_timezone(tz).date_naive();
        buckets.entry(date).or_default().push(trip);
    }

    buckets
}
