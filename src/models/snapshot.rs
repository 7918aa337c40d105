use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::trip::Trip;

/// One fetch worth of records. Views only ever read it; a refresh replaces
/// the whole value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub trips: Vec<Trip>,
    pub drivers: Vec<Driver>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(trips: Vec<Trip>, drivers: Vec<Driver>) -> Self {
        Self {
            trips,
            drivers,
            fetched_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn trip(&self, id: Uuid) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.id == id)
    }
}
