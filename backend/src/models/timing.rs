//! Swim timings (minutes, seconds, hundredths).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::db::models::{record_i64, Record};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Timing {
    pub minutes: i64,
    pub seconds: i64,
    pub hundredths: i64,
}

impl Timing {
    /// Build a timing, carrying overflowing hundredths and seconds.
    pub fn new(minutes: i64, seconds: i64, hundredths: i64) -> Self {
        Self::from_hundredths(minutes * 6000 + seconds * 100 + hundredths)
    }

    pub fn from_hundredths(total: i64) -> Self {
        Self {
            minutes: total / 6000,
            seconds: (total % 6000) / 100,
            hundredths: total % 100,
        }
    }

    pub fn to_hundredths(&self) -> i64 {
        self.minutes * 6000 + self.seconds * 100 + self.hundredths
    }

    pub fn is_zero(&self) -> bool {
        self.to_hundredths() == 0
    }

    /// Read the `minutes`/`seconds`/`hundredths` attributes of a result row.
    ///
    /// Missing parts count as zero; a row without any part yields `None`.
    pub fn from_record(record: &Record) -> Option<Self> {
        let parts = [
            record_i64(record, "minutes"),
            record_i64(record, "seconds"),
            record_i64(record, "hundredths"),
        ];
        if parts.iter().all(Option::is_none) {
            return None;
        }
        let [m, s, h] = parts.map(|p| p.unwrap_or(0));
        Some(Self::new(m, s, h))
    }
}

impl PartialEq for Timing {
    fn eq(&self, other: &Self) -> bool {
        self.to_hundredths() == other.to_hundredths()
    }
}

impl Eq for Timing {}

impl PartialOrd for Timing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timing {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_hundredths().cmp(&other.to_hundredths())
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{:02}\"{:02}", self.minutes, self.seconds, self.hundredths)
    }
}
