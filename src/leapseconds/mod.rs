//! Leap second table and counter
//!
//! A [`DeltaTimeTable`] holds the dates at which UTC was stepped back by one
//! second relative to GPS time, as (MJD, cumulative count) breakpoints. The
//! count at an instant is the count of the latest breakpoint at or before it;
//! there is no interpolation between breakpoints.

use crate::array::IntoTimeArray;
use crate::constants::{DAY_S, TAI_MINUS_GPS_S};
use crate::epochs::MJD_GPS;
use crate::errors::{Result, TimeError};
use lazy_static::lazy_static;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A leap second breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeapSecond {
    /// UTC Modified Julian Day from which the count applies
    pub mjd: f64,
    /// Leap seconds accumulated since the GPS epoch
    pub count: i32,
}

/// TAI-UTC in seconds from each bulletin date since 1972 (MJD, offset)
const TAI_UTC_BREAKPOINTS: [(f64, i32); 28] = [
    (41317.0, 10), // 1972-01-01
    (41499.0, 11), // 1972-07-01
    (41683.0, 12), // 1973-01-01
    (42048.0, 13), // 1974-01-01
    (42413.0, 14), // 1975-01-01
    (42778.0, 15), // 1976-01-01
    (43144.0, 16), // 1977-01-01
    (43509.0, 17), // 1978-01-01
    (43874.0, 18), // 1979-01-01
    (44239.0, 19), // 1980-01-01
    (44786.0, 20), // 1981-07-01
    (45151.0, 21), // 1982-07-01
    (45516.0, 22), // 1983-07-01
    (46247.0, 23), // 1985-07-01
    (47161.0, 24), // 1988-01-01
    (47892.0, 25), // 1990-01-01
    (48257.0, 26), // 1991-01-01
    (48804.0, 27), // 1992-07-01
    (49169.0, 28), // 1993-07-01
    (49534.0, 29), // 1994-07-01
    (50083.0, 30), // 1996-01-01
    (50630.0, 31), // 1997-07-01
    (51179.0, 32), // 1999-01-01
    (53736.0, 33), // 2006-01-01
    (54832.0, 34), // 2009-01-01
    (56109.0, 35), // 2012-07-01
    (57204.0, 36), // 2015-07-01
    (57754.0, 37), // 2017-01-01
];

lazy_static! {
    /// Leap seconds since the GPS epoch through the 2017-01-01 bulletin
    static ref BUILTIN_TABLE: DeltaTimeTable = DeltaTimeTable {
        entries: gps_era_entries(&TAI_UTC_BREAKPOINTS),
    };
}

/// Convert TAI-UTC breakpoints into counts since the GPS epoch
fn gps_era_entries(breakpoints: &[(f64, i32)]) -> Vec<LeapSecond> {
    let mut entries = vec![LeapSecond {
        mjd: MJD_GPS,
        count: 0,
    }];
    entries.extend(
        breakpoints
            .iter()
            .filter(|&&(mjd, _)| mjd > MJD_GPS)
            .map(|&(mjd, offset)| LeapSecond {
                mjd,
                count: offset - TAI_MINUS_GPS_S as i32,
            }),
    );
    entries
}

/// Sorted leap second breakpoints
///
/// Breakpoint dates strictly increase and counts never decrease. A table is
/// read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LeapSecond>", into = "Vec<LeapSecond>")]
pub struct DeltaTimeTable {
    entries: Vec<LeapSecond>,
}

impl DeltaTimeTable {
    /// Create a table, checking ordering and monotonicity
    pub fn new(entries: Vec<LeapSecond>) -> Result<Self> {
        if entries.is_empty() {
            return Err(TimeError::InvalidTable("table has no breakpoints".into()));
        }
        if let Some(bad) = entries.iter().find(|e| !e.mjd.is_finite()) {
            return Err(TimeError::InvalidTable(format!(
                "non-finite breakpoint date {}",
                bad.mjd
            )));
        }
        for pair in entries.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.mjd >= b.mjd {
                return Err(TimeError::InvalidTable(format!(
                    "breakpoints not strictly increasing at MJD {}",
                    b.mjd
                )));
            }
            if a.count > b.count {
                return Err(TimeError::InvalidTable(format!(
                    "leap second count decreases at MJD {}",
                    b.mjd
                )));
            }
        }
        log::debug!(
            "delta time table with {} breakpoints, MJD {} to {}",
            entries.len(),
            entries[0].mjd,
            entries[entries.len() - 1].mjd
        );
        Ok(Self { entries })
    }

    /// Build a GPS-era table from published TAI-UTC breakpoints
    ///
    /// Breakpoints before the GPS epoch are folded into a zero-count entry
    /// at the GPS epoch.
    pub fn from_tai_utc(breakpoints: &[(f64, i32)]) -> Result<Self> {
        Self::new(gps_era_entries(breakpoints))
    }

    /// The built-in table
    pub fn builtin() -> &'static DeltaTimeTable {
        &BUILTIN_TABLE
    }

    pub fn entries(&self) -> &[LeapSecond] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the latest breakpoint whose key is at or before `value`
    fn lookup(&self, value: f64, key: impl Fn(&LeapSecond) -> f64) -> i32 {
        let index = self.entries.partition_point(|entry| key(entry) <= value);
        if index == 0 {
            log::warn!(
                "leap second lookup at {} precedes the first breakpoint, clamping",
                value
            );
            self.entries[0].count
        } else {
            self.entries[index - 1].count
        }
    }

    /// Leap seconds in effect at a UTC Modified Julian Day
    pub fn leap_seconds_at_mjd(&self, mjd: f64) -> i32 {
        self.lookup(mjd, |entry| entry.mjd)
    }

    /// Leap seconds in effect at a number of GPS seconds since the GPS epoch
    ///
    /// A breakpoint takes effect once GPS time has passed the UTC instant of
    /// the breakpoint plus the leap seconds already accumulated by then.
    pub fn count_leap_seconds(&self, gps_seconds: f64) -> i32 {
        // Key is `utc_seconds + count`, not `utc_seconds + count - 1`. GPS
        // time inside the inserted 23:59:60 keeps the previous count and
        // lands on 00:00:00 of the new day, so that UTC second is reached
        // twice rather than 23:59:59.
        self.lookup(gps_seconds, |entry| {
            (entry.mjd - MJD_GPS) * DAY_S + entry.count as f64
        })
    }

    /// Leap seconds for each GPS time
    pub fn count_leap_seconds_array<A: IntoTimeArray>(&self, gps_seconds: A) -> Array1<f64> {
        gps_seconds
            .into_time_array()
            .mapv(|gps| self.count_leap_seconds(gps) as f64)
    }
}

impl Default for DeltaTimeTable {
    fn default() -> Self {
        BUILTIN_TABLE.clone()
    }
}

impl TryFrom<Vec<LeapSecond>> for DeltaTimeTable {
    type Error = TimeError;

    fn try_from(entries: Vec<LeapSecond>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<DeltaTimeTable> for Vec<LeapSecond> {
    fn from(table: DeltaTimeTable) -> Self {
        table.entries
    }
}

/// Count leap seconds for GPS times using the built-in table
pub fn count_leap_seconds<A: IntoTimeArray>(gps_seconds: A) -> Array1<f64> {
    BUILTIN_TABLE.count_leap_seconds_array(gps_seconds)
}
