//! Named reference epochs
//!
//! Each epoch is a calendar instant (UTC) used as the zero point of a time
//! standard. The Modified Julian Day of every named epoch is also published
//! as a literal so callers can skip the calendar arithmetic.

use crate::calendar::CalendarTuple;
use crate::constants::{DAY_S, JD_MJD};
use crate::deltatime::parse_iso_epoch;
use crate::errors::{Result, TimeError};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A zero point expressed as a UTC calendar instant
///
/// The Modified Julian Day is resolved once, when the epoch is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalendarTuple", into = "CalendarTuple")]
pub struct Epoch {
    calendar: CalendarTuple,
    mjd: f64,
}

/// Modified Julian Day epoch (1858-11-17)
pub const MJD_EPOCH: Epoch = Epoch::constant(1858, 11, 17, 0, 0, 0.0);
/// Network Time Protocol epoch (1900-01-01)
pub const NTP_EPOCH: Epoch = Epoch::constant(1900, 1, 1, 0, 0, MJD_NTP);
/// CNES Julian day epoch (1950-01-01)
pub const CNES_EPOCH: Epoch = Epoch::constant(1950, 1, 1, 0, 0, MJD_CNES);
/// UNIX epoch (1970-01-01)
pub const UNIX_EPOCH: Epoch = Epoch::constant(1970, 1, 1, 0, 0, MJD_UNIX);
/// GPS time origin (1980-01-06)
pub const GPS_EPOCH: Epoch = Epoch::constant(1980, 1, 6, 0, 0, MJD_GPS);
/// Tide gauge reference epoch (1992-01-01)
pub const TIDE_EPOCH: Epoch = Epoch::constant(1992, 1, 1, 0, 0, MJD_TIDE);
/// J2000.0 (2000-01-01T12:00:00)
pub const J2000_EPOCH: Epoch = Epoch::constant(2000, 1, 1, 12, 0, MJD_J2000);
/// ICESat-2 ATLAS Standard Data Product epoch (2018-01-01)
pub const ATLAS_SDP_EPOCH: Epoch = Epoch::constant(2018, 1, 1, 0, 0, MJD_ATLAS_SDP);

/// Modified Julian Day of the NTP epoch
pub const MJD_NTP: f64 = 15_020.0;
/// Modified Julian Day of the CNES epoch
pub const MJD_CNES: f64 = 33_282.0;
/// Modified Julian Day of the UNIX epoch
pub const MJD_UNIX: f64 = 40_587.0;
/// Modified Julian Day of the GPS epoch
pub const MJD_GPS: f64 = 44_244.0;
/// Modified Julian Day of the tide gauge epoch
pub const MJD_TIDE: f64 = 48_622.0;
/// Modified Julian Day of J2000.0
pub const MJD_J2000: f64 = 51_544.5;
/// Modified Julian Day of the ATLAS-SDP epoch
pub const MJD_ATLAS_SDP: f64 = 58_119.0;

/// GPS seconds at the ATLAS-SDP epoch, including its 18 leap seconds
pub const ATLAS_SDP_GPS_SECONDS: f64 = 1_198_800_018.0;

/// Pairs of (name, epoch) in the registry
const EPOCH_NAME_PAIRS: [(&str, Epoch); 8] = [
    ("mjd", MJD_EPOCH),
    ("ntp", NTP_EPOCH),
    ("cnes", CNES_EPOCH),
    ("unix", UNIX_EPOCH),
    ("gps", GPS_EPOCH),
    ("tide", TIDE_EPOCH),
    ("j2000", J2000_EPOCH),
    ("atlas_sdp", ATLAS_SDP_EPOCH),
];

lazy_static! {
    /// Map from lowercase epoch names to epochs
    static ref EPOCHS: HashMap<&'static str, Epoch> = EPOCH_NAME_PAIRS.iter().copied().collect();
}

impl Epoch {
    const fn constant(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        mjd: f64,
    ) -> Self {
        Self {
            calendar: CalendarTuple {
                year,
                month,
                day,
                hour,
                minute,
                second: 0.0,
            },
            mjd,
        }
    }

    /// Create an epoch from a validated calendar tuple
    pub fn new(calendar: CalendarTuple) -> Result<Self> {
        calendar.validate()?;
        Ok(Self {
            calendar,
            mjd: calendar.mjd(),
        })
    }

    /// Look up a named epoch (`gps`, `unix`, `atlas_sdp`, ...), ignoring case
    pub fn named(name: &str) -> Option<Epoch> {
        let key = name.trim().to_lowercase().replace('-', "_");
        EPOCHS.get(key.as_str()).copied()
    }

    /// Resolve a registry name or an ISO-8601 date string
    pub fn resolve(value: &str) -> Result<Epoch> {
        if let Some(epoch) = Self::named(value) {
            return Ok(epoch);
        }
        parse_iso_epoch(value).map_err(|_| TimeError::UnknownEpoch(value.to_string()))
    }

    /// The calendar instant of this epoch
    pub fn calendar(&self) -> &CalendarTuple {
        &self.calendar
    }

    /// Modified Julian Day of this epoch
    pub fn mjd(&self) -> f64 {
        self.mjd
    }

    /// Julian date of this epoch
    pub fn jd(&self) -> f64 {
        self.mjd() + JD_MJD
    }

    /// Seconds from `other` to this epoch
    pub fn seconds_since(&self, other: &Epoch) -> f64 {
        (self.calendar.day_number() - other.calendar.day_number()) as f64 * DAY_S
            + (self.calendar.seconds_of_day() - other.calendar.seconds_of_day())
    }
}

impl TryFrom<CalendarTuple> for Epoch {
    type Error = TimeError;

    fn try_from(calendar: CalendarTuple) -> Result<Self> {
        Self::new(calendar)
    }
}

impl From<Epoch> for CalendarTuple {
    fn from(epoch: Epoch) -> Self {
        epoch.calendar
    }
}

impl TryFrom<(i32, u32, u32)> for Epoch {
    type Error = TimeError;

    fn try_from(date: (i32, u32, u32)) -> Result<Self> {
        CalendarTuple::try_from(date).and_then(Self::new)
    }
}

impl TryFrom<(i32, u32, u32, u32, u32, f64)> for Epoch {
    type Error = TimeError;

    fn try_from(tuple: (i32, u32, u32, u32, u32, f64)) -> Result<Self> {
        CalendarTuple::try_from(tuple).and_then(Self::new)
    }
}

impl FromStr for Epoch {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.calendar.fmt(f)
    }
}
