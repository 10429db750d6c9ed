//! Timescale: time standard conversions for geophysical and astronomical data
//!
//! This crate converts between calendar dates, Julian and Modified Julian
//! Days, delta times counted from named epochs, UTC and GPS time (through a
//! leap second table), and derives Earth rotation quantities such as the
//! Greenwich hour angle and sidereal time.
//!
//! ```no_run
//! use timescale::{Epoch, TimeStandard, Timescale};
//!
//! let gps = Epoch::named("gps").unwrap();
//! let ts = Timescale::from_deltatime(1_198_800_018.0, &gps, TimeStandard::Gps, 1.0).unwrap();
//! assert_eq!(ts.mjd()[0], 58119.0);
//! ```

pub mod array;
pub mod calendar;
pub mod constants;
pub mod deltatime;
pub mod epochs;
pub mod errors;
pub mod leapseconds;
pub mod time;

// Re-export commonly used types
pub use array::IntoTimeArray;
pub use calendar::CalendarTuple;
pub use deltatime::{convert_delta_time, parse_date_string};
pub use epochs::Epoch;
pub use errors::{Result, TimeError};
pub use leapseconds::{count_leap_seconds, DeltaTimeTable, LeapSecond};
pub use time::{TimeStandard, Timescale};
