//! Parsing of ISO-8601 dates and "<units> since <date>" strings

use crate::calendar::CalendarTuple;
use crate::epochs::{Epoch, UNIX_EPOCH};
use crate::errors::{Result, TimeError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

/// Date and time formats carrying a fixed UTC offset
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Date and time formats read as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

lazy_static! {
    /// "<units> since <date>"
    static ref UNITS_SINCE: Regex =
        Regex::new(r"(?i)^\s*([a-z]+)\s+since\s+(\S.*?)\s*$").expect("valid units regex");
}

/// Seconds in one of the recognised time units
fn unit_seconds(units: &str) -> Option<f64> {
    let units = units.to_lowercase();
    match units.strip_suffix('s').unwrap_or(&units) {
        "microsecond" => Some(1e-6),
        "millisecond" => Some(1e-3),
        "second" => Some(1.0),
        "minute" => Some(60.0),
        "hour" => Some(3600.0),
        "day" => Some(86400.0),
        _ => None,
    }
}

/// Parse an ISO-8601 date into a UTC datetime, folding in any UTC offset
fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    let value = value.strip_suffix('Z').unwrap_or(value);

    for format in OFFSET_FORMATS {
        if let Ok(datetime) = DateTime::parse_from_str(value, format) {
            return Ok(datetime.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimeError::ParseError(format!("invalid date '{}'", value)))
}

/// Parse an ISO-8601 date (optionally with a time and UTC offset) as an epoch
pub fn parse_iso_epoch(value: &str) -> Result<Epoch> {
    let datetime = parse_datetime(value)?;
    Epoch::new(CalendarTuple {
        year: datetime.year(),
        month: datetime.month(),
        day: datetime.day(),
        hour: datetime.hour(),
        minute: datetime.minute(),
        // leap seconds arrive as nanoseconds past 1e9
        second: datetime.second() as f64 + datetime.nanosecond() as f64 / 1_000_000_000.0,
    })
}

/// Parse a date string into its epoch and the seconds in one unit
///
/// `"days since 1858-11-17T00:00:00"` gives the MJD epoch and 86400.0. A bare
/// date such as `"2000-01-01T12:00:00-06:00"` is an absolute timestamp and
/// gives its instant in UTC with a unit of 0.0.
pub fn parse_date_string(time_string: &str) -> Result<(Epoch, f64)> {
    if let Ok(epoch) = parse_iso_epoch(time_string) {
        log::debug!("'{}' is an absolute date {}", time_string, epoch);
        return Ok((epoch, 0.0));
    }

    let captures = UNITS_SINCE.captures(time_string).ok_or_else(|| {
        TimeError::ParseError(format!("unrecognised date string '{}'", time_string))
    })?;
    let units = &captures[1];
    let scale = unit_seconds(units).ok_or_else(|| TimeError::InvalidUnits(units.to_string()))?;
    let epoch = parse_iso_epoch(&captures[2])?;
    log::debug!("'{}' counts {} s units from {}", time_string, scale, epoch);
    Ok((epoch, scale))
}

/// Reformat a date string as `YYYY-MM-DDTHH:MM:SS`
pub fn isoformat(time_string: &str) -> Result<String> {
    parse_iso_epoch(time_string).map(|epoch| epoch.to_string())
}

/// Seconds since the UNIX epoch of a date string
pub fn get_unix_time(time_string: &str) -> Result<f64> {
    parse_iso_epoch(time_string).map(|epoch| epoch.seconds_since(&UNIX_EPOCH))
}
