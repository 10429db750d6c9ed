//! Calendar date and Julian date conversion functions
//!
//! This module converts between proleptic Gregorian calendar dates, Julian
//! days, Modified Julian days and decimal years. Integer day numbers follow
//! the algorithm in the Explanatory Supplement to the Astronomical Almanac
//! 15.11, so whole days are exact and only the time of day is floating point.

use crate::array::IntoTimeArray;
use crate::constants::{DAY_S, JD_MJD};
use crate::epochs::Epoch;
use crate::errors::{Result, TimeError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days per month in a standard year
const DPM_STANDARD: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
/// Days per month in a leap year
const DPM_LEAP: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Offset between a Julian day number (noon) and the MJD of the same civil day
const JDN_MJD: i64 = 2_400_001;

/// Largest Julian day number converted back to a calendar date
///
/// Keeps the integer arithmetic of [`calendar_date`] far from overflow and
/// the resulting year inside `i32`.
pub const MAX_JULIAN_DAY_NUMBER: i64 = 100_000_000_000;

/// Calendar tuple for representing a date and time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarTuple {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl CalendarTuple {
    /// Create a validated calendar tuple
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Result<Self> {
        let date = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        date.validate()?;
        Ok(date)
    }

    /// Create a validated calendar tuple at midnight
    pub fn date(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Check every field against the Gregorian calendar
    ///
    /// Seconds up to (but excluding) 61 are accepted so that a positive leap
    /// second can be written as `23:59:60.x`.
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(TimeError::CalendarError(format!(
                "month {} outside 1-12",
                self.month
            )));
        }
        let days = calendar_days(self.year)[self.month as usize - 1];
        if self.day < 1 || self.day > days {
            return Err(TimeError::CalendarError(format!(
                "day {} outside 1-{} for {:04}-{:02}",
                self.day, days, self.year, self.month
            )));
        }
        if self.hour > 23 {
            return Err(TimeError::CalendarError(format!(
                "hour {} outside 0-23",
                self.hour
            )));
        }
        if self.minute > 59 {
            return Err(TimeError::CalendarError(format!(
                "minute {} outside 0-59",
                self.minute
            )));
        }
        if !self.second.is_finite() || self.second < 0.0 || self.second >= 61.0 {
            return Err(TimeError::CalendarError(format!(
                "second {} outside [0, 61)",
                self.second
            )));
        }
        Ok(())
    }

    /// Seconds elapsed since midnight
    pub fn seconds_of_day(&self) -> f64 {
        self.hour as f64 * 3600.0 + self.minute as f64 * 60.0 + self.second
    }

    /// Integer Modified Julian Day of the date at midnight
    pub fn day_number(&self) -> i64 {
        mjd_day_number(self.year, self.month, self.day)
    }

    /// Modified Julian Day including the time of day
    pub fn mjd(&self) -> f64 {
        self.day_number() as f64 + self.seconds_of_day() / DAY_S
    }

    /// Day of the year, 1 for January 1st
    pub fn day_of_year(&self) -> u32 {
        let dpm = calendar_days(self.year);
        dpm[..(self.month as usize - 1)].iter().sum::<u32>() + self.day
    }
}

impl TryFrom<(i32, u32, u32, u32, u32, f64)> for CalendarTuple {
    type Error = TimeError;

    fn try_from(t: (i32, u32, u32, u32, u32, f64)) -> Result<Self> {
        Self::new(t.0, t.1, t.2, t.3, t.4, t.5)
    }
}

impl TryFrom<(i32, u32, u32)> for CalendarTuple {
    type Error = TimeError;

    fn try_from(t: (i32, u32, u32)) -> Result<Self> {
        Self::date(t.0, t.1, t.2)
    }
}

impl fmt::Display for CalendarTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:",
            self.year, self.month, self.day, self.hour, self.minute
        )?;
        if self.second.fract() == 0.0 {
            write!(f, "{:02}", self.second as u32)
        } else {
            write!(f, "{:09.6}", self.second)
        }
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in each month of a year
pub fn calendar_days(year: i32) -> [u32; 12] {
    if is_leap_year(year) {
        DPM_LEAP
    } else {
        DPM_STANDARD
    }
}

/// Calculate Julian day number (the Julian date at noon) from a calendar date
///
/// See the Explanatory Supplement to the Astronomical Almanac 15.11. January
/// and February count as the last months of the preceding year, and the
/// Gregorian century correction is always applied. Valid for years after
/// -4712.
pub fn julian_day_number(year: i32, month: u32, day: u32) -> i64 {
    let janfeb = month <= 2;
    let g = year as i64 + 4716 - if janfeb { 1 } else { 0 };
    let f = (month as i64 + 9) % 12;
    let e = 1461 * g / 4 + day as i64 - 1402;
    let j = e + (153 * f + 2) / 5;
    j + 38 - (g + 184) / 100 * 3 / 4
}

/// Convert a Julian day number to a calendar date (year, month, day)
///
/// Day numbers below zero or above [`MAX_JULIAN_DAY_NUMBER`] are `OutOfRange`.
pub fn calendar_date(jdn: i64) -> Result<(i32, u32, u32)> {
    if !(0..=MAX_JULIAN_DAY_NUMBER).contains(&jdn) {
        return Err(TimeError::OutOfRange(format!("Julian day number {}", jdn)));
    }
    // See the Explanatory Supplement to the Astronomical Almanac 15.11.
    let f = jdn + 1401 + (4 * jdn + 274_277) / 146_097 * 3 / 4 - 38;
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;

    let day = (h % 153) / 5 + 1;
    let month = ((h / 153) + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    Ok((year as i32, month as u32, day as u32))
}

/// Integer Modified Julian Day of a calendar date at midnight
pub fn mjd_day_number(year: i32, month: u32, day: u32) -> i64 {
    julian_day_number(year, month, day) - JDN_MJD
}

/// Days from `b` to `a`, keeping the whole-day part in integer arithmetic
pub(crate) fn days_between(a: &CalendarTuple, b: &CalendarTuple) -> f64 {
    (a.day_number() - b.day_number()) as f64 + (a.seconds_of_day() - b.seconds_of_day()) / DAY_S
}

/// Days since `epoch` of a single calendar date
///
/// With `epoch` set to the MJD epoch the result is the Modified Julian Day.
pub fn convert_calendar_date(date: &CalendarTuple, epoch: &Epoch) -> Result<f64> {
    date.validate()?;
    Ok(days_between(date, epoch.calendar()))
}

/// Days since `epoch` for each calendar date
///
/// Fails on the first invalid date; no partial output is returned.
pub fn convert_calendar_dates(dates: &[CalendarTuple], epoch: &Epoch) -> Result<Array1<f64>> {
    log::trace!("converting {} calendar dates", dates.len());
    dates
        .iter()
        .map(|date| convert_calendar_date(date, epoch))
        .collect::<Result<Vec<f64>>>()
        .map(Array1::from)
}

/// Split seconds since midnight into (hour, minute, second)
fn split_seconds_of_day(total_seconds: f64) -> (u32, u32, f64) {
    let hour = (total_seconds / 3600.0).floor();
    let minute = (total_seconds / 60.0).floor().rem_euclid(60.0);
    let second = total_seconds.rem_euclid(60.0);
    (hour as u32, minute as u32, second)
}

/// Convert a Modified Julian Day to a calendar date
///
/// Non-finite values and days outside the range of [`calendar_date`] are
/// `OutOfRange`.
pub fn mjd_to_calendar(mjd: f64) -> Result<CalendarTuple> {
    let whole = mjd.floor();
    let lowest = -JDN_MJD as f64;
    let highest = (MAX_JULIAN_DAY_NUMBER - JDN_MJD) as f64;
    if !whole.is_finite() || whole < lowest || whole > highest {
        return Err(TimeError::OutOfRange(format!("MJD {}", mjd)));
    }
    let (year, month, day) = calendar_date(whole as i64 + JDN_MJD)?;
    let (hour, minute, second) = split_seconds_of_day((mjd - whole) * DAY_S);
    Ok(CalendarTuple {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

/// Convert a Julian date to a calendar date
pub fn julian_to_calendar(jd: f64) -> Result<CalendarTuple> {
    mjd_to_calendar(jd - JD_MJD)
}

/// Convert Julian dates to calendar dates
///
/// Fails on the first date that cannot be converted.
pub fn convert_julian<A: IntoTimeArray>(jd: A) -> Result<Vec<CalendarTuple>> {
    jd.into_time_array()
        .iter()
        .map(|&value| julian_to_calendar(value))
        .collect()
}

/// Convert a calendar date to a decimal year
///
/// The fractional part is the elapsed part of the year divided by the
/// length of that year (365 or 366 days).
pub fn convert_calendar_decimal(date: &CalendarTuple) -> Result<f64> {
    date.validate()?;
    let days_in_year: u32 = calendar_days(date.year).iter().sum();
    let elapsed = (date.day_of_year() - 1) as f64 + date.seconds_of_day() / DAY_S;
    Ok(date.year as f64 + elapsed / days_in_year as f64)
}

/// Convert calendar dates to decimal years
pub fn convert_calendar_decimals(dates: &[CalendarTuple]) -> Result<Array1<f64>> {
    dates
        .iter()
        .map(convert_calendar_decimal)
        .collect::<Result<Vec<f64>>>()
        .map(Array1::from)
}

/// Convert a decimal year back to a calendar date
pub fn convert_decimal_calendar(tdec: f64) -> Result<CalendarTuple> {
    let year = tdec.floor();
    if !year.is_finite() || year < i32::MIN as f64 || year > i32::MAX as f64 {
        return Err(TimeError::OutOfRange(format!("decimal year {}", tdec)));
    }
    let dpm = calendar_days(year as i32);
    let days_in_year: u32 = dpm.iter().sum();

    let day_temp = (tdec - year) * days_in_year as f64;
    let day_floor = day_temp.floor();
    let mut remaining = (day_floor as u32).min(days_in_year - 1);

    let mut month = 1;
    for &days in dpm.iter() {
        if remaining < days {
            break;
        }
        remaining -= days;
        month += 1;
    }

    let (hour, minute, second) = split_seconds_of_day((day_temp - day_floor) * DAY_S);
    Ok(CalendarTuple {
        year: year as i32,
        month,
        day: remaining + 1,
        hour,
        minute,
        second,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epochs::MJD_EPOCH;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_julian_day_conversion() {
        // Test J2000 epoch
        assert_eq!(julian_day_number(2000, 1, 1), 2451545);

        // Test a few other dates
        assert_eq!(julian_day_number(2020, 1, 1), 2458850);
        assert_eq!(julian_day_number(1969, 7, 20), 2440423);
        assert_eq!(julian_day_number(1900, 1, 1), 2415021);
        assert_eq!(julian_day_number(1858, 11, 17), 2400001);
    }

    #[test]
    fn test_calendar_date_conversion() {
        assert_eq!(calendar_date(2451545).unwrap(), (2000, 1, 1));
        assert_eq!(calendar_date(2458850).unwrap(), (2020, 1, 1));
        assert_eq!(calendar_date(2440423).unwrap(), (1969, 7, 20));
        assert_eq!(calendar_date(2415021).unwrap(), (1900, 1, 1));
        assert!(calendar_date(-1).is_err());
        assert!(calendar_date(MAX_JULIAN_DAY_NUMBER + 1).is_err());
    }

    #[test]
    fn test_mjd_day_number() {
        assert_eq!(mjd_day_number(1858, 11, 17), 0);
        assert_eq!(mjd_day_number(1970, 1, 1), 40587);
        assert_eq!(mjd_day_number(2018, 1, 1), 58119);
    }

    #[rstest]
    #[case(1900, 365)]
    #[case(1992, 366)]
    #[case(2000, 366)]
    #[case(2019, 365)]
    #[case(2100, 365)]
    fn test_calendar_days(#[case] year: i32, #[case] expected: u32) {
        assert_eq!(calendar_days(year).iter().sum::<u32>(), expected);
        assert_eq!(is_leap_year(year), expected == 366);
    }

    #[test]
    fn test_every_day_round_trips() {
        // Walk every day across two leap-rule centuries
        let start = mjd_day_number(1800, 1, 1);
        let end = mjd_day_number(2100, 12, 31);
        for mjd in start..=end {
            let date = mjd_to_calendar(mjd as f64).unwrap();
            assert_eq!(date.day_number(), mjd);
            assert!(date.validate().is_ok());
        }
    }

    #[test]
    fn test_validation() {
        assert!(CalendarTuple::date(2019, 2, 29).is_err());
        assert!(CalendarTuple::date(2020, 2, 29).is_ok());
        assert!(CalendarTuple::date(1900, 2, 29).is_err());
        assert!(CalendarTuple::date(2000, 2, 29).is_ok());
        assert!(CalendarTuple::date(2018, 13, 1).is_err());
        assert!(CalendarTuple::date(2018, 0, 1).is_err());
        assert!(CalendarTuple::date(2018, 4, 31).is_err());
        assert!(CalendarTuple::new(2018, 1, 1, 24, 0, 0.0).is_err());
        assert!(CalendarTuple::new(2018, 1, 1, 0, 60, 0.0).is_err());
        assert!(CalendarTuple::new(2016, 12, 31, 23, 59, 60.5).is_ok());
        assert!(CalendarTuple::new(2018, 1, 1, 0, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_dates_do_not_convert() {
        let bad = CalendarTuple {
            year: 2018,
            month: 2,
            day: 30,
            hour: 0,
            minute: 0,
            second: 0.0,
        };
        let good = CalendarTuple::date(2018, 2, 28).unwrap();
        assert!(matches!(
            convert_calendar_date(&bad, &MJD_EPOCH),
            Err(TimeError::CalendarError(_))
        ));
        assert!(convert_calendar_dates(&[good, bad], &MJD_EPOCH).is_err());
        assert!(convert_calendar_decimal(&bad).is_err());
    }

    #[test]
    fn test_convert_calendar_dates() {
        let dates = [
            CalendarTuple::date(2018, 1, 1).unwrap(),
            CalendarTuple::new(2000, 1, 1, 12, 0, 0.0).unwrap(),
        ];
        let mjd = convert_calendar_dates(&dates, &MJD_EPOCH).unwrap();
        assert_eq!(mjd.len(), 2);
        assert_eq!(mjd[0], 58119.0);
        assert_eq!(mjd[1], 51544.5);
    }

    #[test]
    fn test_julian_to_calendar() {
        let date = julian_to_calendar(2451545.0).unwrap();
        assert_eq!((date.year, date.month, date.day), (2000, 1, 1));
        assert_eq!((date.hour, date.minute), (12, 0));
        assert_eq!(date.second, 0.0);

        let dates = convert_julian([2458119.5, 2458120.25, 2458120.75]).unwrap();
        assert_eq!(dates[0], CalendarTuple::date(2018, 1, 1).unwrap());
        // Julian dates start at noon
        assert_eq!((dates[1].day, dates[1].hour), (1, 18));
        assert_eq!((dates[2].day, dates[2].hour), (2, 6));
    }

    #[test]
    fn test_unrepresentable_dates_are_errors() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1.0e19, -1.0e19, 3.0e18] {
            assert!(matches!(
                julian_to_calendar(value),
                Err(TimeError::OutOfRange(_))
            ));
            assert!(matches!(
                mjd_to_calendar(value),
                Err(TimeError::OutOfRange(_))
            ));
        }
        assert!(convert_julian([2451545.0, f64::NAN]).is_err());
        assert!(convert_decimal_calendar(f64::NAN).is_err());
        assert!(convert_decimal_calendar(1.0e19).is_err());

        // earliest convertible day is Julian day number 0
        let first = julian_to_calendar(0.0).unwrap();
        assert_eq!((first.year, first.month, first.day), (-4713, 11, 24));
        assert!(julian_to_calendar(-1.0).is_err());
    }

    #[test]
    fn test_decimal_years() {
        let start = CalendarTuple::date(2000, 1, 1).unwrap();
        assert_eq!(convert_calendar_decimal(&start).unwrap(), 2000.0);

        // 182.5 days into a 365 day year
        let mid = CalendarTuple::new(2001, 7, 2, 12, 0, 0.0).unwrap();
        assert_relative_eq!(convert_calendar_decimal(&mid).unwrap(), 2001.5, epsilon = 1e-12);

        let back = convert_decimal_calendar(2001.5).unwrap();
        assert_eq!((back.year, back.month, back.day, back.hour), (2001, 7, 2, 12));
        assert_relative_eq!(back.seconds_of_day(), 43200.0, epsilon = 1e-4);

        let leap = convert_decimal_calendar(2020.0 + 59.5 / 366.0).unwrap();
        assert_eq!((leap.month, leap.day), (2, 29));
    }

    #[test]
    fn test_display() {
        let date = CalendarTuple::date(2000, 1, 1).unwrap();
        assert_eq!(date.to_string(), "2000-01-01T00:00:00");
        let date = CalendarTuple::new(2000, 1, 1, 6, 5, 4.5).unwrap();
        assert_eq!(date.to_string(), "2000-01-01T06:05:04.500000");
    }
}
