//! Time module for astronomical time calculations
//!
//! A [`Timescale`] holds an array of Modified Julian Days (UTC) and computes
//! everything else from it on demand: Julian centuries since J2000, the Earth
//! rotation angle, Greenwich hour angle and sidereal time, Besselian years,
//! GPS weeks and tide gauge days. It is built once from calendar dates,
//! delta times, Julian dates, Besselian years or a date range, and never
//! changes afterwards.

use crate::array::IntoTimeArray;
use crate::calendar::{mjd_to_calendar, CalendarTuple};
use crate::constants::{
    BESSELIAN_YEAR, CENTURY, DAY_S, DEG2ASEC, JD_MJD, MJD_B1900, TURN, TURNASEC, TURNDEG,
    WEEK_DAYS,
};
use crate::deltatime::convert_delta_time;
use crate::epochs::{Epoch, GPS_EPOCH, MJD_EPOCH, MJD_GPS, MJD_J2000, MJD_TIDE};
use crate::errors::{check_scale, Result, TimeError};
use crate::leapseconds::DeltaTimeTable;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use ndarray::{Array1, Zip};
use std::fmt;
use std::str::FromStr;

/// IAU 2006 sidereal time polynomial in arcseconds, in powers of T
const SIDEREAL_POLYNOMIAL: [f64; 6] = [
    0.014506,
    4612.156534,
    1.3915817,
    -4.4e-7,
    -2.9956e-05,
    -3.68e-08,
];

/// Evaluate a polynomial with coefficients in increasing powers of `x`
fn polynomial_sum(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Time standard of delta times given to [`Timescale::from_deltatime`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeStandard {
    /// Elapsed UTC seconds, leap seconds not counted
    #[default]
    Utc,
    /// Elapsed GPS seconds, leap seconds counted
    Gps,
}

impl FromStr for TimeStandard {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "gps" => Ok(Self::Gps),
            other => Err(TimeError::ParseError(format!(
                "unknown time standard '{}'",
                other
            ))),
        }
    }
}

/// Represents an array of times as Modified Julian Days
#[derive(Debug, Clone, PartialEq)]
pub struct Timescale {
    mjd: Array1<f64>,
}

impl Timescale {
    /// Create a timescale from Modified Julian Days
    pub fn new<A: IntoTimeArray>(mjd: A) -> Self {
        Self {
            mjd: mjd.into_time_array(),
        }
    }

    /// Create a timescale from UTC datetimes
    pub fn from_datetime(dates: &[DateTime<Utc>]) -> Self {
        let mjd = dates
            .iter()
            .map(|dt| {
                CalendarTuple {
                    year: dt.year(),
                    month: dt.month(),
                    day: dt.day(),
                    hour: dt.hour(),
                    minute: dt.minute(),
                    second: dt.second() as f64 + dt.nanosecond() as f64 / 1_000_000_000.0,
                }
                .mjd()
            })
            .collect::<Vec<f64>>();
        Self::new(mjd)
    }

    /// Create a timescale from calendar dates
    pub fn from_calendar(dates: &[CalendarTuple]) -> Result<Self> {
        let mjd = dates
            .iter()
            .map(|date| date.validate().map(|_| date.mjd()))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self::new(mjd))
    }

    /// Create a timescale from delta times since `epoch`
    ///
    /// `scale` is the number of seconds in one unit of `delta_time`. GPS delta
    /// times have the leap seconds elapsed since `epoch` removed using the
    /// built-in leap second table.
    pub fn from_deltatime<A: IntoTimeArray>(
        delta_time: A,
        epoch: &Epoch,
        standard: TimeStandard,
        scale: f64,
    ) -> Result<Self> {
        Self::from_deltatime_with_table(delta_time, epoch, standard, scale, DeltaTimeTable::builtin())
    }

    /// Create a timescale from delta times using an injected leap second table
    pub fn from_deltatime_with_table<A: IntoTimeArray>(
        delta_time: A,
        epoch: &Epoch,
        standard: TimeStandard,
        scale: f64,
        table: &DeltaTimeTable,
    ) -> Result<Self> {
        let seconds = delta_time.into_time_array() * check_scale(scale)?;
        let utc_seconds = match standard {
            TimeStandard::Utc => seconds,
            TimeStandard::Gps => {
                let gps_time = convert_delta_time(&seconds, epoch, &GPS_EPOCH, 1.0)?;
                let epoch_leaps = table.count_leap_seconds(epoch.seconds_since(&GPS_EPOCH));
                let leaps = gps_time.mapv(|gps| (table.count_leap_seconds(gps) - epoch_leaps) as f64);
                seconds - leaps
            }
        };
        log::trace!("{} {:?} delta times from {}", utc_seconds.len(), standard, epoch);
        let mjd = convert_delta_time(utc_seconds, epoch, &MJD_EPOCH, 1.0)?.mapv(|s| s / DAY_S);
        Ok(Self { mjd })
    }

    /// Create a timescale from Julian dates
    pub fn from_julian<A: IntoTimeArray>(jd: A) -> Self {
        Self {
            mjd: jd.into_time_array().mapv(|jd| jd - JD_MJD),
        }
    }

    /// Create a timescale from Besselian years (Lieske 1979)
    pub fn from_besselian<A: IntoTimeArray>(besselian: A) -> Self {
        Self {
            mjd: besselian
                .into_time_array()
                .mapv(|b| MJD_B1900 + BESSELIAN_YEAR * (b - 1900.0)),
        }
    }

    /// Create evenly spaced times from `start` to `stop` inclusive
    ///
    /// `stop` is included when it falls on the step grid; the sequence never
    /// passes it. A `stop` before `start` gives an empty timescale.
    pub fn from_range(start: &Epoch, stop: &Epoch, step_days: f64) -> Result<Self> {
        let step = check_scale(step_days)?;
        let first = start.mjd();
        let span = stop.seconds_since(start) / DAY_S;
        let mjd = if span < 0.0 {
            Array1::zeros(0)
        } else {
            let count = (span / step).floor() as usize + 1;
            Array1::from_iter((0..count).map(|i| first + i as f64 * step))
        };
        Ok(Self { mjd })
    }

    /// Modified Julian Days
    pub fn mjd(&self) -> &Array1<f64> {
        &self.mjd
    }

    pub fn len(&self) -> usize {
        self.mjd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mjd.is_empty()
    }

    /// Julian centuries since J2000.0
    pub fn t(&self) -> Array1<f64> {
        self.mjd.mapv(|mjd| (mjd - MJD_J2000) / CENTURY)
    }

    /// Earth rotation angle in degrees, in [0, 360)
    pub fn era(&self) -> Array1<f64> {
        self.mjd.mapv(|mjd| {
            let days = mjd - MJD_J2000;
            // whole turns per day are split off before scaling
            let fraction = days.rem_euclid(TURN);
            let theta = (0.7790572732640 + 0.00273781191135448 * days).rem_euclid(TURN);
            TURNDEG * (theta + fraction).rem_euclid(TURN)
        })
    }

    /// Greenwich hour angle in degrees (Meeus 1998, eq. 12.4)
    ///
    /// Only the linear term is kept. The T² term adds 4e-6 degrees a decade
    /// from J2000 and 4e-4 degrees a century out.
    pub fn gha(&self) -> Array1<f64> {
        self.t().mapv(|t| {
            let hour_angle = 280.46061837504 + 360.9856473662862 * (t * CENTURY);
            hour_angle.rem_euclid(TURNDEG)
        })
    }

    /// Greenwich mean sidereal time as a fraction of a day
    pub fn st(&self) -> Array1<f64> {
        Zip::from(&self.t())
            .and(&self.era())
            .map_collect(|&t, &era| {
                let sidereal = polynomial_sum(&SIDEREAL_POLYNOMIAL, t);
                (sidereal + era * DEG2ASEC).rem_euclid(TURNASEC) / TURNASEC
            })
    }

    /// Whole days since the 1992-01-01 tide gauge epoch
    pub fn tide(&self) -> Array1<i64> {
        self.mjd.mapv(|mjd| (mjd - MJD_TIDE).floor() as i64)
    }

    /// Whole weeks since the GPS epoch
    pub fn gps_week(&self) -> Array1<i64> {
        self.mjd
            .mapv(|mjd| ((mjd - MJD_GPS) / WEEK_DAYS).floor() as i64)
    }

    /// Besselian years (Lieske 1979)
    pub fn besselian(&self) -> Array1<f64> {
        self.mjd
            .mapv(|mjd| 1900.0 + (mjd - MJD_B1900) / BESSELIAN_YEAR)
    }

    /// Julian dates
    pub fn utc(&self) -> Array1<f64> {
        self.mjd.mapv(|mjd| mjd + JD_MJD)
    }

    /// Calendar dates
    pub fn to_calendar(&self) -> Result<Vec<CalendarTuple>> {
        self.mjd.iter().map(|&mjd| mjd_to_calendar(mjd)).collect()
    }

    /// UTC datetimes, to the nearest nanosecond
    pub fn to_datetime(&self) -> Result<Vec<DateTime<Utc>>> {
        let origin = NaiveDate::from_ymd_opt(1858, 11, 17)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| TimeError::OutOfRange("MJD epoch".into()))?
            .and_utc();

        self.mjd
            .iter()
            .map(|&mjd| {
                let out_of_range = || TimeError::OutOfRange(format!("MJD {}", mjd));
                if !mjd.is_finite() {
                    return Err(out_of_range());
                }
                let days = mjd.floor();
                let nanos = ((mjd - days) * DAY_S * 1e9).round() as i64;
                Duration::try_days(days as i64)
                    .and_then(|d| origin.checked_add_signed(d))
                    .and_then(|dt| dt.checked_add_signed(Duration::nanoseconds(nanos)))
                    .ok_or_else(out_of_range)
            })
            .collect()
    }

    /// Delta times since `epoch`
    ///
    /// `scale` is the number of output units per day: 1.0 gives days and
    /// 86400.0 gives seconds.
    pub fn to_deltatime(&self, epoch: &Epoch, scale: f64) -> Result<Array1<f64>> {
        let scale = check_scale(scale)?;
        let days = convert_delta_time(&self.mjd, &MJD_EPOCH, epoch, DAY_S)?;
        Ok(days * scale)
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mjd.len() {
            0 => write!(f, "<Timescale empty>"),
            1 => write!(f, "<Timescale MJD={}>", self.mjd[0]),
            n => write!(
                f,
                "<Timescale {} times MJD={}..{}>",
                n,
                self.mjd[0],
                self.mjd[n - 1]
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epochs::{ATLAS_SDP_EPOCH, MJD_ATLAS_SDP};
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_atlas_sdp_quantities() {
        let ts = Timescale::new(MJD_ATLAS_SDP);
        assert_eq!(ts.utc()[0], 2458119.5);
        assert_eq!(ts.tide()[0], 9497);
        assert_eq!(ts.gps_week()[0], 1982);
        assert_eq!(ts.mjd()[0] - 51544.5, ts.utc()[0] - 2451545.0);
    }

    #[test]
    fn test_julian_centuries() {
        let ts = Timescale::new([MJD_J2000, MJD_J2000 + CENTURY]);
        assert_eq!(ts.t().to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_earth_rotation_angle() {
        let ts = Timescale::new(55414.0);
        let expected = 0.8730204642501604;
        assert_relative_eq!(ts.era()[0], TURNDEG * expected, epsilon = 1e-9);
    }

    #[test]
    fn test_earth_rotation_angle_range() {
        let ts = Timescale::new(Array1::linspace(40000.0, 70000.0, 1001));
        assert!(ts.era().iter().all(|&era| (0.0..360.0).contains(&era)));
        assert!(ts.gha().iter().all(|&gha| (0.0..360.0).contains(&gha)));
        assert!(ts.st().iter().all(|&st| (0.0..1.0).contains(&st)));
    }

    #[test]
    fn test_greenwich_hour_angle() {
        let ts = Timescale::new(55414.0);
        let hour_angle = 280.46061837504 + 360.9856473662862 * (ts.t()[0] * 36525.0);
        let meeus = hour_angle.rem_euclid(360.0);
        assert_relative_eq!(ts.gha()[0], meeus, epsilon = 1e-6);
        assert_relative_eq!(ts.gha()[0], 314.4231022193562, epsilon = 1e-6);
    }

    #[test]
    fn test_sidereal_time() {
        let ts = Timescale::new(55414.0);
        assert_relative_eq!(24.0 * ts.st()[0], 20.96154017401333, epsilon = 1e-6);
    }

    #[test]
    fn test_polynomial_sum() {
        assert_eq!(polynomial_sum(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(polynomial_sum(&[], 2.0), 0.0);
    }

    #[test]
    fn test_from_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
        let ts = Timescale::from_datetime(&[dt]);
        assert_eq!(ts.mjd()[0], 58119.0);
        assert_eq!(ts.to_datetime().unwrap(), vec![dt]);
    }

    #[test]
    fn test_from_calendar() {
        let dates = [
            CalendarTuple::date(2018, 1, 1).unwrap(),
            CalendarTuple::new(2000, 1, 1, 12, 0, 0.0).unwrap(),
        ];
        let ts = Timescale::from_calendar(&dates).unwrap();
        assert_eq!(ts.mjd().to_vec(), vec![58119.0, 51544.5]);
        assert_eq!(ts.to_calendar().unwrap(), dates.to_vec());

        let mut bad = dates[0];
        bad.day = 32;
        assert!(Timescale::from_calendar(&[bad]).is_err());
    }

    #[test]
    fn test_from_deltatime_utc_days() {
        let ts = Timescale::from_deltatime([0.0, 2.5], &ATLAS_SDP_EPOCH, TimeStandard::Utc, DAY_S)
            .unwrap();
        assert_eq!(ts.mjd().to_vec(), vec![58119.0, 58121.5]);
        assert!(Timescale::from_deltatime(0.0, &ATLAS_SDP_EPOCH, TimeStandard::Utc, 0.0).is_err());
    }

    #[test]
    fn test_from_range() {
        let ts = Timescale::from_range(&ATLAS_SDP_EPOCH, &"2018-01-31".parse().unwrap(), 7.0)
            .unwrap();
        assert_eq!(ts.len(), 5);
        assert_eq!(ts.mjd()[4], 58147.0);

        let empty = Timescale::from_range(&ATLAS_SDP_EPOCH, &GPS_EPOCH, 1.0).unwrap();
        assert!(empty.is_empty());
        assert!(Timescale::from_range(&GPS_EPOCH, &ATLAS_SDP_EPOCH, 0.0).is_err());
    }

    #[test]
    fn test_to_deltatime() {
        let ts = Timescale::new([58119.0, 58120.0]);
        assert_eq!(ts.to_deltatime(&ATLAS_SDP_EPOCH, 1.0).unwrap().to_vec(), vec![0.0, 1.0]);
        assert_eq!(
            ts.to_deltatime(&ATLAS_SDP_EPOCH, DAY_S).unwrap().to_vec(),
            vec![0.0, DAY_S]
        );
        assert_eq!(
            ts.to_deltatime(&GPS_EPOCH, 1.0).unwrap().to_vec(),
            vec![58119.0 - MJD_GPS, 58120.0 - MJD_GPS]
        );
    }

    #[test]
    fn test_to_deltatime_rejects_bad_scale() {
        let ts = Timescale::new(58119.0);
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ts.to_deltatime(&ATLAS_SDP_EPOCH, scale),
                Err(TimeError::InvalidScale(_))
            ));
        }
    }

    #[test]
    fn test_to_calendar_rejects_unrepresentable() {
        assert!(matches!(
            Timescale::new(1.0e19).to_calendar(),
            Err(TimeError::OutOfRange(_))
        ));
        assert!(matches!(
            Timescale::new([58119.0, f64::NAN]).to_calendar(),
            Err(TimeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_to_datetime_rejects_non_finite() {
        let ts = Timescale::new(f64::NAN);
        assert!(matches!(ts.to_datetime(), Err(TimeError::OutOfRange(_))));
    }

    #[test]
    fn test_time_standard_from_str() {
        assert_eq!("GPS".parse::<TimeStandard>().unwrap(), TimeStandard::Gps);
        assert_eq!("utc".parse::<TimeStandard>().unwrap(), TimeStandard::Utc);
        assert!("loran".parse::<TimeStandard>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Timescale::new(58119.0).to_string(), "<Timescale MJD=58119>");
        assert_eq!(
            Timescale::new([1.0, 2.0, 3.0]).to_string(),
            "<Timescale 3 times MJD=1..3>"
        );
    }
}
