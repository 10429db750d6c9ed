//! Constants module for time conversions

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Days in a Julian century
pub const CENTURY: f64 = 36_525.0;
/// Julian date of the Modified Julian Day epoch (1858-11-17T00:00:00)
pub const JD_MJD: f64 = 2_400_000.5;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days in a GPS week
pub const WEEK_DAYS: f64 = 7.0;
/// GPS time runs behind TAI by a fixed 19 seconds
pub const TAI_MINUS_GPS_S: f64 = 19.0;

// Besselian epochs (Lieske 1979)
/// Modified Julian Day of Besselian epoch B1900.0
pub const MJD_B1900: f64 = 15_019.813_52;
/// Length of the tropical year in days used by the Besselian epoch formula
pub const BESSELIAN_YEAR: f64 = 365.242_198_781;

// Angles
/// One full turn
pub const TURN: f64 = 1.0;
/// Degrees in a full turn
pub const TURNDEG: f64 = 360.0;
/// Arcseconds in a full turn
pub const TURNASEC: f64 = 1_296_000.0;
/// Degrees to arcseconds conversion factor
pub const DEG2ASEC: f64 = 3_600.0;
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Arcseconds to radians conversion factor
pub const ASEC2RAD: f64 = PI / 648_000.0;
/// Milliarcseconds to radians conversion factor
pub const MASEC2RAD: f64 = PI / 0.648e12;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_factors() {
        assert_eq!(TURNASEC, TURNDEG * DEG2ASEC);
        assert_eq!(ASEC2RAD, PI / 648_000.0);
        assert_eq!(MASEC2RAD, PI / 0.648e12);
        assert!((DEG2RAD / DEG2ASEC - ASEC2RAD).abs() < 1e-20);
    }

    #[test]
    fn test_julian_offsets() {
        assert_eq!(J2000 - JD_MJD, 51_544.5);
        assert_eq!(JD_MJD + MJD_B1900, 2_415_020.313_52);
    }
}
