//! Delta times between epochs
//!
//! A delta time is a count of units elapsed since an epoch. Moving it to
//! another epoch only adds the separation of the two epochs, so the round
//! trip through [`convert_delta_time`] is exact for integral values.

mod parse;

pub use self::parse::{get_unix_time, isoformat, parse_date_string, parse_iso_epoch};

use crate::array::IntoTimeArray;
use crate::epochs::Epoch;
use crate::errors::{check_scale, Result};
use ndarray::Array1;

/// Convert delta times counted from `epoch1` into delta times counted from `epoch2`
///
/// `scale` is the number of seconds in one unit of `delta_time` (1.0 for
/// seconds, 86400.0 for days); the output is in the same unit. Leap seconds
/// are not applied here: callers holding GPS seconds subtract
/// [`count_leap_seconds`](crate::leapseconds::count_leap_seconds) first.
pub fn convert_delta_time<A: IntoTimeArray>(
    delta_time: A,
    epoch1: &Epoch,
    epoch2: &Epoch,
    scale: f64,
) -> Result<Array1<f64>> {
    let scale = check_scale(scale)?;
    // separation in seconds is exact for whole-second epochs
    let offset = epoch1.seconds_since(epoch2) / scale;
    Ok(delta_time.into_time_array().mapv(|value| value + offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DAY_S;
    use crate::epochs::{ATLAS_SDP_EPOCH, GPS_EPOCH, MJD_EPOCH, UNIX_EPOCH};
    use crate::errors::TimeError;
    use approx::assert_relative_eq;

    #[test]
    fn test_unix_to_atlas_sdp() {
        let output = convert_delta_time(1514764800.0, &UNIX_EPOCH, &ATLAS_SDP_EPOCH, 1.0).unwrap();
        assert_eq!(output[0], 0.0);
    }

    #[test]
    fn test_days_to_mjd() {
        let output = convert_delta_time([0.0, 1.5], &ATLAS_SDP_EPOCH, &MJD_EPOCH, DAY_S).unwrap();
        assert_eq!(output.to_vec(), vec![58119.0, 58120.5]);
    }

    #[test]
    fn test_symmetry() {
        let values = vec![0.0, 1.0, 12345.0, 1.0e9, -42.0];
        let forward = convert_delta_time(values.clone(), &GPS_EPOCH, &ATLAS_SDP_EPOCH, 1.0).unwrap();
        let back = convert_delta_time(&forward, &ATLAS_SDP_EPOCH, &GPS_EPOCH, 1.0).unwrap();
        assert_eq!(back.to_vec(), values);

        let hours = convert_delta_time(10.25, &UNIX_EPOCH, &GPS_EPOCH, 3600.0).unwrap();
        let back = convert_delta_time(hours, &GPS_EPOCH, &UNIX_EPOCH, 3600.0).unwrap();
        assert_relative_eq!(back[0], 10.25, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_scale() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                convert_delta_time(1.0, &GPS_EPOCH, &UNIX_EPOCH, scale),
                Err(TimeError::InvalidScale(_))
            ));
        }
    }
}
