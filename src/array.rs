//! Scalar and array time inputs
//!
//! Every vectorised conversion in this crate takes `impl IntoTimeArray`, so a
//! single `f64` is handled as a one-element array and a `Vec`, slice, fixed
//! array or `ndarray::Array1` is passed through with its length preserved.

use ndarray::Array1;

/// Conversion of scalar or sequence inputs into a one-dimensional array
pub trait IntoTimeArray {
    fn into_time_array(self) -> Array1<f64>;
}

impl IntoTimeArray for f64 {
    fn into_time_array(self) -> Array1<f64> {
        Array1::from_elem(1, self)
    }
}

impl IntoTimeArray for Vec<f64> {
    fn into_time_array(self) -> Array1<f64> {
        Array1::from(self)
    }
}

impl IntoTimeArray for &[f64] {
    fn into_time_array(self) -> Array1<f64> {
        Array1::from(self.to_vec())
    }
}

impl<const N: usize> IntoTimeArray for [f64; N] {
    fn into_time_array(self) -> Array1<f64> {
        Array1::from(self.to_vec())
    }
}

impl IntoTimeArray for Array1<f64> {
    fn into_time_array(self) -> Array1<f64> {
        self
    }
}

impl IntoTimeArray for &Array1<f64> {
    fn into_time_array(self) -> Array1<f64> {
        self.clone()
    }
}
