//! Conversions between point arrays and lists of coordinates

use crate::types::Array2D;
use rlst::{rlst_dynamic_array2, RandomAccessByRef, RandomAccessMut, Shape};

/// Copy each point of a `[tdim, npts]` point array into its own vector
pub fn to_coordinates(points: &Array2D) -> Vec<Vec<f64>> {
    let [tdim, npts] = points.shape();
    (0..npts)
        .map(|i| (0..tdim).map(|j| *points.get([j, i]).unwrap()).collect())
        .collect()
}

/// Create a `[tdim, npts]` point array from a list of points
///
/// Every point must have `tdim` coordinates.
pub fn from_coordinates(coordinates: &[Vec<f64>], tdim: usize) -> Array2D {
    let mut points = rlst_dynamic_array2!(f64, [tdim, coordinates.len()]);
    for (i, point) in coordinates.iter().enumerate() {
        debug_assert_eq!(point.len(), tdim);
        for (j, x) in point.iter().enumerate() {
            *points.get_mut([j, i]).unwrap() = *x;
        }
    }
    points
}
