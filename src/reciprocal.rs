//! Reciprocal-space grids and the regularized phase filter factor.

use ndarray::{Array1, Array2, Axis};

use crate::constants::{PI, PLANCK_CONSTANT, SPEED_OF_LIGHT};

/// Photon wavelength in cm for a beam energy in keV.
pub fn wavelength(energy: f64) -> f64 {
    2.0 * PI * PLANCK_CONSTANT * SPEED_OF_LIGHT / energy
}

/// Reciprocal-space coordinates for an axis of `num_grid` samples.
///
/// Coordinates are symmetric around zero: `rc[k] = (2k - (n-1)) /
/// (2 (n-1) pixel_size)`, so index `(n-1)/2` maps to zero frequency.
/// `num_grid` must be at least 2; the spacing is undefined below that.
pub fn reciprocal_coord(pixel_size: f64, num_grid: usize) -> Array1<f64> {
    let n = (num_grid - 1) as f64;
    let scale = 0.5 / (n * pixel_size);
    Array1::from_shape_fn(num_grid, |k| (2.0 * k as f64 - n) * scale)
}

/// Squared-frequency grid: `grid[i, j] = rc_x[i]^2 + rc_y[j]^2`.
pub fn reciprocal_grid(pixel_size: f64, nx: usize, ny: usize) -> Array2<f64> {
    let indx = reciprocal_coord(pixel_size, nx).mapv(|v| v * v);
    let indy = reciprocal_coord(pixel_size, ny).mapv(|v| v * v);
    // Outer sum via broadcasting: (nx, 1) + (ny,) -> (nx, ny).
    &indx.insert_axis(Axis(1)) + &indy
}

/// Regularized inverse filter response over a squared-frequency grid.
pub fn paganin_filter_factor(energy: f64, dist: f64, alpha: f64, w2: &Array2<f64>) -> Array2<f64> {
    let wl = wavelength(energy);
    w2.mapv(|w| 1.0 / (wl * dist * w / (4.0 * PI) + alpha))
}
