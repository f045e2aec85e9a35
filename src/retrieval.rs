//! Single-step phase retrieval from phase-contrast measurements.

use log::debug;
use ndarray::{s, Array2, Array3, ArrayViewD, Axis};
use rayon::prelude::*;

use crate::error::PhaseError;
use crate::float_trait::PhaseFloat;
use crate::padding::{phase_pad_value, phase_pad_width};
use crate::reciprocal::{paganin_filter_factor, reciprocal_grid, wavelength};
use crate::stack::to_stack;
use crate::transforms::{self, FftPlans};

/// Parameters for [`retrieve_phase`].
#[derive(Debug, Clone, Copy)]
pub struct RetrievalParams {
    /// Detector pixel size in cm.
    pub pixel_size: f64,
    /// Propagation distance of the wavefront in cm.
    pub dist: f64,
    /// Energy of the incident wave in keV.
    pub energy: f64,
    /// Regularization parameter.
    pub alpha: f64,
    /// Extend the projections by padding before transforming.
    pub pad: bool,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            pixel_size: 1e-4,
            dist: 50.0,
            energy: 20.0,
            alpha: 1e-3,
            pad: true,
        }
    }
}

/// Perform single-step phase retrieval on a stack of projections.
///
/// The regularized inverse filter is evaluated on the reciprocal grid of the
/// padded geometry, frequency-shifted, normalized by its own maximum, and
/// multiplied into the spectrum of every padded image. Padding replicates the
/// interior border outward over a buffer pre-filled with the mean of the
/// stack's first and last columns.
///
/// Returns a new stack of the input's (un-padded) geometry in single
/// precision; the input is never mutated.
///
/// Each padded axis needs at least two samples for the reciprocal-space
/// spacing to be defined; a degenerate single-sample axis propagates as
/// non-finite output values rather than an error.
pub fn retrieve_phase<F: PhaseFloat>(
    data: ArrayViewD<'_, F>,
    params: &RetrievalParams,
) -> Result<Array3<f32>, PhaseError> {
    let tomo = to_stack(data)?;
    let (depth, dy, dz) = tomo.dim();

    let wl = wavelength(params.energy);
    let (py, pz, val) = if params.pad {
        (
            phase_pad_width(dy, params.pixel_size, wl, params.dist),
            phase_pad_width(dz, params.pixel_size, wl, params.dist),
            phase_pad_value(&tomo),
        )
    } else {
        (0, 0, 0.0)
    };
    let rows = dy + 2 * py;
    let cols = dz + 2 * pz;
    debug!("phase retrieval: {depth} images of {dy}x{dz}, padded to {rows}x{cols}");

    let w2 = reciprocal_grid(params.pixel_size, rows, cols);
    let factor = paganin_filter_factor(params.energy, params.dist, params.alpha, &w2);
    let shifted = transforms::fftshift2(factor.view());
    let max = shifted.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let filter = shifted.mapv(|v| v / max);

    let plans = FftPlans::new(rows, cols);

    let images: Vec<Array2<f32>> = (0..depth)
        .into_par_iter()
        .map(|m| {
            let mut prj = Array2::<f64>::from_elem((rows, cols), val);
            prj.slice_mut(s![py..py + dy, pz..pz + dz])
                .assign(&tomo.index_axis(Axis(0), m));

            // Replicate the interior border outward, rows then columns, so
            // the column fill also covers the pad-row corners.
            if py > 0 {
                let top = prj.row(py).to_owned();
                let bottom = prj.row(rows - py - 1).to_owned();
                for r in 0..py {
                    prj.row_mut(r).assign(&top);
                }
                for r in rows - py..rows {
                    prj.row_mut(r).assign(&bottom);
                }
            }
            if pz > 0 {
                let left = prj.column(pz).to_owned();
                let right = prj.column(cols - pz - 1).to_owned();
                for c in 0..pz {
                    prj.column_mut(c).assign(&left);
                }
                for c in cols - pz..cols {
                    prj.column_mut(c).assign(&right);
                }
            }

            let mut freq = transforms::fft2d(prj.view(), &plans);
            freq.zip_mut_with(&filter, |f, &w| *f *= w);
            let spatial = transforms::ifft2d(&freq, &plans);

            if params.pad {
                spatial
                    .slice(s![py..py + dy, pz..pz + dz])
                    .mapv(|v| v.re as f32)
            } else {
                spatial.mapv(|v| v.re as f32)
            }
        })
        .collect();

    let mut res = Array3::<f32>::zeros((depth, dy, dz));
    for (m, image) in images.into_iter().enumerate() {
        res.slice_mut(s![m, .., ..]).assign(&image);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;

    #[test]
    fn test_unpadded_keeps_shape() {
        let data = Array3::<f32>::ones((1, 16, 16));
        let params = RetrievalParams {
            pad: false,
            ..RetrievalParams::default()
        };
        let res = retrieve_phase(data.view().into_dyn(), &params).unwrap();
        assert_eq!(res.dim(), (1, 16, 16));
        assert!(res.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_padded_output_has_original_shape() {
        let data = Array3::<f32>::ones((2, 16, 24));
        let res = retrieve_phase(data.view().into_dyn(), &RetrievalParams::default()).unwrap();
        assert_eq!(res.dim(), (2, 16, 24));
    }

    #[test]
    fn test_input_not_mutated() {
        let data = Array3::<f32>::from_shape_fn((1, 16, 16), |(_, i, j)| (i + j) as f32);
        let copy = data.clone();
        let _ = retrieve_phase(data.view().into_dyn(), &RetrievalParams::default()).unwrap();
        assert_eq!(data, copy);
    }

    #[test]
    fn test_uniform_input_stays_near_uniform() {
        // A constant image is pure DC; the normalized filter leaves the DC
        // bin scaled by a constant, so the output is spatially flat.
        let data = Array3::<f64>::from_elem((1, 16, 16), 2.0);
        let res = retrieve_phase(data.view().into_dyn(), &RetrievalParams::default()).unwrap();
        let first = res[[0, 0, 0]];
        for &v in res.iter() {
            assert_abs_diff_eq!(v, first, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_single_sample_axis_propagates_non_finite() {
        // One row leaves the reciprocal spacing undefined; the result keeps
        // its shape and degenerates to NaN instead of raising.
        let data = Array3::<f32>::ones((1, 1, 16));
        let params = RetrievalParams {
            pad: false,
            ..RetrievalParams::default()
        };
        let res = retrieve_phase(data.view().into_dyn(), &params).unwrap();
        assert_eq!(res.dim(), (1, 1, 16));
        assert!(res.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rank_rejection() {
        let rank4 = ndarray::Array4::<f32>::zeros((2, 2, 4, 4));
        let err = retrieve_phase(rank4.view().into_dyn(), &RetrievalParams::default());
        assert_eq!(err.unwrap_err(), PhaseError::InvalidShape(4));
    }

    #[test]
    fn test_2d_input_promoted() {
        let data = ndarray::Array2::<f32>::ones((16, 16));
        let params = RetrievalParams {
            pad: false,
            ..RetrievalParams::default()
        };
        let res = retrieve_phase(data.view().into_dyn(), &params).unwrap();
        assert_eq!(res.dim(), (1, 16, 16));
    }

    #[test]
    fn test_stronger_regularization_weakens_filter() {
        // Larger alpha flattens the normalized filter, pulling the output
        // closer to the plain input.
        let data = Array3::<f32>::from_shape_fn((1, 16, 16), |(_, i, j)| {
            1.0 + 0.1 * ((i * 16 + j) as f32 * 0.37).sin()
        });
        let weak = RetrievalParams {
            alpha: 1.0,
            pad: false,
            ..RetrievalParams::default()
        };
        let res = retrieve_phase(data.view().into_dyn(), &weak).unwrap();
        let mut max_dev = 0.0f32;
        for (idx, &v) in res.indexed_iter() {
            max_dev = max_dev.max((v - data[idx]).abs());
        }
        let strong = RetrievalParams {
            alpha: 1e-6,
            pad: false,
            ..RetrievalParams::default()
        };
        let res2 = retrieve_phase(data.view().into_dyn(), &strong).unwrap();
        let mut max_dev2 = 0.0f32;
        for (idx, &v) in res2.indexed_iter() {
            max_dev2 = max_dev2.max((v - data[idx]).abs());
        }
        assert!(max_dev <= max_dev2 + 1e-6, "weak {max_dev} vs strong {max_dev2}");
    }
}
