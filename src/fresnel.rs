//! Fresnel filter for phase-contrast fringe suppression.

use log::debug;
use ndarray::{s, Array2, Array3, ArrayViewD, Axis};
use rayon::prelude::*;

use crate::error::PhaseError;
use crate::float_trait::PhaseFloat;
use crate::padding::{fresnel_pad_width, pad_2d, PadMode};
use crate::stack::to_stack;
use crate::transforms::{self, FftPlans};

/// Rows dropped from the top of each projection before padding, to keep the
/// timestamp band burned into some detectors out of the edge-replication
/// source. Images with no more rows than this cannot contain the band and
/// are filtered whole.
const TOP_DROP: usize = 10;

/// Spatial layout of the images being filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Projection images: the window attenuates in both axes.
    Projection,
    /// Sinograms (or any generic layout): fringing is assumed constant along
    /// the angle axis, so the window varies along columns only.
    Sinogram,
}

/// Attenuation window, built once per call on the un-padded geometry.
fn make_window(height: usize, width: usize, ratio: f64, pattern: Pattern) -> Array2<f64> {
    let center_row = ((height - 1) as f64 * 0.5).ceil();
    let center_col = ((width - 1) as f64 * 0.5).ceil();
    match pattern {
        Pattern::Projection => Array2::from_shape_fn((height, width), |(i, j)| {
            let u = (j as f64 - center_col) / width as f64;
            let v = (i as f64 - center_row) / height as f64;
            1.0 + ratio * (u * u + v * v)
        }),
        // Row-invariant: the 1D column window tiled over every row.
        Pattern::Sinogram => Array2::from_shape_fn((height, width), |(_, j)| {
            let u = (j as f64 - center_col) / width as f64;
            1.0 + ratio * u * u
        }),
    }
}

/// Apply the Fresnel filter to a stack of projections or sinograms.
///
/// With `apply_log` the filter acts on projected density: the stack is
/// transformed by `-ln(x)` first and by `exp(-x)` after filtering. `ratio`
/// controls the filter strength; zero degenerates to a no-op window.
///
/// A 2D input is treated as a stack of one. The result always has the
/// original (un-padded) rows and columns, in single precision.
pub fn fresnel_filter<F: PhaseFloat>(
    data: ArrayViewD<'_, F>,
    pattern: Pattern,
    ratio: f64,
    apply_log: bool,
) -> Result<Array3<f32>, PhaseError> {
    let mut mat = to_stack(data)?;
    if apply_log {
        mat.mapv_inplace(|v| -v.ln());
    }

    let (depth, nrow, ncol) = mat.dim();
    let window = make_window(nrow, ncol, ratio, pattern);
    let pad = fresnel_pad_width(ncol);
    debug!("fresnel filter: {depth} images of {nrow}x{ncol}, pattern {pattern:?}, pad {pad}");

    let images: Vec<Array2<f64>> = match pattern {
        Pattern::Projection => {
            let win_pad = pad_2d(window.view(), (pad, pad), (pad, pad), PadMode::Edge);
            let win_shifted = transforms::ifftshift2(win_pad.view());
            let plans = FftPlans::new(nrow + 2 * pad, ncol + 2 * pad);
            let top_drop = if nrow > TOP_DROP { TOP_DROP } else { 0 };

            (0..depth)
                .into_par_iter()
                .map(|m| {
                    let image = mat.index_axis(Axis(0), m);
                    let body = image.slice(s![top_drop.., ..]);
                    let padded =
                        pad_2d(body, (pad + top_drop, pad), (pad, pad), PadMode::Edge);
                    let mut freq = transforms::fft2d(padded.view(), &plans);
                    freq.zip_mut_with(&win_shifted, |f, &w| *f /= w);
                    let spatial = transforms::ifft2d(&freq, &plans);
                    spatial
                        .slice(s![pad..pad + nrow, pad..pad + ncol])
                        .mapv(|v| v.re)
                })
                .collect()
        }
        Pattern::Sinogram => {
            let win_pad = pad_2d(window.view(), (0, 0), (pad, pad), PadMode::Edge);
            let plans = FftPlans::new(nrow, ncol + 2 * pad);

            (0..depth)
                .into_par_iter()
                .map(|m| {
                    let image = mat.index_axis(Axis(0), m);
                    let padded = pad_2d(image, (0, 0), (pad, pad), PadMode::Edge);
                    let freq = transforms::fft_rows(padded.view(), &plans);
                    let mut shifted = transforms::fftshift_cols(freq.view());
                    shifted.zip_mut_with(&win_pad, |f, &w| *f /= w);
                    let unshifted = transforms::ifftshift_cols(shifted.view());
                    let spatial = transforms::ifft_rows(&unshifted, &plans);
                    spatial.slice(s![.., pad..pad + ncol]).mapv(|v| v.re)
                })
                .collect()
        }
    };

    let mut res = Array3::<f32>::zeros((depth, nrow, ncol));
    for (m, image) in images.into_iter().enumerate() {
        let mut slot = res.slice_mut(s![m, .., ..]);
        if apply_log {
            slot.zip_mut_with(&image, |o, &v| *o = (-v).exp() as f32);
        } else {
            slot.zip_mut_with(&image, |o, &v| *o = v as f32);
        }
    }
    Ok(res)
}
