//! Paganin filter for single-material phase retrieval on projections.

use log::debug;
use ndarray::{s, Array2, Array3, ArrayViewD, Axis};
use rayon::prelude::*;
use rustfft::num_complex::Complex;

use crate::constants::PI;
use crate::error::PhaseError;
use crate::float_trait::PhaseFloat;
use crate::padding::{pad_2d, PadMode};
use crate::stack::to_stack;
use crate::transforms::{self, FftPlans};

/// Parameters for [`paganin_filter`].
#[derive(Debug, Clone, Copy)]
pub struct PaganinParams {
    /// Ratio of delta/beta.
    pub ratio: f64,
    /// Beam energy in keV.
    pub energy: f64,
    /// Sample-to-detector distance in metres.
    pub distance: f64,
    /// Detector pixel size in microns.
    pub resolution: f64,
    /// Pad applied to the top and bottom of each projection.
    pub pad_y: usize,
    /// Pad applied to the left and right of each projection.
    pub pad_x: usize,
    /// How the pad region is filled.
    pub pad_mode: PadMode,
    /// Offset added to the filtered magnitude before taking the log.
    pub increment: f64,
}

impl Default for PaganinParams {
    fn default() -> Self {
        Self {
            ratio: 250.0,
            energy: 53.0,
            distance: 1.0,
            resolution: 1.28,
            pad_y: 100,
            pad_x: 100,
            pad_mode: PadMode::Edge,
            increment: 0.0,
        }
    }
}

/// Apply the Paganin filter to a stack of projections.
///
/// The rational frequency-domain filter is built once on the padded geometry
/// and applied to every image. Per image, non-finite pixels are scrubbed to
/// zero and exact zeros replaced with one before the log-domain output
/// `-0.5 * ratio * ln(|ifft| + increment)` is taken.
///
/// The result keeps the original (un-padded) geometry, in single precision.
pub fn paganin_filter<F: PhaseFloat>(
    data: ArrayViewD<'_, F>,
    params: &PaganinParams,
) -> Result<Array3<f32>, PhaseError> {
    let mat = to_stack(data)?;
    let (depth, height, width) = mat.dim();

    let energy_ev = params.energy * 1000.0;
    let resolution_m = params.resolution * 1e-6;
    let wavelength = (1240.0 / energy_ev) * 1e-9;

    let height1 = height + 2 * params.pad_y;
    let width1 = width + 2 * params.pad_x;
    let centery = (height1 as f64 / 2.0).ceil() - 1.0;
    let centerx = (width1 as f64 / 2.0).ceil() - 1.0;
    let dpy = 1.0 / (height1 as f64 * resolution_m);
    let dpx = 1.0 / (width1 as f64 * resolution_m);
    debug!("paganin filter: {depth} images of {height}x{width}, padded to {height1}x{width1}");

    // Filter on the padded geometry, built once per call.
    let ratio = params.ratio;
    let distance = params.distance;
    let filter = Array2::from_shape_fn((height1, width1), |(i, j)| {
        let py = (i as f64 - centery) * dpy;
        let px = (j as f64 - centerx) * dpx;
        let pd = (px * px + py * py) * wavelength * distance * PI;
        let f = 1.0 + ratio * pd;
        Complex::new(f, f)
    });

    let plans = FftPlans::new(height1, width1);

    let images: Vec<Array2<f32>> = (0..depth)
        .into_par_iter()
        .map(|m| {
            let image = mat.index_axis(Axis(0), m);
            let mut proj = pad_2d(
                image,
                (params.pad_y, params.pad_y),
                (params.pad_x, params.pad_x),
                params.pad_mode,
            );
            // Scrub non-finite values, then guard the log against zeros.
            proj.mapv_inplace(|v| if v.is_finite() { v } else { 0.0 });
            proj.mapv_inplace(|v| if v == 0.0 { 1.0 } else { v });

            let freq = transforms::fft2d(proj.view(), &plans);
            let mut shifted = transforms::fftshift2(freq.view());
            shifted.zip_mut_with(&filter, |f, &w| *f /= w);
            let spatial = transforms::ifft2d(&shifted, &plans);

            let cropped = spatial.slice(s![
                params.pad_y..params.pad_y + height,
                params.pad_x..params.pad_x + width
            ]);
            cropped.mapv(|v| (-0.5 * ratio * (v.norm() + params.increment).ln()) as f32)
        })
        .collect();

    let mut res = Array3::<f32>::zeros((depth, height, width));
    for (m, image) in images.into_iter().enumerate() {
        res.slice_mut(s![m, .., ..]).assign(&image);
    }
    Ok(res)
}
