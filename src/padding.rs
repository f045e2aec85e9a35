//! Padding widths, border replication, and crop geometry.
//!
//! Every filter pads before transforming and crops back at
//! `[pad .. pad + original]`, so padded sizes are always
//! `original + pad_before + pad_after`.

use ndarray::{s, Array2, Array3, ArrayView2};

use crate::constants::PI;

/// How the pad region is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Replicate the border pixel outward.
    Edge,
    /// Fill with zeros.
    Zero,
}

/// Pad width for the Fresnel filter: a tenth of the image width, capped at
/// 150 pixels to avoid excessive padding on small images.
pub fn fresnel_pad_width(width: usize) -> usize {
    150.min(width / 10)
}

/// Pad width for single-step phase retrieval.
///
/// Rounds the padded dimension up to the next power of two large enough to
/// hold the physical blur kernel support `ceil(pi * wavelength * dist /
/// pixel_size^2)`, which keeps the transform size favorable and avoids
/// circular wrap-around from the kernel's spatial extent.
pub fn phase_pad_width(dim: usize, pixel_size: f64, wavelength: f64, dist: f64) -> usize {
    let pad_pix = (PI * wavelength * dist / (pixel_size * pixel_size)).ceil();
    let target = (dim as f64 + pad_pix).log2().ceil();
    ((2.0f64.powf(target) - dim as f64) * 0.5) as usize
}

/// Border fill value for single-step phase retrieval: the mean of the first
/// and last columns over the whole stack.
pub fn phase_pad_value(stack: &Array3<f64>) -> f64 {
    let (depth, rows, cols) = stack.dim();
    let mut sum = 0.0;
    for m in 0..depth {
        for r in 0..rows {
            sum += (stack[[m, r, 0]] + stack[[m, r, cols - 1]]) * 0.5;
        }
    }
    sum / (depth * rows) as f64
}

/// Pad a 2D image with independent (before, after) widths per axis.
pub fn pad_2d(
    input: ArrayView2<f64>,
    pad_rows: (usize, usize),
    pad_cols: (usize, usize),
    mode: PadMode,
) -> Array2<f64> {
    let (rows, cols) = input.dim();
    let out_rows = rows + pad_rows.0 + pad_rows.1;
    let out_cols = cols + pad_cols.0 + pad_cols.1;

    match mode {
        PadMode::Edge => Array2::from_shape_fn((out_rows, out_cols), |(i, j)| {
            let r = i.saturating_sub(pad_rows.0).min(rows - 1);
            let c = j.saturating_sub(pad_cols.0).min(cols - 1);
            input[[r, c]]
        }),
        PadMode::Zero => {
            let mut out = Array2::<f64>::zeros((out_rows, out_cols));
            out.slice_mut(s![
                pad_rows.0..pad_rows.0 + rows,
                pad_cols.0..pad_cols.0 + cols
            ])
            .assign(&input);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn test_fresnel_pad_width_tenth_of_width() {
        assert_eq!(fresnel_pad_width(64), 6);
        assert_eq!(fresnel_pad_width(640), 64);
    }

    #[test]
    fn test_fresnel_pad_width_capped() {
        assert_eq!(fresnel_pad_width(10_000), 150);
    }

    #[test]
    fn test_phase_pad_width_padded_dim_is_power_of_two() {
        // 20 keV, 50 cm, 1e-4 cm pixels: the defaults of the retrieval path.
        let wavelength = 6.1992e-9;
        for dim in [16usize, 64, 100, 256] {
            let pad = phase_pad_width(dim, 1e-4, wavelength, 50.0);
            let padded = dim + 2 * pad;
            // Even dims pad to an exact power of two.
            if dim % 2 == 0 {
                assert!(padded.is_power_of_two(), "dim {dim} padded to {padded}");
            }
            let pad_pix = (PI * wavelength * 50.0 / 1e-8).ceil() as usize;
            assert!(padded + 1 >= dim + pad_pix);
        }
    }

    #[test]
    fn test_phase_pad_value_mean_of_border_columns() {
        let mut stack = Array3::<f64>::zeros((2, 3, 4));
        stack.slice_mut(s![.., .., 0]).fill(2.0);
        stack.slice_mut(s![.., .., 3]).fill(4.0);
        assert!((phase_pad_value(&stack) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_padding_replicates_border() {
        let input = Array2::from_shape_fn((2, 3), |(i, j)| (i * 3 + j) as f64);
        let padded = pad_2d(input.view(), (2, 1), (1, 2), PadMode::Edge);
        assert_eq!(padded.dim(), (5, 6));
        // Corners replicate the corner pixels.
        assert_eq!(padded[[0, 0]], input[[0, 0]]);
        assert_eq!(padded[[4, 5]], input[[1, 2]]);
        // Pad rows replicate the nearest interior row.
        assert_eq!(padded[[1, 2]], input[[0, 1]]);
        assert_eq!(padded[[4, 2]], input[[1, 1]]);
    }

    #[test]
    fn test_zero_padding_keeps_interior() {
        let input = Array2::from_elem((2, 2), 5.0);
        let padded = pad_2d(input.view(), (1, 1), (1, 1), PadMode::Zero);
        assert_eq!(padded[[0, 0]], 0.0);
        assert_eq!(padded[[1, 1]], 5.0);
        assert_eq!(padded[[3, 3]], 0.0);
    }

    #[test]
    fn test_crop_is_exact_inverse_of_pad() {
        let input = Array2::from_shape_fn((5, 8), |(i, j)| (i * 8 + j) as f64);
        for pad in [1usize, 3, 7] {
            let padded = pad_2d(input.view(), (pad, pad), (pad, pad), PadMode::Edge);
            let cropped = padded.slice(s![pad..pad + 5, pad..pad + 8]);
            assert_eq!(cropped, input);
        }
    }

    #[test]
    fn test_asymmetric_pad_total_size() {
        let input = Array2::<f64>::ones((4, 4));
        let padded = pad_2d(input.view(), (16, 6), (6, 6), PadMode::Edge);
        assert_eq!(padded.dim(), (26, 16));
    }
}
