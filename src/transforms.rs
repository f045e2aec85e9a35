//! 2D/1D Fourier transforms and frequency-shift helpers.
//!
//! Plans are pre-computed once per filter call and shared read-only across
//! the per-image loop; reusing plans avoids re-initialization overhead inside
//! the stack loop.

use ndarray::{Array2, ArrayView2};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Pre-computed FFT plans for one padded image geometry.
pub struct FftPlans {
    fft_row: Arc<dyn Fft<f64>>,
    fft_col: Arc<dyn Fft<f64>>,
    ifft_row: Arc<dyn Fft<f64>>,
    ifft_col: Arc<dyn Fft<f64>>,
}

impl FftPlans {
    /// Create plans for images of `rows` x `cols` samples.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft_row: planner.plan_fft_forward(cols),
            fft_col: planner.plan_fft_forward(rows),
            ifft_row: planner.plan_fft_inverse(cols),
            ifft_col: planner.plan_fft_inverse(rows),
        }
    }
}

/// Compute the unnormalized 2D FFT of a real image.
pub fn fft2d(input: ArrayView2<f64>, plans: &FftPlans) -> Array2<Complex<f64>> {
    let (rows, cols) = input.dim();

    // 1. Transform rows
    let mut intermediate = Array2::<Complex<f64>>::zeros((rows, cols));
    let mut row_vec = vec![Complex::new(0.0, 0.0); cols];

    for r in 0..rows {
        for (c, &v) in input.row(r).iter().enumerate() {
            row_vec[c] = Complex::new(v, 0.0);
        }
        plans.fft_row.process(&mut row_vec);
        for c in 0..cols {
            intermediate[[r, c]] = row_vec[c];
        }
    }

    // 2. Transform columns
    let mut col_vec = vec![Complex::new(0.0, 0.0); rows];
    for c in 0..cols {
        for r in 0..rows {
            col_vec[r] = intermediate[[r, c]];
        }
        plans.fft_col.process(&mut col_vec);
        for r in 0..rows {
            intermediate[[r, c]] = col_vec[r];
        }
    }

    intermediate
}

/// Compute the 2D inverse FFT, normalized by 1/(rows*cols).
///
/// The result stays complex; callers take the real part or the magnitude
/// depending on the filter's output convention.
pub fn ifft2d(input: &Array2<Complex<f64>>, plans: &FftPlans) -> Array2<Complex<f64>> {
    let (rows, cols) = input.dim();

    // 1. Transform columns
    let mut intermediate = input.clone();
    let mut col_vec = vec![Complex::new(0.0, 0.0); rows];
    for c in 0..cols {
        for r in 0..rows {
            col_vec[r] = intermediate[[r, c]];
        }
        plans.ifft_col.process(&mut col_vec);
        for r in 0..rows {
            intermediate[[r, c]] = col_vec[r];
        }
    }

    // 2. Transform rows
    let norm = 1.0 / (rows * cols) as f64;
    let mut row_vec = vec![Complex::new(0.0, 0.0); cols];
    for r in 0..rows {
        for c in 0..cols {
            row_vec[c] = intermediate[[r, c]];
        }
        plans.ifft_row.process(&mut row_vec);
        for c in 0..cols {
            intermediate[[r, c]] = row_vec[c] * norm;
        }
    }

    intermediate
}

/// Unnormalized 1D FFT applied independently to every row.
pub fn fft_rows(input: ArrayView2<f64>, plans: &FftPlans) -> Array2<Complex<f64>> {
    let (rows, cols) = input.dim();
    let mut output = Array2::<Complex<f64>>::zeros((rows, cols));
    let mut row_vec = vec![Complex::new(0.0, 0.0); cols];

    for r in 0..rows {
        for (c, &v) in input.row(r).iter().enumerate() {
            row_vec[c] = Complex::new(v, 0.0);
        }
        plans.fft_row.process(&mut row_vec);
        for c in 0..cols {
            output[[r, c]] = row_vec[c];
        }
    }

    output
}

/// Per-row 1D inverse FFT, normalized by 1/cols.
pub fn ifft_rows(input: &Array2<Complex<f64>>, plans: &FftPlans) -> Array2<Complex<f64>> {
    let (rows, cols) = input.dim();
    let norm = 1.0 / cols as f64;
    let mut output = Array2::<Complex<f64>>::zeros((rows, cols));
    let mut row_vec = vec![Complex::new(0.0, 0.0); cols];

    for r in 0..rows {
        for c in 0..cols {
            row_vec[c] = input[[r, c]];
        }
        plans.ifft_row.process(&mut row_vec);
        for c in 0..cols {
            output[[r, c]] = row_vec[c] * norm;
        }
    }

    output
}

/// Cyclic roll of a 2D array by `(shift_r, shift_c)` towards higher indices.
fn roll2<T: Clone>(input: ArrayView2<T>, shift_r: usize, shift_c: usize) -> Array2<T> {
    let (rows, cols) = input.dim();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        input[[
            (i + rows - shift_r) % rows,
            (j + cols - shift_c) % cols,
        ]]
        .clone()
    })
}

/// Move the zero-frequency bin to the array center (both axes).
pub fn fftshift2<T: Clone>(input: ArrayView2<T>) -> Array2<T> {
    let (rows, cols) = input.dim();
    roll2(input, rows / 2, cols / 2)
}

/// Inverse of [`fftshift2`]: move the centered zero-frequency bin back to index 0.
pub fn ifftshift2<T: Clone>(input: ArrayView2<T>) -> Array2<T> {
    let (rows, cols) = input.dim();
    roll2(input, rows - rows / 2, cols - cols / 2)
}

/// `fftshift` along the column axis only, rows untouched.
pub fn fftshift_cols<T: Clone>(input: ArrayView2<T>) -> Array2<T> {
    let cols = input.dim().1;
    roll2(input, 0, cols / 2)
}

/// `ifftshift` along the column axis only.
pub fn ifftshift_cols<T: Clone>(input: ArrayView2<T>) -> Array2<T> {
    let cols = input.dim().1;
    roll2(input, 0, cols - cols / 2)
}
