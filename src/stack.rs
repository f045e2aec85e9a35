//! Input rank normalization.
//!
//! Every filter accepts a 2D image or a 3D stack; a 2D input is promoted to a
//! stack of one before any other work. Anything else is rejected with the
//! observed rank.

use ndarray::{Array3, ArrayViewD, Axis, Ix2, Ix3};

use crate::error::PhaseError;
use crate::float_trait::PhaseFloat;

/// Promote a dynamic-rank input to a `(depth, rows, cols)` stack in f64.
pub fn to_stack<F: PhaseFloat>(data: ArrayViewD<'_, F>) -> Result<Array3<f64>, PhaseError> {
    let ndim = data.ndim();
    match ndim {
        2 => {
            let image = data
                .into_dimensionality::<Ix2>()
                .map_err(|_| PhaseError::InvalidShape(ndim))?;
            Ok(image.mapv(|v| v.as_f64()).insert_axis(Axis(0)))
        }
        3 => {
            let stack = data
                .into_dimensionality::<Ix3>()
                .map_err(|_| PhaseError::InvalidShape(ndim))?;
            Ok(stack.mapv(|v| v.as_f64()))
        }
        n => Err(PhaseError::InvalidShape(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array3, Array4};

    #[test]
    fn test_2d_promoted_to_single_image_stack() {
        let image = Array2::<f32>::ones((5, 7));
        let stack = to_stack(image.view().into_dyn()).unwrap();
        assert_eq!(stack.dim(), (1, 5, 7));
    }

    #[test]
    fn test_3d_passes_through() {
        let data = Array3::<f64>::zeros((4, 5, 7));
        let stack = to_stack(data.view().into_dyn()).unwrap();
        assert_eq!(stack.dim(), (4, 5, 7));
    }

    #[test]
    fn test_rank_1_rejected() {
        let data = Array1::<f32>::zeros(9);
        let err = to_stack(data.view().into_dyn()).unwrap_err();
        assert_eq!(err, PhaseError::InvalidShape(1));
    }

    #[test]
    fn test_rank_4_rejected() {
        let data = Array4::<f32>::zeros((2, 2, 4, 4));
        let err = to_stack(data.view().into_dyn()).unwrap_err();
        assert_eq!(err, PhaseError::InvalidShape(4));
    }

    #[test]
    fn test_values_widened_exactly() {
        let mut image = Array2::<f32>::zeros((2, 2));
        image[[1, 0]] = 2.5;
        let stack = to_stack(image.view().into_dyn()).unwrap();
        assert_eq!(stack[[0, 1, 0]], 2.5f64);
    }
}
