//! Float trait abstraction for f32/f64 input stacks.
//!
//! Filters accept projection data in either precision; all internal math runs
//! in f64 and the output dtype is always f32, matching the downstream
//! reconstruction contract.

use num_traits::{Float, ToPrimitive};
use std::fmt::Debug;

/// Trait for floating point sample types accepted by the filters.
pub trait PhaseFloat: Float + ToPrimitive + Debug + Send + Sync + 'static {
    /// Widen a sample to f64 for internal computation.
    fn as_f64(self) -> f64;
}

impl PhaseFloat for f32 {
    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl PhaseFloat for f64 {
    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}
