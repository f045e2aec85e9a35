//! Phase-contrast enhancement and phase retrieval for tomography.
//!
//! Preprocessing filters for stacks of projection or sinogram images acquired
//! with a partially coherent X-ray beam. Each filter builds a frequency-domain
//! window from the physical acquisition parameters once per call, then applies
//! it to every image in the stack: pad, forward FFT, multiply or divide by the
//! window, inverse FFT, crop back to the original geometry.

pub mod constants;
pub mod error;
pub mod float_trait;
pub mod fresnel;
pub mod paganin;
pub mod padding;
pub mod reciprocal;
pub mod retrieval;
pub mod stack;
pub mod transforms;

// Re-export commonly used types at the crate root
pub use error::PhaseError;
pub use float_trait::PhaseFloat;
pub use fresnel::{fresnel_filter, Pattern};
pub use paganin::{paganin_filter, PaganinParams};
pub use padding::PadMode;
pub use retrieval::{retrieve_phase, RetrievalParams};
