//! Signal Processing Core
//!
//! The comb filter engine and its companion components: the multichannel
//! sample buffer, the FIR/IIR filters, the shape-validated comparator,
//! and the 16-bit quantizer. Everything here is a bounded, deterministic
//! computation over in-memory buffers; file I/O lives in [`crate::io`].

mod buffer;
mod comb;
mod compare;
mod quantize;

pub use buffer::SampleBuffer;
pub use comb::{apply, apply_fir, apply_iir, FilterParameters, FilterType};
pub use compare::{compare, DifferenceBuffer};
pub use quantize::{quantize, QuantizedBuffer, QUANT_SCALE};
