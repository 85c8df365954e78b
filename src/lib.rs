//! Recomb - Comb Filter Engine with Output Verification
//!
//! Recomb applies time-domain comb filters (feed-forward FIR and
//! feedback IIR) to multichannel audio, and diffs two equal-shaped
//! signals sample by sample so filter outputs can be verified
//! bit-for-bit against other implementations of the same algorithms.
//!
//! # Architecture
//!
//! - [`dsp`]: the core engine — sample buffers, the two comb filters,
//!   the shape-validated comparator, and the 16-bit quantizer
//! - [`io`]: WAV decode/encode collaborators at the pipeline edges
//! - [`pipeline`]: explicit orchestration of decode -> filter ->
//!   quantize -> encode and decode x2 -> compare

pub mod dsp;
pub mod error;
pub mod io;
pub mod pipeline;

pub use error::{RecombError, Result};
