//! Comb Filters
//!
//! Feed-forward (FIR) and feedback (IIR) single-tap comb filters.
//!
//! Both filters process each channel independently, iterating frames in
//! strictly ascending order. The iteration discipline and the exact f32
//! arithmetic here are load-bearing: outputs are compared bit-for-bit
//! against other implementations of the same algorithms, so nothing may
//! be reordered, fused, or clamped.

use serde::{Deserialize, Serialize};

use crate::dsp::buffer::SampleBuffer;

/// Which comb filter algorithm to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Feed-forward: delayed tap reads the input signal
    Fir,
    /// Feedback: delayed tap reads the filter's own output
    Iir,
}

/// Comb filter parameters
///
/// The delay length in samples is always derived from `sample_rate_hz`
/// and `delay_seconds`; it is never stored independently. Gain is not
/// clamped: feedback gains at or above 1.0 make the IIR recurrence grow
/// without bound, and that divergence is propagated downstream untouched
/// so cross-implementation comparison can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    /// Processing sample rate in Hz; the delay length is derived from
    /// this rate, not from the rate carried by the input buffer
    pub sample_rate_hz: u32,
    /// Tap gain (typically in [-1, 1], deliberately not clamped)
    pub gain: f32,
    /// Tap delay in seconds (non-negative)
    pub delay_seconds: f64,
}

impl FilterParameters {
    /// Create parameters for the given rate, gain, and delay
    pub fn new(sample_rate_hz: u32, gain: f32, delay_seconds: f64) -> Self {
        Self {
            sample_rate_hz,
            gain,
            delay_seconds,
        }
    }

    /// Delay length in whole samples: floor(sample_rate_hz * delay_seconds)
    pub fn delay_samples(&self) -> usize {
        (self.sample_rate_hz as f64 * self.delay_seconds) as usize
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            gain: 0.5,
            delay_seconds: 0.25,
        }
    }
}

/// Apply a feed-forward (FIR) comb filter
///
/// For every channel and every frame `n`:
/// `out[n] = in[n] + gain * in[n - delay]` when `n >= delay`, else `in[n]`.
///
/// The delayed tap reads only the immutable input, so a delay at or
/// beyond the frame count degenerates to an identity copy of the input.
/// The output carries `params.sample_rate_hz` as its rate.
pub fn apply_fir(input: &SampleBuffer, params: &FilterParameters) -> SampleBuffer {
    let delay = params.delay_samples();
    let gain = params.gain;
    let num_frames = input.num_frames();

    let mut output = SampleBuffer::new(input.num_channels(), num_frames, params.sample_rate_hz);

    for ch in 0..input.num_channels() {
        let in_ch = input.channel(ch);
        let out_ch = output.channel_mut(ch);
        for n in 0..num_frames {
            out_ch[n] = in_ch[n];
            if n >= delay {
                out_ch[n] += gain * in_ch[n - delay];
            }
        }
    }

    output
}

/// Apply a feedback (IIR) comb filter
///
/// For every channel and every frame `n`, in strictly ascending order:
/// `out[n] = in[n] + gain * out[n - delay]` when `n >= delay`, else `in[n]`.
///
/// Unlike the FIR variant, the delayed tap reads the filter's own
/// already-finalized output, so frames within a channel cannot be
/// reordered. Channels remain independent of each other.
pub fn apply_iir(input: &SampleBuffer, params: &FilterParameters) -> SampleBuffer {
    let delay = params.delay_samples();
    let gain = params.gain;
    let num_frames = input.num_frames();

    let mut output = SampleBuffer::new(input.num_channels(), num_frames, params.sample_rate_hz);

    for ch in 0..input.num_channels() {
        let in_ch = input.channel(ch);
        let out_ch = output.channel_mut(ch);
        for n in 0..num_frames {
            out_ch[n] = in_ch[n];
            if n >= delay {
                out_ch[n] += gain * out_ch[n - delay];
            }
        }
    }

    output
}

/// Apply the comb filter selected by `filter_type`
pub fn apply(
    input: &SampleBuffer,
    filter_type: FilterType,
    params: &FilterParameters,
) -> SampleBuffer {
    match filter_type {
        FilterType::Fir => apply_fir(input, params),
        FilterType::Iir => apply_iir(input, params),
    }
}
