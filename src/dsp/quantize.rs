//! Quantizer
//!
//! Converts floating-point buffers to 16-bit signed fixed point for
//! lossless-format persistence.
//!
//! Scaling is `sample * 32767.0` with truncation toward zero. Samples
//! are deliberately NOT clamped to [-1, 1] first: the reference pipeline
//! quantizes unclipped filter output, and out-of-range values narrow via
//! the language's native float-to-int conversion (saturating in Rust).
//! That is a known correctness gap in the reference behavior, preserved
//! here so cross-implementation comparisons see the same numbers.

use crate::dsp::buffer::SampleBuffer;

/// Full-scale factor for 16-bit signed quantization
pub const QUANT_SCALE: f32 = 32767.0;

/// Fixed-point (16-bit signed) rendition of a sample buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedBuffer {
    /// Quantized data: outer Vec is channels, inner Vec is frames
    samples: Vec<Vec<i16>>,
    /// Sample rate in Hz, carried over from the source buffer
    sample_rate: u32,
}

impl QuantizedBuffer {
    /// Number of channels
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames per channel
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Quantized samples for one channel
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn channel(&self, index: usize) -> &[i16] {
        &self.samples[index]
    }

    /// Collapse a single-channel buffer into a flat sample sequence
    ///
    /// Returns `None` for multichannel buffers; use
    /// [`QuantizedBuffer::to_interleaved`] for those.
    pub fn flatten(&self) -> Option<&[i16]> {
        match self.samples.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Interleave channel rows into frame-major order for an encoder
    pub fn to_interleaved(&self) -> Vec<i16> {
        let num_frames = self.num_frames();
        let mut interleaved = Vec::with_capacity(self.num_channels() * num_frames);

        for frame in 0..num_frames {
            for channel in &self.samples {
                interleaved.push(channel[frame]);
            }
        }

        interleaved
    }
}

/// Quantize a floating-point buffer to 16-bit signed integers
///
/// Each sample becomes `(sample * 32767.0) as i16`: truncation toward
/// zero, with Rust's saturating float-to-int narrowing for values that
/// scale outside the i16 range. No clipping happens before the cast.
pub fn quantize(buffer: &SampleBuffer) -> QuantizedBuffer {
    let samples = buffer
        .channels()
        .map(|ch| ch.iter().map(|&s| (s * QUANT_SCALE) as i16).collect())
        .collect();

    QuantizedBuffer {
        samples,
        sample_rate: buffer.sample_rate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_reference_values() {
        let buf = SampleBuffer::from_channels(vec![vec![0.0, 1.0, -1.0, 0.5]], 44100).unwrap();

        let q = quantize(&buf);

        assert_eq!(q.channel(0), &[0, 32767, -32767, 16383]);
        assert_eq!(q.sample_rate(), 44100);
    }

    #[test_case(0.25, 8191; "quarter scale truncates")]
    #[test_case(-0.5, -16383; "negative truncates toward zero")]
    #[test_case(0.000_01, 0; "tiny value truncates to zero")]
    #[test_case(-0.000_01, 0; "tiny negative truncates to zero")]
    fn test_truncation_toward_zero(sample: f32, expected: i16) {
        let buf = SampleBuffer::from_channels(vec![vec![sample]], 44100).unwrap();
        assert_eq!(quantize(&buf).channel(0), &[expected]);
    }

    #[test]
    fn test_out_of_range_narrows_natively() {
        // Unclipped filter output above full scale saturates via the
        // native float-to-int cast; no clamping happens before scaling
        let buf = SampleBuffer::from_channels(vec![vec![2.0, -2.0]], 44100).unwrap();

        let q = quantize(&buf);

        assert_eq!(q.channel(0), &[i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_shape_preserved() {
        let buf = SampleBuffer::new(2, 300, 48000);
        let q = quantize(&buf);

        assert_eq!(q.num_channels(), 2);
        assert_eq!(q.num_frames(), 300);
    }

    #[test]
    fn test_flatten_mono_only() {
        let mono = quantize(&SampleBuffer::from_channels(vec![vec![0.5, 0.5]], 44100).unwrap());
        assert_eq!(mono.flatten(), Some(&[16383_i16, 16383][..]));

        let stereo = quantize(&SampleBuffer::new(2, 2, 44100));
        assert_eq!(stereo.flatten(), None);
    }

    #[test]
    fn test_to_interleaved() {
        let buf = SampleBuffer::from_channels(
            vec![vec![0.0, 1.0], vec![-1.0, 0.5]],
            44100,
        )
        .unwrap();

        let q = quantize(&buf);

        assert_eq!(q.to_interleaved(), vec![0, -32767, 32767, 16383]);
    }
}
